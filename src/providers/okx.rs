use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rate::{CurrencyPair, RateRecord, RateSource, SourceError};
use crate::providers::util::{HttpSettings, build_client};

/// Rate source backed by OKX's quick-exchange quote endpoint.
///
/// A buy-side quote for 1 unit of the pair's base currency returns both
/// directions of the conversion at once: `askBaseSz` is the forward rate
/// and `askPx` the inverse, so no arithmetic inversion happens here.
pub struct OkxQuoteSource {
    base_url: String,
    client: reqwest::Client,
}

impl OkxQuoteSource {
    pub fn new(base_url: &str, settings: &HttpSettings) -> Result<Self> {
        Ok(OkxQuoteSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(settings)?,
        })
    }
}

#[derive(Serialize)]
struct QuoteRequest {
    side: &'static str,
    #[serde(rename = "baseCcy")]
    base_ccy: String,
    #[serde(rename = "quoteCcy")]
    quote_ccy: String,
    #[serde(rename = "rfqSz")]
    rfq_sz: u32,
    #[serde(rename = "rfqSzCcy")]
    rfq_sz_ccy: String,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    code: i64,
    data: Option<QuoteData>,
    #[serde(default)]
    msg: String,
    error_message: Option<String>,
}

impl QuoteResponse {
    fn error_detail(&self) -> String {
        match &self.error_message {
            Some(message) if !message.is_empty() => message.clone(),
            _ => self.msg.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(rename = "askPx")]
    ask_px: Decimal,
    #[serde(rename = "askBaseSz")]
    ask_base_sz: Decimal,
}

/// Maps a successful quote payload onto the canonical record shape:
/// `askBaseSz` is already the quote-per-base rate and `askPx` its
/// inverse, both natively supplied.
fn record_from_quote(pair: &CurrencyPair, data: &QuoteData) -> Result<RateRecord, SourceError> {
    RateRecord::new(pair, data.ask_base_sz, data.ask_px)
}

#[async_trait]
impl RateSource for OkxQuoteSource {
    fn name(&self) -> &str {
        "okx"
    }

    async fn fetch(&self, pair: &CurrencyPair) -> Result<RateRecord, SourceError> {
        let url = format!("{}/v2/asset/quick/exchange/quote", self.base_url);
        debug!("Requesting trade quote from {}", url);

        // The venue quotes the market in the opposite orientation: the
        // request's base currency is our quote and the quote size is
        // denominated in our base.
        let request = QuoteRequest {
            side: "buy",
            base_ccy: pair.quote.to_string(),
            quote_ccy: pair.base.to_string(),
            rfq_sz: 1,
            rfq_sz_ccy: pair.base.to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let quote: QuoteResponse = serde_json::from_str(&text)
            .map_err(|e| SourceError::Malformed(format!("{e}; body: '{text}'")))?;

        if quote.code != 0 {
            return Err(SourceError::Api {
                code: quote.code,
                message: quote.error_detail(),
            });
        }

        let data = quote
            .data
            .ok_or_else(|| SourceError::Malformed("quote response has no data".to_string()))?;

        debug!("Received quote for {}: {:?}", pair, data);
        record_from_quote(pair, &data)
    }
}
