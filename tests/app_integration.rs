use fxsync::core::store::RateStore;
use fxsync::store::FjallStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const OKX_QUOTE_PATH: &str = "/v2/asset/quick/exchange/quote";
    pub const BINANCE_TICKER_PATH: &str = "/api/v3/ticker/price";

    pub async fn create_okx_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(OKX_QUOTE_PATH))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_binance_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(BINANCE_TICKER_PATH))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn okx_success_body(ask_px: &str, ask_base_sz: &str) -> String {
        format!(
            r#"{{"code": 0, "data": {{"askPx": {ask_px}, "askBaseSz": {ask_base_sz}, "askQuoteSz": 1, "baseCcy": "TRX", "quoteCcy": "USDT"}}, "msg": ""}}"#
        )
    }

    pub fn binance_success_body(price: &str) -> String {
        format!(r#"{{"symbol": "TRXUSDT", "price": "{price}"}}"#)
    }
}

fn write_config(
    data_path: &std::path::Path,
    okx_url: &str,
    binance_url: &str,
    extra: &str,
) -> tempfile::NamedTempFile {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
pair:
  base: USDT
  quote: TRX
providers:
  okx:
    base_url: "{}"
  binance:
    base_url: "{}"
data_path: "{}"
{}
"#,
        okx_url,
        binance_url,
        data_path.display(),
        extra
    );

    fs::write(config_file.path(), &config_content).expect("Failed to write config file");
    config_file
}

async fn stored_rate(data_path: &std::path::Path) -> Option<fxsync::core::rate::RateRecord> {
    let store = FjallStore::open(data_path).expect("Failed to reopen store");
    store.get("USDT_TRX").await.expect("Failed to read store")
}

#[test_log::test(tokio::test)]
async fn test_update_cycle_persists_okx_rate() {
    use wiremock::ResponseTemplate;

    let okx = test_utils::create_okx_mock_server(
        ResponseTemplate::new(200)
            .set_body_string(test_utils::okx_success_body("0.1205", "8.2987")),
    )
    .await;
    let binance = test_utils::create_binance_mock_server(ResponseTemplate::new(500)).await;

    let data_dir = tempfile::tempdir().unwrap();
    let config = write_config(data_dir.path(), &okx.uri(), &binance.uri(), "");

    let result =
        fxsync::run_command(fxsync::AppCommand::Once, Some(config.path().to_str().unwrap())).await;
    assert!(result.is_ok(), "Update cycle failed: {:?}", result.err());

    let record = stored_rate(data_dir.path()).await.expect("No record stored");
    assert_eq!(record.rate, dec!(8.2987));
    assert_eq!(record.inverse_rate, dec!(0.1205));
}

#[test_log::test(tokio::test)]
async fn test_falls_back_to_binance_when_okx_fails() {
    use wiremock::ResponseTemplate;

    let okx = test_utils::create_okx_mock_server(ResponseTemplate::new(500)).await;
    let binance = test_utils::create_binance_mock_server(
        ResponseTemplate::new(200)
            .set_body_string(test_utils::binance_success_body("0.14000000")),
    )
    .await;

    let data_dir = tempfile::tempdir().unwrap();
    let config = write_config(data_dir.path(), &okx.uri(), &binance.uri(), "");

    let result =
        fxsync::run_command(fxsync::AppCommand::Once, Some(config.path().to_str().unwrap())).await;
    assert!(result.is_ok(), "Update cycle failed: {:?}", result.err());

    let record = stored_rate(data_dir.path()).await.expect("No record stored");
    assert_eq!(record.inverse_rate, dec!(0.14000000));
    assert_eq!(record.rate, Decimal::ONE / dec!(0.14000000));
}

#[test_log::test(tokio::test)]
async fn test_provider_api_error_falls_back_to_binance() {
    use wiremock::ResponseTemplate;

    // OKX replies 200 with a non-success provider code
    let okx = test_utils::create_okx_mock_server(
        ResponseTemplate::new(200)
            .set_body_string(r#"{"code": 51000, "data": null, "msg": "Parameter error"}"#),
    )
    .await;
    let binance = test_utils::create_binance_mock_server(
        ResponseTemplate::new(200).set_body_string(test_utils::binance_success_body("0.14")),
    )
    .await;

    let data_dir = tempfile::tempdir().unwrap();
    let config = write_config(data_dir.path(), &okx.uri(), &binance.uri(), "");

    fxsync::run_command(fxsync::AppCommand::Once, Some(config.path().to_str().unwrap()))
        .await
        .expect("Update cycle failed");

    let record = stored_rate(data_dir.path()).await.expect("No record stored");
    assert_eq!(record.inverse_rate, dec!(0.14));
}

#[test_log::test(tokio::test)]
async fn test_exhausted_sources_leave_store_untouched() {
    use wiremock::ResponseTemplate;

    let okx = test_utils::create_okx_mock_server(ResponseTemplate::new(500)).await;
    let binance = test_utils::create_binance_mock_server(ResponseTemplate::new(500)).await;

    let data_dir = tempfile::tempdir().unwrap();
    let config = write_config(data_dir.path(), &okx.uri(), &binance.uri(), "");

    // the cycle itself still succeeds; exhaustion is not an error
    let result =
        fxsync::run_command(fxsync::AppCommand::Once, Some(config.path().to_str().unwrap())).await;
    assert!(result.is_ok(), "Update cycle failed: {:?}", result.err());

    assert!(stored_rate(data_dir.path()).await.is_none());
}

#[test_log::test(tokio::test)]
async fn test_override_rate_skips_providers() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let okx = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(test_utils::OKX_QUOTE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&okx)
        .await;

    let binance = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(test_utils::BINANCE_TICKER_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&binance)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    let config = write_config(
        data_dir.path(),
        &okx.uri(),
        &binance.uri(),
        "override_rate: 7.0",
    );

    fxsync::run_command(fxsync::AppCommand::Once, Some(config.path().to_str().unwrap()))
        .await
        .expect("Update cycle failed");

    let record = stored_rate(data_dir.path()).await.expect("No record stored");
    assert_eq!(record.rate, dec!(7.0));
    assert_eq!(record.inverse_rate, Decimal::ONE / dec!(7.0));
}

// Both providers quoting the same market must land in the same
// direction: the resolved forward rates agree to within an order of
// magnitude.
#[test_log::test(tokio::test)]
async fn test_providers_agree_on_rate_direction() {
    use fxsync::core::rate::{Currency, CurrencyPair, RateSource};
    use fxsync::providers::{BinanceTickerSource, HttpSettings, OkxQuoteSource};
    use wiremock::ResponseTemplate;

    // one real-world TRX/USDT quote, seen by both venues
    let okx = test_utils::create_okx_mock_server(
        ResponseTemplate::new(200)
            .set_body_string(test_utils::okx_success_body("0.1205", "8.2987")),
    )
    .await;
    let binance = test_utils::create_binance_mock_server(
        ResponseTemplate::new(200)
            .set_body_string(test_utils::binance_success_body("0.12050000")),
    )
    .await;

    let pair = CurrencyPair::new(Currency::Usdt, Currency::Trx);
    let settings = HttpSettings::default();

    let okx_record = OkxQuoteSource::new(&okx.uri(), &settings)
        .unwrap()
        .fetch(&pair)
        .await
        .unwrap();
    let binance_record = BinanceTickerSource::new(&binance.uri(), &settings)
        .unwrap()
        .fetch(&pair)
        .await
        .unwrap();

    let ratio = okx_record.rate / binance_record.rate;
    assert!(
        ratio > dec!(0.1) && ratio < dec!(10),
        "Providers disagree on rate direction: okx={} binance={}",
        okx_record.rate,
        binance_record.rate
    );
}
