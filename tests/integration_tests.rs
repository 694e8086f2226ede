use anyhow::Result;
use httpmock::prelude::*;
use market_etl::config::toml_config::TomlConfig;
use market_etl::utils::validation::Validate;
use market_etl::{EtlEngine, EtlError, LocalStorage, MarketPipeline};
use tempfile::TempDir;

fn market_response() -> serde_json::Value {
    serde_json::json!([
        {"SeriesName": "信贷ABS", "Points": [{"X": "2023-12", "Y": [3100.0]}, {"X": "2024-12", "Y": [2800.75]}]},
        {"SeriesName": "企业ABS", "Points": [{"X": "2023-12", "Y": [5000.0]}, {"X": "2024-12", "Y": [5300.5]}]},
        {"SeriesName": "ABN", "Points": [{"X": "2023-12", "Y": [1500.0]}, {"X": "2024-12", "Y": [1720.0]}]},
        {"SeriesName": "", "Points": [{"X": "2023-12", "Y": [0.0]}, {"X": "2024-12", "Y": [99999.0]}]}
    ])
}

fn config_for(server: &MockServer, output_path: &str) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.source.endpoint = server.url("/ajax/ChartMarketHandler.ashx");
    config.load.output_path = output_path.to_string();
    config
}

#[tokio::test]
async fn test_end_to_end_writes_sorted_csv_and_chart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("data");
    let output_path = output_path.to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/ajax/ChartMarketHandler.ashx")
            .header("x-requested-with", "XMLHttpRequest")
            .body("type=marketTotal");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(market_response());
    });

    let config = config_for(&server, &output_path);
    let storage = LocalStorage::new(output_path.clone());
    let engine = EtlEngine::new(MarketPipeline::new(storage, config));

    let outcome = engine.run().await?;
    api_mock.assert();

    assert_eq!(outcome.rows, 3);
    assert!(outcome.csv_path.ends_with("marketTotal_stock.csv"));

    let csv_path = std::path::Path::new(&output_path).join("marketTotal_stock.csv");
    let csv = std::fs::read_to_string(csv_path)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            ",Product Type,Stock Amount",
            "0,企业ABS,5300.5",
            "1,信贷ABS,2800.75",
            "2,ABN,1720.0",
        ]
    );

    let svg_path = std::path::Path::new(&output_path).join("marketTotal_stock.svg");
    let svg = std::fs::read_to_string(svg_path)?;
    assert!(svg.contains("Product stock scale"));
    assert!(svg.contains("ABN"));

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_api_failure_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/ajax/ChartMarketHandler.ashx");
        then.status(500);
    });

    let config = config_for(&server, &output_path);
    let storage = LocalStorage::new(output_path.clone());
    let engine = EtlEngine::new(MarketPipeline::new(storage, config));

    let err = engine.run().await.unwrap_err();
    api_mock.assert();

    assert!(matches!(err, EtlError::ApiStatusError { status: 500, .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(!std::path::Path::new(&output_path)
        .join("marketTotal_stock.csv")
        .exists());

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_malformed_series_is_processing_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/ajax/ChartMarketHandler.ashx");
        then.status(200).json_body(serde_json::json!([
            {"SeriesName": "只有一点", "Points": [{"X": "2024-12", "Y": [1.0]}]}
        ]));
    });

    let config = config_for(&server, &output_path);
    let storage = LocalStorage::new(output_path);
    let engine = EtlEngine::new(MarketPipeline::new(storage, config));

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, EtlError::ProcessingError { .. }));
    assert_eq!(err.exit_code(), 1);

    Ok(())
}

#[tokio::test]
async fn test_market_type_cannot_write_outside_output_dir() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("data");
    let output_path = output_path.to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/ajax/ChartMarketHandler.ashx");
        then.status(200).json_body(market_response());
    });

    let mut config = config_for(&server, &output_path);
    config.set_market_type("../escaped");
    assert!(config.validate().is_err());

    // 即使略過驗證，寫檔前仍會拒絕
    let storage = LocalStorage::new(output_path);
    let engine = EtlEngine::new(MarketPipeline::new(storage, config));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));
    assert!(!temp_dir.path().join("escaped_stock.csv").exists());
    assert!(!temp_dir.path().join("escaped_stock.svg").exists());

    Ok(())
}
