use crate::core::chart::{self, ChartOptions};
use crate::core::client::MarketClient;
use crate::core::export;
use crate::core::transform::{self, PointSelector};
use crate::core::{ConfigProvider, LoadOutcome, Pipeline, Series, StockTable, Storage};
use crate::utils::error::Result;
use crate::utils::validation;

const TEXT_CHART_WIDTH: usize = 50;

pub struct MarketPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: MarketClient,
    chart_options: ChartOptions,
}

impl<S: Storage, C: ConfigProvider> MarketPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: MarketClient::new(),
            chart_options: ChartOptions::default(),
        }
    }

    fn wants_chart(&self, format: &str) -> bool {
        self.config.chart_formats().iter().any(|f| f == format)
    }

    /// 展開後的檔名；`{type}` 來自 payload，需再檢查一次
    fn file_stem(&self) -> Result<String> {
        let market_type = self
            .config
            .payload()
            .get("type")
            .map(String::as_str)
            .unwrap_or("market");
        let stem =
            export::resolve_file_name(self.config.file_name(), market_type, chrono::Utc::now());
        validation::validate_file_name("file_name", &stem)?;
        Ok(stem)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MarketPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Series>> {
        tracing::info!("🚀 Fetching market data from: {}", self.config.endpoint());
        let series = self.client.fetch(&self.config).await?;
        tracing::info!("📊 Received {} series", series.len());
        Ok(series)
    }

    async fn transform(&self, data: Vec<Series>) -> Result<StockTable> {
        let selector = PointSelector {
            point_index: self.config.point_index(),
            value_index: self.config.value_index(),
        };

        let values = transform::parse_series(&data, selector, self.config.label())?;
        tracing::debug!("{}: {:?}", values.label, values.entries);

        if values.entries.is_empty() {
            tracing::warn!("🔶 No named series in response, table will be empty");
        }

        let table = transform::build_table(
            values,
            self.config.category_column(),
            self.config.value_column(),
        );
        tracing::info!("🔧 Built table with {} rows", table.len());
        Ok(table)
    }

    async fn load(&self, table: StockTable) -> Result<LoadOutcome> {
        let stem = self.file_stem()?;

        println!("{}", table);

        if self.wants_chart("text") {
            println!(
                "{}",
                chart::render_text(&table, &self.chart_options.title, TEXT_CHART_WIDTH)
            );
        }

        // CSV 先寫，失敗時不留下沒有資料的圖表
        let csv_name = format!("{}.csv", stem);
        let csv = export::write_csv(&table)?;
        tracing::debug!("Writing CSV ({} bytes)", csv.len());
        self.storage.write_file(&csv_name, &csv).await?;
        let csv_path = self.storage.display_path(&csv_name);
        tracing::info!("💾 CSV saved: {}", csv_path);

        let svg_path = if self.wants_chart("svg") {
            let svg_name = format!("{}.svg", stem);
            let svg = chart::render_svg(&table, &self.chart_options);
            self.storage.write_file(&svg_name, svg.as_bytes()).await?;
            let path = self.storage.display_path(&svg_name);
            tracing::info!("📈 Chart saved: {}", path);
            Some(path)
        } else {
            None
        };

        Ok(LoadOutcome {
            csv_path,
            svg_path,
            rows: table.len(),
        })
    }
}
