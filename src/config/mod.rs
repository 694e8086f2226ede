#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::toml_config::TomlConfig;
    use crate::utils::error::Result;
    use clap::Parser;
    use serde::Serialize;

    #[derive(Debug, Clone, Default, Serialize, Parser)]
    #[command(name = "market-etl")]
    #[command(about = "Fetch ABS market statistics, chart them and save a CSV")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Market chart endpoint (POST)
        #[arg(long)]
        pub endpoint: Option<String>,

        /// Value of the `type` form field
        #[arg(long)]
        pub market_type: Option<String>,

        /// Directory the CSV and chart are written to
        #[arg(long)]
        pub output_path: Option<String>,

        /// Output file name without extension; supports {type} and {timestamp}
        #[arg(long)]
        pub file_name: Option<String>,

        /// Chart formats to render (svg, text); pass an empty value to disable
        #[arg(long, value_delimiter = ',')]
        pub chart: Option<Vec<String>>,

        /// Request timeout in seconds
        #[arg(long)]
        pub timeout: Option<u64>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log phase memory usage and timing")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,
    }

    impl CliConfig {
        /// 讀取設定檔（若有），再套用命令列覆蓋
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => {
                    tracing::info!("📁 Loading configuration from: {}", path);
                    TomlConfig::from_file(path)?
                }
                None => TomlConfig::default(),
            };
            self.apply_overrides(&mut config);
            Ok(config)
        }

        pub fn apply_overrides(&self, config: &mut TomlConfig) {
            if let Some(endpoint) = &self.endpoint {
                config.source.endpoint = endpoint.clone();
            }
            if let Some(market_type) = &self.market_type {
                config.set_market_type(market_type);
            }
            if let Some(output_path) = &self.output_path {
                config.load.output_path = output_path.clone();
            }
            if let Some(file_name) = &self.file_name {
                config.load.file_name = file_name.clone();
            }
            if let Some(formats) = &self.chart {
                config.load.chart_formats = formats
                    .iter()
                    .map(|f| f.trim().to_lowercase())
                    .filter(|f| !f.is_empty())
                    .collect();
            }
            if let Some(timeout) = self.timeout {
                config.source.timeout_seconds = Some(timeout);
            }
            if self.monitor {
                config.monitoring.enabled = true;
            }
        }
    }

}
