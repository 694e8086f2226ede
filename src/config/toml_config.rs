use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://v1.cn-abs.com/ajax/ChartMarketHandler.ashx";
pub const DEFAULT_MARKET_TYPE: &str = "marketTotal";
pub const CHART_FORMATS: [&str; 2] = ["svg", "text"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
    /// 以 form-urlencoded 送出的欄位
    #[serde(default = "default_payload")]
    pub payload: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_point_index")]
    pub point_index: usize,
    #[serde(default)]
    pub value_index: usize,
    #[serde(default = "default_label")]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_category_column")]
    pub category_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default = "default_chart_formats")]
    pub chart_formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

// 模擬瀏覽器的 XHR 請求；Content-Type 由 form 編碼器設定
fn default_headers() -> BTreeMap<String, String> {
    [
        ("Accept", "application/json, text/javascript, */*; q=0.01"),
        ("Accept-Language", "zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"),
        ("Origin", "https://v1.cn-abs.com"),
        ("Referer", "https://v1.cn-abs.com/"),
        ("X-Requested-With", "XMLHttpRequest"),
        (
            "User-Agent",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_payload() -> BTreeMap<String, String> {
    BTreeMap::from([("type".to_string(), DEFAULT_MARKET_TYPE.to_string())])
}

fn default_point_index() -> usize {
    1
}

fn default_label() -> String {
    "存量金额".to_string()
}

fn default_output_path() -> String {
    "./data".to_string()
}

fn default_file_name() -> String {
    "{type}_stock".to_string()
}

fn default_category_column() -> String {
    "Product Type".to_string()
}

fn default_value_column() -> String {
    "Stock Amount".to_string()
}

fn default_chart_formats() -> Vec<String> {
    CHART_FORMATS.iter().map(|f| f.to_string()).collect()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
            headers: default_headers(),
            payload: default_payload(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            point_index: default_point_index(),
            value_index: 0,
            label: default_label(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            file_name: default_file_name(),
            category_column: default_category_column(),
            value_column: default_value_column(),
            chart_formats: default_chart_formats(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
                message: format!("cannot read {}: {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_HOST})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// Payload 的 `type` 欄位，也用於檔名樣板
    pub fn market_type(&self) -> Option<&str> {
        self.source.payload.get("type").map(String::as_str)
    }

    pub fn set_market_type(&mut self, market_type: &str) {
        self.source
            .payload
            .insert("type".to_string(), market_type.to_string());
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn headers(&self) -> &BTreeMap<String, String> {
        &self.source.headers
    }

    fn payload(&self) -> &BTreeMap<String, String> {
        &self.source.payload
    }

    fn timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn point_index(&self) -> usize {
        self.extract.point_index
    }

    fn value_index(&self) -> usize {
        self.extract.value_index
    }

    fn label(&self) -> &str {
        &self.extract.label
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn file_name(&self) -> &str {
        &self.load.file_name
    }

    fn category_column(&self) -> &str {
        &self.load.category_column
    }

    fn value_column(&self) -> &str {
        &self.load.value_column
    }

    fn chart_formats(&self) -> &[String] {
        &self.load.chart_formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }

        match self.market_type() {
            // `{type}` 會展開進檔名
            Some(market_type) => validation::validate_file_name("source.payload.type", market_type)?,
            None => {
                return Err(EtlError::ValidationError {
                    message: "source.payload must contain a 'type' field".to_string(),
                })
            }
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_file_name("load.file_name", &self.load.file_name)?;
        validation::validate_non_empty_string("load.category_column", &self.load.category_column)?;
        validation::validate_non_empty_string("load.value_column", &self.load.value_column)?;
        validation::validate_allowed_values("load.chart_formats", &self.load.chart_formats, &CHART_FORMATS)?;

        Ok(())
    }
}
