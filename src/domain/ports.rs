use crate::domain::model::{LoadOutcome, Series, StockTable};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// 寫入後回報給使用者的完整路徑
    fn display_path(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn headers(&self) -> &BTreeMap<String, String>;
    fn payload(&self) -> &BTreeMap<String, String>;
    fn timeout(&self) -> Option<Duration>;

    fn point_index(&self) -> usize;
    fn value_index(&self) -> usize;
    fn label(&self) -> &str;

    fn output_path(&self) -> &str;
    fn file_name(&self) -> &str;
    fn category_column(&self) -> &str;
    fn value_column(&self) -> &str;
    fn chart_formats(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Series>>;
    async fn transform(&self, data: Vec<Series>) -> Result<StockTable>;
    async fn load(&self, table: StockTable) -> Result<LoadOutcome>;
}
