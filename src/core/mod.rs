pub mod chart;
pub mod client;
pub mod etl;
pub mod export;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{
    CategoryValue, CategoryValues, LoadOutcome, Point, Series, StockRow, StockTable,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
