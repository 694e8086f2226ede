use crate::core::{LoadOutcome, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    /// fetch → parse → table → chart/CSV，任一階段失敗即中止
    pub async fn run(&self) -> Result<LoadOutcome> {
        let mut monitor = SystemMonitor::new(self.monitor_enabled);
        tracing::info!("Starting ETL process...");

        let series = self.pipeline.extract().await?;
        tracing::info!("Extracted {} series", series.len());
        monitor.log_stats("Extract");

        let table = self.pipeline.transform(series).await?;
        tracing::info!("Transformed into {} rows", table.len());
        monitor.log_stats("Transform");

        let outcome = self.pipeline.load(table).await?;
        tracing::info!("Output saved to: {}", outcome.csv_path);
        monitor.log_stats("Load");

        monitor.log_final_stats();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CategoryValues, Series, StockTable};
    use crate::core::transform;
    use crate::utils::error::EtlError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockPipeline {
        fail_extract: bool,
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Pipeline for MockPipeline {
        async fn extract(&self) -> Result<Vec<Series>> {
            if self.fail_extract {
                return Err(EtlError::ApiStatusError {
                    status: 500,
                    endpoint: "mock".to_string(),
                });
            }
            Ok(vec![])
        }

        async fn transform(&self, _data: Vec<Series>) -> Result<StockTable> {
            let values = CategoryValues {
                label: "x".to_string(),
                entries: vec![],
            };
            Ok(transform::build_table(values, "c", "v"))
        }

        async fn load(&self, table: StockTable) -> Result<LoadOutcome> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(LoadOutcome {
                csv_path: "out.csv".to_string(),
                svg_path: None,
                rows: table.len(),
            })
        }
    }

    #[tokio::test]
    async fn test_engine_runs_all_phases() {
        let engine = EtlEngine::new(MockPipeline {
            fail_extract: false,
            loads: AtomicUsize::new(0),
        });

        let outcome = engine.run().await.unwrap();
        assert_eq!(outcome.csv_path, "out.csv");
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_engine_stops_after_failed_extract() {
        let engine = EtlEngine::new_with_monitoring(
            MockPipeline {
                fail_extract: true,
                loads: AtomicUsize::new(0),
            },
            true,
        );

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, EtlError::ApiStatusError { status: 500, .. }));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }
}
