use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::{Phase, RunMonitor};

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    /// Runs one query-and-write pass and returns where the records went.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting pulsar refresh");

        let table = self.pipeline.extract().await?;
        tracing::info!("Catalogue returned {} rows", table.len());
        self.monitor.phase_finished(Phase::Query);

        let result = self.pipeline.transform(table).await?;
        tracing::info!(
            "Selected {} records ({} eligible of {} rows)",
            result.records.len(),
            result.eligible_rows,
            result.source_rows
        );
        self.monitor.phase_finished(Phase::Select);

        let output_path = self.pipeline.load(result).await?;
        self.monitor.phase_finished(Phase::Write);
        self.monitor.summary();

        Ok(output_path)
    }
}
