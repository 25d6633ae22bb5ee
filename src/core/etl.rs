use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting ETL process...");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("Extracting listings...");
        let pages = self.pipeline.extract().await?;
        let listing_count: usize = pages.iter().map(|p| p.listings.len()).sum();
        tracing::info!(
            "Extracted {} listings from {} pages",
            listing_count,
            pages.len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("Rendering outputs...");
        let result = self.pipeline.transform(pages).await?;
        tracing::info!(
            "Rendered {} files ({} listings, {} skipped)",
            result.artifacts.len(),
            result.listings.len(),
            result.failures.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("Writing outputs...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
