use tower::{Service, ServiceBuilder, ServiceExt};

use crate::config::IngestSettings;
use crate::error::AppError;
use crate::pipeline::services::{
    IngestService, InstrumentLayer, InstrumentedService, ReportService, RoughnessService,
};
use crate::pipeline::types::{AnalyzedScan, Upload};
use crate::report::{GeneratedReport, ReportGenerator, ReportRequest};

/// Ingest followed by roughness analysis.
#[derive(Clone)]
pub struct AnalysisPipeline {
    ingest: InstrumentedService<IngestService>,
    roughness: InstrumentedService<RoughnessService>,
}

impl AnalysisPipeline {
    pub fn new(settings: &IngestSettings) -> Self {
        Self {
            ingest: ServiceBuilder::new()
                .layer(InstrumentLayer::new("ingest"))
                .service(IngestService::new(&settings.accepted_extensions)),
            roughness: ServiceBuilder::new()
                .layer(InstrumentLayer::new("roughness"))
                .service(RoughnessService::new()),
        }
    }

    pub async fn process(&mut self, upload: Upload) -> Result<AnalyzedScan, AppError> {
        let scan = self.ingest.ready().await?.call(upload).await?;
        let analyzed = self.roughness.ready().await?.call(scan).await?;
        tracing::info!(
            "Analyzed '{}': Ra={:.3} Rq={:.3} PtV={:.3}",
            analyzed.scan.name(),
            analyzed.report.ra,
            analyzed.report.rq,
            analyzed.report.peak_to_valley
        );
        Ok(analyzed)
    }
}

/// Report generation behind the same instrumentation as the analysis stages.
#[derive(Clone)]
pub struct ReportPipeline {
    service: InstrumentedService<ReportService>,
}

impl ReportPipeline {
    pub fn new(generator: Box<dyn ReportGenerator>) -> Self {
        Self {
            service: ServiceBuilder::new()
                .layer(InstrumentLayer::new("report"))
                .service(ReportService::new(generator)),
        }
    }

    pub async fn generate(&mut self, request: ReportRequest) -> Result<GeneratedReport, AppError> {
        let report = self.service.ready().await?.call(request).await?;
        tracing::info!(
            "Report from '{}' received ({} chars)",
            report.generator,
            report.text.len()
        );
        Ok(report)
    }
}
