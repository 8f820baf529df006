use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::sync::Arc;

use crate::config::ReportSettings;
use crate::error::ReportError;
use crate::pipeline::types::AnalyzedScan;
use crate::report::prompt::{build_prompt, MetricFormat};
use crate::surface::RoughnessReport;

/// Everything a report backend needs for one scan.
#[derive(Clone)]
pub struct ReportRequest {
    pub report: RoughnessReport,
    pub goal: String,
    pub image: Option<Arc<DynamicImage>>,
    pub format: MetricFormat,
    pub include_peak_to_valley: bool,
}

impl ReportRequest {
    pub fn new(report: RoughnessReport, goal: impl Into<String>) -> Self {
        Self {
            report,
            goal: goal.into(),
            image: None,
            format: MetricFormat::default(),
            include_peak_to_valley: false,
        }
    }

    /// Blank goals fall back to the configured default goal.
    pub fn for_scan(
        settings: &ReportSettings,
        analyzed: &AnalyzedScan,
        goal: &str,
        include_image: bool,
        include_peak_to_valley: bool,
    ) -> Self {
        let goal = if goal.trim().is_empty() {
            settings.default_goal.clone()
        } else {
            goal.trim().to_string()
        };
        Self {
            report: analyzed.report,
            goal,
            image: include_image.then(|| analyzed.scan.image().clone()),
            format: MetricFormat {
                decimals: settings.decimals,
                unit: settings.unit.clone(),
            },
            include_peak_to_valley,
        }
    }

    pub fn prompt(&self) -> String {
        build_prompt(
            &self.report,
            &self.goal,
            &self.format,
            self.include_peak_to_valley,
        )
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub text: String,
    pub generator: String,
    pub generated_at: DateTime<Utc>,
}

/// A backend that turns roughness statistics into free text.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, request: &ReportRequest) -> Result<String, ReportError>;
    fn name(&self) -> &str;
}
