pub mod pipeline;
pub mod services;
pub mod types;

pub use pipeline::{AnalysisPipeline, ReportPipeline};
pub use types::{AnalyzedScan, Upload};
