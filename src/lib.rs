pub mod app;
pub mod common;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod surface;

pub use error::{AppError, IngestError, InvalidInputError, ReportError};

pub use common::Scan;
pub use pipeline::{AnalysisPipeline, AnalyzedScan, ReportPipeline, Upload};
pub use report::{GeminiReportGenerator, ReportGenerator, ReportRequest};
pub use surface::{analyze, HeightMap, RoughnessReport};
