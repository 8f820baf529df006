pub mod gemini;
pub mod generator;
pub mod prompt;

pub use gemini::GeminiReportGenerator;
pub use generator::{GeneratedReport, ReportGenerator, ReportRequest};
pub use prompt::{build_prompt, MetricFormat};
