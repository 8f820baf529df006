pub mod ingest_service;
pub mod instrumented;
pub mod report_service;
pub mod roughness_service;

pub use ingest_service::IngestService;
pub use instrumented::{InstrumentLayer, InstrumentedService};
pub use report_service::ReportService;
pub use roughness_service::RoughnessService;
