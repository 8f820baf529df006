mod analyzed_scan;
mod upload;

pub use analyzed_scan::AnalyzedScan;
pub use upload::Upload;
