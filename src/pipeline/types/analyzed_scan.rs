use crate::common::Scan;
use crate::surface::RoughnessReport;

#[derive(Debug, Clone)]
pub struct AnalyzedScan {
    pub scan: Scan,
    pub report: RoughnessReport,
}

impl AnalyzedScan {
    pub fn new(scan: Scan, report: RoughnessReport) -> Self {
        Self { scan, report }
    }
}
