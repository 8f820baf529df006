use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::Service;

use crate::common::Scan;
use crate::error::InvalidInputError;
use crate::pipeline::types::AnalyzedScan;
use crate::surface::analyze;

#[derive(Clone, Default)]
pub struct RoughnessService;

impl RoughnessService {
    pub fn new() -> Self {
        Self
    }
}

impl Service<Scan> for RoughnessService {
    type Response = AnalyzedScan;
    type Error = InvalidInputError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, scan: Scan) -> Self::Future {
        let result = analyze(scan.height_map()).map(|report| AnalyzedScan::new(scan, report));
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeightMap;
    use image::DynamicImage;
    use tower::ServiceExt;

    #[tokio::test]
    async fn attaches_report_to_scan() {
        let height_map = HeightMap::from_rows(vec![vec![0.0, 0.0], vec![10.0, 10.0]]).unwrap();
        let scan = Scan::new("step.png", DynamicImage::new_luma8(2, 2), height_map);
        let analyzed = RoughnessService::new().oneshot(scan.clone()).await.unwrap();
        assert_eq!(analyzed.scan.id(), scan.id());
        assert!((analyzed.report.ra - 5.0).abs() < 1e-9);
        assert!((analyzed.report.peak_to_valley - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_scan_is_refused() {
        let scan = Scan::new("empty.png", DynamicImage::new_luma8(0, 0), HeightMap::empty());
        let err = RoughnessService::new().oneshot(scan).await.unwrap_err();
        assert_eq!(err, InvalidInputError::EmptyGrid);
    }
}
