use chrono::Utc;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

use crate::error::ReportError;
use crate::report::{GeneratedReport, ReportGenerator, ReportRequest};

/// Forwards report requests to whichever generator backs it.
#[derive(Clone)]
pub struct ReportService {
    inner: Arc<dyn ReportGenerator>,
}

impl ReportService {
    pub fn new(inner: Box<dyn ReportGenerator>) -> Self {
        Self {
            inner: Arc::from(inner),
        }
    }

    pub fn generator_name(&self) -> &str {
        self.inner.name()
    }
}

impl Service<ReportRequest> for ReportService {
    type Response = GeneratedReport;
    type Error = ReportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ReportRequest) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let text = inner.generate(&request).await?;
            Ok(GeneratedReport {
                text,
                generator: inner.name().to_string(),
                generated_at: Utc::now(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{analyze, HeightMap};
    use async_trait::async_trait;
    use tower::ServiceExt;

    struct EchoGenerator;

    #[async_trait]
    impl ReportGenerator for EchoGenerator {
        async fn generate(&self, request: &ReportRequest) -> Result<String, ReportError> {
            Ok(format!("echo: {}", request.prompt()))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct OfflineGenerator;

    #[async_trait]
    impl ReportGenerator for OfflineGenerator {
        async fn generate(&self, _request: &ReportRequest) -> Result<String, ReportError> {
            Err(ReportError::Service {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        fn name(&self) -> &str {
            "offline"
        }
    }

    fn request() -> ReportRequest {
        let report = analyze(&HeightMap::from_rows(vec![vec![0.0, 10.0]]).unwrap()).unwrap();
        ReportRequest::new(report, "Describe it.")
    }

    #[tokio::test]
    async fn wraps_generated_text() {
        let service = ReportService::new(Box::new(EchoGenerator));
        assert_eq!(service.generator_name(), "echo");
        let report = service.oneshot(request()).await.unwrap();
        assert_eq!(report.generator, "echo");
        assert_eq!(
            report.text,
            "echo: The calculated roughness is Ra: 5.000 nm and Rq: 5.000 nm. Describe it."
        );
    }

    #[tokio::test]
    async fn generator_failures_propagate() {
        let service = ReportService::new(Box::new(OfflineGenerator));
        let err = service.oneshot(request()).await.unwrap_err();
        assert!(matches!(err, ReportError::Service { status: 503, .. }));
    }
}
