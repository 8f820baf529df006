use std::fmt::Display;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::Service;
use tower_layer::Layer;
use tracing::{debug, debug_span, error, Instrument};

/// Wraps a service so every call is timed and its outcome logged under `stage`.
#[derive(Clone, Debug)]
pub struct InstrumentLayer {
    stage: &'static str,
}

impl InstrumentLayer {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }
}

impl<S> Layer<S> for InstrumentLayer {
    type Service = InstrumentedService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedService {
            inner,
            stage: self.stage,
        }
    }
}

#[derive(Clone, Debug)]
pub struct InstrumentedService<S> {
    inner: S,
    stage: &'static str,
}

impl<S> InstrumentedService<S> {
    pub fn stage(&self) -> &'static str {
        self.stage
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Request> Service<Request> for InstrumentedService<S>
where
    S: Service<Request>,
    S::Future: Send + 'static,
    S::Error: Display,
    S::Response: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let stage = self.stage;
        let span = debug_span!("stage", stage = %stage);
        let start = Instant::now();
        let future = span.in_scope(|| {
            debug!("Starting stage: {}", stage);
            self.inner.call(request)
        });

        Box::pin(
            async move {
                let result = future.await;
                let duration_us = start.elapsed().as_micros() as u64;
                match &result {
                    Ok(_) => debug!("Completed stage '{}' in {}us", stage, duration_us),
                    Err(e) => error!("Stage '{}' failed after {}us: {}", stage, duration_us, e),
                }
                result
            }
            .instrument(span),
        )
    }
}
