use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::error::AppError;
use crate::pipeline::{AnalysisPipeline, AnalyzedScan, ReportPipeline, Upload};
use crate::report::{GeminiReportGenerator, GeneratedReport, ReportRequest};

/// Results handed back from background tasks to the UI thread.
pub enum UiUpdate {
    ScanAnalyzed(AnalyzedScan),
    AnalysisFailed(String),
    ReportReady { scan_id: Uuid, report: GeneratedReport },
    ReportFailed { scan_id: Uuid, message: String },
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub api_key: String,
    pub goal: String,
    pub include_image: bool,
    pub include_peak_to_valley: bool,
}

/// Runs analysis and report generation off the UI thread.
#[derive(Clone)]
pub struct LabController {
    settings: Arc<Settings>,
    pipeline: AnalysisPipeline,
    ui_update_tx: mpsc::Sender<UiUpdate>,
}

impl LabController {
    pub fn new(settings: Arc<Settings>) -> (Self, mpsc::Receiver<UiUpdate>) {
        let (ui_update_tx, ui_update_rx) = mpsc::channel(32);
        let pipeline = AnalysisPipeline::new(&settings.ingest);
        (
            Self {
                settings,
                pipeline,
                ui_update_tx,
            },
            ui_update_rx,
        )
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn load_path(&self, path: PathBuf) {
        let mut pipeline = self.pipeline.clone();
        let tx = self.ui_update_tx.clone();
        tokio::spawn(async move {
            let result = match Upload::read(&path).await {
                Ok(upload) => pipeline.process(upload).await,
                Err(e) => Err(AppError::from(e)),
            };
            send_analysis(&tx, result).await;
        });
    }

    pub fn load_upload(&self, upload: Upload) {
        let mut pipeline = self.pipeline.clone();
        let tx = self.ui_update_tx.clone();
        tokio::spawn(async move {
            let result = pipeline.process(upload).await;
            send_analysis(&tx, result).await;
        });
    }

    /// Builds the remote generator from `options` and asks it for a report.
    pub fn request_report(&self, analyzed: &AnalyzedScan, options: &ReportOptions) {
        let scan_id = analyzed.scan.id();
        let request = ReportRequest::for_scan(
            &self.settings.report,
            analyzed,
            &options.goal,
            options.include_image,
            options.include_peak_to_valley,
        );
        match GeminiReportGenerator::new(&self.settings.report, &options.api_key) {
            Ok(generator) => {
                self.spawn_report(scan_id, ReportPipeline::new(Box::new(generator)), request)
            }
            Err(e) => {
                let tx = self.ui_update_tx.clone();
                let message = AppError::from(e).to_string();
                tokio::spawn(async move {
                    send(&tx, UiUpdate::ReportFailed { scan_id, message }).await;
                });
            }
        }
    }

    pub fn spawn_report(&self, scan_id: Uuid, mut pipeline: ReportPipeline, request: ReportRequest) {
        let tx = self.ui_update_tx.clone();
        tokio::spawn(async move {
            let update = match pipeline.generate(request).await {
                Ok(report) => UiUpdate::ReportReady { scan_id, report },
                Err(e) => {
                    warn!("Report generation failed: {}", e);
                    UiUpdate::ReportFailed {
                        scan_id,
                        message: e.to_string(),
                    }
                }
            };
            send(&tx, update).await;
        });
    }
}

async fn send_analysis(tx: &mpsc::Sender<UiUpdate>, result: Result<AnalyzedScan, AppError>) {
    let update = match result {
        Ok(analyzed) => UiUpdate::ScanAnalyzed(analyzed),
        Err(e) => {
            warn!("Analysis failed: {}", e);
            UiUpdate::AnalysisFailed(e.to_string())
        }
    };
    send(tx, update).await;
}

async fn send(tx: &mpsc::Sender<UiUpdate>, update: UiUpdate) {
    if tx.send(update).await.is_err() {
        error!("UI update receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::report::ReportGenerator;
    use async_trait::async_trait;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    struct CannedGenerator;

    #[async_trait]
    impl ReportGenerator for CannedGenerator {
        async fn generate(&self, _request: &ReportRequest) -> Result<String, ReportError> {
            Ok("Smooth, isotropic surface.".to_string())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn png_upload() -> Upload {
        let image = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 0 } else { 10 }]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Upload::new("step.png", bytes)
    }

    async fn analyzed_scan(
        controller: &LabController,
        rx: &mut mpsc::Receiver<UiUpdate>,
    ) -> AnalyzedScan {
        controller.load_upload(png_upload());
        match rx.recv().await {
            Some(UiUpdate::ScanAnalyzed(analyzed)) => analyzed,
            _ => panic!("expected an analyzed scan"),
        }
    }

    #[tokio::test]
    async fn upload_is_analyzed_in_background() {
        let (controller, mut rx) = LabController::new(Arc::new(Settings::default()));
        let analyzed = analyzed_scan(&controller, &mut rx).await;
        assert!((analyzed.report.ra - 5.0).abs() < 1e-9);
        assert!((analyzed.report.rq - 5.0).abs() < 1e-9);
        assert!((analyzed.report.peak_to_valley - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unsupported_upload_becomes_notice() {
        let (controller, mut rx) = LabController::new(Arc::new(Settings::default()));
        controller.load_upload(Upload::new("scan.bmp", vec![0u8; 8]));
        match rx.recv().await {
            Some(UiUpdate::AnalysisFailed(message)) => {
                assert!(message.contains("Unsupported image format"))
            }
            _ => panic!("expected an analysis failure"),
        }
    }

    #[tokio::test]
    async fn missing_credential_is_reported_without_a_request() {
        let (controller, mut rx) = LabController::new(Arc::new(Settings::default()));
        let analyzed = analyzed_scan(&controller, &mut rx).await;
        let options = ReportOptions {
            api_key: String::new(),
            goal: String::new(),
            include_image: true,
            include_peak_to_valley: false,
        };
        controller.request_report(&analyzed, &options);
        match rx.recv().await {
            Some(UiUpdate::ReportFailed { scan_id, message }) => {
                assert_eq!(scan_id, analyzed.scan.id());
                assert!(message.contains("No API key"));
            }
            _ => panic!("expected a report failure"),
        }
    }

    #[tokio::test]
    async fn report_is_delivered_for_its_scan() {
        let (controller, mut rx) = LabController::new(Arc::new(Settings::default()));
        let analyzed = analyzed_scan(&controller, &mut rx).await;
        let request = ReportRequest::for_scan(
            &controller.settings().report,
            &analyzed,
            "",
            false,
            false,
        );
        controller.spawn_report(
            analyzed.scan.id(),
            ReportPipeline::new(Box::new(CannedGenerator)),
            request,
        );
        match rx.recv().await {
            Some(UiUpdate::ReportReady { scan_id, report }) => {
                assert_eq!(scan_id, analyzed.scan.id());
                assert_eq!(report.text, "Smooth, isotropic surface.");
                assert_eq!(report.generator, "canned");
            }
            _ => panic!("expected a report"),
        }
    }
}
