use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError as MpscTryRecvError;
use tracing::{debug, error, info};

use crate::app::controller::{LabController, ReportOptions, UiUpdate};
use crate::app::views::{MetricsView, ScanView, SurfaceView, View};
use crate::config::Settings;
use crate::error::AppError;
use crate::pipeline::{AnalyzedScan, Upload};
use crate::report::{GeneratedReport, MetricFormat};

const PANEL_HEIGHT: f32 = 360.0;
/// Oldest notices are dropped past this many.
pub const MAX_NOTICES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Everything the dashboard shows that is driven by background results.
#[derive(Default)]
pub struct DashboardState {
    pub current: Option<AnalyzedScan>,
    pub report: Option<GeneratedReport>,
    pub analysis_pending: bool,
    pub report_pending: bool,
    pub notices: VecDeque<Notice>,
}

impl DashboardState {
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            level,
            message: message.into(),
            at: Utc::now(),
        });
    }

    /// Applies one background result; returns true when the current scan changed.
    pub fn apply(&mut self, update: UiUpdate) -> bool {
        match update {
            UiUpdate::ScanAnalyzed(analyzed) => {
                self.analysis_pending = false;
                self.report = None;
                self.report_pending = false;
                self.notify(
                    NoticeLevel::Info,
                    format!("Loaded '{}'", analyzed.scan.name()),
                );
                self.current = Some(analyzed);
                true
            }
            UiUpdate::AnalysisFailed(message) => {
                self.analysis_pending = false;
                self.current = None;
                self.report = None;
                self.report_pending = false;
                self.notify(NoticeLevel::Error, message);
                true
            }
            UiUpdate::ReportReady { scan_id, report } => {
                if self.current_scan_id() == Some(scan_id) {
                    self.report_pending = false;
                    self.report = Some(report);
                } else {
                    debug!("Dropping report for stale scan {}", scan_id);
                }
                false
            }
            UiUpdate::ReportFailed { scan_id, message } => {
                if self.current_scan_id() == Some(scan_id) {
                    self.report_pending = false;
                }
                self.notify(NoticeLevel::Warning, message);
                false
            }
        }
    }

    fn current_scan_id(&self) -> Option<uuid::Uuid> {
        self.current.as_ref().map(|analyzed| analyzed.scan.id())
    }
}

pub struct AfmLabApp {
    controller: LabController,
    ui_update_rx: mpsc::Receiver<UiUpdate>,
    state: DashboardState,
    scan_view: ScanView,
    surface_view: SurfaceView,
    metrics_view: MetricsView,
    path_input: String,
    report_options: ReportOptions,
}

impl AfmLabApp {
    pub fn new(settings: Arc<Settings>) -> Self {
        let (controller, ui_update_rx) = LabController::new(settings.clone());
        let report_options = ReportOptions {
            api_key: settings.api_key().unwrap_or_default().to_string(),
            goal: settings.report.default_goal.clone(),
            include_image: settings.report.include_image,
            include_peak_to_valley: settings.report.include_peak_to_valley,
        };

        let mut state = DashboardState::default();
        if report_options.api_key.is_empty() {
            state.notify(
                NoticeLevel::Warning,
                "Please enter your API key in the sidebar to enable AI reports.",
            );
        }

        Self {
            controller,
            ui_update_rx,
            state,
            scan_view: ScanView::new(PANEL_HEIGHT),
            surface_view: SurfaceView::new(settings.display.max_surface_resolution, PANEL_HEIGHT),
            metrics_view: MetricsView::new(MetricFormat {
                decimals: settings.report.decimals,
                unit: settings.report.unit.clone(),
            }),
            path_input: String::new(),
            report_options,
        }
    }

    pub fn start_gui(settings: Settings) -> Result<(), AppError> {
        let settings = Arc::new(settings);
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(settings.display.width, settings.display.height))
                .with_title(settings.display.window_title.clone()),
            ..Default::default()
        };

        let title = settings.display.window_title.clone();
        eframe::run_native(
            &title,
            options,
            Box::new(move |cc| {
                let visuals = if settings.display.dark_mode {
                    egui::Visuals::dark()
                } else {
                    egui::Visuals::light()
                };
                cc.egui_ctx.set_visuals(visuals);
                Ok(Box::new(AfmLabApp::new(settings)))
            }),
        )
        .map_err(|e| AppError::Ui(e.to_string()))
    }

    fn drain_updates(&mut self) {
        loop {
            match self.ui_update_rx.try_recv() {
                Ok(update) => {
                    if self.state.apply(update) {
                        self.sync_views();
                    }
                }
                Err(MpscTryRecvError::Empty) => break,
                Err(MpscTryRecvError::Disconnected) => {
                    error!("UI update sender disconnected");
                    break;
                }
            }
        }
    }

    fn sync_views(&mut self) {
        let scan = self.state.current.as_ref().map(|analyzed| &analyzed.scan);
        self.scan_view.set_scan(scan.cloned());
        self.surface_view.set_scan(scan);
        self.metrics_view
            .set_report(self.state.current.as_ref().map(|analyzed| analyzed.report));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // One analysis at a time; the latest drop wins.
        if let Some(file) = dropped.into_iter().last() {
            if let Some(bytes) = file.bytes {
                info!("Analyzing dropped file '{}'", file.name);
                self.state.analysis_pending = true;
                self.controller.load_upload(Upload::new(file.name, bytes));
            } else if let Some(path) = file.path {
                self.load_path(path);
            }
        }
    }

    fn load_path(&mut self, path: PathBuf) {
        info!("Analyzing {}", path.display());
        self.state.analysis_pending = true;
        self.controller.load_path(path);
    }

    fn draw_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.separator();
        ui.label("API key");
        ui.add(egui::TextEdit::singleline(&mut self.report_options.api_key).password(true));
        ui.small(format!("Model: {}", self.controller.settings().report.model));
        ui.separator();
        ui.label("Report goal");
        ui.add(
            egui::TextEdit::multiline(&mut self.report_options.goal)
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        ui.checkbox(&mut self.report_options.include_image, "Send image with prompt");
        ui.checkbox(
            &mut self.report_options.include_peak_to_valley,
            "Include peak-to-valley",
        );
    }

    fn draw_loader(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.controller.settings().display.window_title.clone());
        ui.horizontal(|ui| {
            ui.label("Image path:");
            let edit = ui.text_edit_singleline(&mut self.path_input);
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Load").clicked() || submitted) && !self.path_input.trim().is_empty() {
                let path = PathBuf::from(self.path_input.trim());
                self.load_path(path);
            }
            if self.state.analysis_pending {
                ui.spinner();
            }
        });
        let accepted = self
            .controller
            .settings()
            .ingest
            .accepted_extensions
            .join(", ");
        ui.small(format!("…or drop an image onto the window ({accepted})."));
    }

    fn draw_notices(&self, ui: &mut egui::Ui) {
        ui.heading("Notices");
        egui::ScrollArea::vertical().show(ui, |ui| {
            for notice in self.state.notices.iter().rev() {
                let (tag, color) = match notice.level {
                    NoticeLevel::Info => ("INFO", egui::Color32::LIGHT_GRAY),
                    NoticeLevel::Warning => ("WARN", egui::Color32::YELLOW),
                    NoticeLevel::Error => ("ERROR", egui::Color32::LIGHT_RED),
                };
                ui.colored_label(
                    color,
                    format!("[{}] {} {}", tag, notice.at.format("%H:%M:%S"), notice.message),
                );
            }
        });
    }

    fn draw_report_section(&mut self, ui: &mut egui::Ui) {
        let Some(analyzed) = self.state.current.clone() else {
            return;
        };
        ui.separator();
        let has_key = !self.report_options.api_key.trim().is_empty();
        ui.horizontal(|ui| {
            let button = ui.add_enabled(
                has_key && !self.state.report_pending,
                egui::Button::new("Generate AI Research Report"),
            );
            if button.clicked() {
                self.state.report_pending = true;
                self.controller
                    .request_report(&analyzed, &self.report_options);
            }
            if self.state.report_pending {
                ui.spinner();
            }
        });
        if !has_key {
            ui.colored_label(
                egui::Color32::YELLOW,
                "Enter an API key in the sidebar to generate a report.",
            );
        }

        if let Some(report) = &self.state.report {
            ui.heading("AI Scientific Report");
            ui.small(format!(
                "{} at {}",
                report.generator,
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            ui.label(report.text.as_str());
        }
    }
}

impl eframe::App for AfmLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_updates();
        self.handle_dropped_files(ctx);

        egui::SidePanel::left("settings_panel")
            .resizable(true)
            .show(ctx, |ui| self.draw_sidebar(ui));

        egui::TopBottomPanel::top("loader_panel").show(ctx, |ui| self.draw_loader(ui));

        egui::TopBottomPanel::bottom("notice_panel")
            .resizable(true)
            .show(ctx, |ui| self.draw_notices(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.state.current.is_none() {
                    ui.heading("Upload an AFM image to start.");
                    return;
                }
                ui.columns(2, |columns| {
                    self.scan_view.draw(&mut columns[0]);
                    self.surface_view.draw(&mut columns[1]);
                });
                ui.separator();
                self.metrics_view.draw(ui);
                self.draw_report_section(ui);
            });
        });

        if self.state.analysis_pending || self.state.report_pending {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
