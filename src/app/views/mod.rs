pub mod metrics_view;
pub mod scan_view;
pub mod surface_view;

pub use metrics_view::MetricsView;
pub use scan_view::ScanView;
pub use surface_view::SurfaceView;

/// Something that can render itself into a region of the dashboard.
pub trait View {
    fn draw(&mut self, ui: &mut egui::Ui);
}
