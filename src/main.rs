use afm_lab::app::AfmLabApp;
use afm_lab::config::Settings;
use afm_lab::error::AppError;
use tracing::Level;

fn init_logging(settings: &Settings) {
    let level = settings
        .logging
        .level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::load()?;
    init_logging(&settings);
    tracing::info!(
        "Starting {} (model '{}')",
        settings.display.window_title,
        settings.report.model
    );
    AfmLabApp::start_gui(settings)
}
