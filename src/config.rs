use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

pub const CONFIG_PATH_VAR: &str = "AFM_LAB_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "afm-lab";
const ENV_PREFIX: &str = "AFM_LAB";

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an AFM specialist. Analyze height maps. \
Ra is average roughness, Rq is RMS. If Rq > Ra by ~7%, it is a standard Gaussian surface.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub ingest: IngestSettings,
    pub report: ReportSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub accepted_extensions: Vec<String>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            accepted_extensions: ["png", "jpg", "jpeg", "tif", "tiff"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub system_instruction: String,
    pub default_goal: String,
    pub decimals: usize,
    pub unit: String,
    pub include_image: bool,
    pub include_peak_to_valley: bool,
    pub request_timeout_secs: u64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            default_goal: "Analyze the morphology.".to_string(),
            decimals: 3,
            unit: "nm".to_string(),
            include_image: true,
            include_peak_to_valley: false,
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub window_title: String,
    pub width: f32,
    pub height: f32,
    /// Largest number of rows/columns drawn in the 3-D view.
    pub max_surface_resolution: usize,
    pub dark_mode: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            window_title: "AFM NanoSurface Lab".to_string(),
            width: 1280.0,
            height: 800.0,
            max_surface_resolution: 96,
            dark_mode: true,
        }
    }
}

impl Settings {
    /// Loads `afm-lab.toml` (or the file named by `AFM_LAB_CONFIG`) and
    /// `AFM_LAB__*` environment overrides on top of the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).ok();
        Self::load_from(path.as_deref(), environment())
    }

    /// An explicit `path` must exist; without one `afm-lab.toml` is optional.
    fn load_from(path: Option<&str>, environment: Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest.accepted_extensions.is_empty() {
            return Err(ConfigError::Message(
                "ingest.accepted_extensions must not be empty".to_string(),
            ));
        }
        if self.report.decimals > 6 {
            return Err(ConfigError::Message(
                "report.decimals must be at most 6".to_string(),
            ));
        }
        if self.report.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "report.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.display.max_surface_resolution < 2 {
            return Err(ConfigError::Message(
                "display.max_surface_resolution must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.report
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}
