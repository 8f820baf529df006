use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ingest Error: {0}")]
    Ingest(#[from] IngestError),
    #[error("Analysis Error: {0}")]
    Analysis(#[from] InvalidInputError),
    #[error("Report Error: {0}")]
    Report(#[from] ReportError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("UI Error: {0}")]
    Ui(String),
}

// Raised by the roughness analyzer; the workflow must not generate a report for the scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("height map is empty")]
    EmptyGrid,
    #[error("height map shape {rows}x{cols} does not match {samples} samples")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        samples: usize,
    },
    #[error("row {row} has {found} samples, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("sample at ({row}, {col}) is not a finite number")]
    NonFiniteSample { row: usize, col: usize },
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported image format for '{name}', accepted: {accepted}")]
    UnsupportedFormat { name: String, accepted: String },
    #[error("Failed to decode '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to read {1}: {0}")]
    Read(std::io::Error, String),
    #[error("Invalid height map: {0}")]
    HeightMap(#[from] InvalidInputError),
    #[error("Decoder task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No API key configured for the report service.")]
    MissingCredential,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Report service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("Report service returned no text.")]
    EmptyResponse,
    #[error("Failed to encode image for the report request: {0}")]
    Encode(#[from] image::ImageError),
}
