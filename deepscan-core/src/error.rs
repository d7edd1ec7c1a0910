use deepscan_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeepScanError {
    /// The browser session could not be started. Fatal to the whole scan.
    #[error("Browser session unavailable: {0}")]
    Browser(String),

    #[error("Navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Audit failed: {0}")]
    Audit(String),

    #[error("Unknown scan profile: {0}")]
    InvalidProfile(String),

    #[error(transparent)]
    Scanner(#[from] ScanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeepScanError>;
