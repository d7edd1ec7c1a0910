use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Not an HTML document: {0}")]
    NotHtml(String),

    #[error("No page loaded")]
    NoPage,

    #[error("Unsupported by this navigator: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, ScanError>;
