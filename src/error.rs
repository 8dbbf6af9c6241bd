use thiserror::Error;

use crate::models::DesignCategory;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("No image data found for: {0}")]
    NoImageData(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
    #[error("All {attempted} designs failed to generate. Check the logs for details.")]
    BatchFailed { attempted: usize },
    #[error("Export error: {0}")]
    ExportError(String),
}

impl StudioError {
    /// True for failures raised before any generation request is issued.
    pub fn is_config(&self) -> bool {
        matches!(self, StudioError::ConfigError(_))
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        StudioError::RequestError(e.to_string())
    }
}

/// One request of a batch that did not produce an image.
///
/// These never escape the orchestrator; they are logged and dropped.
#[derive(Debug)]
pub struct DesignFailure {
    pub sequence_index: usize,
    pub category: DesignCategory,
    pub error: StudioError,
}

impl std::fmt::Display for DesignFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "design #{} ({}) failed: {}",
            self.sequence_index, self.category, self.error
        )
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
