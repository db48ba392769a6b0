use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Extraction failed for {path}: {message}")]
    Extraction { path: String, message: String },

    #[error("Classification failed: {message}")]
    Classification { message: String },

    #[error("Filing failed for {path}: {message}")]
    Filing { path: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Operation timed out: {message}")]
    Timeout { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Serializable snapshot of an error, kept in batch reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error_type: String,
    pub message: String,
    pub recoverable: bool,
}

impl AppError {
    /// Stable code for the error kind, used in logs and JSON reports
    pub fn error_type(&self) -> String {
        match self {
            Self::Extraction { .. } => "EXTRACTION_ERROR",
            Self::Classification { .. } => "CLASSIFICATION_ERROR",
            Self::Filing { .. } => "FILING_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::NetworkError { .. } => "NETWORK_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Io(_) => "IO_ERROR",
            Self::SerdeJson(_) => "PARSE_ERROR",
            Self::Other(_) => "UNKNOWN_ERROR",
        }
        .to_string()
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            error_type: self.error_type(),
            message: self.to_string(),
            recoverable: self.is_recoverable(),
        }
    }

    /// Indicates if retrying the same operation can succeed
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigError { .. })
    }

    /// Returns the complete error source chain for debugging
    pub fn source_chain(&self) -> Vec<String> {
        let mut chain = vec![self.to_string()];
        let mut current: &dyn std::error::Error = self;

        while let Some(source) = current.source() {
            chain.push(source.to_string());
            current = source;
        }

        chain
    }

    pub(crate) fn extraction(path: &std::path::Path, message: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn filing(path: &std::path::Path, message: impl Into<String>) -> Self {
        Self::Filing {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
