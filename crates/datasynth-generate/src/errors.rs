use thiserror::Error;

/// Errors emitted by the generation engine and the provider catalog.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Rejected before any row is generated (zero count, empty selection, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("invalid arguments for provider '{provider}': {message}")]
    InvalidArgs { provider: String, message: String },
    /// The provider was resolved and bound but failed while producing a value.
    #[error("provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },
    #[error("core error: {0}")]
    Core(#[from] datasynth_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    /// Stable diagnostic code used in generation reports.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::InvalidRequest(_) => "invalid_request",
            GenerationError::UnknownProvider(_) => "unknown_provider",
            GenerationError::InvalidArgs { .. } => "invalid_args",
            GenerationError::Provider { .. } => "provider_failed",
            GenerationError::Core(_) => "core_error",
            GenerationError::Io(_) => "io_error",
            GenerationError::Json(_) => "json_error",
            GenerationError::Csv(_) => "csv_error",
        }
    }
}
