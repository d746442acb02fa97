use thiserror::Error;

/// Message shown when a failure carries no text of its own.
pub const FALLBACK_FAILURE_MESSAGE: &str = "An error occurred during analysis.";

/// Rejections raised while collecting form input, before any request exists.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown family category '{0}'")]
    UnknownCategory(String),

    #[error("file size must be a positive number of megabytes (got '{0}')")]
    InvalidFileSize(String),

    #[error("failed reading image {path}: {source}")]
    ImageRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a recognised image file")]
    NotAnImage(String),

    #[error("no image selected")]
    MissingImage,
}

/// Failures of one analysis call: transport/service failures and parse failures.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0} not set")]
    MissingCredential(String),

    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider} request failed ({status}): {body}")]
    Service {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Empty response from AI")]
    EmptyResponse,

    #[error("failed to parse analysis response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("an analysis is already in progress")]
    Busy,

    #[error(transparent)]
    Input(#[from] InputError),
}

impl AnalysisError {
    pub fn transport(provider: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// The user-facing text stored in a failed analysis slot.
    pub fn user_message(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            FALLBACK_FAILURE_MESSAGE.to_string()
        } else {
            text
        }
    }
}
