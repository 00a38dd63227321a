use thiserror::Error;

/// Broad classification of a failed dispatch, for callers that only need to
/// decide what to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any network call was attempted.
    Configuration,
    /// The request went out but did not come back with a success status.
    Transport,
    /// The provider answered with a success status but the body was not JSON.
    Decode,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("API key is required for provider '{0}'")]
    MissingCredential(String),

    #[error("API key for provider '{0}' contains characters that cannot be sent in a header")]
    InvalidCredential(String),

    #[error("custom API endpoint required")]
    MissingEndpoint,

    #[error("invalid API endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("temperature {0} is outside the supported range 0.0 to 2.0")]
    InvalidTemperature(f64),

    #[error("API request failed: {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not decode API response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnsupportedProvider(_)
            | DispatchError::MissingCredential(_)
            | DispatchError::InvalidCredential(_)
            | DispatchError::MissingEndpoint
            | DispatchError::InvalidEndpoint(_)
            | DispatchError::InvalidTemperature(_) => ErrorKind::Configuration,
            DispatchError::Status { .. } | DispatchError::Transport(_) => ErrorKind::Transport,
            DispatchError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// HTTP status code, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Status { status, .. } => Some(*status),
            DispatchError::Transport(err) | DispatchError::Decode(err) => {
                err.status().map(|status| status.as_u16())
            }
            _ => None,
        }
    }
}
