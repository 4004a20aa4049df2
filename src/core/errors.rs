use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    /// Rejected locally before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered with `success: false`.
    #[error("{0}")]
    Application(String),

    #[error("Transport error: {0}")]
    Transport(Box<reqwest::Error>),

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Session expired, please sign in again")]
    SessionExpired,

    #[error("Invalid server address: {0}")]
    InvalidUrl(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("PortalError: {0}")]
    Custom(String),
}

impl PortalError {
    /// Network failures and unreadable responses, as opposed to errors the
    /// server or the validator reported deliberately.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PortalError::Transport(_) | PortalError::Json(_) | PortalError::Status { .. }
        )
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(error: reqwest::Error) -> Self {
        PortalError::Transport(Box::new(error))
    }
}

impl From<std::io::Error> for PortalError {
    fn from(error: std::io::Error) -> Self {
        PortalError::Io(Box::new(error))
    }
}
