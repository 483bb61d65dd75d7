#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    /// Maps a failed HTTP status and its body message onto the failure taxonomy.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 422 => Self::Validation(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Server { status, message },
        }
    }
}
