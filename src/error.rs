#[derive(Debug, thiserror::Error)]
pub enum SkinTrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(
        "Unexpected status {status} from {url}{}",
        .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
    )]
    Status {
        status: u16,
        url: String,
        /// The backend's `detail` message, or the raw body when it has none.
        detail: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A local lookup came up empty: an offline cache miss or a corrupt
    /// cache entry, or a backend resource already resolved as missing.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SkinTrackerError {
    /// Backend unreachable, timed out, or answered with a non-2xx status
    /// other than 404.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status != 404,
            _ => false,
        }
    }

    /// Response body did not match the expected JSON shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Status { status: 404, .. })
    }

    /// HTTP status of a non-2xx backend answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend reported a missing resource.
    ///
    /// The tracker backend wraps its own 404s in a 500 whose detail reads
    /// `"404: <message>"`, so both shapes count when the detail names `message`.
    pub(crate) fn is_backend_missing(&self, message: &str) -> bool {
        match self {
            Self::Status { status: 404, .. } => true,
            Self::Status {
                status: 500,
                detail: Some(detail),
                ..
            } => detail.starts_with("404") && detail.contains(message),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SkinTrackerError>;
