use crate::db::CodecError;

/// Errors that can occur talking to the remote document store.
#[derive(Debug)]
pub enum RemoteError {
    /// Sync is not configured
    NotConfigured,
    /// No signed-in user for this session
    NotAuthenticated,
    /// Request never got a response
    Http(String),
    /// Server answered with a non-success status
    Status(u16, String),
    /// Remote payload could not be decoded
    Decode(CodecError),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::NotConfigured => write!(
                f,
                "Sync not configured. Add server_url and api_key to config."
            ),
            RemoteError::NotAuthenticated => write!(f, "No signed-in user"),
            RemoteError::Http(e) => write!(f, "HTTP error: {}", e),
            RemoteError::Status(code, body) => {
                write!(f, "Server returned status {}: {}", code, body)
            }
            RemoteError::Decode(e) => write!(f, "Remote decode error: {}", e),
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemoteError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for RemoteError {
    fn from(e: CodecError) -> Self {
        RemoteError::Decode(e)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Http(e.to_string())
    }
}
