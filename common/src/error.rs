use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ClientError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("session storage failed: {0}")]
    Storage(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Malformed(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_failures_are_not_reported_as_request_errors() {
        let navigation = ClientError::Navigation("/: blocked".into());
        assert_eq!(navigation.to_string(), "navigation failed: /: blocked");
        assert_ne!(navigation, ClientError::Transport("/: blocked".into()));

        let storage = ClientError::Storage("quota".into());
        assert_eq!(storage.to_string(), "session storage failed: quota");
    }

    #[test]
    fn status_reads_like_a_fetch_error() {
        assert_eq!(ClientError::Status(404).to_string(), "HTTP error! status: 404");
    }
}
