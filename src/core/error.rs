#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("http error: {0}")]
    Http(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("dispatch error: {0}")]
    Dispatch(String),
    #[error("unknown error")]
    Unknown,
}

impl From<reqwest::Error> for FinderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FinderError::Timeout
        } else if err.is_connect() {
            FinderError::Network(err.to_string())
        } else if err.is_status() || err.is_redirect() || err.is_decode() {
            FinderError::Http(err.to_string())
        } else {
            FinderError::Unknown
        }
    }
}

impl From<tokio::task::JoinError> for FinderError {
    fn from(err: tokio::task::JoinError) -> Self {
        FinderError::Dispatch(err.to_string())
    }
}
