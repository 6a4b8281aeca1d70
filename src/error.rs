use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("no active session")]
    NoActiveSession,

    #[error("malformed persisted record: {0}")]
    MalformedPersistedRecord(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, HubError>;
