use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuardianError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Docker error: {0}")]
    Docker(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("System error: {0}")]
    System(String),
}

impl From<serde_json::Error> for GuardianError {
    fn from(e: serde_json::Error) -> Self {
        GuardianError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GuardianError>;
