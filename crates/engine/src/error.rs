use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("could not connect to index: {0}")]
    Connect(String),

    #[error("query execution failed: {0}")]
    Execute(String),

    #[error("unreadable result record: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
