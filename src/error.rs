use thiserror::Error;

#[derive(Debug, Error)]
pub enum MermatesRagError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("timeout: {0}")]
    Timeout(String),
}

pub use crate::Result;
