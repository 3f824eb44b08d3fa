use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Metadata backend error ({backend}): {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error("Metadata serialization error: {0}")]
    Serialization(String),

    #[error("Metadata configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl MetadataError {
    pub fn backend(backend: &'static str, msg: impl Into<String>) -> Self {
        Self::Backend {
            backend,
            message: msg.into(),
        }
    }
}
