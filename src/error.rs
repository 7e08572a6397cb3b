use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeycoachError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bundled asset not found: {0}")]
    MissingAsset(String),

    #[error("Prompt has no words to type")]
    EmptyPrompt,
}

pub type Result<T> = std::result::Result<T, KeycoachError>;
