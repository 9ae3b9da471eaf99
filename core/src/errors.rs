use thiserror::Error;

/// Errors raised while preparing, sending or interpreting chatbot requests
#[derive(Error, Debug)]
pub enum ChatbotError {
    #[error("API Error: {0}")]
    ApiError(String),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Missing parameter '{name}' for {question}")]
    MissingParameter { question: String, name: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Storage Error: {0}")]
    StorageError(String),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Result type for chatbot operations
pub type ChatbotResult<T> = Result<T, ChatbotError>;
