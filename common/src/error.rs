use thiserror::Error;
use tokio::task::JoinError;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Document source not found: {0}")]
    SourceNotFound(String),
    #[error("Extraction error: {0}")]
    Extraction(String),
    #[error("Classifier error: {0}")]
    Classifier(String),
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Task join error: {0}")]
    Join(#[from] JoinError),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
