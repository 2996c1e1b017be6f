use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to load Postman collection: {0}")]
    CollectionLoadError(String),

    #[error("Failed to load Postman environment: {0}")]
    EnvironmentLoadError(String),

    #[error("Failed to load simulation template: {0}")]
    TemplateLoadError(String),

    #[error("Request not found: {0}")]
    RequestNotFound(String),

    #[error("Cyclic environment variables: {0}")]
    VariableCycle(String),

    #[error("Invalid simulation state: {0}")]
    InvalidState(String),

    #[error("Failed to write output: {0}")]
    OutputError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
