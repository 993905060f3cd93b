use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublicationError {
    #[error("render error: {0}")]
    Render(#[from] askama::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
