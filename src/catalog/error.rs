use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed element set for {name}: {reason}")]
    MalformedElementSet { name: String, reason: String },
    #[error("duplicate satellite name: {0}")]
    DuplicateName(String),
    #[error("catalog is empty")]
    Empty,
    #[error("TLE file read error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub(crate) fn malformed(name: &str, reason: impl ToString) -> Self {
        CatalogError::MalformedElementSet {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
