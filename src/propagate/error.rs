use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("elements error for {name}: {reason}")]
    Elements { name: String, reason: String },
    #[error("epoch error for {name}: {reason}")]
    Epoch { name: String, reason: String },
    #[error("propagation error for {name}: {reason}")]
    Propagation { name: String, reason: String },
}

impl PropagationError {
    #[cfg(test)]
    pub fn satellite(&self) -> &str {
        match self {
            PropagationError::Elements { name, .. }
            | PropagationError::Epoch { name, .. }
            | PropagationError::Propagation { name, .. } => name,
        }
    }
}
