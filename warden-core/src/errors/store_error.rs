//! Resource store errors.

/// Errors surfaced by the external resource store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("resource {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("transport error: {message}")]
    Transport { message: String },
}

impl StoreError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
