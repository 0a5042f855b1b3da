#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The human-readable message a collaborator supplied, if any.
    ///
    /// `NotFound` and `Internal` carry no operator-facing text, so callers
    /// fall back to their own wording for those.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CoreError::Validation(msg)
            | CoreError::Conflict(msg)
            | CoreError::Unauthorized(msg)
            | CoreError::Forbidden(msg) => Some(msg),
            CoreError::NotFound { .. } | CoreError::Internal(_) => None,
        }
    }

    /// Whether repeating the same request could succeed.
    ///
    /// Only internal/transport failures qualify; rejections are final.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::Internal(_))
    }
}
