use thiserror::Error;

/// Failure taxonomy for one resolution attempt.
///
/// Recoverable variants move the pipeline to its next stage; terminal
/// variants end the attempt with an empty result. Nothing in this taxonomy
/// ever propagates past the pipeline boundary.
#[derive(Error, Debug)]
pub enum LightboxError {
    #[error("no identity strategy matched the clicked node")]
    IdentityNotFound,

    #[error("primary media service failed: {0}")]
    PrimaryServiceFailure(String),

    #[error("no post container found around the clicked node")]
    FallbackContainerNotFound,

    #[error("post container held no extractable media")]
    FallbackEmpty,

    #[error("unexpected failure in stage {stage}: {message}")]
    Unexpected { stage: String, message: String },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl LightboxError {
    /// Recoverable failures trigger the next resolution stage; terminal ones
    /// end the attempt for this click.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LightboxError::IdentityNotFound | LightboxError::PrimaryServiceFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_splits_recoverable_from_terminal() {
        assert!(LightboxError::IdentityNotFound.is_recoverable());
        assert!(LightboxError::PrimaryServiceFailure("timeout".into()).is_recoverable());
        assert!(!LightboxError::FallbackContainerNotFound.is_recoverable());
        assert!(!LightboxError::FallbackEmpty.is_recoverable());
        assert!(!LightboxError::Unexpected {
            stage: "identity".into(),
            message: "boom".into()
        }
        .is_recoverable());
    }
}
