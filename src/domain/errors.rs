use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Unknown stage: {0}")]
    UnknownStage(String),
}
