use mas_core::EntityId;
use mas_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration boundary was already crossed; model builders can no
    /// longer be added and `configure` cannot run twice.
    #[error("simulator is already configured")]
    AlreadyConfigured,

    /// An operation that needs built models was called before `configure`.
    #[error("simulator is not configured yet (required by {0})")]
    NotConfigured(&'static str),

    /// No object is registered under the given handle.
    #[error("no registered object with handle {0}")]
    UnknownEntity(EntityId),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

pub type SimResult<T> = Result<T, SimError>;
