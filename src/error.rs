use thiserror::Error;
use tracing::error;
use tracing_error::SpanTrace;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
    #[error("store error: {0}")]
    StoreError(#[from] crate::store::StoreError),
    #[error("session error: {0}")]
    SessionError(#[from] crate::session::SessionError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

pub fn log_error<E: std::error::Error + std::fmt::Display>(error: &E) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
}
