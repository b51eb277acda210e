use thiserror::Error;

use crate::store::DocPath;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocPath),
    #[error("stale write: {path} changed since it was read")]
    StaleWrite { path: DocPath },
    #[error("decode error at {path}: {source}")]
    Decode {
        path: DocPath,
        source: serde_json::Error,
    },
    #[error("malformed document id in {0}")]
    MalformedId(DocPath),
    #[error("backend error: {0}")]
    Backend(String),
}
