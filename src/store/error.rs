use thiserror::Error;

/// Errors that can occur when creating a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store requires a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
