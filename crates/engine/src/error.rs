//! The errors the store can return.
//!
//! - [`Persistence`] when the database rejects or cannot perform an operation.
//! - [`Missing`] when a freshly committed row cannot be read back.
//!
//!  [`Persistence`]: EngineError::Persistence
//!  [`Missing`]: EngineError::Missing
use sea_orm::DbErr;
use thiserror::Error;

/// Store errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("transaction {0} not found after commit")]
    Missing(i32),
    #[error(transparent)]
    Persistence(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Missing(a), Self::Missing(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
