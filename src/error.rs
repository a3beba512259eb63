//! Recoverable table errors.
//!
//! Misuse of the table (full table on insert, re-attaching an item, zero
//! capacity) panics instead; only resource exhaustion is reported here.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The slot array for the requested capacity could not be allocated.
    /// The table keeps its previous array.
    #[error("failed to allocate slot array of capacity {capacity}: {source}")]
    AllocFailed {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}

pub type Result<T> = std::result::Result<T, TableError>;
