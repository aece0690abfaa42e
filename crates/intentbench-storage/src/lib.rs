//! File-based persistence of evaluation runs and comparative reports.
//!
//! A [`ResultsStore`] is constructed with its directory and passed to whoever
//! needs it; nothing here keeps process-wide state.

pub mod error;
pub mod results;

pub use error::{Error as StorageError, Result};
pub use results::{ResultsStore, RunMetadata, RunRecord, StoredReport};
