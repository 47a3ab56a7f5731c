//! Crate error type.
//!
//! Every fatal condition is fail-fast: the binary logs the error and exits
//! with a per-category status code. There is no retry anywhere.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotifError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("network contains no edges after deduplication")]
    EmptyNetwork,

    #[error("background alteration type '{0}' does not occur in the alteration profiles")]
    UnknownBackground(String),

    #[error("mismatch bound {0} is outside the supported range 1..=2")]
    BadDelta(u32),

    #[error("flow solver failed: {0}")]
    Solver(#[source] anyhow::Error),

    #[error("alteration type '{0}' exceeds the {max} supported types", max = crate::catalog::MAX_ALTERATION_TYPES)]
    TooManyAlterations(String),
}

impl MotifError {
    /// Process exit status for this error category.
    pub fn exit_code(&self) -> i32 {
        match self {
            MotifError::Io { .. } => 2,
            MotifError::EmptyNetwork => 3,
            MotifError::UnknownBackground(_) => 4,
            MotifError::BadDelta(_) => 5,
            MotifError::Solver(_) => 6,
            MotifError::TooManyAlterations(_) => 7,
        }
    }
}
