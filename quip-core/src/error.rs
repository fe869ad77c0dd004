//! Error types.

use std::io;

pub type Result<T> = core::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Crate-wide error type.
///
/// Parsing itself is expected to never fault on well-formed character input;
/// the `Internal` variant exists purely as a defensive backstop around slice
/// arithmetic. Malformed-but-tolerable input (stray markers, unterminated
/// quotes, empty parameter names) is never an error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(String),

    #[error("internal parser fault: {0}")]
    Internal(String),
}
