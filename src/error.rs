// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown variant `{0}` (expected one of: full, minus_len, minus_pos, diag_only, ibm1)")]
    UnknownVariant(String),

    #[error("no valid variants specified")]
    NoValidVariants,

    #[error("sigma must be a positive finite number, got {0}")]
    InvalidSigma(f64),

    #[error("malformed alignment on line {line}: `{token}`")]
    MalformedAlignment { line: usize, token: String },

    #[error("scorer failed: {0}")]
    Scorer(String),

    #[error("run cancelled before this configuration started")]
    Cancelled,

    #[error("could not write sweep report: {0}")]
    Report(#[source] io::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
