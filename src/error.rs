use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while decoding, encoding or searching a subtitle track.
#[derive(Error, Debug)]
pub enum SrtError {
    /// A timestamp did not match `HH:MM:SS,mmm`.
    #[error("invalid timestamp {text:?}: {detail}")]
    Format { text: String, detail: String },

    /// The first line of a block is not a subtitle number.
    #[error("sequence error: expected a subtitle number, found {0:?}")]
    Sequence(String),

    /// The second line of a block is not `<start> --> <end>`.
    #[error("time range error in {line:?}: {reason}")]
    TimeRange { line: String, reason: String },

    /// A block failed to decode. Carries the raw block for diagnostics.
    #[error("failed to parse subtitle block #{position}: {raw:?}")]
    Block {
        position: usize,
        raw: String,
        #[source]
        source: Box<SrtError>,
    },

    #[error("I/O error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not found: {0:?}")]
    NotFound(String),
}

impl SrtError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SrtError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SrtError::NotFound(_))
    }
}
