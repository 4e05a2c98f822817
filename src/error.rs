//! The error kinds produced by the core engine.

use std::fmt;

/// A failure reported by the writer or reader side of the engine.
///
/// Most of the contract-violation cases described in the component design
/// (null pool, undefined atom as key, out-of-range index, ...) are *not*
/// represented here: those are no-ops or return a well-defined sentinel
/// (`Value::Error`, `None`, `0`) as specified, and never reach this type.
/// `PdfError` is reserved for the failures that must propagate.
#[derive(Debug)]
pub enum PdfError {
    /// The platform allocator reported exhaustion.
    OutOfMemory,
    /// The underlying sink reported a short write.
    WriteFail { expected: usize, actual: usize },
    /// An I/O error from the wrapped writer or reader.
    Io(std::io::Error),
    /// The byte source does not carry a recognizable PDF/raster signature.
    NotRecognized,
    /// The xref or trailer could not be located or decoded.
    Malformed(&'static str),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "allocator exhausted"),
            Self::WriteFail { expected, actual } => {
                write!(f, "short write: expected {expected} bytes, wrote {actual}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::NotRecognized => write!(f, "not a PDF/raster file"),
            Self::Malformed(what) => write!(f, "malformed PDF structure: {what}"),
        }
    }
}

impl std::error::Error for PdfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PdfError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
