//! A PDF/raster object-graph construction, serialization, and recognition engine.
//!
//! The writer side builds an in-memory graph of [`value::Value`]s threaded
//! through an [`xref::Xref`], then serializes it via [`envelope`]. The
//! reader side ([`reader`]) sniffs and walks an existing file to recognize
//! it and count its pages, without building the full graph back up.

pub mod array;
pub mod atom;
pub mod config;
pub mod content;
pub mod dict;
pub mod envelope;
pub mod error;
pub mod outstream;
pub mod pool;
pub mod reader;
pub mod serialize;
pub mod standard;
pub mod stream;
pub mod value;
pub mod xref;

pub use atom::{Atom, AtomTable, StdAtom};
pub use config::DocumentDefaults;
pub use dict::Dict;
pub use error::PdfError;
pub use outstream::OutStream;
pub use pool::{Block, Pool};
pub use reader::{ByteSource, FileSource, Reader, SliceSource};
pub use value::{PdfString, Value};
pub use xref::{Reference, Xref};
