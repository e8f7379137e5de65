use crate::plist::ParseError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors produced while converting a Glyphs package
#[derive(Debug, Error)]
pub enum GlyphspkgError {
    /// An I/O failure while reading a package member or writing the output
    #[error("IO error for {path:?}: {source}")]
    Io {
        /// The path being read or written
        path: PathBuf,
        /// The underlying failure
        source: io::Error,
    },

    /// A plist document could not be parsed
    #[error("Error parsing plist {path:?}: {source}")]
    PlistParse {
        /// The path of the document
        path: PathBuf,
        /// The underlying parse failure
        source: ParseError,
    },

    /// A plist document parsed but did not have the expected shape
    #[error("Unexpected content in {path:?}: expected {expected}")]
    UnexpectedStructure {
        /// The path of the document
        path: PathBuf,
        /// What the document should have contained
        expected: &'static str,
    },

    /// No output file name could be derived from the input path
    #[error("Cannot derive an output file name from {path:?}")]
    BadInputPath {
        /// The offending input path
        path: PathBuf,
    },

    /// The resolved output path would overwrite the input package
    #[error("Output path {path:?} is the same as the input package")]
    OutputIsInput {
        /// The conflicting path
        path: PathBuf,
    },
}
