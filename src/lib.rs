#![deny(clippy::unwrap_used, clippy::expect_used)]
//! Convert Glyphs package directories into single-file Glyphs sources.
//!
//! A `.glyphspackage` keeps font metadata and every glyph in separate plist
//! files; the single-file `.glyphs` format holds the same data in one
//! document. [`package_to_single`] merges the package members into one
//! document, ordering glyph records by the package's `order.plist` rather
//! than by directory listing.

mod convert;
mod error;
pub mod filenames;
pub mod package;
pub mod plist;
mod reporter;

pub use crate::{
    convert::{package_to_single, package_to_single_with, resolve_output_path, SINGLE_FILE_EXTENSION},
    error::GlyphspkgError,
    plist::{Dictionary, ParseError, Plist},
    reporter::{LogReporter, Reporter},
};
