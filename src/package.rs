//! Readers for the individual members of a Glyphs package directory.

use crate::{
    error::GlyphspkgError,
    plist::{Dictionary, Plist},
};
use smol_str::SmolStr;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The base metadata document, required
pub const FONT_INFO_FILE: &str = "fontinfo.plist";
/// The ordered glyph name sequence, required
pub const ORDER_FILE: &str = "order.plist";
/// Editor display state, optional
pub const UI_STATE_FILE: &str = "UIState.plist";
/// Subdirectory holding one file per glyph
pub const GLYPHS_DIR: &str = "glyphs";
/// Extension of per-glyph files
pub const GLYPH_EXTENSION: &str = "glyph";

/// Read and parse one plist file.
pub fn parse_plist_file(path: &Path) -> Result<Plist, GlyphspkgError> {
    let text = fs::read_to_string(path).map_err(|source| GlyphspkgError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Plist::parse(&text).map_err(|source| GlyphspkgError::PlistParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read `fontinfo.plist`, the dictionary the merged document grows from.
pub fn read_font_info(package: &Path) -> Result<Dictionary, GlyphspkgError> {
    let path = package.join(FONT_INFO_FILE);
    match parse_plist_file(&path)? {
        Plist::Dictionary(dict) => Ok(dict),
        _ => Err(GlyphspkgError::UnexpectedStructure {
            path,
            expected: "a dictionary",
        }),
    }
}

/// Read `order.plist`, the sequence deciding which glyphs are included and
/// in which order. Duplicate names are kept; they produce duplicate output
/// entries.
pub fn read_glyph_order(package: &Path) -> Result<Vec<SmolStr>, GlyphspkgError> {
    let path = package.join(ORDER_FILE);
    let Plist::Array(entries) = parse_plist_file(&path)? else {
        return Err(GlyphspkgError::UnexpectedStructure {
            path,
            expected: "an array of glyph names",
        });
    };
    entries
        .into_iter()
        .map(|entry| match entry {
            Plist::String(name) => Ok(SmolStr::from(name)),
            _ => Err(GlyphspkgError::UnexpectedStructure {
                path: path.clone(),
                expected: "an array of glyph names",
            }),
        })
        .collect()
}

/// Read `UIState.plist` if the package has one.
pub fn read_ui_state(package: &Path) -> Result<Option<Dictionary>, GlyphspkgError> {
    let path = package.join(UI_STATE_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    match parse_plist_file(&path)? {
        Plist::Dictionary(dict) => Ok(Some(dict)),
        _ => Err(GlyphspkgError::UnexpectedStructure {
            path,
            expected: "a dictionary",
        }),
    }
}

/// The path a glyph file would have within the package, given its
/// already-mapped file stem.
pub fn glyph_file_path(package: &Path, file_stem: &str) -> PathBuf {
    package
        .join(GLYPHS_DIR)
        .join(format!("{file_stem}.{GLYPH_EXTENSION}"))
}
