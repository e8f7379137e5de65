//! The package-to-single conversion pipeline.

use crate::{
    error::GlyphspkgError,
    filenames::user_name_to_file_name,
    package::{glyph_file_path, parse_plist_file, read_font_info, read_glyph_order, read_ui_state},
    plist::Plist,
    reporter::{LogReporter, Reporter},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Extension of the single-file output
pub const SINGLE_FILE_EXTENSION: &str = "glyphs";

const GLYPHS_KEY: &str = "glyphs";
const UI_STATE_KEY: &str = "displayStrings";
// The single-file format spells the same key with a capital D.
const DISPLAY_STRINGS_KEY: &str = "DisplayStrings";

/// Convert a package with the default log-based reporter.
pub fn package_to_single(
    input: &Path,
    output: Option<&Path>,
) -> Result<PathBuf, GlyphspkgError> {
    package_to_single_with(input, output, &LogReporter)
}

/// Convert a Glyphs package directory into a single-file Glyphs source.
///
/// `output` may be a file path, a directory to place the file in, or
/// `None` to save next to the package. Returns the path of the written
/// file. Glyphs listed in the package order with no corresponding file are
/// reported as warnings and left out of the output.
pub fn package_to_single_with(
    input: &Path,
    output: Option<&Path>,
    reporter: &dyn Reporter,
) -> Result<PathBuf, GlyphspkgError> {
    let output_path = resolve_output_path(input, output)?;

    // The main dict; the merged document grows from it
    let mut glyphs_file = read_font_info(input)?;

    // The glyph order decides which glyph files are read, and in which order
    let glyph_order = read_glyph_order(input)?;

    let mut glyphs = Vec::with_capacity(glyph_order.len());
    for glyph_name in &glyph_order {
        let file_name = user_name_to_file_name(glyph_name.as_str());
        let file_path = glyph_file_path(input, &file_name);
        if !file_path.is_file() {
            reporter.warn(&format!(
                "Glyph file not found for glyph '{glyph_name}': {file_name}, \
                 glyph will be missing in converted file."
            ));
            continue;
        }
        glyphs.push(parse_plist_file(&file_path)?);
    }
    glyphs_file.insert(GLYPHS_KEY.into(), Plist::Array(glyphs));

    // UIState carries the display strings currently open in the edit view
    if let Some(ui_state) = read_ui_state(input)? {
        if let Some(display_strings) = ui_state.get(UI_STATE_KEY) {
            glyphs_file.insert(DISPLAY_STRINGS_KEY.into(), display_strings.clone());
        }
    }

    reporter.info(&format!("Saving: {}", output_path.display()));
    fs::write(&output_path, Plist::Dictionary(glyphs_file).to_text()).map_err(|source| {
        GlyphspkgError::Io {
            path: output_path.clone(),
            source,
        }
    })?;
    Ok(output_path)
}

/// Decide where the converted file goes.
///
/// With no output path, the file is saved next to the package under the
/// package's name with a `.glyphs` extension. An output path naming an
/// existing directory places a file of that name inside it; any other
/// output path is the destination itself. The resolved path must not be
/// the input package.
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
) -> Result<PathBuf, GlyphspkgError> {
    let resolved = match output {
        None => input.with_extension(SINGLE_FILE_EXTENSION),
        Some(dir) if dir.is_dir() => {
            let single = input.with_extension(SINGLE_FILE_EXTENSION);
            let file_name = single
                .file_name()
                .ok_or_else(|| GlyphspkgError::BadInputPath {
                    path: input.to_path_buf(),
                })?;
            dir.join(file_name)
        }
        Some(file) => file.to_path_buf(),
    };
    if resolved == input {
        return Err(GlyphspkgError::OutputIsInput { path: resolved });
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_output_saves_next_to_package() {
        let resolved =
            resolve_output_path(Path::new("sources/Foo.glyphspackage"), None).unwrap();
        assert_eq!(resolved, PathBuf::from("sources/Foo.glyphs"));
    }

    #[test]
    fn explicit_file_path_is_used_verbatim() {
        let resolved = resolve_output_path(
            Path::new("Foo.glyphspackage"),
            Some(Path::new("out/Renamed.glyphs")),
        )
        .unwrap();
        assert_eq!(resolved, PathBuf::from("out/Renamed.glyphs"));
    }

    #[test]
    fn output_directory_gets_package_name() {
        let dir = tempfile::tempdir().unwrap();
        let resolved =
            resolve_output_path(Path::new("Foo.glyphspackage"), Some(dir.path())).unwrap();
        assert_eq!(resolved, dir.path().join("Foo.glyphs"));
    }

    #[test]
    fn output_equal_to_input_is_rejected() {
        let input = Path::new("Foo.glyphspackage");
        let err = resolve_output_path(input, Some(input)).unwrap_err();
        assert!(matches!(err, GlyphspkgError::OutputIsInput { .. }));
    }

    #[test]
    fn package_named_like_output_is_rejected() {
        // a package directory named Foo.glyphs would resolve onto itself
        let err = resolve_output_path(Path::new("Foo.glyphs"), None).unwrap_err();
        assert!(matches!(err, GlyphspkgError::OutputIsInput { .. }));
    }
}
