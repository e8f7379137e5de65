//! Mapping of user-visible glyph names to filesystem-safe file stems.
//!
//! Packages store one file per glyph, so names like `A` and `a` must not
//! collide on case-insensitive filesystems, and characters that are reserved
//! on common platforms must not reach the filesystem at all. The scheme is
//! the UFO common-filename convention: uppercase characters get an
//! underscore suffix, reserved characters become underscores, and name parts
//! matching reserved DOS device names are prefixed with an underscore.

const MAX_FILE_NAME_LENGTH: usize = 255;

const RESERVED_FILE_NAMES: &[&str] = &[
    "aux", "clock$", "com1", "com2", "com3", "com4", "con", "lpt1", "lpt2", "lpt3", "nul", "prn",
];

fn is_illegal(c: char) -> bool {
    matches!(
        c,
        '"' | '*' | '+' | '/' | ':' | '<' | '>' | '?' | '[' | '\\' | ']' | '|'
    ) || (c as u32) < 0x20
        || c as u32 == 0x7F
}

/// Map a glyph name to the stem of its file within the package.
///
/// Deterministic: the same name always maps to the same stem.
pub fn user_name_to_file_name(user_name: &str) -> String {
    let mut filtered = String::with_capacity(user_name.len() + 4);
    for (index, c) in user_name.chars().enumerate() {
        if index == 0 && c == '.' {
            filtered.push('_');
        } else if is_illegal(c) {
            filtered.push('_');
        } else {
            filtered.push(c);
            if c.to_lowercase().ne(std::iter::once(c)) {
                filtered.push('_');
            }
        }
    }
    let clipped: String = filtered.chars().take(MAX_FILE_NAME_LENGTH).collect();
    clipped
        .split('.')
        .map(|part| {
            if RESERVED_FILE_NAMES.contains(&part.to_lowercase().as_str()) {
                format!("_{part}")
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("a", "a")]
    #[case("A", "A_")]
    #[case("AE", "A_E_")]
    #[case("Aacute", "A_acute")]
    #[case("T_H", "T__H_")]
    #[case(".notdef", "_notdef")]
    #[case(".null", "_null")]
    #[case("f_f_i", "f_f_i")]
    #[case("a:b", "a_b")]
    #[case("quotedbl\"", "quotedbl_")]
    #[case("con", "_con")]
    #[case("CON", "C_O_N_")]
    #[case("alt.con", "alt._con")]
    #[case("con.alt", "_con.alt")]
    fn maps_names(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(user_name_to_file_name(name), expected);
    }

    #[test]
    fn long_names_are_clipped() {
        let name = "a".repeat(300);
        assert_eq!(user_name_to_file_name(&name).len(), MAX_FILE_NAME_LENGTH);
    }

    #[test]
    fn mapping_is_stable() {
        assert_eq!(
            user_name_to_file_name("Omega"),
            user_name_to_file_name("Omega")
        );
    }
}
