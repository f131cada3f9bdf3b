//! Path keys used to fold and group override entries.

use tsl_mod_core::extension_of;

/// Suffix that disables a file without deleting it.
pub const HIDDEN_SUFFIX: &str = ".mohidden";

/// Extensions the resolver lists (lowercase, without the dot).
pub const TEXTURE_EXTENSIONS: &[&str] = &["tga", "tpc", "txi", "dds"];

/// Case-folded lookup key of a relative path, with `/` separators.
pub fn fold_key(rel_path: &str) -> String {
    rel_path.replace('\\', "/").to_lowercase()
}

/// A key with the extension of its last segment stripped.
///
/// `textures/bar.tpc` -> `textures/bar`. Dots in directory names are kept.
pub fn base_key(key: &str) -> &str {
    let name_start = key.rfind('/').map_or(0, |i| i + 1);
    match key[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &key[..name_start + dot],
        _ => key,
    }
}

/// The file name without the hidden suffix, if it carries one (ASCII case-insensitive).
pub fn strip_hidden_suffix(file_name: &str) -> Option<&str> {
    let cut = file_name.len().checked_sub(HIDDEN_SUFFIX.len())?;
    if !file_name.is_char_boundary(cut) {
        return None;
    }
    let (stem, suffix) = file_name.split_at(cut);
    (suffix.eq_ignore_ascii_case(HIDDEN_SUFFIX) && !stem.is_empty()).then_some(stem)
}

/// Lowercase texture extension of a file name, or `None` if it is not a texture.
pub fn texture_extension(file_name: &str) -> Option<String> {
    extension_of(file_name).filter(|ext| TEXTURE_EXTENSIONS.contains(&ext.as_str()))
}
