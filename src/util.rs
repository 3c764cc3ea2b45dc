use std::path::{Path, PathBuf};

/// drops the last `count` characters of `name`,
/// yielding an empty string when `name` is shorter than that
pub fn strip_trailing_chars(name: &str, count: usize) -> &str {
    let keep = name.chars().count().saturating_sub(count);
    match name.char_indices().nth(keep) {
        Some((byte_index, _)) => &name[..byte_index],
        None => name,
    }
}

/// a path in `dir` named like `file_name`, with its last `strip` characters
/// replaced by `suffix`
pub fn sibling_with_suffix(dir: &Path, file_name: &str, strip: usize, suffix: &str) -> PathBuf {
    let stem = strip_trailing_chars(file_name, strip);
    dir.join(format!("{stem}{suffix}"))
}
