use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::*;

use super::{BatchError, list_entry_names};
use crate::util::strip_trailing_chars;

/// appended to the truncated source name to find its options files
pub const OPTIONS_GLOB_SUFFIX: &str = "*_options.txt";

/// the length of "_source.cl"
const SOURCE_NAME_TRIM: usize = 10;

/// the glob an options file for `source_file_name` must match,
/// ie "a_source.cl" -> "a*_options.txt"
pub fn options_pattern(source_file_name: &str) -> String {
    let prefix = strip_trailing_chars(source_file_name, SOURCE_NAME_TRIM);
    format!("{prefix}{OPTIONS_GLOB_SUFFIX}")
}

fn compile_pattern(source_file_name: &str) -> Result<Pattern, BatchError> {
    let raw = options_pattern(source_file_name);

    match Pattern::new(&raw) {
        Ok(pattern) => Ok(pattern),
        Err(err) => {
            // treat the name part literally, ie an unclosed '['
            debug!("options glob {raw:?} is not a valid pattern ({err}), matching its prefix literally");
            let prefix = strip_trailing_chars(source_file_name, SOURCE_NAME_TRIM);
            let escaped = format!("{}{OPTIONS_GLOB_SUFFIX}", Pattern::escape(prefix));
            Pattern::new(&escaped).map_err(|source| BatchError::OptionsPattern {
                pattern: escaped,
                source,
            })
        }
    }
}

/// rescans `directory` for every entry matching the options glob of `source_file_name`
pub fn matching_options_files(
    directory: &Path,
    source_file_name: &str,
) -> Result<Vec<PathBuf>, BatchError> {
    let pattern = compile_pattern(source_file_name)?;

    let matches = list_entry_names(directory)?
        .into_iter()
        .filter(|name| pattern.matches(name))
        .map(|name| directory.join(name))
        .collect();

    Ok(matches)
}

/// the whitespace-separated flags on the first line of an options file
///
/// anything that isn't a regular file (missing, a directory) has no options
pub fn read_options(path: &Path) -> Result<Vec<String>, BatchError> {
    if !path.is_file() {
        return Ok(vec![]);
    }

    let read_error = |source| BatchError::ReadOptions {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut first_line = String::new();
    BufReader::new(file)
        .read_line(&mut first_line)
        .map_err(read_error)?;

    Ok(first_line.split_whitespace().map(str::to_string).collect())
}
