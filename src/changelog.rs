use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::StageError;

pub const SECTION_HEADER: &str = "## [Latest Changes]";

/// Append one entry to the changelog, creating the file if absent.
///
/// Existing content is never rewritten; the file is an append-only log.
pub fn append_entry(path: &Path, text: &str) -> Result<(), StageError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write!(file, "\n{SECTION_HEADER}\n{text}\n")?;
    Ok(())
}
