//! Flat-file CSV encoding shared by the CSV repository and snapshot mirrors.
//!
//! Layout: one `word,definition` record per line, no header row.

use crate::error::StorageResult;
use lexicon_types::WordEntry;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads all entries from a CSV file.
///
/// A missing file reads as empty. Records that do not have exactly two
/// fields are skipped.
pub fn read_entries(path: &Path) -> StorageResult<Vec<WordEntry>> {
    if !path.exists() {
        debug!("No CSV file at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != 2 {
            warn!(
                "Skipping malformed record at line {} of {:?} ({} fields)",
                line + 1,
                path,
                record.len()
            );
            continue;
        }
        entries.push(WordEntry::new(&record[0], &record[1]));
    }
    Ok(entries)
}

/// Rewrites the CSV file with the given entries.
///
/// Records go to a uniquely named temp file in the target's directory,
/// which is then renamed over the target. Writers targeting different
/// files never share a temp file.
pub fn write_entries<'a, I>(path: &Path, entries: I) -> StorageResult<()>
where
    I: IntoIterator<Item = &'a WordEntry>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut prefix = OsString::from(".");
    prefix.push(path.file_name().unwrap_or_else(|| OsStr::new("lexicon")));
    prefix.push(".");
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file_mut());
        for entry in entries {
            writer.write_record([entry.word.as_str(), entry.definition.as_str()])?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    // On failure the temp file is removed when `PersistError` drops.
    temp.persist(path).map_err(|e| e.error)?;
    debug!("Wrote CSV file {:?}", path);
    Ok(())
}
