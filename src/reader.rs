//! Batch reading of message files into a feature table

use crate::error::{ExtractError, Result};
use crate::features::build_record;
use crate::types::{FeatureRecord, FeatureTable};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Read every message file into one feature table, in input order
///
/// Any single failure aborts the whole batch; use
/// [`read_messages_lossy`] to isolate per-message failures instead.
pub fn read_messages<P: AsRef<Path>>(paths: &[P]) -> Result<FeatureTable> {
    let mut table = FeatureTable::new();

    for path in paths {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading message");
        table.push(read_one(path)?);
    }

    Ok(table)
}

/// Read message files, skipping failures instead of aborting
///
/// Returns the table of successful rows in input order plus the failures
/// that were skipped, each with the offending path.
pub fn read_messages_lossy<P: AsRef<Path>>(
    paths: &[P],
) -> (FeatureTable, Vec<(PathBuf, ExtractError)>) {
    let mut table = FeatureTable::new();
    let mut failures = Vec::new();

    for path in paths {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading message");
        match read_one(path) {
            Ok(record) => table.push(record),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping message");
                failures.push((path.to_path_buf(), e));
            }
        }
    }

    (table, failures)
}

fn read_one(path: &Path) -> Result<FeatureRecord> {
    let raw = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = mailparse::parse_mail(&raw).map_err(|e| ExtractError::Structure(e.to_string()))?;
    build_record(&parsed)
}
