//! File export and import.
//!
//! Export writes a pretty-printed envelope with `exportedAt` to
//! `SyncOperator_<date>.json`. Import accepts either a full envelope or a
//! bare `data` object and replaces the whole plan.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::snapshot::{normalize_logged, unwrap_envelope, SnapshotEnvelope};
use crate::error::Result;
use crate::models::PlannerState;
use crate::normalization::NormalizedState;

/// File name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("SyncOperator_{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed export document.
pub fn export_json(state: &PlannerState, at: DateTime<Utc>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SnapshotEnvelope::exported(state, at))?)
}

/// Writes an export into `dir` and returns the file path.
pub fn export_to_dir(dir: &Path, state: &PlannerState, at: DateTime<Utc>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(at.date_naive()));
    fs::write(&path, export_json(state, at)?)?;
    info!(path = %path.display(), "exported plan");
    Ok(path)
}

/// Parses import text (wrapped or bare) into a normalized plan.
pub fn parse_import(text: &str) -> Result<NormalizedState> {
    let parsed: Value = serde_json::from_str(text)?;
    normalize_logged(unwrap_envelope(&parsed))
}

/// Reads and parses an import file.
pub fn import_from_path(path: &Path) -> Result<NormalizedState> {
    let text = fs::read_to_string(path)?;
    let normalized = parse_import(&text)?;
    info!(
        path = %path.display(),
        operations = normalized.state.library.len(),
        "imported plan"
    );
    Ok(normalized)
}
