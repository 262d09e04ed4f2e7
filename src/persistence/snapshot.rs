//! Versioned snapshot envelope.
//!
//! Stored and exported plans share one shape:
//!
//! ```json
//! { "version": 3, "exportedAt": "...", "data": { ...PlannerState... } }
//! ```
//!
//! `exportedAt` is only written by file export.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::KeyValueStore;
use crate::error::{Error, Result};
use crate::models::PlannerState;
use crate::normalization::{normalize_state, truthy, NormalizedState};

/// Snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 3;

/// Default key of the persisted plan.
pub const STORAGE_KEY: &str = "SyncOperator_v1";

/// Outgoing envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEnvelope<'a> {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub data: &'a PlannerState,
}

impl<'a> SnapshotEnvelope<'a> {
    /// Envelope for the local store.
    pub fn stored(data: &'a PlannerState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at: None,
            data,
        }
    }

    /// Envelope for a file export.
    pub fn exported(data: &'a PlannerState, at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at: Some(at),
            data,
        }
    }
}

fn present(value: &Value) -> bool {
    truthy(Some(value))
}

/// Payload of an envelope, or the value itself when it is bare data.
pub fn unwrap_envelope(value: &Value) -> &Value {
    match value.get("data") {
        Some(data) if present(data) => data,
        _ => value,
    }
}

/// Normalizes a parsed envelope, logging every coercion.
pub(crate) fn normalize_logged(data: &Value) -> Result<NormalizedState> {
    let normalized = normalize_state(data)?;
    for issue in &normalized.issues {
        warn!(kind = ?issue.kind, "{}", issue.message);
    }
    Ok(normalized)
}

/// Writes the state to `store` under `key`.
pub fn save_state(store: &mut dyn KeyValueStore, key: &str, state: &PlannerState) -> Result<()> {
    let text = serde_json::to_string(&SnapshotEnvelope::stored(state))?;
    store.set(key, &text)
}

/// Reads the state stored under `key`.
///
/// `Ok(None)` when nothing has been stored yet.
///
/// # Errors
/// Unparseable JSON, an envelope without `data`, or `data` that is not an
/// object.
pub fn load_state(store: &dyn KeyValueStore, key: &str) -> Result<Option<NormalizedState>> {
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };
    let parsed: Value = serde_json::from_str(&text)?;
    let data = parsed
        .get("data")
        .filter(|d| present(d))
        .ok_or_else(|| Error::InvalidSnapshot("stored snapshot has no data".into()))?;
    let normalized = normalize_logged(data)?;
    info!(
        operations = normalized.state.library.len(),
        issues = normalized.issues.len(),
        "loaded stored plan"
    );
    Ok(Some(normalized))
}
