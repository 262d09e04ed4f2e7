//! Normalization of untrusted snapshot data.
//!
//! Stored and imported plans are plain JSON. Every field is coerced
//! individually instead of rejecting the whole payload, so a partially
//! corrupt plan still loads. Coercions are reported as
//! [`NormalizationIssue`]s.
//!
//! Rules:
//! - operation `id` missing or duplicated → fresh random id
//! - `spindle` not `SP3` → `SP4`; unknown `category` → `Außen`
//! - slot list missing or not an array → [`MIN_SLOTS`] empty slots
//! - slot entries that are not strings or name no catalog entry → empty
//! - `nextOpId` not a positive integer up to [`MAX_OP_COUNTER`] →
//!   `library.len() + 1`
//! - unknown filters → all; view mode other than `EINRICHTE` → `PLAN`;
//!   channel other than `"2"` → `"1"`

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{
    Catalog, Category, CategoryFilter, Channel, ChannelSlots, Operation, OperationId,
    PlanViewMode, PlannerState, SlotList, Spindle, SpindleFilter, ViewState, MIN_SLOTS,
};

/// Largest accepted `nextOpId`, 2^53 - 1.
pub const MAX_OP_COUNTER: u64 = (1 << 53) - 1;

/// A single coercion applied while normalizing.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationIssue {
    /// Issue category.
    pub kind: NormalizationIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of normalization issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationIssueKind {
    /// Operation had no usable id.
    MissingId,
    /// Two operations shared an id.
    DuplicateId,
    /// Spindle value was not recognized.
    InvalidSpindle,
    /// Category value was not recognized.
    InvalidCategory,
    /// `library` was not an array.
    InvalidLibrary,
    /// A channel slot list was missing or not an array.
    MissingSlotList,
    /// A slot entry was neither a string nor null.
    InvalidSlotEntry,
    /// A slot referenced an operation not in the catalog.
    DanglingReference,
    /// `nextOpId` was missing, not positive or above [`MAX_OP_COUNTER`].
    InvalidCounter,
    /// A view field held an unknown value.
    InvalidViewField,
}

impl NormalizationIssue {
    fn new(kind: NormalizationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Normalized plan plus the coercions applied to get there.
#[derive(Debug, Clone)]
pub struct NormalizedState {
    pub state: PlannerState,
    pub issues: Vec<NormalizationIssue>,
}

/// JavaScript-style truthiness for loosely typed flags.
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Text field: strings as-is, numbers stringified, anything else empty.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Normalizes one catalog entry.
///
/// Never fails: a non-object entry becomes a blank operation with a fresh id.
pub fn normalize_operation(raw: &Value, issues: &mut Vec<NormalizationIssue>) -> Operation {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => OperationId::new(s.as_str()),
        Some(Value::Number(n)) => OperationId::new(n.to_string()),
        _ => {
            let id = OperationId::random();
            issues.push(NormalizationIssue::new(
                NormalizationIssueKind::MissingId,
                format!("Operation without id was assigned '{id}'"),
            ));
            id
        }
    };

    let spindle = match obj.get("spindle").and_then(Value::as_str) {
        Some("SP3") => Spindle::Sp3,
        Some("SP4") => Spindle::Sp4,
        other => {
            issues.push(NormalizationIssue::new(
                NormalizationIssueKind::InvalidSpindle,
                format!("Operation '{id}' has spindle {other:?}, using SP4"),
            ));
            Spindle::Sp4
        }
    };

    let category = match obj
        .get("category")
        .and_then(Value::as_str)
        .and_then(Category::from_wire)
    {
        Some(c) => c,
        None => {
            issues.push(NormalizationIssue::new(
                NormalizationIssueKind::InvalidCategory,
                format!("Operation '{id}' has unknown category, using Außen"),
            ));
            Category::Aussen
        }
    };

    Operation {
        code: text(obj.get("code")),
        title: text(obj.get("title")),
        spindle,
        category,
        doppelhalter: truthy(obj.get("doppelhalter")),
        tool_no: text(obj.get("toolNo")),
        tool_name: text(obj.get("toolName")),
        id,
    }
}

/// Normalizes the `library` array. Duplicate ids are replaced; the first
/// occurrence keeps the original id.
pub fn normalize_library(raw: Option<&Value>, issues: &mut Vec<NormalizationIssue>) -> Catalog {
    let entries: &[Value] = match raw {
        Some(Value::Array(entries)) => entries.as_slice(),
        None => &[],
        Some(_) => {
            issues.push(NormalizationIssue::new(
                NormalizationIssueKind::InvalidLibrary,
                "Library is not an array, starting with an empty catalog",
            ));
            &[]
        }
    };

    let mut seen = HashSet::new();
    let mut catalog = Catalog::new();
    for entry in entries {
        let mut op = normalize_operation(entry, issues);
        if !seen.insert(op.id.clone()) {
            let fresh = OperationId::random();
            issues.push(NormalizationIssue::new(
                NormalizationIssueKind::DuplicateId,
                format!("Duplicate operation id '{}' reassigned to '{fresh}'", op.id),
            ));
            op.id = fresh.clone();
            seen.insert(fresh);
        }
        catalog.push(op);
    }
    catalog
}

/// Normalizes one channel's slot list against the catalog.
pub fn normalize_slot_list(
    channel: Channel,
    raw: Option<&Value>,
    catalog: &Catalog,
    issues: &mut Vec<NormalizationIssue>,
) -> SlotList {
    let Some(Value::Array(entries)) = raw else {
        issues.push(NormalizationIssue::new(
            NormalizationIssueKind::MissingSlotList,
            format!("Channel {channel} has no slot list, using {MIN_SLOTS} empty slots"),
        ));
        return SlotList::new();
    };

    let normalized = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => {
                let id = OperationId::new(s.as_str());
                if catalog.contains(&id) {
                    Some(id)
                } else {
                    issues.push(NormalizationIssue::new(
                        NormalizationIssueKind::DanglingReference,
                        format!("Channel {channel} slot {} references unknown '{id}'", i + 1),
                    ));
                    None
                }
            }
            _ => {
                issues.push(NormalizationIssue::new(
                    NormalizationIssueKind::InvalidSlotEntry,
                    format!("Channel {channel} slot {} is not an operation id", i + 1),
                ));
                None
            }
        })
        .collect();

    SlotList::from_entries(normalized)
}

fn normalize_view(obj: &Map<String, Value>, issues: &mut Vec<NormalizationIssue>) -> ViewState {
    let channel_raw = obj.get("currentChannel").or_else(|| obj.get("currentKanal"));
    let current_channel = match channel_raw.and_then(Value::as_str) {
        Some("2") => Channel::Two,
        _ => Channel::One,
    };

    let active_category = match non_empty_str(obj.get("activeCategory")) {
        None => CategoryFilter::All,
        Some(s) => CategoryFilter::from_wire(s).unwrap_or_else(|| {
            issues.push(NormalizationIssue::new(
                NormalizationIssueKind::InvalidViewField,
                format!("Unknown category filter '{s}', showing all"),
            ));
            CategoryFilter::All
        }),
    };

    let spindle_filter = match non_empty_str(obj.get("spindleFilter")) {
        None => SpindleFilter::All,
        Some(s) => SpindleFilter::from_wire(s).unwrap_or_else(|| {
            issues.push(NormalizationIssue::new(
                NormalizationIssueKind::InvalidViewField,
                format!("Unknown spindle filter '{s}', showing all"),
            ));
            SpindleFilter::All
        }),
    };

    let plan_view_mode = match obj.get("planViewMode").and_then(Value::as_str) {
        Some("EINRICHTE") => PlanViewMode::SetupSheet,
        _ => PlanViewMode::ProgramTable,
    };

    ViewState {
        current_channel,
        active_category,
        spindle_filter,
        plan_view_mode,
        library_collapsed: truthy(obj.get("libraryCollapsed")),
    }
}

/// Normalizes a snapshot `data` object into a [`PlannerState`].
///
/// # Errors
/// Only fails when `raw` is not a JSON object; every field-level problem is
/// coerced and reported in [`NormalizedState::issues`].
pub fn normalize_state(raw: &Value) -> Result<NormalizedState> {
    let obj = raw
        .as_object()
        .ok_or_else(|| Error::InvalidSnapshot("snapshot data is not an object".into()))?;

    let mut issues = Vec::new();
    let library = normalize_library(obj.get("library"), &mut issues);

    let slots_raw = obj.get("slots");
    let slots = ChannelSlots {
        one: normalize_slot_list(
            Channel::One,
            slots_raw.and_then(|s| s.get("1")),
            &library,
            &mut issues,
        ),
        two: normalize_slot_list(
            Channel::Two,
            slots_raw.and_then(|s| s.get("2")),
            &library,
            &mut issues,
        ),
    };

    let next_op_id = match obj.get("nextOpId").and_then(Value::as_u64) {
        Some(n) if (1..=MAX_OP_COUNTER).contains(&n) => n,
        _ => {
            let fallback = library.len() as u64 + 1;
            issues.push(NormalizationIssue::new(
                NormalizationIssueKind::InvalidCounter,
                format!("Missing or invalid nextOpId, using {fallback}"),
            ));
            fallback
        }
    };

    let view = normalize_view(obj, &mut issues);

    Ok(NormalizedState {
        state: PlannerState {
            view,
            slots,
            library,
            next_op_id,
        },
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(issues: &[NormalizationIssue]) -> Vec<NormalizationIssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_normalize_clean_operation() {
        let mut issues = Vec::new();
        let op = normalize_operation(
            &json!({
                "id": "op_4", "code": "L1113", "title": "I-Gewinde M26x1",
                "spindle": "SP3", "category": "Innen", "doppelhalter": true,
                "toolNo": "T0404", "toolName": "GEWINDE-I"
            }),
            &mut issues,
        );
        assert!(issues.is_empty());
        assert_eq!(op.id.as_str(), "op_4");
        assert_eq!(op.spindle, Spindle::Sp3);
        assert_eq!(op.category, Category::Innen);
        assert!(op.doppelhalter);
        assert_eq!(op.tool_no, "T0404");
    }

    #[test]
    fn test_normalize_operation_coerces() {
        let mut issues = Vec::new();
        let op = normalize_operation(
            &json!({ "code": 1101, "spindle": "SP9", "category": "Oben", "doppelhalter": 1 }),
            &mut issues,
        );
        assert!(op.id.as_str().starts_with("op_"));
        assert_eq!(op.code, "1101");
        assert_eq!(op.title, "");
        assert_eq!(op.spindle, Spindle::Sp4);
        assert_eq!(op.category, Category::Aussen);
        assert!(op.doppelhalter);
        assert_eq!(
            kinds(&issues),
            vec![
                NormalizationIssueKind::MissingId,
                NormalizationIssueKind::InvalidSpindle,
                NormalizationIssueKind::InvalidCategory
            ]
        );
    }

    #[test]
    fn test_normalize_non_object_operation() {
        let mut issues = Vec::new();
        let op = normalize_operation(&json!("garbage"), &mut issues);
        assert_eq!(op.code, "");
        assert_eq!(op.spindle, Spindle::Sp4);
        assert!(!issues.is_empty());
    }

    #[test]
    fn test_duplicate_ids_reassigned() {
        let mut issues = Vec::new();
        let catalog = normalize_library(
            Some(&json!([
                { "id": "op_1", "spindle": "SP4", "category": "Innen" },
                { "id": "op_1", "spindle": "SP4", "category": "Innen" }
            ])),
            &mut issues,
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.as_slice()[0].id.as_str(), "op_1");
        assert_ne!(catalog.as_slice()[1].id.as_str(), "op_1");
        assert_eq!(kinds(&issues), vec![NormalizationIssueKind::DuplicateId]);
    }

    #[test]
    fn test_library_not_array() {
        let mut issues = Vec::new();
        let catalog = normalize_library(Some(&json!({ "op_1": {} })), &mut issues);
        assert!(catalog.is_empty());
        assert_eq!(kinds(&issues), vec![NormalizationIssueKind::InvalidLibrary]);
    }

    #[test]
    fn test_slot_list_drops_unknown_ids() {
        let catalog = Catalog::new().with_operation(Operation::new(OperationId::new("op_1"), "L", "A"));
        let mut issues = Vec::new();
        let list = normalize_slot_list(
            Channel::One,
            Some(&json!(["op_1", "op_99", null, 5, ""])),
            &catalog,
            &mut issues,
        );
        assert_eq!(list.len(), MIN_SLOTS);
        assert_eq!(list.get(0).map(OperationId::as_str), Some("op_1"));
        assert_eq!(list.filled().count(), 1);
        assert_eq!(
            kinds(&issues),
            vec![
                NormalizationIssueKind::DanglingReference,
                NormalizationIssueKind::InvalidSlotEntry
            ]
        );
    }

    #[test]
    fn test_slot_list_keeps_long_lists() {
        let catalog = Catalog::new();
        let mut issues = Vec::new();
        let raw = json!([null, null, null, null, null, null, null, null]);
        let list = normalize_slot_list(Channel::Two, Some(&raw), &catalog, &mut issues);
        assert_eq!(list.len(), 8);
    }

    #[test]
    fn test_normalize_state_defaults() {
        let n = normalize_state(&json!({})).unwrap();
        let state = n.state;
        assert_eq!(state.slots.one.len(), MIN_SLOTS);
        assert_eq!(state.slots.two.len(), MIN_SLOTS);
        assert!(state.library.is_empty());
        assert_eq!(state.next_op_id, 1);
        assert_eq!(state.view, ViewState::default());
        assert!(kinds(&n.issues).contains(&NormalizationIssueKind::MissingSlotList));
        assert!(kinds(&n.issues).contains(&NormalizationIssueKind::InvalidCounter));
    }

    #[test]
    fn test_normalize_state_reads_fields() {
        let n = normalize_state(&json!({
            "currentKanal": "2",
            "slots": { "1": ["op_1"], "2": [] },
            "library": [{ "id": "op_1", "code": "L1101", "title": "Planen",
                          "spindle": "SP4", "category": "Außen" }],
            "nextOpId": 12,
            "activeCategory": "Radial",
            "spindleFilter": "SP3",
            "planViewMode": "EINRICHTE",
            "libraryCollapsed": true
        }))
        .unwrap();
        let state = n.state;
        assert!(n.issues.is_empty());
        assert_eq!(state.view.current_channel, Channel::Two);
        assert_eq!(state.view.active_category, CategoryFilter::Only(Category::Radial));
        assert_eq!(state.view.spindle_filter, SpindleFilter::Only(Spindle::Sp3));
        assert_eq!(state.view.plan_view_mode, PlanViewMode::SetupSheet);
        assert!(state.view.library_collapsed);
        assert_eq!(state.next_op_id, 12);
        assert_eq!(state.slots.one.get(0).map(OperationId::as_str), Some("op_1"));
    }

    #[test]
    fn test_counter_falls_back_to_library_len() {
        let n = normalize_state(&json!({
            "library": [{ "id": "a" }, { "id": "b" }],
            "nextOpId": -3
        }))
        .unwrap();
        assert_eq!(n.state.next_op_id, 3);
    }

    #[test]
    fn test_state_json_upholds_model_invariants() {
        let n = normalize_state(&json!({
            "library": [{ "id": "op_1" }, { "id": "op_1" }],
            "slots": { "1": ["op_1"], "2": [] }
        }))
        .unwrap();
        assert_eq!(n.state.slots.one.len(), MIN_SLOTS);
        assert_eq!(n.state.slots.two.len(), MIN_SLOTS);

        let ids: HashSet<_> = n.state.library.iter().map(|op| op.id.clone()).collect();
        assert_eq!(ids.len(), n.state.library.len());
    }

    #[test]
    fn test_oversized_counter_rejected() {
        let n = normalize_state(&json!({ "nextOpId": u64::MAX })).unwrap();
        assert_eq!(n.state.next_op_id, 1);
        assert!(kinds(&n.issues).contains(&NormalizationIssueKind::InvalidCounter));

        let at_bound = normalize_state(&json!({ "nextOpId": MAX_OP_COUNTER })).unwrap();
        assert_eq!(at_bound.state.next_op_id, MAX_OP_COUNTER);

        let mut state = n.state;
        let id = state
            .upsert_operation(crate::assignment::OperationDraft::new("L1", "A"), None)
            .unwrap();
        assert_eq!(id.as_str(), "op_1");
    }

    #[test]
    fn test_unknown_view_values() {
        let n = normalize_state(&json!({
            "currentChannel": "7",
            "activeCategory": "Quer",
            "spindleFilter": "SP5",
            "planViewMode": "GANTT"
        }))
        .unwrap();
        assert_eq!(n.state.view, ViewState::default());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(normalize_state(&json!([1, 2])).is_err());
        assert!(normalize_state(&json!(null)).is_err());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = normalize_state(&json!({
            "slots": { "1": ["op_1", "op_x"] },
            "library": [{ "id": "op_1", "code": "L1", "title": "T", "category": "Axial" }],
        }))
        .unwrap()
        .state;
        let again = normalize_state(&serde_json::to_value(&first).unwrap()).unwrap();
        assert!(again.issues.is_empty());
        assert_eq!(again.state, first);
    }
}
