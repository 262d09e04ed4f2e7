//! Setup sheet ("Einrichteblatt").
//!
//! Tool-centric summary: one row per distinct tool number used in either
//! channel, with the upper revolver (channel 1, "oben") and lower revolver
//! (channel 2, "unten") texts side by side. Slot order only matters for
//! which operation supplies a side's text.

use std::collections::HashMap;

use crate::models::{Channel, PlannerState};

/// Sort key for tool numbers that are not `T<digits>`.
pub const UNNUMBERED_TOOL_KEY: i64 = 999_999;

/// One tool row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupSheetRow {
    pub tool_no: String,
    /// Text for channel 1 (upper revolver). Empty if unused there.
    pub oben: String,
    /// Text for channel 2 (lower revolver). Empty if unused there.
    pub unten: String,
}

impl SetupSheetRow {
    fn new(tool_no: &str) -> Self {
        Self {
            tool_no: tool_no.to_string(),
            ..Self::default()
        }
    }

    /// Side text for a channel.
    pub fn text(&self, channel: Channel) -> &str {
        match channel {
            Channel::One => &self.oben,
            Channel::Two => &self.unten,
        }
    }

    /// Tool number shown beside a side, only when that side is filled.
    pub fn tool_no_for(&self, channel: Channel) -> Option<&str> {
        (!self.text(channel).is_empty()).then_some(self.tool_no.as_str())
    }

    fn text_mut(&mut self, channel: Channel) -> &mut String {
        match channel {
            Channel::One => &mut self.oben,
            Channel::Two => &mut self.unten,
        }
    }
}

/// Tool list for both revolvers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupSheet {
    pub rows: Vec<SetupSheetRow>,
}

impl SetupSheet {
    /// Derives the sheet.
    ///
    /// Scans channel 1 then channel 2 in slot order. Operations without a
    /// tool number are skipped. Per tool and side, the first non-empty text
    /// (tool name, else title) wins.
    pub fn build(state: &PlannerState) -> Self {
        let mut rows: Vec<SetupSheetRow> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for channel in Channel::ALL {
            for (_, id) in state.slots.get(channel).filled() {
                let Some(op) = state.operation(id) else {
                    continue;
                };
                let Some(tool_no) = op.tool_no() else {
                    continue;
                };
                let pos = *index.entry(tool_no.to_string()).or_insert_with(|| {
                    rows.push(SetupSheetRow::new(tool_no));
                    rows.len() - 1
                });
                let side = rows[pos].text_mut(channel);
                if side.is_empty() {
                    let text = op.tool_name().unwrap_or_else(|| op.title.trim());
                    *side = text.to_string();
                }
            }
        }

        rows.sort_by(|a, b| {
            tool_sort_key(&a.tool_no)
                .cmp(&tool_sort_key(&b.tool_no))
                .then_with(|| a.tool_no.cmp(&b.tool_no))
        });
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, tool_no: &str) -> Option<&SetupSheetRow> {
        self.rows.iter().find(|r| r.tool_no == tool_no)
    }
}

/// Numeric part of a `T`-prefixed tool number: leading whitespace skipped,
/// optional sign, then leading digits. Tools without a number, or numbered
/// zero, sort last with [`UNNUMBERED_TOOL_KEY`].
pub fn tool_sort_key(tool_no: &str) -> i64 {
    let Some(rest) = tool_no.strip_prefix('T') else {
        return UNNUMBERED_TOOL_KEY;
    };
    let rest = rest.trim_start();
    let (negative, rest) = match rest.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, rest.strip_prefix('+').unwrap_or(rest)),
    };
    let value = rest
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(None, |acc: Option<i64>, d| {
            Some(acc.unwrap_or(0).saturating_mul(10).saturating_add(i64::from(d)))
        });
    match value {
        Some(v) if v != 0 => {
            if negative {
                -v
            } else {
                v
            }
        }
        _ => UNNUMBERED_TOOL_KEY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Catalog, Operation, OperationId, SlotList};

    fn op(n: u64, title: &str, tool_no: &str, tool_name: &str) -> Operation {
        Operation::new(OperationId::sequential(n), format!("L{n}"), title).with_tool(tool_no, tool_name)
    }

    fn slots(ids: &[u64]) -> SlotList {
        SlotList::from_entries(ids.iter().map(|&n| Some(OperationId::sequential(n))).collect())
    }

    fn state(ops: Vec<Operation>, one: &[u64], two: &[u64]) -> PlannerState {
        PlannerState::new()
            .with_library(Catalog::from_operations(ops))
            .with_slots(Channel::One, slots(one))
            .with_slots(Channel::Two, slots(two))
    }

    #[test]
    fn test_shared_tool_single_row() {
        let s = state(
            vec![
                op(1, "Planen", "T0101", "PLAN-80"),
                op(2, "Vordrehen", "T0101", ""),
                op(3, "Nachplanen", "T0101", "ANDERS"),
            ],
            &[1, 3],
            &[2],
        );
        let sheet = SetupSheet::build(&s);
        assert_eq!(sheet.len(), 1);

        let row = sheet.row("T0101").unwrap();
        assert_eq!(row.oben, "PLAN-80");
        assert_eq!(row.unten, "Vordrehen");
        assert_eq!(row.tool_no_for(Channel::One), Some("T0101"));
    }

    #[test]
    fn test_operations_without_tool_excluded() {
        let s = state(vec![op(1, "A", "", "NAME"), op(2, "B", "  ", "")], &[1], &[2]);
        assert!(SetupSheet::build(&s).is_empty());
    }

    #[test]
    fn test_one_sided_row() {
        let s = state(vec![op(1, "Bohren", "T0505", "")], &[], &[1]);
        let sheet = SetupSheet::build(&s);
        let row = &sheet.rows[0];
        assert_eq!(row.oben, "");
        assert_eq!(row.unten, "Bohren");
        assert_eq!(row.tool_no_for(Channel::One), None);
        assert_eq!(row.tool_no_for(Channel::Two), Some("T0505"));
    }

    #[test]
    fn test_sort_order() {
        let s = state(
            vec![
                op(1, "a", "T12", ""),
                op(2, "b", "X5", ""),
                op(3, "c", "T0101", ""),
                op(4, "d", "T2", ""),
                op(5, "e", "Tabc", ""),
                op(6, "f", "T002", ""),
            ],
            &[1, 2, 3],
            &[4, 5, 6],
        );
        let order: Vec<_> = SetupSheet::build(&s)
            .rows
            .into_iter()
            .map(|r| r.tool_no)
            .collect();
        assert_eq!(order, vec!["T002", "T2", "T12", "T0101", "Tabc", "X5"]);
    }

    #[test]
    fn test_tool_sort_key() {
        assert_eq!(tool_sort_key("T0101"), 101);
        assert_eq!(tool_sort_key("T12a"), 12);
        assert_eq!(tool_sort_key("t12"), UNNUMBERED_TOOL_KEY);
        assert_eq!(tool_sort_key("T"), UNNUMBERED_TOOL_KEY);
        assert_eq!(tool_sort_key("12"), UNNUMBERED_TOOL_KEY);
        assert_eq!(tool_sort_key("T0"), UNNUMBERED_TOOL_KEY);
        assert_eq!(tool_sort_key("T000"), UNNUMBERED_TOOL_KEY);
        assert_eq!(tool_sort_key("T 12"), 12);
        assert_eq!(tool_sort_key("T+7"), 7);
        assert_eq!(tool_sort_key("T-3"), -3);
    }

    #[test]
    fn test_zero_tool_sorts_with_unnumbered() {
        let s = state(
            vec![op(1, "a", "T0", ""), op(2, "b", "T5", ""), op(3, "c", "T 2", "")],
            &[1, 2],
            &[3],
        );
        let order: Vec<_> = SetupSheet::build(&s)
            .rows
            .into_iter()
            .map(|r| r.tool_no)
            .collect();
        assert_eq!(order, vec!["T 2", "T5", "T0"]);
    }

    #[test]
    fn test_first_non_empty_text_wins() {
        let s = state(
            vec![
                op(1, "   ", "T0707", ""),
                op(2, "Ausdrehen", "T0707", ""),
                op(3, "Nachdrehen", "T0707", "BOHRSTANGE"),
            ],
            &[1, 2, 3],
            &[],
        );
        let sheet = SetupSheet::build(&s);
        let row = sheet.row("T0707").unwrap();
        assert_eq!(row.oben, "Ausdrehen");
        assert_eq!(row.unten, "");
        assert_eq!(row.tool_no_for(Channel::One), Some("T0707"));
    }

    #[test]
    fn test_tool_number_trimmed() {
        let s = state(vec![op(1, "A", " T0303 ", ""), op(2, "B", "T0303", "")], &[1], &[2]);
        let sheet = SetupSheet::build(&s);
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.rows[0].oben, "A");
        assert_eq!(sheet.rows[0].unten, "B");
    }
}
