//! Read-only projections of the planner state.
//!
//! Both views are recomputed on demand and never mutate state.
//!
//! | View | Rows | Columns |
//! |------|------|---------|
//! | [`ProgramTable`] | slot index | K1/SP4, K1/SP3, K2/SP3, K2/SP4 |
//! | [`SetupSheet`] | tool number | oben (K1), unten (K2) |

mod program_table;
mod setup_sheet;

pub use program_table::{slot_title, PlanCell, ProgramRow, ProgramTable};
pub use setup_sheet::{tool_sort_key, SetupSheet, SetupSheetRow, UNNUMBERED_TOOL_KEY};

use crate::models::{PlanViewMode, PlannerState};

/// The projection selected by the view mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanView {
    ProgramTable(ProgramTable),
    SetupSheet(SetupSheet),
}

impl PlanView {
    /// Builds the projection for the state's current view mode.
    pub fn build(state: &PlannerState) -> Self {
        match state.view.plan_view_mode {
            PlanViewMode::ProgramTable => PlanView::ProgramTable(ProgramTable::build(state)),
            PlanViewMode::SetupSheet => PlanView::SetupSheet(SetupSheet::build(state)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_follows_mode() {
        let mut state = PlannerState::new();
        assert!(matches!(PlanView::build(&state), PlanView::ProgramTable(_)));

        state.view.plan_view_mode = PlanViewMode::SetupSheet;
        assert!(matches!(PlanView::build(&state), PlanView::SetupSheet(s) if s.is_empty()));
    }
}
