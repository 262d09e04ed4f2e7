//! Slot picker: fill an empty slot by choosing from the catalog or by
//! creating a new operation directly into it.
//!
//! The picker keeps its own filters, reset to "all" whenever it is opened,
//! independent of the library view filters.

use crate::error::EditRejection;
use crate::filter::filter_catalog;
use crate::models::{
    Catalog, CategoryFilter, Operation, OperationId, PlannerState, SlotLocation, SpindleFilter,
};

use super::OperationDraft;

/// Transient picker state for one target slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPicker {
    pub target: SlotLocation,
    pub category: CategoryFilter,
    pub spindle: SpindleFilter,
}

impl SlotPicker {
    /// Opens the picker for a slot with both filters set to "all".
    pub fn open(target: SlotLocation) -> Self {
        Self {
            target,
            category: CategoryFilter::All,
            spindle: SpindleFilter::All,
        }
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_spindle(mut self, spindle: SpindleFilter) -> Self {
        self.spindle = spindle;
        self
    }

    /// Candidate operations under the picker's filters.
    pub fn options<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Operation> {
        filter_catalog(catalog, self.category, self.spindle)
    }

    /// Places a chosen catalog operation into the target slot.
    pub fn choose(&self, state: &mut PlannerState, id: OperationId) {
        state.place(self.target.channel, self.target.index, id);
    }

    /// Creates a new operation and places it into the target slot.
    pub fn create(
        &self,
        state: &mut PlannerState,
        draft: OperationDraft,
    ) -> Result<OperationId, EditRejection> {
        let draft = OperationDraft { id: None, ..draft };
        state.upsert_operation(draft, Some(self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Channel, Spindle};

    fn state() -> PlannerState {
        PlannerState::new()
            .with_library(Catalog::from_operations(vec![
                Operation::new(OperationId::sequential(1), "L1", "A")
                    .with_category(Category::Innen),
                Operation::new(OperationId::sequential(2), "L2", "B")
                    .with_spindle(Spindle::Sp3),
            ]))
            .with_next_op_id(3)
    }

    #[test]
    fn test_open_resets_filters() {
        let picker = SlotPicker::open(SlotLocation::new(Channel::One, 2));
        assert_eq!(picker.category, CategoryFilter::All);
        assert_eq!(picker.spindle, SpindleFilter::All);
    }

    #[test]
    fn test_options_use_own_filters() {
        let s = state();
        let picker = SlotPicker::open(SlotLocation::new(Channel::One, 0))
            .with_spindle(SpindleFilter::Only(Spindle::Sp3));
        let opts = picker.options(&s.library);
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].code, "L2");
        assert_eq!(s.view.spindle_filter, SpindleFilter::All);
    }

    #[test]
    fn test_choose_places() {
        let mut s = state();
        let picker = SlotPicker::open(SlotLocation::new(Channel::Two, 4));
        picker.choose(&mut s, OperationId::sequential(1));
        assert_eq!(s.slots.two.get(4), Some(&OperationId::sequential(1)));
    }

    #[test]
    fn test_create_into_slot() {
        let mut s = state();
        let picker = SlotPicker::open(SlotLocation::new(Channel::One, 1));
        let draft = OperationDraft::new("L1105", "Neu").with_id(OperationId::sequential(1));
        let id = picker.create(&mut s, draft).unwrap();
        assert_eq!(id.as_str(), "op_3");
        assert_eq!(s.slots.one.get(1), Some(&id));
        assert_eq!(s.library.len(), 3);
    }
}
