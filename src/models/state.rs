//! Planner state: the unit that is persisted, exported and imported.

use serde::Serialize;

use super::{Catalog, Channel, ChannelSlots, Operation, OperationId, SlotList, ViewState};

/// Complete session state.
///
/// Serializes to the snapshot `data` object: view fields are flattened next
/// to `slots`, `library` and `nextOpId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerState {
    /// Presentation state.
    #[serde(flatten)]
    pub view: ViewState,
    /// Slot lists of both channels.
    pub slots: ChannelSlots,
    /// Operation catalog.
    pub library: Catalog,
    /// Next sequential id number (`op_<n>`).
    pub next_op_id: u64,
}

impl PlannerState {
    /// Empty plan: no operations, [`super::MIN_SLOTS`] empty slots per channel.
    pub fn new() -> Self {
        Self {
            view: ViewState::default(),
            slots: ChannelSlots::default(),
            library: Catalog::new(),
            next_op_id: 1,
        }
    }

    /// Replaces the catalog.
    pub fn with_library(mut self, library: Catalog) -> Self {
        self.library = library;
        self
    }

    /// Replaces a channel's slot list.
    pub fn with_slots(mut self, channel: Channel, slots: SlotList) -> Self {
        *self.slots.get_mut(channel) = slots;
        self
    }

    /// Sets the id counter.
    pub fn with_next_op_id(mut self, next_op_id: u64) -> Self {
        self.next_op_id = next_op_id;
        self
    }

    /// Sets the view state.
    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    /// Looks up a catalog operation.
    pub fn operation(&self, id: &OperationId) -> Option<&Operation> {
        self.library.get(id)
    }

    /// The operation placed at a slot. Empty and dangling slots yield `None`.
    pub fn operation_at(&self, channel: Channel, index: usize) -> Option<&Operation> {
        self.slots
            .get(channel)
            .get(index)
            .and_then(|id| self.library.get(id))
    }
}

impl Default for PlannerState {
    fn default() -> Self {
        Self::new()
    }
}
