//! Slot and catalog mutations.
//!
//! Every mutation is synchronous and all-or-nothing. Slot lists are never
//! compacted: clearing leaves a hole, growing always appends, and only an
//! explicit move reorders.

use tracing::debug;

use crate::error::EditRejection;
use crate::models::{
    Category, Channel, Operation, OperationId, PlannerState, SlotLocation, Spindle,
};

/// Editor input for creating or overwriting an operation.
///
/// `id: None` creates a new catalog entry; `Some` overwrites that entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationDraft {
    pub id: Option<OperationId>,
    pub code: String,
    pub title: String,
    pub spindle: Spindle,
    pub category: Category,
    pub doppelhalter: bool,
    pub tool_no: String,
    pub tool_name: String,
}

impl OperationDraft {
    /// Draft for a new operation.
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Draft pre-filled from an existing operation, for editing.
    pub fn from_operation(op: &Operation) -> Self {
        Self {
            id: Some(op.id.clone()),
            code: op.code.clone(),
            title: op.title.clone(),
            spindle: op.spindle,
            category: op.category,
            doppelhalter: op.doppelhalter,
            tool_no: op.tool_no.clone(),
            tool_name: op.tool_name.clone(),
        }
    }

    /// Targets an existing catalog entry.
    pub fn with_id(mut self, id: OperationId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_spindle(mut self, spindle: Spindle) -> Self {
        self.spindle = spindle;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_doppelhalter(mut self, doppelhalter: bool) -> Self {
        self.doppelhalter = doppelhalter;
        self
    }

    pub fn with_tool(mut self, tool_no: impl Into<String>, tool_name: impl Into<String>) -> Self {
        self.tool_no = tool_no.into();
        self.tool_name = tool_name.into();
        self
    }

    fn trimmed(mut self) -> Self {
        for field in [
            &mut self.code,
            &mut self.title,
            &mut self.tool_no,
            &mut self.tool_name,
        ] {
            *field = field.trim().to_string();
        }
        self
    }

    fn apply_to(self, op: &mut Operation) {
        op.code = self.code;
        op.title = self.title;
        op.spindle = self.spindle;
        op.category = self.category;
        op.doppelhalter = self.doppelhalter;
        op.tool_no = self.tool_no;
        op.tool_name = self.tool_name;
    }
}

impl PlannerState {
    /// Puts `id` into a slot, growing the channel's list if `index` is past
    /// the end. The id is not checked against the catalog.
    pub fn place(&mut self, channel: Channel, index: usize, id: OperationId) {
        debug!(%channel, index, %id, "place operation");
        self.slots.get_mut(channel).set(index, id);
    }

    /// Moves the entry at `from` to `to` within one channel (splice, not swap).
    ///
    /// Returns `false` and leaves the list unchanged if `from == to` or
    /// `from` is out of bounds.
    pub fn move_slot(&mut self, channel: Channel, from: usize, to: usize) -> bool {
        let moved = self.slots.get_mut(channel).move_entry(from, to);
        if moved {
            debug!(%channel, from, to, "move slot");
        }
        moved
    }

    /// Empties a slot in place. The list length is unchanged.
    pub fn clear_slot(&mut self, channel: Channel, index: usize) -> Option<OperationId> {
        debug!(%channel, index, "clear slot");
        self.slots.get_mut(channel).clear(index)
    }

    /// Appends one empty slot. Returns the new length.
    pub fn grow(&mut self, channel: Channel) -> usize {
        let list = self.slots.get_mut(channel);
        list.push_empty();
        debug!(%channel, len = list.len(), "grow slot list");
        list.len()
    }

    /// Removes an operation from the catalog and empties every slot on both
    /// channels that referenced it.
    pub fn delete_operation(&mut self, id: &OperationId) -> Option<Operation> {
        let cleared: usize = Channel::ALL
            .into_iter()
            .map(|channel| self.slots.get_mut(channel).clear_references(id))
            .sum();
        let removed = self.library.remove(id);
        debug!(%id, cleared, found = removed.is_some(), "delete operation");
        removed
    }

    /// Creates or overwrites a catalog operation.
    ///
    /// Text fields are trimmed. A blank code or title rejects the save with
    /// state unchanged (code is checked first). When creating with a
    /// `target`, the new id is placed into that slot in the same step; the
    /// target is ignored when editing.
    pub fn upsert_operation(
        &mut self,
        draft: OperationDraft,
        target: Option<SlotLocation>,
    ) -> Result<OperationId, EditRejection> {
        let draft = draft.trimmed();
        if let Some(id) = &draft.id {
            if !self.library.contains(id) {
                return Err(EditRejection::UnknownOperation(id.clone()));
            }
        }
        if draft.code.is_empty() {
            return Err(EditRejection::BlankCode);
        }
        if draft.title.is_empty() {
            return Err(EditRejection::BlankTitle);
        }

        match draft.id.clone() {
            Some(id) => {
                if let Some(op) = self.library.get_mut(&id) {
                    draft.apply_to(op);
                }
                debug!(%id, "update operation");
                Ok(id)
            }
            None => {
                let id = self.allocate_id();
                let mut op = Operation::new(id.clone(), "", "");
                draft.apply_to(&mut op);
                self.library.push(op);
                debug!(%id, "create operation");
                if let Some(target) = target {
                    self.place(target.channel, target.index, id.clone());
                }
                Ok(id)
            }
        }
    }

    /// Next sequential id not present in the catalog. Advances the counter.
    ///
    /// Once the counter is exhausted, ids are random.
    fn allocate_id(&mut self) -> OperationId {
        loop {
            let id = match self.next_op_id.checked_add(1) {
                Some(next) => {
                    let id = OperationId::sequential(self.next_op_id);
                    self.next_op_id = next;
                    id
                }
                None => OperationId::random(),
            };
            if !self.library.contains(&id) {
                return id;
            }
        }
    }
}
