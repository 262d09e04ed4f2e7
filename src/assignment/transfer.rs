//! Drag-and-drop as a two-message protocol.
//!
//! [`begin_transfer`] encodes what is being dragged into transfer text;
//! [`complete_transfer`] decodes it at the drop target and dispatches to
//! [`PlannerState::place`] or [`PlannerState::move_slot`]. A slot payload
//! carries no channel, so moves always happen inside the target's channel.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{OperationId, PlannerState, SlotLocation};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransferPayload {
    /// A catalog operation dragged from the library.
    #[serde(rename = "op")]
    Operation { id: OperationId },
    /// A filled slot of the displayed channel.
    #[serde(rename = "slot")]
    Slot { index: usize },
}

/// Result of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// An operation was placed into the target slot.
    Placed,
    /// A slot entry was moved to the target index.
    Moved,
    /// Nothing changed (undecodable payload or no-op move).
    Ignored,
}

impl TransferOutcome {
    /// Whether state changed and should be persisted.
    pub fn changed(&self) -> bool {
        !matches!(self, TransferOutcome::Ignored)
    }
}

/// Encodes a payload as transfer text.
pub fn begin_transfer(payload: &TransferPayload) -> String {
    // Serializing a tagged enum of a string and an integer cannot fail.
    serde_json::to_string(payload).unwrap_or_default()
}

/// Decodes transfer text and applies the drop to `target`.
///
/// Unparseable or unknown payloads are ignored.
pub fn complete_transfer(
    state: &mut PlannerState,
    raw: &str,
    target: SlotLocation,
) -> TransferOutcome {
    let payload: TransferPayload = match serde_json::from_str(raw) {
        Ok(p) => p,
        Err(err) => {
            debug!(%err, "ignoring undecodable drop payload");
            return TransferOutcome::Ignored;
        }
    };

    match payload {
        TransferPayload::Operation { id } => {
            state.place(target.channel, target.index, id);
            TransferOutcome::Placed
        }
        TransferPayload::Slot { index } => {
            if state.move_slot(target.channel, index, target.index) {
                TransferOutcome::Moved
            } else {
                TransferOutcome::Ignored
            }
        }
    }
}
