//! Assignment of catalog operations to channel slots.
//!
//! # Operations
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `place` | Set a slot, growing the list if needed |
//! | `move_slot` | Splice-move within one channel |
//! | `clear_slot` | Empty a slot in place |
//! | `grow` | Append one empty slot |
//! | `delete_operation` | Remove from catalog, empty all references |
//! | `upsert_operation` | Create (optionally into a slot) or edit |
//!
//! Drag-and-drop is handled by [`transfer`], click-to-fill by
//! [`SlotPicker`].

mod engine;
mod picker;
pub mod transfer;

pub use engine::OperationDraft;
pub use picker::SlotPicker;
pub use transfer::{begin_transfer, complete_transfer, TransferOutcome, TransferPayload};
