//! Slot-planning domain models.
//!
//! Provides the data types for the operation catalog, the two channel slot
//! lists and the presentation state that are persisted together.
//!
//! # Domain Mappings
//!
//! | sync-operator | Machine shop |
//! |---------------|--------------|
//! | Operation | Machining step with tool |
//! | Channel | Revolver (Kanal 1 oben, Kanal 2 unten) |
//! | SlotList | Ordered program blocks of a channel |
//! | Spindle | SP3 / SP4 |
//! | PlannerState | Saved plan |

mod catalog;
mod channel;
mod operation;
mod state;
mod view;

pub use catalog::Catalog;
pub use channel::{Channel, ChannelSlots, SlotList, SlotLocation, MIN_SLOTS};
pub use operation::{Category, Operation, OperationId, Spindle};
pub use state::PlannerState;
pub use view::{
    CategoryFilter, PlanViewMode, SpindleFilter, ViewState, ALL_CATEGORIES, ALL_SPINDLES,
};
