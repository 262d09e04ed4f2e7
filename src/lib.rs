//! Slot planner for two-channel CNC lathes.
//!
//! Reusable operations from a catalog are assigned into the ordered slot
//! lists of channel 1 and channel 2. Two read-only views are derived from
//! the assignment: the program table (one row per slot, columns per
//! channel and spindle) and the setup sheet (one row per tool number).
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Operation`, `Catalog`, `SlotList`,
//!   `ChannelSlots`, `ViewState`, `PlannerState`
//! - **`normalization`**: Coercion of untrusted snapshot JSON into a valid state
//! - **`filter`**: Category and spindle filtering of the catalog
//! - **`assignment`**: Place, move, clear, grow, delete and edit; drag transfer and slot picker
//! - **`plan`**: Program table and setup sheet projections
//! - **`persistence`**: Key-value store, versioned snapshots, file export/import
//! - **`session`**: `Planner`, which applies mutations and auto-saves
//! - **`config`**: `config.toml` and data directory resolution
//! - **`assets`**: Offline cache for the static front-end assets
//! - **`defaults`**: Demo plan
//!
//! # Architecture
//!
//! State transitions are synchronous and all-or-nothing. The projections
//! are pure functions of the state. Storage is best-effort: a failed save
//! is logged and the in-memory plan stays authoritative.

pub mod assets;
pub mod assignment;
pub mod config;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalization;
pub mod persistence;
pub mod plan;
pub mod session;

pub use error::{EditRejection, Error, Result};
pub use session::Planner;
