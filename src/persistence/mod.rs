//! Persistence bridge: local key-value store and file import/export.
//!
//! Both paths use the same versioned snapshot. Incoming data always passes
//! through [`crate::normalization`].

mod export;
mod snapshot;
mod store;

pub use export::{export_file_name, export_json, export_to_dir, import_from_path, parse_import};
pub use snapshot::{
    load_state, save_state, unwrap_envelope, SnapshotEnvelope, SNAPSHOT_VERSION, STORAGE_KEY,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
