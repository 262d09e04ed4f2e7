//! Planner session: the state plus the store it auto-saves into.
//!
//! Every mutation goes through [`Planner`], which applies it to the
//! [`PlannerState`] and then writes a snapshot. Write failures are logged
//! and swallowed; the in-memory state stays authoritative.
//!
//! # Startup
//!
//! | Stored snapshot | Result |
//! |-----------------|--------|
//! | present, readable | normalized and used |
//! | absent | demo plan (or empty plan), saved at once |
//! | unreadable | same as absent, with a warning |

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::assignment::{complete_transfer, OperationDraft, TransferOutcome};
use crate::defaults::demo_state;
use crate::error::{EditRejection, Result};
use crate::filter::library_view;
use crate::models::{
    CategoryFilter, Channel, Operation, OperationId, PlanViewMode, PlannerState, SlotLocation,
    SpindleFilter,
};
use crate::normalization::NormalizationIssue;
use crate::persistence::{export_to_dir, import_from_path, load_state, save_state, KeyValueStore};
use crate::plan::{PlanView, ProgramTable, SetupSheet};

/// Owns the planner state and persists it after each change.
pub struct Planner {
    state: PlannerState,
    store: Box<dyn KeyValueStore>,
    storage_key: String,
    seed_demo_data: bool,
}

impl Planner {
    /// Opens a session on `store`.
    ///
    /// Falls back to the demo plan when `seed_demo_data` is set, otherwise
    /// to an empty plan, whenever nothing usable is stored.
    pub fn open(
        store: Box<dyn KeyValueStore>,
        storage_key: impl Into<String>,
        seed_demo_data: bool,
    ) -> Self {
        let storage_key = storage_key.into();
        let loaded = match load_state(store.as_ref(), &storage_key) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(%err, key = %storage_key, "stored plan unreadable, starting fresh");
                None
            }
        };

        let mut planner = Self {
            state: PlannerState::new(),
            store,
            storage_key,
            seed_demo_data,
        };
        match loaded {
            Some(normalized) => planner.state = normalized.state,
            None => {
                planner.state = planner.fresh_state();
                planner.persist();
            }
        }
        planner
    }

    fn fresh_state(&self) -> PlannerState {
        if self.seed_demo_data {
            demo_state()
        } else {
            PlannerState::new()
        }
    }

    /// Best-effort save.
    fn persist(&mut self) {
        if let Err(err) = save_state(self.store.as_mut(), &self.storage_key, &self.state) {
            warn!(%err, key = %self.storage_key, "failed to save plan");
        }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // Slot mutations

    pub fn place(&mut self, channel: Channel, index: usize, id: OperationId) {
        self.state.place(channel, index, id);
        self.persist();
    }

    pub fn move_slot(&mut self, channel: Channel, from: usize, to: usize) -> bool {
        let moved = self.state.move_slot(channel, from, to);
        if moved {
            self.persist();
        }
        moved
    }

    pub fn clear_slot(&mut self, channel: Channel, index: usize) -> Option<OperationId> {
        let previous = self.state.clear_slot(channel, index);
        self.persist();
        previous
    }

    pub fn grow(&mut self, channel: Channel) -> usize {
        let len = self.state.grow(channel);
        self.persist();
        len
    }

    /// Applies a drop onto `target`. Saves only if something changed.
    pub fn complete_transfer(&mut self, raw: &str, target: SlotLocation) -> TransferOutcome {
        let outcome = complete_transfer(&mut self.state, raw, target);
        if outcome.changed() {
            self.persist();
        }
        outcome
    }

    // Catalog mutations

    pub fn delete_operation(&mut self, id: &OperationId) -> Option<Operation> {
        let removed = self.state.delete_operation(id);
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    /// Creates or edits an operation. A rejection leaves state and store
    /// untouched.
    pub fn upsert_operation(
        &mut self,
        draft: OperationDraft,
        target: Option<SlotLocation>,
    ) -> std::result::Result<OperationId, EditRejection> {
        let id = self.state.upsert_operation(draft, target)?;
        self.persist();
        Ok(id)
    }

    // View state

    pub fn set_channel(&mut self, channel: Channel) {
        self.state.view.current_channel = channel;
        self.persist();
    }

    pub fn set_view_mode(&mut self, mode: PlanViewMode) {
        self.state.view.plan_view_mode = mode;
        self.persist();
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.state.view.active_category = filter;
        self.persist();
    }

    pub fn set_spindle_filter(&mut self, filter: SpindleFilter) {
        self.state.view.spindle_filter = filter;
        self.persist();
    }

    /// Flips the library panel and returns the new collapsed flag.
    pub fn toggle_library_collapsed(&mut self) -> bool {
        self.state.view.library_collapsed = !self.state.view.library_collapsed;
        self.persist();
        self.state.view.library_collapsed
    }

    // Files

    /// Replaces the whole plan with the contents of `path`.
    ///
    /// On error the current plan is kept. Returns the coercions applied to
    /// the imported data.
    pub fn import_file(&mut self, path: &Path) -> Result<Vec<NormalizationIssue>> {
        let normalized = import_from_path(path)?;
        self.state = normalized.state;
        self.persist();
        Ok(normalized.issues)
    }

    /// Writes a dated export into `dir`.
    pub fn export_to(&self, dir: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
        export_to_dir(dir, &self.state, at)
    }

    /// Discards the plan and starts over from the seed plan.
    pub fn reset(&mut self) {
        self.state = self.fresh_state();
        info!(demo = self.seed_demo_data, "reset plan");
        self.persist();
    }

    // Projections

    pub fn program_table(&self) -> ProgramTable {
        ProgramTable::build(&self.state)
    }

    pub fn setup_sheet(&self) -> SetupSheet {
        SetupSheet::build(&self.state)
    }

    /// Projection selected by the current view mode.
    pub fn plan_view(&self) -> PlanView {
        PlanView::build(&self.state)
    }

    /// Library listing under the persisted filters.
    pub fn filtered_library(&self) -> Vec<&Operation> {
        library_view(&self.state.library, &self.state.view)
    }
}
