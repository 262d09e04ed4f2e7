//! Channels and their slot lists.
//!
//! The lathe has two channels (upper and lower revolver). Each owns an
//! ordered list of slots; a slot holds at most one operation reference.
//!
//! # Invariants
//! - A slot list is never shorter than [`MIN_SLOTS`].
//! - Lists only grow by appending. Clearing empties a slot in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::OperationId;
use crate::error::Error;

/// Minimum number of slots per channel.
pub const MIN_SLOTS: usize = 5;

/// Program channel ("Kanal").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Channel {
    /// Kanal 1, upper revolver.
    #[default]
    #[serde(rename = "1")]
    One,
    /// Kanal 2, lower revolver.
    #[serde(rename = "2")]
    Two,
}

impl Channel {
    /// Both channels in table order.
    pub const ALL: [Channel; 2] = [Channel::One, Channel::Two];

    /// Wire name (`"1"` / `"2"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::One => "1",
            Channel::Two => "2",
        }
    }

    /// Revolver position served by this channel.
    pub fn revolver(&self) -> &'static str {
        match self {
            Channel::One => "oben",
            Channel::Two => "unten",
        }
    }

    /// Main program file of the channel.
    pub fn program_file(&self) -> &'static str {
        match self {
            Channel::One => "1000.MPF",
            Channel::Two => "2000.MPF",
        }
    }

    /// Position code for a 1-based row, e.g. `L1102` for channel 1 row 2.
    ///
    /// Row numbers below 1 are treated as 1.
    pub fn l_code(&self, row_number: usize) -> String {
        let prefix = match self {
            Channel::One => "L11",
            Channel::Two => "L21",
        };
        format!("{prefix}{:02}", row_number.max(1))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Channel::One),
            "2" => Ok(Channel::Two),
            other => Err(Error::InvalidInput(format!("unknown channel '{other}'"))),
        }
    }
}

/// A (channel, 0-based index) slot address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotLocation {
    pub channel: Channel,
    pub index: usize,
}

impl SlotLocation {
    pub fn new(channel: Channel, index: usize) -> Self {
        Self { channel, index }
    }
}

/// Ordered slots of one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotList {
    entries: Vec<Option<OperationId>>,
}

impl SlotList {
    /// Creates a list of [`MIN_SLOTS`] empty slots.
    pub fn new() -> Self {
        Self {
            entries: vec![None; MIN_SLOTS],
        }
    }

    /// Builds a list from raw entries, padding up to [`MIN_SLOTS`].
    pub fn from_entries(entries: Vec<Option<OperationId>>) -> Self {
        let mut list = Self { entries };
        list.ensure_len(MIN_SLOTS);
        list
    }

    /// Number of slots (filled or empty).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; lists hold at least [`MIN_SLOTS`] entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The operation id at `index`, if the slot exists and is filled.
    pub fn get(&self, index: usize) -> Option<&OperationId> {
        self.entries.get(index).and_then(|e| e.as_ref())
    }

    /// All entries in order.
    pub fn entries(&self) -> &[Option<OperationId>] {
        &self.entries
    }

    /// Iterates `(index, id)` over filled slots.
    pub fn filled(&self) -> impl Iterator<Item = (usize, &OperationId)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|id| (i, id)))
    }

    /// Appends empty slots until the list holds `count` entries.
    pub fn ensure_len(&mut self, count: usize) {
        if self.entries.len() < count {
            self.entries.resize(count, None);
        }
    }

    /// Sets a slot, growing the list first if `index` is past the end.
    pub fn set(&mut self, index: usize, id: OperationId) {
        self.ensure_len(index + 1);
        self.entries[index] = Some(id);
    }

    /// Empties a slot in place. Returns the previous occupant.
    pub fn clear(&mut self, index: usize) -> Option<OperationId> {
        self.entries.get_mut(index).and_then(Option::take)
    }

    /// Appends one empty slot.
    pub fn push_empty(&mut self) {
        self.entries.push(None);
    }

    /// Splice move: removes the entry at `from` and reinserts it at `to`.
    ///
    /// Returns `false` without touching the list if `from == to` or `from`
    /// is out of bounds. A `to` past the end appends.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.entries.len() {
            return false;
        }
        let moved = self.entries.remove(from);
        let to = to.min(self.entries.len());
        self.entries.insert(to, moved);
        true
    }

    /// Empties every slot holding `id`. Returns the number of slots cleared.
    pub fn clear_references(&mut self, id: &OperationId) -> usize {
        let mut cleared = 0;
        for entry in &mut self.entries {
            if entry.as_ref() == Some(id) {
                *entry = None;
                cleared += 1;
            }
        }
        cleared
    }
}

impl Default for SlotList {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot lists of both channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelSlots {
    #[serde(rename = "1")]
    pub one: SlotList,
    #[serde(rename = "2")]
    pub two: SlotList,
}

impl ChannelSlots {
    pub fn get(&self, channel: Channel) -> &SlotList {
        match channel {
            Channel::One => &self.one,
            Channel::Two => &self.two,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut SlotList {
        match channel {
            Channel::One => &mut self.one,
            Channel::Two => &mut self.two,
        }
    }

    /// Length of the longer list, floored at [`MIN_SLOTS`].
    pub fn row_count(&self) -> usize {
        self.one.len().max(self.two.len()).max(MIN_SLOTS)
    }
}
