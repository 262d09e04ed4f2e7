//! Program table ("Programmplan").
//!
//! One row per slot index across both channels. Each row has four cells:
//!
//! | K1 · SP4 | K1 · SP3 | K2 · SP3 | K2 · SP4 |
//!
//! The operation in a channel's slot occupies exactly one of that channel's
//! two cells, chosen by its spindle. The other cell stays blank.

use std::fmt;

use crate::models::{Channel, Operation, OperationId, PlannerState, Spindle};

/// A populated table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCell {
    pub operation_id: OperationId,
    /// Operation title, or code when the title is blank.
    pub name: String,
    /// Row position code, e.g. `L1102`.
    pub l_code: String,
    /// Trimmed tool number, if any.
    pub tool_no: Option<String>,
}

impl PlanCell {
    fn new(op: &Operation, channel: Channel, row_number: usize) -> Self {
        Self {
            operation_id: op.id.clone(),
            name: op.display_name().to_string(),
            l_code: channel.l_code(row_number),
            tool_no: op.tool_no().map(str::to_string),
        }
    }
}

/// `name L-code tool`, with the tool omitted when absent.
impl fmt::Display for PlanCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.l_code)?;
        if let Some(tool) = &self.tool_no {
            write!(f, " {tool}")?;
        }
        Ok(())
    }
}

/// One table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramRow {
    /// 1-based row number.
    pub row_number: usize,
    pub k1_sp4: Option<PlanCell>,
    pub k1_sp3: Option<PlanCell>,
    pub k2_sp3: Option<PlanCell>,
    pub k2_sp4: Option<PlanCell>,
}

impl ProgramRow {
    /// Cells in column order: K1/SP4, K1/SP3, K2/SP3, K2/SP4.
    pub fn cells(&self) -> [Option<&PlanCell>; 4] {
        [
            self.k1_sp4.as_ref(),
            self.k1_sp3.as_ref(),
            self.k2_sp3.as_ref(),
            self.k2_sp4.as_ref(),
        ]
    }

    /// The cell for a (channel, spindle) column.
    pub fn cell(&self, channel: Channel, spindle: Spindle) -> Option<&PlanCell> {
        match (channel, spindle) {
            (Channel::One, Spindle::Sp4) => self.k1_sp4.as_ref(),
            (Channel::One, Spindle::Sp3) => self.k1_sp3.as_ref(),
            (Channel::Two, Spindle::Sp3) => self.k2_sp3.as_ref(),
            (Channel::Two, Spindle::Sp4) => self.k2_sp4.as_ref(),
        }
    }

    fn cell_mut(&mut self, channel: Channel, spindle: Spindle) -> &mut Option<PlanCell> {
        match (channel, spindle) {
            (Channel::One, Spindle::Sp4) => &mut self.k1_sp4,
            (Channel::One, Spindle::Sp3) => &mut self.k1_sp3,
            (Channel::Two, Spindle::Sp3) => &mut self.k2_sp3,
            (Channel::Two, Spindle::Sp4) => &mut self.k2_sp4,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cells().iter().all(Option::is_none)
    }
}

/// Two-channel program table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramTable {
    pub rows: Vec<ProgramRow>,
}

impl ProgramTable {
    /// Derives the table. Empty and dangling slots yield blank cells.
    pub fn build(state: &PlannerState) -> Self {
        let rows = (0..state.slots.row_count())
            .map(|index| {
                let row_number = index + 1;
                let mut row = ProgramRow {
                    row_number,
                    ..ProgramRow::default()
                };
                for channel in Channel::ALL {
                    if let Some(op) = state.operation_at(channel, index) {
                        *row.cell_mut(channel, op.spindle) =
                            Some(PlanCell::new(op, channel, row_number));
                    }
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Slot list caption: `name L-code`.
pub fn slot_title(op: &Operation, channel: Channel, row_number: usize) -> String {
    format!("{} {}", op.display_name(), channel.l_code(row_number))
}
