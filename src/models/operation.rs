//! Operation (catalog entry) model.
//!
//! An operation is a reusable, named unit of machining work. It runs on one
//! spindle, belongs to one category and optionally carries tool metadata
//! used by the setup sheet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Stable catalog identifier (`op_<n>`).
///
/// Assigned once at creation and never reused for another operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier produced by the sequential counter.
    pub fn sequential(n: u64) -> Self {
        Self(format!("op_{n}"))
    }

    /// Random identifier for bulk-loaded entries that arrive without one.
    pub fn random() -> Self {
        Self(format!("op_{:x}", rand::random::<u64>()))
    }

    /// The raw identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for OperationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Machine spindle an operation runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Spindle {
    #[serde(rename = "SP3")]
    Sp3,
    #[default]
    #[serde(rename = "SP4")]
    Sp4,
}

impl Spindle {
    /// Both spindles, in editor order.
    pub const ALL: [Spindle; 2] = [Spindle::Sp4, Spindle::Sp3];

    /// Wire name (`SP3` / `SP4`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Spindle::Sp3 => "SP3",
            Spindle::Sp4 => "SP4",
        }
    }
}

impl fmt::Display for Spindle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Spindle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SP3" => Ok(Spindle::Sp3),
            "SP4" => Ok(Spindle::Sp4),
            other => Err(Error::InvalidInput(format!("unknown spindle '{other}'"))),
        }
    }
}

/// Machining category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Außen")]
    Aussen,
    Innen,
    Radial,
    Axial,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Aussen,
        Category::Innen,
        Category::Radial,
        Category::Axial,
    ];

    /// Wire name as stored in snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Aussen => "Außen",
            Category::Innen => "Innen",
            Category::Radial => "Radial",
            Category::Axial => "Axial",
        }
    }

    /// Filter pill label, e.g. "Innen Bearbeitung".
    pub fn label(&self) -> String {
        format!("{} Bearbeitung", self.as_str())
    }

    /// Exact wire-name lookup (no coercion).
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts the wire name, case-insensitively, and `aussen` as an ASCII
    /// spelling of `Außen`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "außen" | "aussen" => Ok(Category::Aussen),
            "innen" => Ok(Category::Innen),
            "radial" => Ok(Category::Radial),
            "axial" => Ok(Category::Axial),
            _ => Err(Error::InvalidInput(format!("unknown category '{s}'"))),
        }
    }
}

/// A catalog operation.
///
/// `tool_no` and `tool_name` are optional; an empty string means absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique catalog identifier.
    pub id: OperationId,
    /// Base program-block code (e.g. `L1101`).
    pub code: String,
    /// Display name.
    pub title: String,
    /// Spindle the operation runs on.
    pub spindle: Spindle,
    /// Machining category.
    pub category: Category,
    /// Double tool holder flag.
    pub doppelhalter: bool,
    /// Tool number (e.g. `T0101`).
    pub tool_no: String,
    /// Tool display name.
    pub tool_name: String,
}

impl Operation {
    /// Creates an operation with default spindle/category and no tool data.
    pub fn new(id: OperationId, code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            title: title.into(),
            spindle: Spindle::default(),
            category: Category::default(),
            doppelhalter: false,
            tool_no: String::new(),
            tool_name: String::new(),
        }
    }

    /// Sets the spindle.
    pub fn with_spindle(mut self, spindle: Spindle) -> Self {
        self.spindle = spindle;
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Marks the operation as using a double holder.
    pub fn with_doppelhalter(mut self, doppelhalter: bool) -> Self {
        self.doppelhalter = doppelhalter;
        self
    }

    /// Sets tool number and tool name.
    pub fn with_tool(mut self, tool_no: impl Into<String>, tool_name: impl Into<String>) -> Self {
        self.tool_no = tool_no.into();
        self.tool_name = tool_name.into();
        self
    }

    /// Title, falling back to code when the title is blank.
    pub fn display_name(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            self.code.trim()
        } else {
            title
        }
    }

    /// Library card label: `title code`, or whichever of the two is present.
    pub fn label(&self) -> String {
        let title = self.title.trim();
        let code = self.code.trim();
        match (title.is_empty(), code.is_empty()) {
            (false, false) => format!("{title} {code}"),
            (false, true) => title.to_string(),
            _ => code.to_string(),
        }
    }

    /// Trimmed tool number, `None` when blank.
    pub fn tool_no(&self) -> Option<&str> {
        non_blank(&self.tool_no)
    }

    /// Trimmed tool name, `None` when blank.
    pub fn tool_name(&self) -> Option<&str> {
        non_blank(&self.tool_name)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let t = s.trim();
    (!t.is_empty()).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_builder() {
        let op = Operation::new(OperationId::sequential(7), "L1107", "Nute stechen")
            .with_spindle(Spindle::Sp3)
            .with_category(Category::Radial)
            .with_doppelhalter(true)
            .with_tool("T0303", "STECHER-3mm");

        assert_eq!(op.id.as_str(), "op_7");
        assert_eq!(op.spindle, Spindle::Sp3);
        assert_eq!(op.category, Category::Radial);
        assert!(op.doppelhalter);
        assert_eq!(op.tool_no(), Some("T0303"));
        assert_eq!(op.tool_name(), Some("STECHER-3mm"));
    }

    #[test]
    fn test_display_name_falls_back_to_code() {
        let op = Operation::new(OperationId::sequential(1), "L1101", "  ");
        assert_eq!(op.display_name(), "L1101");

        let op = Operation::new(OperationId::sequential(1), "L1101", "Planen");
        assert_eq!(op.display_name(), "Planen");
    }

    #[test]
    fn test_label() {
        let op = Operation::new(OperationId::sequential(1), "L1101", "Planen");
        assert_eq!(op.label(), "Planen L1101");

        let op = Operation::new(OperationId::sequential(1), "", "Planen");
        assert_eq!(op.label(), "Planen");

        let op = Operation::new(OperationId::sequential(1), "L1101", "");
        assert_eq!(op.label(), "L1101");
    }

    #[test]
    fn test_blank_tool_is_absent() {
        let op = Operation::new(OperationId::sequential(1), "L1", "A").with_tool(" ", "");
        assert_eq!(op.tool_no(), None);
        assert_eq!(op.tool_name(), None);
    }

    #[test]
    fn test_serde_wire_names() {
        let op = Operation::new(OperationId::sequential(3), "L1102", "Schlichten")
            .with_spindle(Spindle::Sp3)
            .with_tool("T0101", "");
        let json = serde_json::to_value(&op).unwrap();

        assert_eq!(json["id"], "op_3");
        assert_eq!(json["spindle"], "SP3");
        assert_eq!(json["category"], "Außen");
        assert_eq!(json["toolNo"], "T0101");
        assert_eq!(json["toolName"], "");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("sp3".parse::<Spindle>().unwrap(), Spindle::Sp3);
        assert!("SP5".parse::<Spindle>().is_err());
        assert_eq!("aussen".parse::<Category>().unwrap(), Category::Aussen);
        assert_eq!("Außen".parse::<Category>().unwrap(), Category::Aussen);
        assert_eq!("innen".parse::<Category>().unwrap(), Category::Innen);
        assert!("Oben".parse::<Category>().is_err());
    }

    #[test]
    fn test_random_ids_are_prefixed() {
        let id = OperationId::random();
        assert!(id.as_str().starts_with("op_"));
        assert!(id.as_str().len() > 3);
    }
}
