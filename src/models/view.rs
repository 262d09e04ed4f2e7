//! Presentation state.
//!
//! Filters and view selection parameterize what the read-only views show.
//! They are persisted with the plan but never consulted when slots or the
//! catalog are mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Category, Channel, Spindle};
use crate::error::Error;

/// Wire name of the "all categories" filter.
pub const ALL_CATEGORIES: &str = "Alle";

/// Wire name of the "all spindles" filter.
pub const ALL_SPINDLES: &str = "ALL";

/// Category filter: one category or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    /// Exact wire-name lookup (`Alle` or a category wire name).
    pub fn from_wire(s: &str) -> Option<Self> {
        if s == ALL_CATEGORIES {
            return Some(CategoryFilter::All);
        }
        Category::from_wire(s).map(CategoryFilter::Only)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(c) => c.as_str(),
        }
    }

    /// Filter pill label.
    pub fn label(&self) -> String {
        match self {
            CategoryFilter::All => "Alle Kategorien".to_string(),
            CategoryFilter::Only(c) => c.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case(ALL_CATEGORIES) || t.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        t.parse().map(CategoryFilter::Only)
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_wire(&s).ok_or_else(|| Error::InvalidInput(format!("unknown category filter '{s}'")))
    }
}

impl From<CategoryFilter> for String {
    fn from(f: CategoryFilter) -> Self {
        f.as_str().to_string()
    }
}

/// Spindle filter: one spindle or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpindleFilter {
    #[default]
    All,
    Only(Spindle),
}

impl SpindleFilter {
    pub fn matches(&self, spindle: Spindle) -> bool {
        match self {
            SpindleFilter::All => true,
            SpindleFilter::Only(s) => *s == spindle,
        }
    }

    /// Exact wire-name lookup (`ALL`, `SP3`, `SP4`).
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            ALL_SPINDLES => Some(SpindleFilter::All),
            "SP3" => Some(SpindleFilter::Only(Spindle::Sp3)),
            "SP4" => Some(SpindleFilter::Only(Spindle::Sp4)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpindleFilter::All => ALL_SPINDLES,
            SpindleFilter::Only(s) => s.as_str(),
        }
    }
}

impl fmt::Display for SpindleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SpindleFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case(ALL_SPINDLES) || t.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return Ok(SpindleFilter::All);
        }
        t.parse().map(SpindleFilter::Only)
    }
}

impl TryFrom<String> for SpindleFilter {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_wire(&s).ok_or_else(|| Error::InvalidInput(format!("unknown spindle filter '{s}'")))
    }
}

impl From<SpindleFilter> for String {
    fn from(f: SpindleFilter) -> Self {
        f.as_str().to_string()
    }
}

/// Which projection the plan panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanViewMode {
    /// Two-channel program table ("Programmplan").
    #[default]
    #[serde(rename = "PLAN")]
    ProgramTable,
    /// Tool-centric setup sheet ("Einrichteblatt").
    #[serde(rename = "EINRICHTE")]
    SetupSheet,
}

impl PlanViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanViewMode::ProgramTable => "PLAN",
            PlanViewMode::SetupSheet => "EINRICHTE",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PlanViewMode::ProgramTable => "Programmplan",
            PlanViewMode::SetupSheet => "Einrichteblatt",
        }
    }
}

/// Persisted presentation state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Channel whose slot list is being edited.
    pub current_channel: Channel,
    /// Library category filter.
    pub active_category: CategoryFilter,
    /// Library spindle filter.
    pub spindle_filter: SpindleFilter,
    /// Plan panel projection.
    pub plan_view_mode: PlanViewMode,
    /// Whether the library panel is collapsed.
    pub library_collapsed: bool,
}
