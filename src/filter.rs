//! Catalog filtering.
//!
//! Used by the library listing (with the persisted view filters) and by the
//! slot picker (with its own transient filters).

use crate::models::{Catalog, CategoryFilter, Operation, SpindleFilter, ViewState};

/// Operations matching both filters, in catalog order.
pub fn filter_catalog<'a>(
    catalog: &'a Catalog,
    category: CategoryFilter,
    spindle: SpindleFilter,
) -> Vec<&'a Operation> {
    catalog
        .iter()
        .filter(|op| category.matches(op.category) && spindle.matches(op.spindle))
        .collect()
}

/// Library listing under the persisted view filters.
pub fn library_view<'a>(catalog: &'a Catalog, view: &ViewState) -> Vec<&'a Operation> {
    filter_catalog(catalog, view.active_category, view.spindle_filter)
}
