//! Column name canonicalization
//!
//! Hosted layers use lower-case attribute names. `SHAPE` and `OBJECTID`
//! keep their case, `globalid` becomes `global_id`, and the computed
//! length/area columns the map service appends are dropped.

use crate::domain::LayerTable;

/// Columns whose case is left alone
pub const PRESERVED_COLUMNS: [&str; 2] = ["SHAPE", "OBJECTID"];

/// Computed geometry columns removed after lower-casing
pub const DROPPED_COLUMNS: [&str; 2] = ["shape.stlength()", "shape.starea()"];

/// Canonical name for `name`, or `None` if it is already canonical
pub fn canonical_name(name: &str) -> Option<String> {
    if PRESERVED_COLUMNS.contains(&name) {
        return None;
    }

    let lower = name.to_lowercase();
    let canonical = if lower == "globalid" {
        "global_id".to_string()
    } else {
        lower
    };

    (canonical != name).then_some(canonical)
}

/// Rename every column to its canonical name and drop computed columns
///
/// Running it twice leaves the table unchanged the second time.
pub fn canonicalize_columns(table: &mut LayerTable) {
    table.rename_columns(canonical_name);
    table.drop_columns(&DROPPED_COLUMNS);
}
