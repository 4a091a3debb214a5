//! Flood hazard area labeling
//!
//! The `S_Fld_Haz_Ar` layer is symbolized on a derived `label` column. The
//! label comes from the `(FLD_ZONE, ZONE_SUBTY)` pair via [`HAZARD_RULES`];
//! the rules are mutually exclusive and rows matching none get `""`.

use crate::domain::{FieldType, LayerTable, Result, SyncError};
use serde_json::Value;

pub const FLD_ZONE: &str = "FLD_ZONE";
pub const ZONE_SUBTY: &str = "ZONE_SUBTY";
pub const LABEL: &str = "label";

/// How a rule constrains `ZONE_SUBTY`
#[derive(Debug, Clone, Copy)]
pub enum SubtypeMatch {
    /// Subtype must be null
    Null,
    /// Subtype is ignored
    Any,
    /// Subtype must be one of these values
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct HazardRule {
    pub zones: &'static [&'static str],
    pub subtype: SubtypeMatch,
    pub label: &'static str,
}

impl HazardRule {
    fn matches(&self, zone: Option<&str>, subtype: Option<&str>) -> bool {
        let zone_matches = zone.is_some_and(|z| self.zones.contains(&z));
        zone_matches
            && match self.subtype {
                SubtypeMatch::Null => subtype.is_none(),
                SubtypeMatch::Any => true,
                SubtypeMatch::OneOf(values) => subtype.is_some_and(|s| values.contains(&s)),
            }
    }
}

pub const HAZARD_RULES: [HazardRule; 6] = [
    HazardRule {
        zones: &["A", "AE", "AH", "AO", "VE"],
        subtype: SubtypeMatch::Null,
        label: "1% Annual Chance Flood Hazard",
    },
    HazardRule {
        zones: &["AE"],
        subtype: SubtypeMatch::OneOf(&["FLOODWAY", "FLOODWAY CONTAINED IN CHANNEL"]),
        label: "Regulatory Floodway",
    },
    HazardRule {
        zones: &["D"],
        subtype: SubtypeMatch::Any,
        label: "Area of Undetermined Flood Hazard",
    },
    HazardRule {
        zones: &["X"],
        subtype: SubtypeMatch::OneOf(&[
            "0.2 PCT ANNUAL CHANCE FLOOD HAZARD",
            "1 PCT DEPTH LESS THAN 1 FOOT",
            "1 PCT DRAINAGE AREA LESS THAN 1 SQUARE MILE",
        ]),
        label: "0.2% Annual Chance Flood Hazard",
    },
    HazardRule {
        zones: &["X"],
        subtype: SubtypeMatch::OneOf(&["AREA WITH REDUCED FLOOD RISK DUE TO LEVEE"]),
        label: "Area with Reduced Flood Risk due to Levee",
    },
    HazardRule {
        zones: &["AREA NOT INCLUDED"],
        subtype: SubtypeMatch::Any,
        label: "Area Not Included",
    },
];

/// Label for one zone/subtype pair; `None` means null
pub fn hazard_label(zone: Option<&str>, subtype: Option<&str>) -> &'static str {
    HAZARD_RULES
        .iter()
        .find(|rule| rule.matches(zone, subtype))
        .map(|rule| rule.label)
        .unwrap_or("")
}

/// Add the `label` column and blank out null strings
///
/// Must run before column canonicalization since it reads the service's
/// upper-case field names.
///
/// # Errors
///
/// Fails when `FLD_ZONE` or `ZONE_SUBTY` is not a column of the table.
pub fn label_hazard_areas(table: &mut LayerTable) -> Result<()> {
    for required in [FLD_ZONE, ZONE_SUBTY] {
        if !table.has_column(required) {
            return Err(SyncError::Transform(format!(
                "hazard area layer is missing column {required}"
            )));
        }
    }

    table.set_column(LABEL, FieldType::String, |feature| {
        let label = hazard_label(feature.str_attr(FLD_ZONE), feature.str_attr(ZONE_SUBTY));
        Value::String(label.to_string())
    });

    let string_columns: Vec<String> = table
        .fields
        .iter()
        .filter(|f| f.field_type == FieldType::String)
        .map(|f| f.name.clone())
        .collect();
    for column in &string_columns {
        table.map_column(column, |value| match value {
            Value::Null => Value::String(String::new()),
            other => other,
        });
    }

    let unlabeled = table
        .features
        .iter()
        .filter(|f| f.str_attr(LABEL) == Some(""))
        .count();
    tracing::debug!(
        rows = table.len(),
        unlabeled = unlabeled,
        "Labeled hazard areas"
    );

    Ok(())
}
