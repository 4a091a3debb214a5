//! Layer descriptors
//!
//! A [`LayerDescriptor`] names one NFHL dataset mirrored from the FEMA map
//! service to an ArcGIS Online hosted feature layer.

use serde::{Deserialize, Serialize};

/// Name of the flood hazard area layer, the only one that gets labels
pub const HAZARD_AREA_LAYER: &str = "S_Fld_Haz_Ar";

/// Filter selecting Utah features by DFIRM id
pub const DFIRM_WHERE: &str = "DFIRM_ID LIKE '49%'";

/// Bounding filter for LOMA points, which carry no DFIRM id
pub const LAT_LON_WHERE: &str = "LAT > 36.95 and LAT < 42.05 AND LON > -114.05 AND LON < -109.04 AND NOT (LAT > 41 AND LON >-111.05)";

/// Static description of one layer to synchronize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Display name, also the key in the run summary
    pub name: String,

    /// Layer number within the map service
    pub number: u32,

    /// Destination ArcGIS Online item id
    pub item_id: String,

    /// Fields to coerce to dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_fields: Option<Vec<String>>,

    /// Fields to coerce to doubles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_fields: Option<Vec<String>>,

    /// Fields to coerce to nullable integers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_fields: Option<Vec<String>>,

    /// Server-side attribute filter
    #[serde(default = "default_where_clause")]
    pub where_clause: String,
}

impl LayerDescriptor {
    /// Create a descriptor with no coercions and the DFIRM filter
    pub fn new(name: impl Into<String>, number: u32, item_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            item_id: item_id.into(),
            date_fields: None,
            double_fields: None,
            int_fields: None,
            where_clause: default_where_clause(),
        }
    }

    /// Set the date fields
    pub fn with_date_fields(mut self, fields: &[&str]) -> Self {
        self.date_fields = Some(to_owned(fields));
        self
    }

    /// Set the double fields
    pub fn with_double_fields(mut self, fields: &[&str]) -> Self {
        self.double_fields = Some(to_owned(fields));
        self
    }

    /// Set the nullable integer fields
    pub fn with_int_fields(mut self, fields: &[&str]) -> Self {
        self.int_fields = Some(to_owned(fields));
        self
    }

    /// Set the where clause
    pub fn with_where_clause(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = where_clause.into();
        self
    }

    /// Whether this is the flood hazard area layer
    pub fn is_hazard_area(&self) -> bool {
        self.name == HAZARD_AREA_LAYER
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("layers.name cannot be empty".to_string());
        }
        if self.item_id.len() != 32 || !self.item_id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!(
                "layers.item_id for '{}' must be a 32 character hex item id, got '{}'",
                self.name, self.item_id
            ));
        }
        if self.where_clause.trim().is_empty() {
            return Err(format!(
                "layers.where_clause for '{}' cannot be empty",
                self.name
            ));
        }
        Ok(())
    }
}

fn to_owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

fn default_where_clause() -> String {
    DFIRM_WHERE.to_string()
}

/// The NFHL layers mirrored for Utah, in processing order
pub fn default_layers() -> Vec<LayerDescriptor> {
    vec![
        LayerDescriptor::new("S_LOMR", 1, "647c5dfc31044b0aba7611f0b7b3ed62")
            .with_date_fields(&["eff_date"]),
        LayerDescriptor::new("S_FIRM_Pan", 3, "cb041caea3ad4b48bef4502e10e14368")
            .with_date_fields(&["pre_date", "eff_date"]),
        LayerDescriptor::new("S_XS", 14, "4c87be2e986643e2b82b787d630c83a6")
            .with_double_fields(&["stream_stn", "wsel_reg", "strmbed_el"])
            .with_int_fields(&["seq"]),
        LayerDescriptor::new("S_BFE", 16, "8cab946b96d94167bd75314c32584d1a")
            .with_double_fields(&["elev"]),
        LayerDescriptor::new("S_PROFIL_BASLN", 17, "c0e92cf18ed14dc883b5ce9cae69e288"),
        LayerDescriptor::new("S_Wtr_Ln", 20, "f784f6c8b32a4f7abe180c4e37ffb8d6"),
        LayerDescriptor::new("S_LEVEE", 23, "295a02bbe0694dbfb5c827e073df2f9e")
            .with_date_fields(&["const_date", "pal_date"])
            .with_double_fields(&["freeboard"]),
        LayerDescriptor::new(HAZARD_AREA_LAYER, 28, "b2c606f13a4c4a59b3c253647883833f")
            .with_double_fields(&["static_bfe", "depth", "velocity", "bfe_revert", "dep_revert"]),
        LayerDescriptor::new("S_LOMAs", 34, "db07fd59e21846a993c32b1d048ba38f")
            .with_date_fields(&["dateended"])
            .with_double_fields(&["lat", "lon"])
            .with_where_clause(LAT_LON_WHERE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layers_order_and_count() {
        let layers = default_layers();
        let names: Vec<&str> = layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "S_LOMR",
                "S_FIRM_Pan",
                "S_XS",
                "S_BFE",
                "S_PROFIL_BASLN",
                "S_Wtr_Ln",
                "S_LEVEE",
                "S_Fld_Haz_Ar",
                "S_LOMAs"
            ]
        );
        for layer in &layers {
            assert!(layer.validate().is_ok(), "{} should be valid", layer.name);
        }
    }

    #[test]
    fn test_only_hazard_layer_is_hazard_area() {
        let hazard: Vec<_> = default_layers()
            .into_iter()
            .filter(LayerDescriptor::is_hazard_area)
            .collect();
        assert_eq!(hazard.len(), 1);
        assert_eq!(hazard[0].number, 28);
    }

    #[test]
    fn test_lomas_uses_lat_lon_filter() {
        let lomas = default_layers()
            .into_iter()
            .find(|l| l.name == "S_LOMAs")
            .unwrap();
        assert_eq!(lomas.where_clause, LAT_LON_WHERE);
    }

    #[test]
    fn test_validate_rejects_bad_item_id() {
        let layer = LayerDescriptor::new("S_BFE", 16, "not-an-item");
        let err = layer.validate().unwrap_err();
        assert!(err.contains("32 character hex"));
    }

    #[test]
    fn test_deserialize_defaults_where_clause() {
        let layer: LayerDescriptor = toml::from_str(
            r#"
name = "S_BFE"
number = 16
item_id = "8cab946b96d94167bd75314c32584d1a"
double_fields = ["elev"]
"#,
        )
        .unwrap();
        assert_eq!(layer.where_clause, DFIRM_WHERE);
        assert_eq!(layer.double_fields, Some(vec!["elev".to_string()]));
        assert!(layer.date_fields.is_none());
    }
}
