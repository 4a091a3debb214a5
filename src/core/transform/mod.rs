//! Layer transformation
//!
//! Turns an extracted [`LayerTable`] into the shape the hosted layer
//! expects. The steps run in a fixed order:
//!
//! 1. **Hazard labels**: only for `S_Fld_Haz_Ar`, on the service's original
//!    upper-case column names
//! 2. **Column names**: lower-cased, `globalid` renamed, computed columns
//!    dropped
//! 3. **Coercion**: the layer's date, double and integer fields
//! 4. **Geometry check**: rows without geometry are dropped
//!
//! # Example
//!
//! ```
//! use nfhl_sync::core::transform::transform_layer;
//! use nfhl_sync::domain::{Feature, Field, FieldType, LayerDescriptor, LayerTable};
//! use serde_json::json;
//!
//! let layer = LayerDescriptor::new("S_BFE", 16, "8cab946b96d94167bd75314c32584d1a")
//!     .with_double_fields(&["elev"]);
//! let attributes = json!({"OBJECTID": 1, "ELEV": "4500.5"});
//! let table = LayerTable::new(
//!     vec![Field::new("OBJECTID", FieldType::Oid), Field::new("ELEV", FieldType::String)],
//!     vec![Feature::new(attributes.as_object().cloned().unwrap(), Some(json!({"paths": []})))],
//! );
//!
//! let table = transform_layer(&layer, table).unwrap();
//! assert_eq!(table.features[0].attributes["elev"], json!(4500.5));
//! ```

pub mod coerce;
pub mod columns;
pub mod hazard;

pub use coerce::apply_coercions;
pub use columns::canonicalize_columns;
pub use hazard::{hazard_label, label_hazard_areas};

use crate::domain::{LayerDescriptor, LayerTable, Result};

/// Transform one extracted layer
///
/// # Errors
///
/// Fails only for the hazard area layer when its zone columns are missing.
pub fn transform_layer(layer: &LayerDescriptor, mut table: LayerTable) -> Result<LayerTable> {
    if layer.is_hazard_area() {
        label_hazard_areas(&mut table)?;
    }

    canonicalize_columns(&mut table);
    apply_coercions(layer, &mut table);

    let dropped = table.drop_empty_geometries();
    if !dropped.is_empty() {
        tracing::warn!(
            layer = %layer.name,
            count = dropped.len(),
            rows = ?dropped,
            "Dropped rows with empty geometry"
        );
    }

    tracing::debug!(
        layer = %layer.name,
        rows = table.len(),
        columns = table.fields.len(),
        "Transformed layer"
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Feature, Field, FieldType, HAZARD_AREA_LAYER};
    use serde_json::{json, Value};

    fn feature(attributes: Value, geometry: Option<Value>) -> Feature {
        Feature::new(attributes.as_object().cloned().unwrap(), geometry)
    }

    fn polygon() -> Option<Value> {
        Some(json!({"rings": [[[0, 0], [0, 1], [1, 1], [0, 0]]]}))
    }

    #[test]
    fn test_hazard_layer_labels_before_lowercasing() {
        let layer = LayerDescriptor::new(HAZARD_AREA_LAYER, 28, "ae1b8cfd8f0e4a3f8bd3d5b5bd16fcd1");
        let table = LayerTable::new(
            vec![
                Field::new("OBJECTID", FieldType::Oid),
                Field::new("FLD_ZONE", FieldType::String),
                Field::new("ZONE_SUBTY", FieldType::String),
                Field::new("GlobalID", FieldType::GlobalId),
            ],
            vec![
                feature(
                    json!({"OBJECTID": 1, "FLD_ZONE": "AE", "ZONE_SUBTY": null, "GlobalID": "{A}"}),
                    polygon(),
                ),
                feature(
                    json!({"OBJECTID": 2, "FLD_ZONE": "D", "ZONE_SUBTY": null, "GlobalID": "{B}"}),
                    None,
                ),
            ],
        );

        let table = transform_layer(&layer, table).unwrap();

        assert_eq!(
            table.column_names(),
            vec!["OBJECTID", "fld_zone", "zone_subty", "global_id", "label"]
        );
        assert_eq!(table.len(), 1);
        let row = &table.features[0];
        assert_eq!(row.str_attr("label"), Some("1% Annual Chance Flood Hazard"));
        assert_eq!(row.str_attr("zone_subty"), Some(""));
    }

    #[test]
    fn test_other_layers_get_no_label() {
        let layer = LayerDescriptor::new("S_Gen_Struct", 24, "a9a7ba4a5a8b4c6f9ee9f6c0d58e8a10");
        let table = LayerTable::new(
            vec![Field::new("STRUCT_TYP", FieldType::String)],
            vec![feature(json!({"STRUCT_TYP": null}), polygon())],
        );

        let table = transform_layer(&layer, table).unwrap();

        assert!(!table.has_column("label"));
        assert_eq!(table.features[0].attributes["struct_typ"], Value::Null);
    }

    #[test]
    fn test_hazard_layer_missing_columns_fails() {
        let layer = LayerDescriptor::new(HAZARD_AREA_LAYER, 28, "ae1b8cfd8f0e4a3f8bd3d5b5bd16fcd1");
        let table = LayerTable::new(vec![Field::new("fld_zone", FieldType::String)], vec![]);

        assert!(transform_layer(&layer, table).is_err());
    }
}
