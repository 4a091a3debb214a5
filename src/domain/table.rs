//! In-memory layer tables
//!
//! A [`LayerTable`] holds the features of one extracted layer in the same
//! shape the ArcGIS REST API uses (`fields` plus `features` with
//! `attributes` and `geometry`). It is produced by extraction, mutated in
//! place by the transform step, serialized once for load, then dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// ArcGIS field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "esriFieldTypeOID")]
    Oid,
    #[serde(rename = "esriFieldTypeString")]
    String,
    #[serde(rename = "esriFieldTypeDouble")]
    Double,
    #[serde(rename = "esriFieldTypeSingle")]
    Single,
    #[serde(rename = "esriFieldTypeInteger")]
    Integer,
    #[serde(rename = "esriFieldTypeSmallInteger")]
    SmallInteger,
    #[serde(rename = "esriFieldTypeBigInteger")]
    BigInteger,
    #[serde(rename = "esriFieldTypeDate")]
    Date,
    #[serde(rename = "esriFieldTypeGlobalID")]
    GlobalId,
    #[serde(rename = "esriFieldTypeGUID")]
    Guid,
    #[serde(rename = "esriFieldTypeGeometry")]
    Geometry,
    #[serde(other)]
    Other,
}

/// One attribute column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            alias: None,
        }
    }
}

/// One row: attribute values plus an optional geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
}

impl Feature {
    pub fn new(attributes: Map<String, Value>, geometry: Option<Value>) -> Self {
        Self {
            attributes,
            geometry,
        }
    }

    /// Attribute as a string slice, `None` for null, missing or non-string
    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// Whether the geometry is missing, null or an empty JSON object
    pub fn has_empty_geometry(&self) -> bool {
        match &self.geometry {
            None | Some(Value::Null) => true,
            Some(Value::Object(map)) => map.is_empty(),
            Some(_) => false,
        }
    }
}

/// Features of one layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerTable {
    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default)]
    pub features: Vec<Feature>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<Value>,
}

impl LayerTable {
    pub fn new(fields: Vec<Field>, features: Vec<Feature>) -> Self {
        Self {
            fields,
            features,
            geometry_type: None,
            spatial_reference: None,
        }
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Column names in field order
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Add a column computed per feature, replacing it if it already exists
    pub fn set_column<F>(&mut self, name: &str, field_type: FieldType, mut value: F)
    where
        F: FnMut(&Feature) -> Value,
    {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.field_type = field_type,
            None => self.fields.push(Field::new(name, field_type)),
        }
        for feature in &mut self.features {
            let computed = value(feature);
            feature.attributes.insert(name.to_string(), computed);
        }
    }

    /// Rewrite every value of an existing column
    ///
    /// Returns `false` (and does nothing) when the column is absent.
    pub fn map_column<F>(&mut self, name: &str, mut map: F) -> bool
    where
        F: FnMut(Value) -> Value,
    {
        if !self.has_column(name) {
            return false;
        }
        for feature in &mut self.features {
            let slot = feature
                .attributes
                .entry(name.to_string())
                .or_insert(Value::Null);
            let current = std::mem::take(slot);
            *slot = map(current);
        }
        true
    }

    /// Change the declared type of an existing column
    pub fn set_field_type(&mut self, name: &str, field_type: FieldType) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.field_type = field_type;
        }
    }

    /// Rename columns in place, keeping column order
    ///
    /// `rename` returns the new name, or `None` to keep the current one.
    pub fn rename_columns<F>(&mut self, rename: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for field in &mut self.fields {
            if let Some(new_name) = rename(&field.name) {
                field.name = new_name;
            }
        }
        for feature in &mut self.features {
            let attributes = std::mem::take(&mut feature.attributes);
            feature.attributes = attributes
                .into_iter()
                .map(|(key, value)| match rename(&key) {
                    Some(new_key) => (new_key, value),
                    None => (key, value),
                })
                .collect();
        }
    }

    /// Drop columns, ignoring any that are not present
    pub fn drop_columns(&mut self, names: &[&str]) {
        self.fields.retain(|f| !names.contains(&f.name.as_str()));
        for feature in &mut self.features {
            feature
                .attributes
                .retain(|key, _| !names.contains(&key.as_str()));
        }
    }

    /// Remove features without geometry, returning their original indices
    pub fn drop_empty_geometries(&mut self) -> Vec<usize> {
        let dropped: Vec<usize> = self
            .features
            .iter()
            .enumerate()
            .filter(|(_, f)| f.has_empty_geometry())
            .map(|(i, _)| i)
            .collect();
        if !dropped.is_empty() {
            self.features.retain(|f| !f.has_empty_geometry());
        }
        dropped
    }
}
