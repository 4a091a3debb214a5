//! ArcGIS REST API response models
//!
//! Only the members the sync job reads are modelled. Feature query
//! responses deserialize straight into [`LayerTable`](crate::domain::LayerTable).

use crate::domain::Field;
use serde::Deserialize;
use serde_json::Value;

/// `GET {layer}?f=json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    #[serde(default)]
    pub name: Option<String>,

    /// Server cap on features per query
    #[serde(default)]
    pub max_record_count: Option<usize>,

    #[serde(default)]
    pub geometry_type: Option<String>,

    #[serde(default)]
    pub fields: Vec<Field>,
}

/// `GET {layer}/query?returnIdsOnly=true`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectIdsResponse {
    #[serde(default)]
    pub object_id_field_name: Option<String>,

    /// Null when nothing matches
    #[serde(default)]
    pub object_ids: Option<Vec<i64>>,
}

/// The `error` object ArcGIS returns with HTTP 200
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: i64,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub details: Vec<Value>,
}

impl ServiceErrorBody {
    /// Message with any details appended
    pub fn describe(&self) -> String {
        let details: Vec<String> = self
            .details
            .iter()
            .map(|d| match d {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .filter(|d| !d.is_empty())
            .collect();
        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, details.join("; "))
        }
    }
}

/// Extract the embedded `error` object from an ArcGIS response body
pub fn service_error(body: &Value) -> Option<ServiceErrorBody> {
    body.get("error")
        .filter(|e| !e.is_null())
        .and_then(|e| serde_json::from_value(e.clone()).ok())
}
