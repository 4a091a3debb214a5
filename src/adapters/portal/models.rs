//! ArcGIS Online sharing and feature service models

use serde::Deserialize;
use serde_json::Value;

/// `POST /sharing/rest/generateToken`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,

    /// Expiry as epoch milliseconds
    #[serde(default)]
    pub expires: Option<i64>,
}

/// `GET /sharing/rest/content/items/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemInfo {
    pub id: String,

    pub owner: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(rename = "type", default)]
    pub item_type: Option<String>,

    /// Feature service url for hosted layers
    #[serde(default)]
    pub url: Option<String>,
}

impl ItemInfo {
    /// Admin endpoint of the item's feature service
    pub fn admin_url(&self) -> Option<String> {
        self.url
            .as_deref()
            .map(|url| url.trim_end_matches('/').replacen("/rest/services/", "/rest/admin/services/", 1))
    }
}

/// Generic `{"success": bool}` response
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}

/// One entry of `addResults`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    #[serde(default)]
    pub object_id: Option<i64>,

    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub error: Option<Value>,
}

/// `POST {layer}/addFeatures`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFeaturesResponse {
    #[serde(default)]
    pub add_results: Vec<EditResult>,
}

impl AddFeaturesResponse {
    pub fn added(&self) -> usize {
        self.add_results.iter().filter(|r| r.success).count()
    }

    pub fn first_error(&self) -> Option<&Value> {
        self.add_results.iter().find_map(|r| r.error.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_url() {
        let item: ItemInfo = serde_json::from_value(json!({
            "id": "8cab946b96d94167bd75314c32584d1a",
            "owner": "UtahEM",
            "type": "Feature Service",
            "url": "https://services1.arcgis.com/abc/arcgis/rest/services/S_BFE/FeatureServer/"
        }))
        .unwrap();

        assert_eq!(
            item.admin_url().unwrap(),
            "https://services1.arcgis.com/abc/arcgis/rest/admin/services/S_BFE/FeatureServer"
        );
    }

    #[test]
    fn test_add_results_counted() {
        let response: AddFeaturesResponse = serde_json::from_value(json!({
            "addResults": [
                {"objectId": 1, "success": true},
                {"objectId": -1, "success": false, "error": {"code": 1000, "description": "bad geometry"}},
                {"objectId": 3, "success": true}
            ]
        }))
        .unwrap();

        assert_eq!(response.added(), 2);
        assert_eq!(response.first_error().unwrap()["code"], 1000);
    }
}
