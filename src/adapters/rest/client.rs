//! NFHL map service client
//!
//! Extraction follows the ArcGIS REST paging protocol: read the layer's
//! `maxRecordCount`, list the matching object ids, then fetch the features
//! in id chunks no larger than that count.

use super::models::{service_error, LayerInfo, ObjectIdsResponse};
use crate::adapters::traits::FeatureSource;
use crate::config::ServiceConfig;
use crate::domain::{LayerDescriptor, LayerTable, RestError, Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Client for one ArcGIS REST map service
///
/// # Example
///
/// ```no_run
/// use nfhl_sync::adapters::rest::MapServiceClient;
/// use nfhl_sync::adapters::traits::FeatureSource;
/// use nfhl_sync::config::ServiceConfig;
/// use nfhl_sync::domain::default_layers;
///
/// # async fn example() -> nfhl_sync::domain::Result<()> {
/// let client = MapServiceClient::new(&ServiceConfig::default())?;
/// let table = client.extract(&default_layers()[0]).await?;
/// println!("{} features", table.len());
/// # Ok(())
/// # }
/// ```
pub struct MapServiceClient {
    service_url: String,
    client: Client,
    max_page_size: usize,
}

impl MapServiceClient {
    /// Build a client with the configured per-request timeout
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the service URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Url::parse(&config.url).map_err(|e| {
            SyncError::Configuration(format!("Invalid service url '{}': {e}", config.url))
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            service_url: config.url.trim_end_matches('/').to_string(),
            client,
            max_page_size: config.max_page_size.max(1),
        })
    }

    fn layer_url(&self, number: u32) -> String {
        format!("{}/{number}", self.service_url)
    }

    /// Layer properties
    pub async fn layer_info(&self, number: u32) -> Result<LayerInfo> {
        let url = self.layer_url(number);
        let response = self
            .client
            .get(&url)
            .query(&[("f", "json")])
            .send()
            .await
            .map_err(request_error)?;
        decode(&url, response).await
    }

    /// Object ids matching `where_clause`, ascending
    pub async fn object_ids(&self, number: u32, where_clause: &str) -> Result<Vec<i64>> {
        let url = format!("{}/query", self.layer_url(number));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("where", where_clause),
                ("returnIdsOnly", "true"),
                ("f", "json"),
            ])
            .send()
            .await
            .map_err(request_error)?;
        let ids: ObjectIdsResponse = decode(&url, response).await?;

        let mut ids = ids.object_ids.unwrap_or_default();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Features with the given object ids, all fields and geometry
    pub async fn query_features(&self, number: u32, object_ids: &[i64]) -> Result<LayerTable> {
        let url = format!("{}/query", self.layer_url(number));
        let ids = object_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let response = self
            .client
            .post(&url)
            .form(&[
                ("objectIds", ids.as_str()),
                ("outFields", "*"),
                ("returnGeometry", "true"),
                ("f", "json"),
            ])
            .send()
            .await
            .map_err(request_error)?;
        decode(&url, response).await
    }

    fn page_size(&self, info: &LayerInfo) -> usize {
        info.max_record_count
            .unwrap_or(self.max_page_size)
            .clamp(1, self.max_page_size)
    }
}

#[async_trait]
impl FeatureSource for MapServiceClient {
    async fn extract(&self, layer: &LayerDescriptor) -> Result<LayerTable> {
        let info = self.layer_info(layer.number).await?;
        let ids = self.object_ids(layer.number, &layer.where_clause).await?;
        let page_size = self.page_size(&info);

        tracing::info!(
            layer = %layer.name,
            number = layer.number,
            features = ids.len(),
            page_size = page_size,
            "Extracting layer"
        );

        let mut table = LayerTable::new(info.fields, Vec::with_capacity(ids.len()));
        table.geometry_type = info.geometry_type;

        for (page, chunk) in ids.chunks(page_size).enumerate() {
            let part = self.query_features(layer.number, chunk).await?;
            tracing::debug!(
                layer = %layer.name,
                page = page,
                received = part.len(),
                "Fetched feature page"
            );

            if table.fields.is_empty() {
                table.fields = part.fields;
            }
            if table.geometry_type.is_none() {
                table.geometry_type = part.geometry_type;
            }
            if table.spatial_reference.is_none() {
                table.spatial_reference = part.spatial_reference;
            }
            table.features.extend(part.features);
        }

        if table.len() != ids.len() {
            return Err(RestError::IncompleteExtract {
                expected: ids.len(),
                received: table.len(),
            }
            .into());
        }

        Ok(table)
    }
}

fn request_error(err: reqwest::Error) -> SyncError {
    if err.is_timeout() {
        RestError::Timeout(err.to_string()).into()
    } else {
        RestError::ConnectionFailed(err.to_string()).into()
    }
}

/// Check status and embedded errors, then deserialize the body
async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(RestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        }
        .into());
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| RestError::InvalidResponse(format!("{url}: {e}")))?;
    if let Some(error) = service_error(&body) {
        return Err(RestError::Service {
            code: error.code,
            message: error.describe(),
        }
        .into());
    }

    serde_json::from_value(body)
        .map_err(|e| RestError::InvalidResponse(format!("{url}: {e}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server, max_page_size: usize) -> MapServiceClient {
        MapServiceClient::new(&ServiceConfig {
            url: format!("{}/arcgis/rest/services/NFHL/MapServer", server.url()),
            timeout_seconds: 5,
            max_page_size,
        })
        .unwrap()
    }

    fn bfe() -> LayerDescriptor {
        LayerDescriptor::new("S_BFE", 16, "8cab946b96d94167bd75314c32584d1a")
    }

    fn features(ids: &[i64]) -> String {
        let features: Vec<Value> = ids
            .iter()
            .map(|id| json!({"attributes": {"OBJECTID": id, "ELEV": 4500}, "geometry": {"paths": [[[0, 0], [1, 1]]]}}))
            .collect();
        json!({
            "geometryType": "esriGeometryPolyline",
            "spatialReference": {"wkid": 4269},
            "fields": [{"name": "OBJECTID", "type": "esriFieldTypeOID"}],
            "features": features
        })
        .to_string()
    }

    async fn mock_layer_info(server: &mut Server, max_record_count: usize) -> mockito::Mock {
        server
            .mock("GET", "/arcgis/rest/services/NFHL/MapServer/16")
            .match_query(Matcher::UrlEncoded("f".into(), "json".into()))
            .with_body(
                json!({
                    "maxRecordCount": max_record_count,
                    "geometryType": "esriGeometryPolyline",
                    "fields": [
                        {"name": "OBJECTID", "type": "esriFieldTypeOID"},
                        {"name": "ELEV", "type": "esriFieldTypeDouble"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_extract_pages_by_max_record_count() {
        let mut server = Server::new_async().await;
        let info = mock_layer_info(&mut server, 2).await;
        let ids = server
            .mock("GET", "/arcgis/rest/services/NFHL/MapServer/16/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("where".into(), "DFIRM_ID LIKE '49%'".into()),
                Matcher::UrlEncoded("returnIdsOnly".into(), "true".into()),
            ]))
            .with_body(json!({"objectIdFieldName": "OBJECTID", "objectIds": [3, 1, 2]}).to_string())
            .create_async()
            .await;
        let first_page = server
            .mock("POST", "/arcgis/rest/services/NFHL/MapServer/16/query")
            .match_body(Matcher::UrlEncoded("objectIds".into(), "1,2".into()))
            .with_body(features(&[1, 2]))
            .create_async()
            .await;
        let second_page = server
            .mock("POST", "/arcgis/rest/services/NFHL/MapServer/16/query")
            .match_body(Matcher::UrlEncoded("objectIds".into(), "3".into()))
            .with_body(features(&[3]))
            .create_async()
            .await;

        let table = client_for(&server, 2000).extract(&bfe()).await.unwrap();

        info.assert_async().await;
        ids.assert_async().await;
        first_page.assert_async().await;
        second_page.assert_async().await;
        assert_eq!(table.len(), 3);
        assert_eq!(table.column_names(), vec!["OBJECTID", "ELEV"]);
        assert_eq!(table.spatial_reference, Some(json!({"wkid": 4269})));
    }

    #[tokio::test]
    async fn test_page_size_capped_by_configuration() {
        let mut server = Server::new_async().await;
        let _info = mock_layer_info(&mut server, 1000).await;
        let _ids = server
            .mock("GET", "/arcgis/rest/services/NFHL/MapServer/16/query")
            .match_query(Matcher::Any)
            .with_body(json!({"objectIds": [1, 2]}).to_string())
            .create_async()
            .await;
        let pages = server
            .mock("POST", "/arcgis/rest/services/NFHL/MapServer/16/query")
            .with_body(features(&[1]))
            .expect(2)
            .create_async()
            .await;

        let table = client_for(&server, 1).extract(&bfe()).await.unwrap();

        pages.assert_async().await;
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_no_matching_features() {
        let mut server = Server::new_async().await;
        let _info = mock_layer_info(&mut server, 1000).await;
        let _ids = server
            .mock("GET", "/arcgis/rest/services/NFHL/MapServer/16/query")
            .match_query(Matcher::Any)
            .with_body(json!({"objectIdFieldName": "OBJECTID", "objectIds": null}).to_string())
            .create_async()
            .await;

        let table = client_for(&server, 2000).extract(&bfe()).await.unwrap();

        assert!(table.is_empty());
        assert_eq!(table.fields.len(), 2);
    }

    #[tokio::test]
    async fn test_embedded_service_error() {
        let mut server = Server::new_async().await;
        let _info = server
            .mock("GET", "/arcgis/rest/services/NFHL/MapServer/16")
            .match_query(Matcher::Any)
            .with_body(json!({"error": {"code": 500, "message": "Service unavailable", "details": []}}).to_string())
            .create_async()
            .await;

        let err = client_for(&server, 2000).extract(&bfe()).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Rest(RestError::Service { code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let mut server = Server::new_async().await;
        let _info = server
            .mock("GET", "/arcgis/rest/services/NFHL/MapServer/16")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("busy")
            .create_async()
            .await;

        let err = client_for(&server, 2000).extract(&bfe()).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Rest(RestError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_incomplete_extract() {
        let mut server = Server::new_async().await;
        let _info = mock_layer_info(&mut server, 1000).await;
        let _ids = server
            .mock("GET", "/arcgis/rest/services/NFHL/MapServer/16/query")
            .match_query(Matcher::Any)
            .with_body(json!({"objectIds": [1, 2]}).to_string())
            .create_async()
            .await;
        let _page = server
            .mock("POST", "/arcgis/rest/services/NFHL/MapServer/16/query")
            .with_body(features(&[1]))
            .create_async()
            .await;

        let err = client_for(&server, 2000).extract(&bfe()).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Rest(RestError::IncompleteExtract {
                expected: 2,
                received: 1
            })
        ));
    }

    #[test]
    fn test_invalid_service_url() {
        let result = MapServiceClient::new(&ServiceConfig {
            url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }
}
