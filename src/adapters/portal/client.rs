//! ArcGIS Online client
//!
//! Authenticates once with a generated token, then resolves items and
//! replaces hosted layer contents with truncate + `addFeatures`.

use super::models::{AddFeaturesResponse, ItemInfo, SuccessResponse, TokenResponse};
use crate::adapters::rest::service_error;
use crate::adapters::traits::HostedLayerStore;
use crate::config::{secret_string, PortalConfig, SecretString};
use crate::domain::{LayerDescriptor, LayerTable, PortalError, Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Service error codes the sharing API uses for a missing or hidden item
const ITEM_NOT_FOUND_CODES: [i64; 2] = [400, 404];

/// Authenticated ArcGIS Online session
pub struct PortalClient {
    org_url: String,
    client: Client,
    token: SecretString,
    add_chunk_size: usize,
}

impl PortalClient {
    /// Generate a token for `username` and return a ready client
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ConnectionFailed`] when the portal cannot be
    /// reached and [`PortalError::AuthenticationFailed`] when it rejects the
    /// credentials.
    pub async fn connect(
        config: &PortalConfig,
        username: &str,
        password: &SecretString,
    ) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        let org_url = config.org_url.trim_end_matches('/').to_string();

        let url = format!("{org_url}/sharing/rest/generateToken");
        let expiration = config.token_expiration_minutes.to_string();
        let response = client
            .post(&url)
            .form(&[
                ("username", username),
                ("password", password.expose_secret().as_ref()),
                ("referer", org_url.as_str()),
                ("expiration", expiration.as_str()),
                ("f", "json"),
            ])
            .send()
            .await
            .map_err(|e| PortalError::ConnectionFailed(format!("{org_url}: {e}")))?;

        let token: TokenResponse = decode(&url, response).await.map_err(|e| match e {
            SyncError::Portal(PortalError::Service { message, .. })
            | SyncError::Portal(PortalError::InvalidResponse(message)) => {
                PortalError::AuthenticationFailed(message).into()
            }
            other => other,
        })?;

        tracing::info!(
            org_url = %org_url,
            user = %username,
            expires = ?token.expires,
            "Authenticated with ArcGIS Online"
        );

        Ok(Self {
            org_url,
            client,
            token: secret_string(token.token),
            add_chunk_size: config.add_chunk_size.max(1),
        })
    }

    fn token(&self) -> &str {
        self.token.expose_secret().as_ref()
    }

    /// Item metadata
    pub async fn item(&self, item_id: &str) -> Result<ItemInfo> {
        let url = format!("{}/sharing/rest/content/items/{item_id}", self.org_url);
        let response = self
            .client
            .get(&url)
            .query(&[("f", "json"), ("token", self.token())])
            .send()
            .await
            .map_err(connection_error)?;

        decode(&url, response).await.map_err(|e| match e {
            SyncError::Portal(PortalError::Service { code, .. })
                if ITEM_NOT_FOUND_CODES.contains(&code) =>
            {
                PortalError::ItemNotFound(item_id.to_string()).into()
            }
            other => other,
        })
    }

    /// Feature service url of a hosted layer item
    async fn feature_service(&self, item_id: &str) -> Result<ItemInfo> {
        let item = self.item(item_id).await?;
        if item.url.is_none() {
            return Err(PortalError::NotAFeatureLayer(item_id.to_string()).into());
        }
        Ok(item)
    }

    /// Remove every feature from layer 0 of the item's service
    pub async fn truncate(&self, item: &ItemInfo) -> Result<()> {
        let admin_url = item
            .admin_url()
            .ok_or_else(|| PortalError::NotAFeatureLayer(item.id.clone()))?;
        let url = format!("{admin_url}/0/truncate");
        let response = self
            .client
            .post(&url)
            .form(&[("async", "false"), ("f", "json"), ("token", self.token())])
            .send()
            .await
            .map_err(connection_error)?;

        let result: SuccessResponse = decode(&url, response).await?;
        if !result.success {
            return Err(PortalError::TruncateFailed(item.id.clone()).into());
        }
        Ok(())
    }

    /// Add features to layer 0 in chunks, returning how many were added
    pub async fn add_features(&self, item: &ItemInfo, table: &LayerTable) -> Result<usize> {
        let service_url = item
            .url
            .as_deref()
            .ok_or_else(|| PortalError::NotAFeatureLayer(item.id.clone()))?
            .trim_end_matches('/');
        let url = format!("{service_url}/0/addFeatures");
        let total = table.len();
        let mut added = 0;

        for (chunk_number, chunk) in table.features.chunks(self.add_chunk_size).enumerate() {
            let features = serde_json::to_string(chunk)?;
            let response = self
                .client
                .post(&url)
                .form(&[
                    ("features", features.as_str()),
                    ("rollbackOnFailure", "true"),
                    ("f", "json"),
                    ("token", self.token()),
                ])
                .send()
                .await
                .map_err(connection_error)?;

            let result: AddFeaturesResponse = decode(&url, response).await?;
            added += result.added();

            if let Some(error) = result.first_error() {
                tracing::warn!(
                    item_id = %item.id,
                    chunk = chunk_number,
                    error = %error,
                    "Features rejected by addFeatures"
                );
            }
        }

        if added < total {
            return Err(PortalError::AddFailed { added, total }.into());
        }
        Ok(added)
    }
}

#[async_trait]
impl HostedLayerStore for PortalClient {
    async fn truncate_and_load(
        &self,
        layer: &LayerDescriptor,
        table: &LayerTable,
    ) -> Result<usize> {
        let item = self.feature_service(&layer.item_id).await?;

        tracing::info!(layer = %layer.name, item_id = %item.id, "Truncating hosted layer");
        self.truncate(&item).await?;

        tracing::info!(
            layer = %layer.name,
            features = table.len(),
            "Loading features"
        );
        self.add_features(&item, table).await
    }

    async fn item_data(&self, item_id: &str) -> Result<Value> {
        let url = format!("{}/sharing/rest/content/items/{item_id}/data", self.org_url);
        let response = self
            .client
            .get(&url)
            .query(&[("f", "json"), ("token", self.token())])
            .send()
            .await
            .map_err(connection_error)?;
        decode(&url, response).await
    }

    async fn update_item_data(&self, item_id: &str, data: &Value) -> Result<()> {
        let item = self.item(item_id).await?;
        let url = format!(
            "{}/sharing/rest/content/users/{}/items/{item_id}/update",
            self.org_url, item.owner
        );
        let text = serde_json::to_string(data)?;
        let response = self
            .client
            .post(&url)
            .form(&[
                ("text", text.as_str()),
                ("f", "json"),
                ("token", self.token()),
            ])
            .send()
            .await
            .map_err(connection_error)?;

        let result: SuccessResponse = decode(&url, response).await?;
        if !result.success {
            return Err(PortalError::UpdateFailed(item_id.to_string()).into());
        }
        Ok(())
    }
}

fn connection_error(err: reqwest::Error) -> SyncError {
    PortalError::ConnectionFailed(err.to_string()).into()
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(PortalError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        }
        .into());
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| PortalError::InvalidResponse(format!("{url}: {e}")))?;
    if let Some(error) = service_error(&body) {
        return Err(PortalError::Service {
            code: error.code,
            message: error.describe(),
        }
        .into());
    }

    serde_json::from_value(body)
        .map_err(|e| PortalError::InvalidResponse(format!("{url}: {e}")).into())
}
