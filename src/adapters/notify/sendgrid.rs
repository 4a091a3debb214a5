//! SendGrid v3 mail sender

use crate::adapters::traits::{EmailMessage, Notifier};
use crate::config::{NotificationConfig, SecretString};
use crate::domain::{NotificationError, Result, SyncError};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct Attachment {
    content: String,
    filename: String,
    #[serde(rename = "type")]
    content_type: &'static str,
    disposition: &'static str,
}

/// `POST /v3/mail/send` body
#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

/// Sends the run summary through SendGrid
pub struct SendGridNotifier {
    client: Client,
    api_url: String,
    api_key: SecretString,
    from_address: String,
    to_addresses: Vec<String>,
}

impl SendGridNotifier {
    pub fn new(config: &NotificationConfig, api_key: SecretString) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            from_address: config.from_address.clone(),
            to_addresses: config.to_addresses.clone(),
        })
    }
}

async fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| NotificationError::Attachment {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "log.txt".to_string());

    Ok(Attachment {
        content: general_purpose::STANDARD.encode(bytes),
        filename,
        content_type: "text/plain",
        disposition: "attachment",
    })
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let mut attachments = Vec::with_capacity(message.attachments.len());
        for path in &message.attachments {
            attachments.push(read_attachment(path).await?);
        }

        let request = MailRequest {
            personalizations: vec![Personalization {
                to: self
                    .to_addresses
                    .iter()
                    .map(|email| Address { email })
                    .collect(),
            }],
            from: Address {
                email: &self.from_address,
            },
            subject: &message.subject,
            content: vec![Content {
                content_type: "text/plain",
                value: &message.body,
            }],
            attachments,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret().as_ref())
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        tracing::info!(
            recipients = self.to_addresses.len(),
            status = status.as_u16(),
            "Sent summary email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn notifier(server: &Server) -> SendGridNotifier {
        let config = NotificationConfig {
            from_address: "noreply@utah.gov".to_string(),
            to_addresses: vec!["gis@utah.gov".to_string()],
            prefix: None,
            api_url: format!("{}/v3/mail/send", server.url()),
        };
        SendGridNotifier::new(&config, secret_string("SG.key".to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_send_with_attachment() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("log_20261018-020000.txt");
        std::fs::write(&log, "hello").unwrap();

        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v3/mail/send")
            .match_header("authorization", "Bearer SG.key")
            .match_body(Matcher::PartialJson(json!({
                "personalizations": [{"to": [{"email": "gis@utah.gov"}]}],
                "from": {"email": "noreply@utah.gov"},
                "subject": "nfhl_sync Update Summary",
                "content": [{"type": "text/plain", "value": "body"}],
                "attachments": [{
                    "content": "aGVsbG8=",
                    "filename": "log_20261018-020000.txt",
                    "type": "text/plain",
                    "disposition": "attachment"
                }]
            })))
            .with_status(202)
            .create_async()
            .await;

        notifier(&server)
            .send(&EmailMessage {
                subject: "nfhl_sync Update Summary".to_string(),
                body: "body".to_string(),
                attachments: vec![log],
            })
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v3/mail/send")
            .with_status(401)
            .with_body(r#"{"errors":[{"message":"bad key"}]}"#)
            .create_async()
            .await;

        let err = notifier(&server)
            .send(&EmailMessage {
                subject: "s".to_string(),
                body: "b".to_string(),
                attachments: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::Notification(NotificationError::Rejected { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_attachment() {
        let server = Server::new_async().await;

        let err = notifier(&server)
            .send(&EmailMessage {
                subject: "s".to_string(),
                body: "b".to_string(),
                attachments: vec![PathBuf::from("/no/such/log.txt")],
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::Notification(NotificationError::Attachment { .. })
        ));
    }
}
