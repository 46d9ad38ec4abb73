use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::config::ClientConfig;
use super::errors::ClientError;
use crate::models::prescription::AnalysisResult;
use crate::models::reminder::{ReminderConfirmation, ReminderRequest};
use crate::models::upload::SelectedFile;

/// Trait for the calls made to the prescription service
#[async_trait]
pub trait PrescriptionClientTrait: Send + Sync {
    /// Upload a prescription image and return the extracted data
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult, ClientError>;

    /// Ask the service to schedule a medication reminder
    async fn submit_reminder(
        &self,
        request: &ReminderRequest,
    ) -> Result<ReminderConfirmation, ClientError>;
}

/// HTTP client for the prescription service.
///
/// Every call is a single POST: no retries, no idempotency key. Timeouts are the
/// HTTP client's defaults unless [`ClientConfig::timeout`] is set.
#[derive(Debug, Clone)]
pub struct PrescriptionClient {
    http: Client,
    analyze_url: Url,
    reminder_url: Url,
}

impl PrescriptionClient {
    /// Create a new client from the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config
            .validate()
            .map_err(|errors| ClientError::Config(errors.join("; ")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let client = Self {
            http,
            analyze_url: config.analyze_url()?,
            reminder_url: config.reminder_url()?,
        };
        debug!(analyze_url = %client.analyze_url, reminder_url = %client.reminder_url, "Prescription client ready");
        Ok(client)
    }
}

#[async_trait]
impl PrescriptionClientTrait for PrescriptionClient {
    #[instrument(skip(self, file), fields(file_name = %file.name, bytes = file.len()))]
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult, ClientError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| ClientError::Unexpected(format!("Unusable MIME type {}: {}", file.mime_type, e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.analyze_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(no_response)?;

        let result: AnalysisResult = parse_success(response).await?;
        info!(medications = result.medications.len(), "Prescription analyzed");
        Ok(result)
    }

    #[instrument(skip(self, request), fields(medication = %request.medication_name, interval = %request.interval_type))]
    async fn submit_reminder(
        &self,
        request: &ReminderRequest,
    ) -> Result<ReminderConfirmation, ClientError> {
        let response = self
            .http
            .post(self.reminder_url.clone())
            .json(request)
            .send()
            .await
            .map_err(no_response)?;

        let confirmation: ReminderConfirmation = parse_success(response).await?;
        info!("Reminder accepted by the service");
        Ok(confirmation)
    }
}

/// Classify a failed send: no response was received
fn no_response(error: reqwest::Error) -> ClientError {
    warn!("Request did not reach the service: {}", error);
    ClientError::NoResponse(error.to_string())
}

/// Read a response, decoding the body on success and classifying it otherwise
async fn parse_success<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::Unexpected(format!("Failed to read response body: {}", e)))?;

    if !status.is_success() {
        return Err(match server_error_message(&body) {
            Some(message) => {
                warn!(%status, "Service reported an error: {}", message);
                ClientError::Server(message)
            }
            None => {
                warn!(%status, "Service failed without an error payload");
                ClientError::Unexpected(format!("HTTP {}", status))
            }
        });
    }

    serde_json::from_slice(&body)
        .map_err(|e| ClientError::Unexpected(format!("Malformed response body: {}", e)))
}

/// Extract a non-empty `error` string from a JSON error body
fn server_error_message(body: &[u8]) -> Option<String> {
    let payload: serde_json::Value = serde_json::from_slice(body).ok()?;
    payload
        .get("error")
        .and_then(|error| error.as_str())
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message() {
        assert_eq!(
            server_error_message(br#"{"error": "Invalid image format"}"#),
            Some("Invalid image format".to_string())
        );
        assert_eq!(server_error_message(br#"{"error": ""}"#), None);
        assert_eq!(server_error_message(br#"{"error": 42}"#), None);
        assert_eq!(server_error_message(br#"{"message": "nope"}"#), None);
        assert_eq!(server_error_message(b"<html>502 Bad Gateway</html>"), None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = PrescriptionClient::new(ClientConfig::new("::not a url::")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
