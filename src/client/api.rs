use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::LeadSubmission;

pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// The server answered, but not with success.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("No response from server. Please check your connection and try again.")]
    NoResponse,

    /// The request could not even be put together.
    #[error("{0}")]
    Request(String),
}

#[async_trait]
pub trait LeadApi: Send + Sync {
    async fn submit(&self, lead: &LeadSubmission) -> Result<(), SubmitError>;
}

pub struct LeadClient {
    endpoint: String,
    client: reqwest::Client,
}

impl LeadClient {
    pub fn new(base_url: &str) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(SUBMIT_TIMEOUT)
            .build()
            .map_err(|e| SubmitError::Request(e.to_string()))?;

        Ok(Self {
            endpoint: format!("{}/api/leads", base_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadApi for LeadClient {
    async fn submit(&self, lead: &LeadSubmission) -> Result<(), SubmitError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(lead)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;
        let data: Option<Value> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            return Err(SubmitError::Server {
                status: status.as_u16(),
                message: server_message(status.as_u16(), data.as_ref(), &body),
            });
        }

        let accepted = data
            .as_ref()
            .and_then(|d| d.get("success"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !accepted {
            let message = data
                .as_ref()
                .and_then(|d| d.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("Submission failed")
                .to_string();
            return Err(SubmitError::Server {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(endpoint = %self.endpoint, "lead submitted");
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> SubmitError {
    if e.is_builder() {
        SubmitError::Request(e.to_string())
    } else {
        tracing::warn!(error = %e, "lead submission got no response");
        SubmitError::NoResponse
    }
}

/// The server's own `error` text when it sent one, else the raw body, else the status.
fn server_message(status: u16, data: Option<&Value>, body: &str) -> String {
    if let Some(msg) = data.and_then(|d| d.get("error")).and_then(Value::as_str) {
        return msg.to_string();
    }
    if data.is_none() && !body.trim().is_empty() {
        return body.trim().to_string();
    }
    format!("Server error: {status}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_prefers_error_field() {
        let data = json!({"error": "All fields are required"});
        assert_eq!(
            server_message(400, Some(&data), "ignored"),
            "All fields are required"
        );
    }

    #[test]
    fn test_server_message_plain_text_body() {
        assert_eq!(server_message(502, None, "Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_server_message_falls_back_to_status() {
        assert_eq!(server_message(500, None, ""), "Server error: 500");
        let data = json!({"detail": "x"});
        assert_eq!(server_message(503, Some(&data), "{\"detail\":\"x\"}"), "Server error: 503");
    }

    #[test]
    fn test_endpoint_normalises_trailing_slash() {
        let client = LeadClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000/api/leads");
    }

    #[tokio::test]
    async fn test_bad_url_is_request_error() {
        let client = LeadClient::new("not a url").unwrap();
        let err = client.submit(&LeadSubmission::default()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Request(_)));
    }

    #[test]
    fn test_no_response_message() {
        assert_eq!(
            SubmitError::NoResponse.to_string(),
            "No response from server. Please check your connection and try again."
        );
    }
}
