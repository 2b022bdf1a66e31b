pub mod smtp;

use async_trait::async_trait;

/// One fully rendered message. Sent as multipart/alternative (text + HTML).
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport verification failed: {0}")]
    Verification(String),

    #[error("invalid address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("send failed: {0}")]
    Other(String),
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Pre-flight check that the provider accepts our connection and credentials.
    async fn verify(&self) -> Result<(), MailError>;

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}
