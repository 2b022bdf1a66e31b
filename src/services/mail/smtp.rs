use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailError, MailTransport, OutgoingMail};
use crate::config::AppConfig;

/// SMTP reply codes that mean the account itself was rejected.
const AUTH_FAILURE_CODES: [&str; 3] = ["530", "534", "535"];

pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, username: String, password: String) -> Result<Self, MailError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(classify)?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self { mailer })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, MailError> {
        Self::new(
            &config.smtp_host,
            config.smtp_port,
            config.email_user.clone(),
            config.email_pass.clone(),
        )
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> Result<(), MailError> {
        match self.mailer.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Verification(
                "server did not accept the connection".to_string(),
            )),
            Err(e) => Err(MailError::Verification(classify(e).to_string())),
        }
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        let response = self.mailer.send(message).await.map_err(classify)?;

        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            code = %response.code(),
            "email sent"
        );
        Ok(())
    }
}

pub fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let from_address: Address = mail
        .from_address
        .parse()
        .map_err(|_| MailError::Address(mail.from_address.clone()))?;
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|_| MailError::Address(mail.to.clone()))?;

    Message::builder()
        .from(Mailbox::new(Some(mail.from_name.clone()), from_address))
        .to(to)
        .subject(&mail.subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(mail.text.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(mail.html.clone()),
                ),
        )
        .map_err(|e| MailError::Build(e.to_string()))
}

fn classify(err: lettre::transport::smtp::Error) -> MailError {
    let code = err.status().map(|c| c.to_string());
    match code.as_deref() {
        Some(c) if AUTH_FAILURE_CODES.contains(&c) => MailError::Auth(err.to_string()),
        Some(_) => MailError::Other(err.to_string()),
        None if err.is_client() => MailError::Other(err.to_string()),
        // no SMTP reply at all: timeouts, DNS, TLS and socket failures
        None => MailError::Connection(err.to_string()),
    }
}
