use crate::config::AppConfig;
use crate::services::mail::MailTransport;

pub struct AppState {
    pub config: AppConfig,
    pub mailer: Box<dyn MailTransport>,
}
