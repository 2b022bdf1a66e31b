use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub email_user: String,
    pub email_pass: String,
    pub admin_email: String,
    pub webhook_secret: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub brand_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            email_user: env::var("EMAIL_USER").unwrap_or_default(),
            email_pass: env::var("EMAIL_PASS").unwrap_or_default(),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_default(),
            webhook_secret: env::var("CALENDLY_WEBHOOK_SECRET").unwrap_or_default(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            brand_name: env::var("BRAND_NAME").unwrap_or_else(|_| "ProDone".to_string()),
        }
    }

    /// Both halves of the mail account are required before anything is sent.
    pub fn email_configured(&self) -> bool {
        !self.email_user.is_empty() && !self.email_pass.is_empty()
    }

    /// Lead notifications go to the admin inbox, or back to the sending account.
    pub fn lead_recipient(&self) -> &str {
        if self.admin_email.is_empty() {
            &self.email_user
        } else {
            &self.admin_email
        }
    }
}
