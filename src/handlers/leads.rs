use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::LeadSubmission;
use crate::services::mail::{MailError, OutgoingMail};
use crate::services::templates;
use crate::state::AppState;

// POST /api/leads
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    // An unreadable body is reported the same way as an empty form.
    let lead = match payload {
        Ok(Json(lead)) => lead,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable lead submission");
            LeadSubmission::default()
        }
    };

    let missing = lead.missing_fields();
    if !missing.is_empty() {
        tracing::info!(missing = ?missing, "lead submission rejected");
        return Err(AppError::BadRequest(format!(
            "All fields are required (missing: {})",
            missing.join(", ")
        )));
    }

    let config = &state.config;
    if !config.email_configured() {
        tracing::error!(
            has_email_user = !config.email_user.is_empty(),
            has_email_pass = !config.email_pass.is_empty(),
            "email configuration missing"
        );
        return Err(AppError::Config(
            "Email service not configured. Please contact support.".to_string(),
        ));
    }

    let reference = Uuid::new_v4().to_string();
    let rendered = templates::lead_notification(&config.brand_name, &lead, &reference);
    let mail = OutgoingMail {
        from_name: format!("{} Website", config.brand_name),
        from_address: config.email_user.clone(),
        to: config.lead_recipient().to_string(),
        subject: rendered.subject,
        html: rendered.html,
        text: rendered.text,
    };

    if let Err(e) = state.mailer.send(&mail).await {
        tracing::error!(error = %e, reference = %reference, "lead email error");
        return Err(AppError::Mail(send_failure_message(&e).to_string()));
    }

    tracing::info!(
        reference = %reference,
        name = %lead.name,
        email = %lead.email,
        industry = %lead.industry,
        "lead email sent"
    );
    Ok(Json(json!({ "success": true, "message": "Email sent successfully" })))
}

fn send_failure_message(err: &MailError) -> &'static str {
    match err {
        MailError::Auth(_) => "Email authentication failed. Please check email credentials.",
        MailError::Connection(_) => "Email service connection failed. Please try again later.",
        _ => "Failed to send email. Please try again or contact support.",
    }
}
