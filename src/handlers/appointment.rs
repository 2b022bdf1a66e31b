use std::any::Any;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::{format_meeting_time, EventKind, WebhookEnvelope};
use crate::services::mail::OutgoingMail;
use crate::services::templates;
use crate::state::AppState;

pub const WEBHOOK_TOKEN_HEADER: &str = "x-calendly-webhook-token";

/// Shared-secret check. An unset secret authorizes nothing.
fn check_token(headers: &HeaderMap, secret: &str) -> Result<(), AppError> {
    let token = headers
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if secret.is_empty() || token.is_empty() || token != secret {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// POST /api/appointment
//
// The body is taken raw so authorization is decided before anything in it
// is parsed.
pub async fn scheduling_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    if let Err(e) = check_token(&headers, &state.config.webhook_secret) {
        tracing::warn!("scheduling webhook rejected: bad or missing token");
        return Err(e);
    }

    let envelope: WebhookEnvelope = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "unparseable scheduling webhook body");
        AppError::BadRequest("Malformed payload".to_string())
    })?;

    match envelope.kind() {
        EventKind::InviteeCreated => invitee_created(&state, &envelope).await,
        EventKind::InviteeCanceled => {
            tracing::info!("invitee canceled, nothing to do");
            Ok(Json(json!({ "success": true })))
        }
        EventKind::Other(kind) => {
            tracing::info!(event = %kind, "ignoring scheduling webhook event");
            Ok(Json(json!({ "received": true })))
        }
    }
}

async fn invitee_created(
    state: &AppState,
    envelope: &WebhookEnvelope,
) -> Result<Json<Value>, AppError> {
    let payload = envelope.scheduling_payload().unwrap_or_default();
    let (Some(invitee), Some(event)) = (payload.invitee, payload.event) else {
        tracing::error!(payload = ?envelope.payload, "malformed scheduling payload");
        return Err(AppError::BadRequest("Malformed payload".to_string()));
    };

    let email = invitee.email.as_deref().map(str::trim).unwrap_or("");
    if email.is_empty() {
        tracing::error!(invitee = ?invitee, "no email found in invitee");
        return Err(AppError::BadRequest("No email found in invitee".to_string()));
    }

    let meet_link = event.meet_link();
    if meet_link.is_empty() {
        tracing::warn!(event = ?event, "no meeting link found for event");
    }

    let config = &state.config;
    if !config.email_configured() {
        tracing::error!(
            has_email_user = !config.email_user.is_empty(),
            has_email_pass = !config.email_pass.is_empty(),
            "missing EMAIL_USER or EMAIL_PASS"
        );
        return Err(AppError::Config("Email configuration error".to_string()));
    }

    if let Err(e) = state.mailer.verify().await {
        tracing::error!(error = %e, "mail transport verification failed");
        return Err(AppError::Mail(
            "Email transporter verification failed".to_string(),
        ));
    }

    let invitee_name = invitee
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("there");
    let meeting_time = event
        .start_time
        .as_deref()
        .map(format_meeting_time)
        .unwrap_or_else(|| "To be confirmed".to_string());

    let rendered =
        templates::meeting_confirmation(&config.brand_name, invitee_name, &meeting_time, &meet_link);
    let mail = OutgoingMail {
        from_name: format!("{} Team", config.brand_name),
        from_address: config.email_user.clone(),
        to: email.to_string(),
        subject: rendered.subject,
        html: rendered.html,
        text: rendered.text,
    };

    if let Err(e) = state.mailer.send(&mail).await {
        tracing::error!(error = %e, to = %email, "error sending confirmation email");
        return Err(AppError::Mail("Failed to send email".to_string()));
    }

    tracing::info!(to = %email, meeting_time = %meeting_time, "meeting confirmation sent");
    Ok(Json(json!({ "success": true, "emailSent": true })))
}

/// Last-resort response when webhook processing panics.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "scheduling webhook error");

    AppError::Internal("Webhook processing failed".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(token: Option<&str>) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(t) = token {
            h.insert(WEBHOOK_TOKEN_HEADER, HeaderValue::from_str(t).unwrap());
        }
        h
    }

    #[test]
    fn test_check_token() {
        assert!(check_token(&headers(Some("s3cret")), "s3cret").is_ok());
        assert!(check_token(&headers(Some("nope")), "s3cret").is_err());
        assert!(check_token(&headers(None), "s3cret").is_err());
    }

    #[test]
    fn test_unset_secret_rejects_everything() {
        assert!(check_token(&headers(None), "").is_err());
        assert!(check_token(&headers(Some("")), "").is_err());
        assert!(check_token(&headers(Some("anything")), "").is_err());
    }

    #[test]
    fn test_panic_response_is_generic_500() {
        let res = panic_response(Box::new("boom".to_string()));
        assert_eq!(res.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
