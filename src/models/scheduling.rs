use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const GOOGLE_MEET_PREFIX: &str = "https://meet.google.com";

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    InviteeCreated,
    InviteeCanceled,
    Other(String),
}

impl EventKind {
    pub fn from_str(s: &str) -> Self {
        match s {
            "invitee.created" => EventKind::InviteeCreated,
            "invitee.canceled" => EventKind::InviteeCanceled,
            other => EventKind::Other(other.to_string()),
        }
    }
}

/// Body of a scheduling-provider webhook delivery. The payload stays untyped
/// until the event kind says it matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub event: Option<serde_json::Value>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl WebhookEnvelope {
    /// A missing or non-string `event` is just another kind we do not handle.
    pub fn kind(&self) -> EventKind {
        match &self.event {
            Some(serde_json::Value::String(s)) => EventKind::from_str(s),
            Some(other) => EventKind::Other(other.to_string()),
            None => EventKind::Other(String::new()),
        }
    }

    /// `None` when the payload is absent or does not have the expected shape.
    pub fn scheduling_payload(&self) -> Option<SchedulingPayload> {
        self.payload
            .clone()
            .and_then(|p| serde_json::from_value(p).ok())
    }
}

/// Shared by webhook deliveries and the widget's browser message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulingPayload {
    #[serde(default)]
    pub invitee: Option<Invitee>,
    #[serde(default)]
    pub event: Option<ScheduledEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Invitee {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledEvent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    /// Usually a string, but providers also send structured locations.
    #[serde(default)]
    pub location: Option<serde_json::Value>,
    #[serde(default)]
    pub conferencing: Option<Conferencing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conferencing {
    #[serde(default)]
    pub join_url: Option<String>,
}

impl ScheduledEvent {
    pub fn location_str(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn join_url(&self) -> Option<&str> {
        self.conferencing
            .as_ref()
            .and_then(|c| c.join_url.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Link for the confirmation email: a Google Meet location wins, then
    /// the conferencing join URL. Empty when neither is present.
    pub fn meet_link(&self) -> String {
        self.location_str()
            .filter(|loc| loc.starts_with(GOOGLE_MEET_PREFIX))
            .or_else(|| self.join_url())
            .unwrap_or("")
            .to_string()
    }

    /// Link as the booking widget reports it: any location string, then
    /// the conferencing join URL.
    pub fn any_link(&self) -> String {
        self.location_str()
            .or_else(|| self.join_url())
            .unwrap_or("")
            .to_string()
    }
}

/// Renders an RFC 3339 timestamp for people. Anything unparseable is shown as-is.
pub fn format_meeting_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => format_utc(&dt.with_timezone(&Utc)),
        Err(_) => raw.to_string(),
    }
}

pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%A, %B %-d, %Y at %-I:%M %p UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> ScheduledEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_event_kind_parse() {
        assert_eq!(EventKind::from_str("invitee.created"), EventKind::InviteeCreated);
        assert_eq!(EventKind::from_str("invitee.canceled"), EventKind::InviteeCanceled);
        assert_eq!(
            EventKind::from_str("routing_form_submission.created"),
            EventKind::Other("routing_form_submission.created".to_string())
        );
    }

    #[test]
    fn test_envelope_payload_shape() {
        let env: WebhookEnvelope = serde_json::from_value(json!({
            "event": "invitee.created",
            "payload": {"invitee": {"name": "Jo", "email": "jo@example.com"}, "event": {"start_time": "2024-01-01T10:00:00Z"}}
        }))
        .unwrap();
        assert_eq!(env.kind(), EventKind::InviteeCreated);
        let payload = env.scheduling_payload().unwrap();
        assert_eq!(payload.invitee.unwrap().email.as_deref(), Some("jo@example.com"));

        let env: WebhookEnvelope = serde_json::from_value(json!({
            "event": "invitee.canceled",
            "payload": {"event": "https://api.calendly.com/scheduled_events/X"}
        }))
        .unwrap();
        assert_eq!(env.kind(), EventKind::InviteeCanceled);
        assert!(env.scheduling_payload().is_none());
    }

    #[test]
    fn test_envelope_non_string_event_is_other() {
        let env: WebhookEnvelope = serde_json::from_value(json!({"event": 5})).unwrap();
        assert_eq!(env.kind(), EventKind::Other("5".to_string()));

        let env: WebhookEnvelope = serde_json::from_value(json!({"event": null})).unwrap();
        assert_eq!(env.kind(), EventKind::Other(String::new()));

        let env: WebhookEnvelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(env.kind(), EventKind::Other(String::new()));
    }

    #[test]
    fn test_meet_link_prefers_google_meet_location() {
        let ev = event(json!({
            "location": "https://meet.google.com/abc-defg-hij",
            "conferencing": {"join_url": "https://zoom.us/j/1"}
        }));
        assert_eq!(ev.meet_link(), "https://meet.google.com/abc-defg-hij");
    }

    #[test]
    fn test_meet_link_falls_back_to_join_url() {
        let ev = event(json!({"conferencing": {"join_url": "https://zoom.us/j/1"}}));
        assert_eq!(ev.meet_link(), "https://zoom.us/j/1");

        let ev = event(json!({
            "location": "Office, 5th floor",
            "conferencing": {"join_url": "https://zoom.us/j/1"}
        }));
        assert_eq!(ev.meet_link(), "https://zoom.us/j/1");
    }

    #[test]
    fn test_meet_link_ignores_structured_location() {
        let ev = event(json!({"location": {"type": "google_conference"}}));
        assert_eq!(ev.meet_link(), "");
    }

    #[test]
    fn test_any_link_takes_plain_location() {
        let ev = event(json!({"location": "Office, 5th floor"}));
        assert_eq!(ev.any_link(), "Office, 5th floor");
        assert_eq!(ev.meet_link(), "");
    }

    #[test]
    fn test_format_meeting_time() {
        assert_eq!(
            format_meeting_time("2024-01-01T10:00:00Z"),
            "Monday, January 1, 2024 at 10:00 AM UTC"
        );
        assert_eq!(
            format_meeting_time("2024-01-01T10:30:00-05:00"),
            "Monday, January 1, 2024 at 3:30 PM UTC"
        );
        assert_eq!(format_meeting_time("next tuesday"), "next tuesday");
    }
}
