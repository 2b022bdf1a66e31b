use serde::{Deserialize, Serialize};

/// What the confirmation popup shows after a booking. Kept in the
/// browser-local store between the widget callback and the next page load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetails {
    pub event_type: String,
    pub invitee_name: String,
    pub invitee_email: String,
    pub meeting_time: String,
    pub meeting_link: String,
    pub confirmation_email: bool,
}

impl MeetingDetails {
    pub const DEFAULT_EVENT_TYPE: &'static str = "Consultation Call";
    pub const DEFAULT_INVITEE_NAME: &'static str = "You";
}
