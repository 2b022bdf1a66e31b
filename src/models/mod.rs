pub mod lead;
pub mod meeting;
pub mod scheduling;

pub use lead::{BusinessType, Industry, LeadSubmission};
pub use meeting::MeetingDetails;
pub use scheduling::{
    format_meeting_time, Conferencing, EventKind, Invitee, ScheduledEvent, SchedulingPayload,
    WebhookEnvelope,
};
