use chrono::Utc;
use url::Url;

use crate::client::storage::{MeetingStore, StorageError};
use crate::models::scheduling::format_utc;
use crate::models::MeetingDetails;

// Query parameters left by the redirect-based booking flow.
const PARAM_EVENT: &str = "calendly_event";
const PARAM_EVENT_TYPE: &str = "event_type";
const PARAM_INVITEE_EMAIL: &str = "invitee_email";
const PARAM_INVITEE_NAME: &str = "invitee_name";

#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub details: MeetingDetails,
    /// Where the page should `replaceState` to so a reload does not show the popup again.
    pub clean_url: Url,
}

pub struct ConfirmationPopup;

impl ConfirmationPopup {
    /// Decides, once per page load, whether there is a booked meeting to
    /// show. Whatever is found is consumed.
    pub fn on_mount(store: &MeetingStore, page: &Url) -> Result<Option<PopupView>, StorageError> {
        if let Some(details) = store.take()? {
            return Ok(Some(PopupView {
                details,
                clean_url: clean_url(page),
            }));
        }

        let param = |name: &str| {
            page.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
                .filter(|v| !v.is_empty())
        };

        let event = param(PARAM_EVENT);
        let event_type = param(PARAM_EVENT_TYPE);
        if event.is_none() && event_type.is_none() {
            return Ok(None);
        }

        let details = MeetingDetails {
            event_type: event_type.unwrap_or_else(|| MeetingDetails::DEFAULT_EVENT_TYPE.to_string()),
            invitee_name: param(PARAM_INVITEE_NAME)
                .unwrap_or_else(|| MeetingDetails::DEFAULT_INVITEE_NAME.to_string()),
            invitee_email: param(PARAM_INVITEE_EMAIL).unwrap_or_default(),
            meeting_time: format_utc(&Utc::now()),
            meeting_link: store.take_link()?.unwrap_or_default(),
            confirmation_email: true,
        };
        tracing::info!(event_type = %details.event_type, "meeting confirmation from redirect parameters");

        Ok(Some(PopupView {
            details,
            clean_url: clean_url(page),
        }))
    }
}

fn clean_url(page: &Url) -> Url {
    let mut url = page.clone();
    url.set_query(None);
    url.set_fragment(None);
    url
}
