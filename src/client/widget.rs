use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::client::events::UiEvent;
use crate::client::storage::{MeetingStore, StorageError};
use crate::client::timer::DelayedTask;
use crate::models::{format_meeting_time, MeetingDetails, SchedulingPayload};

pub const SCRIPT_MARKER_ID: &str = "calendly-script";
pub const SCRIPT_SRC: &str = "https://assets.calendly.com/assets/external/widget.js";
pub const BOOKING_URL: &str =
    "https://calendly.com/yourprodone/30min?hide_event_type_details=1&hide_gdpr_banner=1";
pub const EVENT_SCHEDULED: &str = "calendly.event_scheduled";
pub const CONFIRMATION_DISPLAY: Duration = Duration::from_secs(7);
pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load booking widget. Please check your internet connection and try again.";

/// Injects the provider's script at most once per page, however many
/// widgets ask for it.
pub struct ScriptLoader {
    marker_id: &'static str,
    src: &'static str,
    loaded: AtomicBool,
}

impl ScriptLoader {
    pub const fn new(marker_id: &'static str, src: &'static str) -> Self {
        Self {
            marker_id,
            src,
            loaded: AtomicBool::new(false),
        }
    }

    pub fn calendly() -> Self {
        Self::new(SCRIPT_MARKER_ID, SCRIPT_SRC)
    }

    /// True only for the call that actually injected the script.
    pub fn ensure_loaded(&self) -> bool {
        let injected = self
            .loaded
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if injected {
            tracing::info!(id = self.marker_id, src = self.src, "injecting scheduling script");
        }
        injected
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// The script's error callback fired. Clears the flag so the next
    /// `ensure_loaded` injects it again.
    pub fn mark_failed(&self) {
        if self.loaded.swap(false, Ordering::SeqCst) {
            tracing::warn!(id = self.marker_id, src = self.src, "scheduling script failed to load");
        }
    }
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub booking_url: String,
    pub utm_campaign: String,
    pub utm_source: String,
    pub utm_medium: String,
}

impl WidgetConfig {
    fn with_medium(medium: &str) -> Self {
        Self {
            booking_url: BOOKING_URL.to_string(),
            utm_campaign: "website".to_string(),
            utm_source: "prodone".to_string(),
            utm_medium: medium.to_string(),
        }
    }

    /// The widget embedded in the contact section.
    pub fn contact() -> Self {
        Self::with_medium("contact")
    }

    /// The standalone booking page.
    pub fn booking() -> Self {
        Self::with_medium("booking")
    }

    pub fn embed_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.booking_url)?;
        url.query_pairs_mut()
            .append_pair("utm_campaign", &self.utm_campaign)
            .append_pair("utm_source", &self.utm_source)
            .append_pair("utm_medium", &self.utm_medium);
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    Closed,
    Open(Url),
    Confirmed,
    Failed(String),
}

pub struct SchedulingWidget {
    config: WidgetConfig,
    loader: Arc<ScriptLoader>,
    store: MeetingStore,
    state: Arc<Mutex<WidgetState>>,
    dismiss: Option<DelayedTask>,
}

impl SchedulingWidget {
    pub fn new(config: WidgetConfig, loader: Arc<ScriptLoader>, store: MeetingStore) -> Self {
        Self {
            config,
            loader,
            store,
            state: Arc::new(Mutex::new(WidgetState::Closed)),
            dismiss: None,
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn set_state(&self, next: WidgetState) {
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = next;
    }

    /// Loads the script if needed and points the inline widget at the
    /// booking URL.
    pub fn open(&mut self) -> Result<Url, url::ParseError> {
        self.loader.ensure_loaded();
        let url = self.config.embed_url()?;
        self.dismiss = None;
        self.set_state(WidgetState::Open(url.clone()));
        Ok(url)
    }

    /// Shows the load error in place of the widget. A later `open` retries.
    pub fn script_failed(&mut self) {
        self.loader.mark_failed();
        self.dismiss = None;
        self.set_state(WidgetState::Failed(LOAD_FAILED_MESSAGE.to_string()));
    }

    pub fn close(&mut self) {
        self.dismiss = None;
        self.set_state(WidgetState::Closed);
    }

    pub fn handle_event(&mut self, event: &UiEvent) -> Result<(), url::ParseError> {
        if *event == UiEvent::OpenSchedulingWidget {
            self.open()?;
        }
        Ok(())
    }

    /// Feeds one window message to the widget. Anything that is not a
    /// "meeting scheduled" notice is ignored.
    pub fn handle_message(&mut self, message: &Value) -> Result<Option<MeetingDetails>, StorageError> {
        if message.get("event").and_then(Value::as_str) != Some(EVENT_SCHEDULED) {
            return Ok(None);
        }
        tracing::info!("scheduling event received");

        let details = message
            .get("payload")
            .and_then(|p| serde_json::from_value::<SchedulingPayload>(p.clone()).ok())
            .and_then(|p| meeting_details(&p));

        if let Some(details) = &details {
            self.store.save(details)?;
        }

        self.set_state(WidgetState::Confirmed);
        let state = Arc::clone(&self.state);
        self.dismiss = Some(DelayedTask::spawn(CONFIRMATION_DISPLAY, move || {
            let mut state = state.lock().unwrap_or_else(|p| p.into_inner());
            if *state == WidgetState::Confirmed {
                *state = WidgetState::Closed;
            }
        }));

        Ok(details)
    }
}

fn meeting_details(payload: &SchedulingPayload) -> Option<MeetingDetails> {
    let invitee = payload.invitee.as_ref()?;
    let event = payload.event.as_ref()?;

    Some(MeetingDetails {
        event_type: non_empty(event.name.as_deref())
            .unwrap_or(MeetingDetails::DEFAULT_EVENT_TYPE)
            .to_string(),
        invitee_name: non_empty(invitee.name.as_deref())
            .unwrap_or(MeetingDetails::DEFAULT_INVITEE_NAME)
            .to_string(),
        invitee_email: invitee.email.clone().unwrap_or_default(),
        meeting_time: event
            .start_time
            .as_deref()
            .map(format_meeting_time)
            .unwrap_or_default(),
        meeting_link: event.any_link(),
        confirmation_email: true,
    })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
