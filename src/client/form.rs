use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::client::api::{LeadApi, SubmitError};
use crate::client::events::{UiBus, UiEvent};
use crate::client::timer::DelayedTask;
use crate::client::validation::{validate_field, validate_lead, Field, FieldError};
use crate::models::LeadSubmission;

/// How long the thank-you state stays up before handing over to booking.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);
/// Unprompted visitors see the form this long after the page loads.
pub const AUTO_OPEN_DELAY: Duration = Duration::from_secs(20);
pub const CONTACT_SECTION: &str = "contact";

#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    Editing,
    Submitting,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct LeadForm {
    values: LeadSubmission,
    status: FormStatus,
}

impl Default for LeadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadForm {
    pub fn new() -> Self {
        Self {
            values: LeadSubmission::default(),
            status: FormStatus::Editing,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *field.value_mut(&mut self.values) = value.into();
        if matches!(self.status, FormStatus::Failed(_)) {
            self.status = FormStatus::Editing;
        }
    }

    pub fn values(&self) -> &LeadSubmission {
        &self.values
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn errors(&self) -> Vec<FieldError> {
        validate_lead(&self.values)
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        validate_field(field, field.value(&self.values))
            .err()
            .map(|e| e.message)
    }

    pub fn can_submit(&self) -> bool {
        self.status != FormStatus::Submitting && self.errors().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Starts a submission if one is allowed, handing back the payload to send.
    fn begin_submit(&mut self) -> Result<LeadSubmission, FormRejected> {
        if self.status == FormStatus::Submitting {
            return Err(FormRejected::InFlight);
        }
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(FormRejected::Invalid(errors));
        }
        self.status = FormStatus::Submitting;
        Ok(self.values.clone())
    }

    fn finish_submit(&mut self, result: &Result<(), SubmitError>) {
        match result {
            Ok(()) => {
                self.values = LeadSubmission::default();
                self.status = FormStatus::Succeeded;
            }
            Err(e) => self.status = FormStatus::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormRejected {
    #[error("a submission is already in progress")]
    InFlight,

    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

struct ModalInner {
    open: bool,
    form: LeadForm,
}

/// The lead-capture modal: open/close state, the form, and the timed
/// handoff to the booking widget after a successful submission.
pub struct LeadModal {
    inner: Arc<Mutex<ModalInner>>,
    api: Arc<dyn LeadApi>,
    bus: UiBus,
    auto_open: Option<DelayedTask>,
    handoff: Option<DelayedTask>,
}

impl LeadModal {
    pub fn new(api: Arc<dyn LeadApi>, bus: UiBus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ModalInner {
                open: false,
                form: LeadForm::new(),
            })),
            api,
            bus,
            auto_open: None,
            handoff: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModalInner> {
        // Nothing in here can be left half-updated, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Call once when the page mounts.
    pub fn schedule_auto_open(&mut self) {
        let inner = Arc::clone(&self.inner);
        self.auto_open = Some(DelayedTask::spawn(AUTO_OPEN_DELAY, move || {
            let mut inner = inner.lock().unwrap_or_else(|p| p.into_inner());
            inner.open = true;
        }));
    }

    pub fn handle_event(&mut self, event: &UiEvent) {
        if *event == UiEvent::OpenLeadForm {
            self.open();
        }
    }

    pub fn open(&mut self) {
        self.auto_open = None;
        self.lock().open = true;
    }

    pub fn close(&mut self) {
        self.auto_open = None;
        self.handoff = None;
        let mut inner = self.lock();
        inner.open = false;
        if inner.form.status == FormStatus::Succeeded {
            inner.form.status = FormStatus::Editing;
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn form(&self) -> LeadForm {
        self.lock().form.clone()
    }

    pub fn set(&self, field: Field, value: impl Into<String>) {
        self.lock().form.set(field, value);
    }

    pub fn can_submit(&self) -> bool {
        self.lock().form.can_submit()
    }

    pub async fn submit(&mut self) -> Result<(), FormRejected> {
        let lead = self.lock().form.begin_submit()?;

        let result = self.api.submit(&lead).await;
        self.lock().form.finish_submit(&result);

        match result {
            Ok(()) => {
                self.schedule_handoff();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "lead submission failed");
                Err(e.into())
            }
        }
    }

    fn schedule_handoff(&mut self) {
        let inner = Arc::clone(&self.inner);
        let bus = self.bus.clone();
        self.handoff = Some(DelayedTask::spawn(SUCCESS_DISPLAY, move || {
            {
                let mut inner = inner.lock().unwrap_or_else(|p| p.into_inner());
                inner.open = false;
                inner.form.status = FormStatus::Editing;
            }
            bus.publish(UiEvent::ScrollTo(CONTACT_SECTION.to_string()));
            bus.publish(UiEvent::OpenSchedulingWidget);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio_stream::StreamExt;

    struct StubApi {
        result: Result<(), SubmitError>,
        calls: Mutex<Vec<LeadSubmission>>,
    }

    impl StubApi {
        fn new(result: Result<(), SubmitError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl LeadApi for StubApi {
        async fn submit(&self, lead: &LeadSubmission) -> Result<(), SubmitError> {
            self.calls.lock().unwrap().push(lead.clone());
            self.result.clone()
        }
    }

    fn fill(modal: &LeadModal) {
        modal.set(Field::Industry, "Technology");
        modal.set(Field::BusinessType, "B2B");
        modal.set(Field::Name, "Jo Lee");
        modal.set(Field::City, "Austin");
        modal.set(Field::Phone, "+1 512 555 0100");
        modal.set(Field::Email, "jo@example.com");
        modal.set(Field::Message, "Need a new website for our startup");
    }

    #[test]
    fn test_form_blocks_invalid_submission() {
        let mut form = LeadForm::new();
        assert!(!form.can_submit());
        form.set(Field::Email, "nope");
        assert_eq!(form.error_for(Field::Email), Some("Invalid email format"));
        assert!(matches!(form.begin_submit(), Err(FormRejected::Invalid(e)) if e.len() == 7));
    }

    #[test]
    fn test_form_blocks_while_in_flight() {
        let mut form = LeadForm::new();
        for (field, value) in [
            (Field::Industry, "Finance"),
            (Field::BusinessType, "B2C"),
            (Field::Name, "Sam"),
            (Field::City, "Leeds"),
            (Field::Phone, "07700 900123"),
            (Field::Email, "sam@example.co.uk"),
            (Field::Message, "Looking for a rebrand"),
        ] {
            form.set(field, value);
        }
        assert!(form.can_submit());
        form.begin_submit().unwrap();
        assert!(!form.can_submit());
        assert_eq!(form.begin_submit(), Err(FormRejected::InFlight));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_api() {
        let api = StubApi::new(Ok(()));
        let mut modal = LeadModal::new(api.clone(), UiBus::new());
        modal.set(Field::Name, "J");

        assert!(matches!(modal.submit().await, Err(FormRejected::Invalid(_))));
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_clears_form_then_hands_off_to_booking() {
        let api = StubApi::new(Ok(()));
        let bus = UiBus::new();
        let mut events = bus.subscribe();
        let mut modal = LeadModal::new(api.clone(), bus.clone());
        modal.open();
        fill(&modal);

        modal.submit().await.unwrap();
        assert_eq!(api.calls.lock().unwrap().len(), 1);
        assert_eq!(api.calls.lock().unwrap()[0].name, "Jo Lee");
        assert_eq!(modal.form().status(), &FormStatus::Succeeded);
        assert_eq!(modal.form().values(), &LeadSubmission::default());
        assert!(modal.is_open());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(modal.is_open());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!modal.is_open());
        assert_eq!(modal.form().status(), &FormStatus::Editing);
        assert_eq!(
            events.next().await.unwrap().unwrap(),
            UiEvent::ScrollTo("contact".to_string())
        );
        assert_eq!(events.next().await.unwrap().unwrap(), UiEvent::OpenSchedulingWidget);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_cancels_handoff() {
        let api = StubApi::new(Ok(()));
        let bus = UiBus::new();
        let mut events = bus.subscribe();
        let mut modal = LeadModal::new(api, bus.clone());
        modal.open();
        fill(&modal);
        modal.submit().await.unwrap();

        modal.close();
        tokio::time::sleep(Duration::from_secs(5)).await;

        bus.publish(UiEvent::OpenLeadForm);
        assert_eq!(events.next().await.unwrap().unwrap(), UiEvent::OpenLeadForm);
    }

    #[tokio::test]
    async fn test_failure_keeps_values_and_reports_message() {
        let api = StubApi::new(Err(SubmitError::Server {
            status: 500,
            message: "Email service connection failed. Please try again later.".to_string(),
        }));
        let mut modal = LeadModal::new(api, UiBus::new());
        fill(&modal);

        let err = modal.submit().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Email service connection failed. Please try again later."
        );
        let form = modal.form();
        assert_eq!(
            form.status(),
            &FormStatus::Failed("Email service connection failed. Please try again later.".to_string())
        );
        assert_eq!(form.values().name, "Jo Lee");
        assert!(form.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_open_after_delay() {
        let mut modal = LeadModal::new(StubApi::new(Ok(())), UiBus::new());
        modal.schedule_auto_open();

        tokio::time::sleep(Duration::from_secs(19)).await;
        assert!(!modal.is_open());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(modal.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_event_opens_and_close_stops_auto_open() {
        let mut modal = LeadModal::new(StubApi::new(Ok(())), UiBus::new());
        modal.schedule_auto_open();
        modal.handle_event(&UiEvent::OpenLeadForm);
        assert!(modal.is_open());

        modal.close();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!modal.is_open());
    }
}
