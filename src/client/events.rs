use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    OpenLeadForm,
    OpenSchedulingWidget,
    /// Scroll the page to the section with this anchor id.
    ScrollTo(String),
}

/// Page-wide signalling between components that do not share a parent.
#[derive(Clone)]
pub struct UiBus {
    tx: broadcast::Sender<UiEvent>,
}

impl UiBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    /// Returns how many subscribers saw the event. Nobody listening is not an error.
    pub fn publish(&self, event: UiEvent) -> usize {
        tracing::debug!(event = ?event, "ui event");
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> BroadcastStream<UiEvent> {
        BroadcastStream::new(self.tx.subscribe())
    }
}

impl Default for UiBus {
    fn default() -> Self {
        Self::new()
    }
}
