// Page event subscription.
// Stands in for DOM mutation observers and click listeners.

use std::rc::Rc;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{GhlocError, Result};

use super::dom::Document;

/// Something that happened on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEvent {
    /// The page tree changed (including client-side navigation).
    DomChanged,
    /// The user activated the injected trigger.
    TriggerActivated,
}

/// Receives page events. Handlers run on the page's single thread.
#[async_trait(?Send)]
pub trait PageHandler {
    async fn handle(&self, event: PageEvent, doc: &mut Document) -> Result<()>;
}

/// Ordered list of subscriptions.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(PageEvent, Rc<dyn PageHandler>)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `event`.
    pub fn on(&mut self, event: PageEvent, handler: Rc<dyn PageHandler>) {
        self.handlers.push((event, handler));
    }

    pub fn handler_count(&self, event: PageEvent) -> usize {
        self.handlers.iter().filter(|(e, _)| *e == event).count()
    }

    /// Run every handler subscribed to `event`, in subscription order.
    ///
    /// A failing handler does not stop the others; failures are logged and
    /// returned.
    pub async fn emit(&self, event: PageEvent, doc: &mut Document) -> Vec<GhlocError> {
        let mut failures = Vec::new();
        for (subscribed, handler) in &self.handlers {
            if *subscribed != event {
                continue;
            }
            if let Err(e) = handler.handle(event, doc).await {
                warn!(?event, error = %e, "Page handler failed");
                failures.push(e);
            }
        }
        failures
    }
}
