// Page integration.
// Attaches the trigger on every page change and renders LOC data when it is activated.

use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::context::AppContext;
use crate::error::Result;

use super::dom::{Document, NodeId};
use super::events::{EventBus, PageEvent, PageHandler};
use super::widgets::{attach_trigger, render_panel};
use super::{PANEL_ID, TRIGGER_ID, locate};

/// Connects page events to the resolver, cache and client.
pub struct PageIntegration {
    ctx: Arc<AppContext>,
}

impl PageIntegration {
    pub fn new(ctx: Arc<AppContext>) -> Rc<Self> {
        Rc::new(Self { ctx })
    }

    /// Subscribe to page changes and trigger activation.
    pub fn register(self: &Rc<Self>, bus: &mut EventBus) {
        bus.on(PageEvent::DomChanged, self.clone());
        bus.on(PageEvent::TriggerActivated, self.clone());
    }

    /// Make sure the trigger exists. Never fetches.
    pub fn on_dom_changed(&self, doc: &mut Document) -> bool {
        let attached = attach_trigger(doc);
        if attached {
            debug!(location = doc.location(), "LOC trigger attached");
        }
        attached
    }

    /// Resolve, load and render the panel for the current page.
    ///
    /// Pages that are not repositories, already show the panel, or have no
    /// trigger are left alone.
    pub async fn on_trigger_activated(&self, doc: &mut Document) -> Result<Option<NodeId>> {
        if doc.get_element_by_id(PANEL_ID).is_some() || doc.get_element_by_id(TRIGGER_ID).is_none()
        {
            return Ok(None);
        }

        let Some(locator) = locate(doc) else {
            debug!(location = doc.location(), "Not a repository page");
            return Ok(None);
        };

        let key = locator.cache_key();
        let root = self.ctx.locs(&key).await?;
        let node = root.descend(&locator.path_segments)?;
        let link = self.ctx.stats_link(&locator)?;

        let panel = render_panel(doc, node, Some(&link));
        debug!(%key, path = ?locator.path_segments, "LOC panel rendered");
        Ok(panel)
    }
}

#[async_trait(?Send)]
impl PageHandler for PageIntegration {
    async fn handle(&self, event: PageEvent, doc: &mut Document) -> Result<()> {
        match event {
            PageEvent::DomChanged => {
                self.on_dom_changed(doc);
            }
            PageEvent::TriggerActivated => {
                self.on_trigger_activated(doc).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::sample_tree;
    use crate::cache::MemoryStore;
    use crate::cache::loc::testing::ManualClock;
    use crate::client::stub::StubService;
    use crate::config::Config;
    use crate::error::GhlocError;
    use crate::locator::CacheKey;
    use crate::page::{STATS_LINK_ID, panel_text, repository_page};

    const T: i64 = 1_700_000_000_000;

    // Nothing listens on the discard port, so any fetch fails fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn context(service_url: &str) -> Arc<AppContext> {
        let config = Config {
            service_url: service_url.to_string(),
            stats_url: "https://stats.test".to_string(),
            ..Config::default()
        };
        AppContext::with_store(
            config,
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::at(T)),
        )
        .unwrap()
    }

    async fn seeded_bus(key: &str) -> EventBus {
        let ctx = context(UNREACHABLE);
        ctx.cache()
            .put(&CacheKey::new(key), &sample_tree())
            .await
            .unwrap();
        let mut bus = EventBus::new();
        PageIntegration::new(ctx).register(&mut bus);
        bus
    }

    #[tokio::test]
    async fn test_dom_changes_attach_once() {
        let bus = seeded_bus("o/r").await;
        let mut doc = repository_page("/o/r", None, None);

        assert!(bus.emit(PageEvent::DomChanged, &mut doc).await.is_empty());
        assert!(bus.emit(PageEvent::DomChanged, &mut doc).await.is_empty());
        assert_eq!(doc.count_with_id(TRIGGER_ID), 1);
        assert_eq!(doc.count_with_id(PANEL_ID), 0);
    }

    #[tokio::test]
    async fn test_dom_change_does_not_fetch() {
        let stub = StubService::start("200 OK", "{}", 1).await;
        let mut bus = EventBus::new();
        PageIntegration::new(context(&stub.url)).register(&mut bus);
        let mut doc = repository_page("/o/r", None, None);

        bus.emit(PageEvent::DomChanged, &mut doc).await;
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_no_container_no_trigger() {
        let bus = seeded_bus("o/r").await;
        let mut doc = Document::new("/o/r");

        assert!(bus.emit(PageEvent::DomChanged, &mut doc).await.is_empty());
        assert!(bus.emit(PageEvent::TriggerActivated, &mut doc).await.is_empty());
        assert_eq!(doc.count_with_id(TRIGGER_ID), 0);
        assert_eq!(doc.count_with_id(PANEL_ID), 0);
    }

    #[tokio::test]
    async fn test_activation_renders_selected_node() {
        let bus = seeded_bus("o/r/main").await;
        let mut doc = repository_page("/o/r/blob/main/src/index.ts", None, None);

        bus.emit(PageEvent::DomChanged, &mut doc).await;
        let failures = bus.emit(PageEvent::TriggerActivated, &mut doc).await;
        assert!(failures.is_empty(), "{:?}", failures);

        let text = panel_text(&doc).unwrap();
        assert!(text.starts_with("Lines of Code: 40\n"));

        let link = doc.get_element_by_id(STATS_LINK_ID).unwrap();
        let href = doc.element(link).attribute("href").unwrap();
        assert!(href.starts_with("https://stats.test/o/r?branch=main&path="));
    }

    #[tokio::test]
    async fn test_activation_twice_renders_one_panel() {
        let bus = seeded_bus("o/r").await;
        let mut doc = repository_page("/o/r", None, None);

        bus.emit(PageEvent::DomChanged, &mut doc).await;
        bus.emit(PageEvent::TriggerActivated, &mut doc).await;
        bus.emit(PageEvent::TriggerActivated, &mut doc).await;
        assert_eq!(doc.count_with_id(PANEL_ID), 1);
        assert!(panel_text(&doc).unwrap().starts_with("Lines of Code: 100"));
    }

    #[tokio::test]
    async fn test_missing_path_is_contained() {
        let bus = seeded_bus("o/r/main").await;
        let mut doc = repository_page("/o/r/tree/main/docs", None, None);

        bus.emit(PageEvent::DomChanged, &mut doc).await;
        let failures = bus.emit(PageEvent::TriggerActivated, &mut doc).await;

        assert_eq!(failures.len(), 1);
        assert!(matches!(&failures[0], GhlocError::PathNotFound { path } if path == "docs"));
        assert_eq!(doc.count_with_id(TRIGGER_ID), 1);
        assert_eq!(doc.count_with_id(PANEL_ID), 0);
    }

    #[tokio::test]
    async fn test_non_repository_page_is_silent() {
        let bus = seeded_bus("o/r").await;
        let mut doc = repository_page("/settings/profile", None, None);

        bus.emit(PageEvent::DomChanged, &mut doc).await;
        let failures = bus.emit(PageEvent::TriggerActivated, &mut doc).await;
        assert!(failures.is_empty());
        assert_eq!(doc.count_with_id(PANEL_ID), 0);
    }

    #[tokio::test]
    async fn test_remote_error_is_contained() {
        let stub = StubService::start("500 Internal Server Error", "boom", 1).await;
        let mut bus = EventBus::new();
        PageIntegration::new(context(&stub.url)).register(&mut bus);
        let mut doc = repository_page("/o/r", None, None);

        bus.emit(PageEvent::DomChanged, &mut doc).await;
        let failures = bus.emit(PageEvent::TriggerActivated, &mut doc).await;

        assert_eq!(failures.len(), 1);
        assert!(matches!(
            &failures[0],
            GhlocError::Remote { status: 500, .. }
        ));
        assert_eq!(doc.count_with_id(PANEL_ID), 0);
    }

    #[tokio::test]
    async fn test_fetch_on_miss_then_cache() {
        let body = serde_json::to_string(&sample_tree()).unwrap();
        let stub = StubService::start("200 OK", &body, 1).await;
        let ctx = context(&stub.url);
        let mut bus = EventBus::new();
        PageIntegration::new(ctx.clone()).register(&mut bus);

        let mut first = repository_page("/o/r/tree/dev/src", None, None);
        bus.emit(PageEvent::DomChanged, &mut first).await;
        assert!(bus.emit(PageEvent::TriggerActivated, &mut first).await.is_empty());

        // A second page on the same branch is served from the cache
        let mut second = repository_page("/o/r/blob/dev/src/util.ts", None, None);
        bus.emit(PageEvent::DomChanged, &mut second).await;
        assert!(bus.emit(PageEvent::TriggerActivated, &mut second).await.is_empty());

        assert_eq!(stub.request_count(), 1);
        assert!(panel_text(&second).unwrap().starts_with("Lines of Code: 60"));
    }
}
