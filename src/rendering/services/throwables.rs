//! Throwable rendering engine.
//!
//! Same dispatch as value renderers, applied to execution errors: the first
//! accepting renderer in priority order replaces the displayed error value.

use std::ptr;
use std::sync::Arc;

use super::registry::{Prioritized, PriorityRegistry};
use crate::rendering::domain::{ExecutionError, Priority, ThrowableRenderer, Value};

/// A registered throwable renderer with its priority.
pub type ThrowableRendererWithPriority = Prioritized<Arc<dyn ThrowableRenderer>>;

/// Ordered registry of throwable renderers.
#[derive(Debug, Default)]
pub struct ThrowableRenderersProcessor {
    registry: PriorityRegistry<Arc<dyn ThrowableRenderer>>,
}

impl ThrowableRenderersProcessor {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `renderer`.
    pub fn register(&self, renderer: Arc<dyn ThrowableRenderer>, priority: Priority) {
        tracing::debug!(%renderer, %priority, "registering throwable renderer");
        self.registry.register(renderer, priority);
    }

    /// Removes the first registration of `renderer`.
    ///
    /// Returns `false` when it was not registered.
    #[must_use = "unregistering an absent renderer is a no-op"]
    pub fn unregister(&self, renderer: &dyn ThrowableRenderer) -> bool {
        self.registry.remove_first(|registered| {
            ptr::addr_eq(Arc::as_ptr(registered), ptr::from_ref(renderer))
        })
    }

    /// Returns the renderers in dispatch order.
    #[must_use]
    pub fn registered_renderers(&self) -> Vec<ThrowableRendererWithPriority> {
        self.registry.snapshot().to_vec()
    }

    /// Renders `error` with the first accepting renderer.
    ///
    /// Returns `None` when no renderer accepts the error or the accepting
    /// renderer fails; callers then show the error's own message.
    #[must_use]
    pub fn render_throwable(&self, error: &ExecutionError) -> Option<Value> {
        let renderers = self.registry.snapshot();
        let entry = renderers.iter().find(|entry| entry.item.accepts(error))?;
        entry
            .item
            .render(error)
            .inspect_err(|failure| {
                tracing::warn!(
                    renderer = %entry.item,
                    error = %failure,
                    "throwable renderer failed on an error it accepted"
                );
            })
            .ok()
    }
}
