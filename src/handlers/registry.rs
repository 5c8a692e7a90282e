use std::sync::Arc;

use super::maps::MapsHandler;
use super::traits::EmbedHandler;

/// Registry mapping frame source URLs to the handler that recognizes them.
///
/// Resolution is first-match-wins in registration order, not best-match:
/// at most one handler is active per URL, and handlers are expected to
/// keep their `can_handle` predicates mutually exclusive or be registered
/// in a deliberate order.
///
/// The registry is built once at process start (`with_defaults`) and
/// shared by `Arc`; tests construct fresh instances instead of relying on
/// ambient global state.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn EmbedHandler>>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler. Re-registering an id replaces the previous
    /// handler in its original position, so resolution order is stable.
    pub fn register(&mut self, handler: Arc<dyn EmbedHandler>) {
        match self.handlers.iter().position(|h| h.id() == handler.id()) {
            Some(index) => self.handlers[index] = handler,
            None => self.handlers.push(handler),
        }
    }

    /// First registered handler whose `can_handle` accepts the URL
    pub fn resolve(&self, src: &str) -> Option<Arc<dyn EmbedHandler>> {
        self.handlers
            .iter()
            .find(|handler| handler.can_handle(src))
            .cloned()
    }

    pub fn all(&self) -> &[Arc<dyn EmbedHandler>] {
        &self.handlers
    }

    /// Remove a handler by id. No-op when absent.
    pub fn unregister(&mut self, handler_id: &str) {
        self.handlers.retain(|handler| handler.id() != handler_id);
    }

    /// Create a registry with the built-in handlers registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MapsHandler));
        registry
    }
}
