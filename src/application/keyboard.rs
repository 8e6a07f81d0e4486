//! Process-wide key event fan-out. Views subscribe while mounted; the returned
//! [`KeyListener`] deregisters on drop, so a torn-down view never sees keys.

use std::sync::{Arc, Mutex, Weak};

use tracing::trace;

use crate::domain::gallery::Key;
use crate::infra::lock::mutex_lock;

type Handler = Arc<dyn Fn(Key) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

#[derive(Clone, Default)]
pub struct KeyboardDispatcher {
    registry: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for KeyboardDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardDispatcher")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl KeyboardDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscribe<F>(&self, handler: F) -> KeyListener
    where
        F: Fn(Key) + Send + Sync + 'static,
    {
        let mut registry = mutex_lock(&self.registry, "application::keyboard", "subscribe");
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));
        KeyListener {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `key` to every live listener. Returns how many were called.
    pub fn dispatch(&self, key: Key) -> usize {
        // Handlers run outside the lock so they may subscribe or drop listeners.
        let handlers: Vec<Handler> =
            mutex_lock(&self.registry, "application::keyboard", "dispatch")
                .handlers
                .iter()
                .map(|(_, handler)| Arc::clone(handler))
                .collect();
        trace!(?key, listeners = handlers.len(), "dispatching key");
        for handler in &handlers {
            handler(key);
        }
        handlers.len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        mutex_lock(&self.registry, "application::keyboard", "listener_count")
            .handlers
            .len()
    }
}

/// Registration handle returned by [`KeyboardDispatcher::subscribe`].
#[derive(Debug)]
pub struct KeyListener {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl KeyListener {
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            mutex_lock(&registry, "application::keyboard", "unsubscribe")
                .handlers
                .retain(|(id, _)| *id != self.id);
        }
    }
}
