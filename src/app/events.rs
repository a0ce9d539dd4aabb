use std::sync::{Arc, RwLock};

use anyhow::Result;
use uuid::Uuid;

use crate::domain::notification::Notification;

/// Lifecycle announcement. Deletion carries only the id; the record is gone.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    Created(Notification),
    Updated(Notification),
    Deleted(Uuid),
}

impl NotificationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::Created(_) => "created",
            NotificationEvent::Updated(_) => "updated",
            NotificationEvent::Deleted(_) => "deleted",
        }
    }
}

pub trait NotificationListener: Send + Sync {
    fn name(&self) -> &str;

    fn handle(&self, event: &NotificationEvent) -> Result<()>;
}

/// In-process publish/subscribe registry, passed by reference to the
/// lifecycle service at construction. Dispatch is synchronous and in
/// registration order; a failing listener is logged and skipped so it
/// neither rolls back the triggering mutation nor starves later listeners.
#[derive(Default)]
pub struct EventRegistry {
    listeners: RwLock<Vec<Arc<dyn NotificationListener>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn NotificationListener>) {
        self.listeners
            .write()
            .expect("listener lock poisoned")
            .push(listener);
    }

    pub fn publish(&self, event: &NotificationEvent) {
        let listeners = self.listeners.read().expect("listener lock poisoned");
        for listener in listeners.iter() {
            if let Err(err) = listener.handle(event) {
                tracing::warn!(
                    listener = listener.name(),
                    event = event.kind(),
                    error = %err,
                    "notification listener failed"
                );
            }
        }
    }
}

/// Default listener: traces every lifecycle event.
pub struct LogListener;

impl NotificationListener for LogListener {
    fn name(&self) -> &str {
        "log"
    }

    fn handle(&self, event: &NotificationEvent) -> Result<()> {
        match event {
            NotificationEvent::Created(notification) => {
                tracing::info!(id = %notification.id, user_id = %notification.user_id, "notification created");
            }
            NotificationEvent::Updated(notification) => {
                tracing::info!(id = %notification.id, user_id = %notification.user_id, "notification updated");
            }
            NotificationEvent::Deleted(id) => {
                tracing::info!(%id, "notification deleted");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recorder {
        name: String,
        order: Arc<Mutex<Vec<String>>>,
    }

    impl NotificationListener for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn handle(&self, _event: &NotificationEvent) -> Result<()> {
            self.order.lock().unwrap().push(self.name.clone());
            Ok(())
        }
    }

    struct Exploder {
        calls: AtomicUsize,
    }

    impl NotificationListener for Exploder {
        fn name(&self) -> &str {
            "exploder"
        }

        fn handle(&self, _event: &NotificationEvent) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("listener blew up")
        }
    }

    #[test]
    fn dispatches_in_registration_order() {
        let registry = EventRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            registry.register(Arc::new(Recorder {
                name: name.to_string(),
                order: order.clone(),
            }));
        }

        registry.publish(&NotificationEvent::Deleted(Uuid::new_v4()));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn failing_listener_does_not_block_later_ones() {
        let registry = EventRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let exploder = Arc::new(Exploder {
            calls: AtomicUsize::new(0),
        });

        registry.register(exploder.clone());
        registry.register(Arc::new(Recorder {
            name: "survivor".to_string(),
            order: order.clone(),
        }));

        registry.publish(&NotificationEvent::Deleted(Uuid::new_v4()));

        assert_eq!(exploder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*order.lock().unwrap(), vec!["survivor"]);
    }
}
