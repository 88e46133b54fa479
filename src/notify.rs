use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::types::{Notification, NotificationKind};
use crate::view::View;

/// Transient banners that remove themselves after `ttl`.
pub struct Notifier {
    view: Arc<dyn View>,
    ttl: Duration,
    next_id: AtomicU64,
    active: Arc<Mutex<HashSet<u64>>>,
}

impl Notifier {
    pub fn new(view: Arc<dyn View>, ttl: Duration) -> Self {
        Self {
            view,
            ttl,
            next_id: AtomicU64::new(1),
            active: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn success(&self, message: &str) -> u64 {
        self.notify(message, NotificationKind::Success)
    }

    pub fn error(&self, message: &str) -> u64 {
        self.notify(message, NotificationKind::Error)
    }

    /// Show a banner and schedule its expiry. Must run inside a tokio runtime.
    pub fn notify(&self, message: &str, kind: NotificationKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.active).insert(id);

        self.view.show_notification(&Notification {
            id,
            kind,
            message: message.to_string(),
        });
        self.view.present();

        let view = Arc::clone(&self.view);
        let active = Arc::clone(&self.active);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if remove(&active, view.as_ref(), id) {
                tracing::trace!(id, "notification expired");
            }
        });

        id
    }

    /// Manual dismissal. Returns false when the banner is already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        remove(&self.active, self.view.as_ref(), id)
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        lock(&self.active).len()
    }
}

fn lock(active: &Mutex<HashSet<u64>>) -> std::sync::MutexGuard<'_, HashSet<u64>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}

fn remove(active: &Mutex<HashSet<u64>>, view: &dyn View, id: u64) -> bool {
    if !lock(active).remove(&id) {
        return false;
    }
    view.remove_notification(id);
    view.present();
    true
}
