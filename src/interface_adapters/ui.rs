use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

use crate::domain::{Navigator, Notification, NotificationKind, Notifier};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Toast {
    expires_at: Instant,
    notification: Notification,
}

// In-memory toast area. Notifications stay visible until their duration elapses;
// nothing waits on them.
#[derive(Clone, Default)]
pub struct ToastTray {
    active: Arc<Mutex<Vec<Toast>>>,
    history: Arc<Mutex<Vec<Notification>>>,
}

impl ToastTray {
    pub fn new() -> Self {
        Self::default()
    }

    // Currently visible notifications, oldest first. Expired ones are dropped.
    pub fn visible(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut active = lock(&self.active);
        active.retain(|toast| toast.expires_at > now);
        active
            .iter()
            .map(|toast| toast.notification.clone())
            .collect()
    }

    #[cfg(test)]
    fn active_len(&self) -> usize {
        lock(&self.active).len()
    }

    // Every notification ever shown, including dismissed ones.
    pub fn history(&self) -> Vec<Notification> {
        lock(&self.history).clone()
    }
}

impl Notifier for ToastTray {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!(title = %notification.title, "toast shown.")
            }
            NotificationKind::Error => {
                tracing::warn!(title = %notification.title, message = %notification.message, "toast shown.")
            }
        }

        lock(&self.history).push(notification.clone());

        let now = Instant::now();
        let mut active = lock(&self.active);
        active.retain(|toast| toast.expires_at > now);
        active.push(Toast {
            expires_at: now + notification.duration,
            notification,
        });
    }
}

// Router stand-in that keeps the pushed routes.
#[derive(Clone)]
pub struct RouteHistory {
    entries: Arc<Mutex<Vec<String>>>,
}

impl RouteHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(vec![initial.into()])),
        }
    }

    pub fn current(&self) -> String {
        lock(&self.entries).last().cloned().unwrap_or_default()
    }

    pub fn entries(&self) -> Vec<String> {
        lock(&self.entries).clone()
    }
}

impl Navigator for RouteHistory {
    fn navigate_to(&self, path: &str) {
        tracing::debug!(path, "navigating.");
        lock(&self.entries).push(path.to_string());
    }
}
