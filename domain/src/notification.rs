use shared::NotificationKind;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

/// A toast currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    /// How long the toast stays up before it removes itself
    pub auto_dismiss: Duration,
}

/// Holds at most one visible toast.
///
/// Showing a new toast replaces the current one. Dismissal is keyed by id, so
/// the auto-dismiss timer of a replaced toast cannot remove its successor.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationCenter {
    current: Option<Notification>,
    next_id: u64,
    auto_dismiss: Duration,
}

impl NotificationCenter {
    pub fn new(auto_dismiss: Duration) -> Self {
        Self {
            current: None,
            next_id: 1,
            auto_dismiss,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.current = Some(Notification {
            id,
            message: message.into(),
            kind,
            auto_dismiss: self.auto_dismiss,
        });
        id
    }

    /// Remove the toast if it is still the one identified by `id`
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Number of toasts in the document; never more than one
    pub fn visible_count(&self) -> usize {
        usize::from(self.current.is_some())
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
