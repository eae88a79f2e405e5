//! User-facing notifications.
//!
//! The [`NotificationBus`] is the fire-and-forget sink used by the favorites
//! store and the search controller. It accepts notifications at any time:
//! until the UI is ready they are buffered, and [`NotificationBus::mark_ready`]
//! flushes the backlog exactly once, in emission order. Once ready, each
//! notification is shown as a [`Toast`] on a small bounded stack.

use std::collections::VecDeque;
use std::fmt;

/// Maximum number of toasts visible at once.
pub const TOAST_CAPACITY: usize = 4;

/// Number of shown notifications remembered by [`NotificationBus::history`].
pub const HISTORY_CAPACITY: usize = 64;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    /// Glyph shown in front of the toast title.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
            Self::Info => "ℹ",
            Self::Warning => "!",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        };
        f.write_str(name)
    }
}

/// A notification as emitted by a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
}

impl Notification {
    /// Creates a notification.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message,
        }
    }

    pub fn success(title: impl Into<String>, message: Option<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: Option<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }

    pub fn info(title: impl Into<String>, message: Option<String>) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: Option<String>) -> Self {
        Self::new(NotificationKind::Warning, title, message)
    }
}

/// A notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

/// Buffered notification sink with a bounded toast stack.
#[derive(Debug)]
pub struct NotificationBus {
    ready: bool,
    backlog: Vec<Notification>,
    toasts: VecDeque<Toast>,
    shown: Vec<u64>,
    history: VecDeque<Notification>,
    next_id: u64,
    capacity: usize,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus {
    /// Creates a bus that buffers until [`mark_ready`](Self::mark_ready).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(TOAST_CAPACITY)
    }

    /// Creates a bus with a custom toast stack size (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ready: false,
            backlog: Vec::new(),
            toasts: VecDeque::new(),
            shown: Vec::new(),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            next_id: 1,
            capacity: capacity.max(1),
        }
    }

    /// Emits a notification built from its parts.
    pub fn emit(&mut self, kind: NotificationKind, title: impl Into<String>, message: Option<String>) {
        self.emit_notification(Notification::new(kind, title, message));
    }

    /// Emits a notification, buffering it while the bus is not ready.
    pub fn emit_notification(&mut self, notification: Notification) {
        if self.ready {
            self.show(notification);
        } else {
            tracing::trace!(title = %notification.title, "buffering notification until ready");
            self.backlog.push(notification);
        }
    }

    /// Marks the UI surface as mounted and flushes the backlog in order.
    ///
    /// Subsequent calls are no-ops.
    pub fn mark_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;

        let backlog = std::mem::take(&mut self.backlog);
        tracing::debug!(buffered = backlog.len(), "notification bus ready");
        for notification in backlog {
            self.show(notification);
        }
    }

    fn show(&mut self, notification: Notification) {
        tracing::debug!(kind = %notification.kind, title = %notification.title, "notification");

        let id = self.next_id;
        self.next_id += 1;

        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(notification.clone());
        self.toasts.push_back(Toast { id, notification });
        while self.toasts.len() > self.capacity {
            self.toasts.pop_front();
        }
        self.shown.push(id);
    }

    /// Removes the toast with `id`. Returns `true` if it was visible.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        before != self.toasts.len()
    }

    /// Ids of toasts shown since the last call, for scheduling dismissal.
    pub fn take_shown(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.shown)
    }

    /// Visible toasts, oldest first.
    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// The most recent shown notifications, oldest first, up to
    /// [`HISTORY_CAPACITY`].
    #[must_use]
    pub const fn history(&self) -> &VecDeque<Notification> {
        &self.history
    }

    /// Notifications waiting for [`mark_ready`](Self::mark_ready).
    #[must_use]
    pub fn pending(&self) -> &[Notification] {
        &self.backlog
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }
}
