use std::collections::VecDeque;
use std::time::Duration;

/// How long a toast stays on screen unless dismissed.
pub(crate) const TOAST_DURATION: Duration = Duration::from_secs(4);

const TOAST_LIMIT: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Variant {
    #[default]
    Normal,
    Destructive,
}

impl Variant {
    pub(crate) fn css_class(self) -> &'static str {
        match self {
            Variant::Normal => "toast",
            Variant::Destructive => "toast destructive",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notification {
    pub(crate) title: &'static str,
    pub(crate) description: String,
    pub(crate) variant: Variant,
}

impl Notification {
    pub(crate) fn copied() -> Self {
        Self {
            title: "Copied!",
            description: String::from("Text copied to clipboard"),
            variant: Variant::Normal,
        }
    }

    pub(crate) fn downloaded() -> Self {
        Self {
            title: "Downloaded!",
            description: String::from("QR code saved to your device"),
            variant: Variant::Normal,
        }
    }

    pub(crate) fn generation_failed() -> Self {
        Self {
            title: "Error",
            description: String::from("Failed to generate QR code"),
            variant: Variant::Destructive,
        }
    }

    pub(crate) fn download_failed(reason: impl std::fmt::Display) -> Self {
        Self {
            title: "Download failed",
            description: format!("Could not save the QR code: {reason}"),
            variant: Variant::Destructive,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub(crate) id: u64,
    pub(crate) notification: Notification,
}

/// Toasts currently on screen, newest last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ToastQueue {
    next_id: u64,
    limit: usize,
    entries: VecDeque<Toast>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_limit(TOAST_LIMIT)
    }
}

impl ToastQueue {
    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            next_id: 1,
            limit: limit.max(1),
            entries: VecDeque::with_capacity(limit),
        }
    }

    /// Show a notification, evicting the oldest toast when full. Returns its id.
    pub(crate) fn push(&mut self, notification: Notification) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(Toast { id, notification });
        id
    }

    pub(crate) fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|toast| toast.id != id);
        self.entries.len() != before
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.entries.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
