use dioxus::prelude::*;

use super::notify::ToastQueue;
use super::view::{Stats, Summary};

pub(crate) const QR_ICON: &[&str] = &[
    "M3 3h5v5H3z",
    "M16 3h5v5h-5z",
    "M3 16h5v5H3z",
    "M21 16h-3a2 2 0 0 0-2 2v3",
    "M21 21v.01",
    "M12 7v3a2 2 0 0 1-2 2H7",
    "M3 12h.01",
    "M12 3h.01",
    "M12 16v.01",
    "M16 12h1",
    "M21 12v.01",
    "M12 21v-1",
];
pub(crate) const COPY_ICON: &[&str] = &[
    "M10 8h10a2 2 0 0 1 2 2v10a2 2 0 0 1-2 2H10a2 2 0 0 1-2-2V10a2 2 0 0 1 2-2z",
    "M4 16c-1.1 0-2-.9-2-2V4c0-1.1.9-2 2-2h10c1.1 0 2 .9 2 2",
];
pub(crate) const DOWNLOAD_ICON: &[&str] = &[
    "M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4",
    "M7 10l5 5 5-5",
    "M12 15V3",
];
const CALENDAR_ICON: &[&str] = &[
    "M8 2v4",
    "M16 2v4",
    "M3 10h18",
    "M5 4h14a2 2 0 0 1 2 2v14a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2z",
];
const CLOCK_ICON: &[&str] = &["M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20z", "M12 6v6l4 2"];

/// Stroke icon on a 24×24 grid.
#[component]
pub(crate) fn Icon(paths: &'static [&'static str], class: &'static str) -> Element {
    rsx! {
        span { class: class, aria_hidden: "true",
            svg {
                view_box: "0 0 24 24",
                fill: "none",
                stroke: "currentColor",
                stroke_width: "2",
                for d in paths {
                    path {
                        d: *d,
                        stroke_linecap: "round",
                        stroke_linejoin: "round",
                    }
                }
            }
        }
    }
}

#[component]
pub(crate) fn GenerationSummary(summary: Summary) -> Element {
    rsx! {
        div { class: "summary",
            div { class: "summary-row",
                Icon { paths: CALENDAR_ICON, class: "summary-icon" }
                span { class: "summary-label", "Generated on:" }
                span { class: "summary-value", "{summary.date}" }
            }
            div { class: "summary-row",
                Icon { paths: CLOCK_ICON, class: "summary-icon" }
                span { class: "summary-label", "Time:" }
                span { class: "summary-value mono", "{summary.time}" }
            }
        }
    }
}

#[component]
pub(crate) fn EmptyState() -> Element {
    rsx! {
        div { class: "empty-state",
            Icon { paths: QR_ICON, class: "empty-icon" }
            p { class: "empty-title", "Enter text to generate QR code" }
            p { class: "empty-hint", "Your QR code will appear here" }
        }
    }
}

#[component]
pub(crate) fn StatsPanel(stats: Stats) -> Element {
    rsx! {
        section { class: "stats",
            div { class: "stat",
                span { class: "stat-value", "{stats.characters}" }
                span { class: "stat-label", "Characters" }
            }
            div { class: "stat",
                span { class: "stat-value mono", "{stats.generated_at}" }
                span { class: "stat-label", "Generated At" }
            }
            div { class: "stat",
                span { class: "stat-value", "{stats.format}" }
                span { class: "stat-label", "Format" }
            }
        }
    }
}

/// Transient notifications, newest last. Clicking a toast dismisses it early.
#[component]
pub(crate) fn ToastStack(toasts: Signal<ToastQueue>) -> Element {
    let mut queue = toasts;
    if queue.read().is_empty() {
        return rsx! {};
    }
    let entries: Vec<_> = queue.read().iter().cloned().collect();

    rsx! {
        div { class: "toast-stack", role: "status", aria_live: "polite",
            for toast in entries {
                div {
                    key: "{toast.id}",
                    class: toast.notification.variant.css_class(),
                    onclick: move |_| {
                        queue.write().dismiss(toast.id);
                    },
                    p { class: "toast-title", "{toast.notification.title}" }
                    p { class: "toast-description", "{toast.notification.description}" }
                }
            }
        }
    }
}
