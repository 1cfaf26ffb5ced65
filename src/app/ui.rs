use dioxus::prelude::*;
use time::OffsetDateTime;

use super::actions::{SystemClipboard, copy_text, download_image, image_saver};
use super::components::{
    COPY_ICON, DOWNLOAD_ICON, EmptyState, GenerationSummary, Icon, QR_ICON, StatsPanel, ToastStack,
};
use super::notify::ToastQueue;
use super::settings::PanelSettings;
use super::state::PanelState;
use super::style::STYLE;
use super::tasks::{show_toast, start_panel};
use super::view::panel_view;

#[component]
pub fn App() -> Element {
    let settings = use_hook(PanelSettings::load_or_default);
    let mut text = use_signal(String::new);
    let snapshot = use_signal(PanelState::default);
    let toasts = use_signal(ToastQueue::default);
    let mut clipboard = use_signal(SystemClipboard::default);
    let panel = use_hook(|| start_panel(&settings, snapshot, toasts));
    let saver = use_hook(|| image_saver(&settings));

    let text_value = text.read().clone();
    let view = panel_view(&text_value, &snapshot.read());

    let on_input = move |evt: FormEvent| {
        let value = evt.value();
        text.set(value.clone());
        panel.edit(value);
    };

    let on_copy = move |_: MouseEvent| {
        let current = text.read().clone();
        if let Some(notification) = copy_text(&mut *clipboard.write(), &current) {
            show_toast(toasts, notification);
        }
    };

    let on_download = move |_: MouseEvent| {
        let clicked_at = OffsetDateTime::now_utc();
        let result = snapshot.read().result().cloned();
        if let Some(notification) = download_image(&*saver, result.as_ref(), clicked_at) {
            show_toast(toasts, notification);
        }
    };

    rsx! {
        style { "{STYLE}" }
        main { class: "app",
            header { class: "hero",
                Icon { paths: QR_ICON, class: "hero-icon" }
                h1 { "QR Code Generator" }
                p { class: "tagline", "Generate QR codes instantly with timestamp tracking" }
            }

            div { class: "panels",
                section { class: "card",
                    h2 { "Enter Your Text" }
                    div { class: "input-row",
                        input {
                            r#type: "text",
                            class: "text-input",
                            value: "{text_value}",
                            placeholder: "Enter text, URL, or any content...",
                            autofocus: true,
                            oninput: on_input,
                        }
                        if view.show_copy {
                            button {
                                class: "icon-button",
                                title: "Copy text",
                                aria_label: "Copy text",
                                onclick: on_copy,
                                Icon { paths: COPY_ICON, class: "button-icon" }
                            }
                        }
                    }
                    if let Some(summary) = view.summary.clone() {
                        GenerationSummary { summary }
                    }
                }

                section { class: "card output",
                    h2 { "Generated QR Code" }
                    if let Some(src) = view.image_src.clone() {
                        div { class: "qr-frame",
                            img {
                                src: "{src}",
                                alt: "Generated QR Code",
                                width: "256",
                                height: "256",
                            }
                        }
                        button {
                            class: "action",
                            onclick: on_download,
                            Icon { paths: DOWNLOAD_ICON, class: "button-icon" }
                            "Download QR Code"
                        }
                    } else {
                        EmptyState {}
                    }
                }
            }

            if let Some(stats) = view.stats.clone() {
                StatsPanel { stats }
            }

            ToastStack { toasts }
        }
    }
}
