use std::sync::Arc;

use dioxus::prelude::{WritableExt, spawn};
use dioxus::signals::Signal;
use tokio::time::sleep;
use tracing::debug;

use super::encoder::QrCodeEncoder;
use super::notify::{Notification, TOAST_DURATION, ToastQueue};
use super::service::{PanelHandle, panel_service};
use super::settings::PanelSettings;
use super::state::PanelState;

/// Start the panel service on the UI runtime and mirror its snapshots and
/// notifications into signals.
pub(crate) fn start_panel(
    settings: &PanelSettings,
    mut snapshot: Signal<PanelState>,
    toasts: Signal<ToastQueue>,
) -> PanelHandle {
    let (service, handle, mut notifications) =
        panel_service(Arc::new(QrCodeEncoder), settings);
    spawn(service.run());

    let mut snapshots = handle.subscribe();
    spawn(async move {
        while snapshots.changed().await.is_ok() {
            let next = snapshots.borrow_and_update().clone();
            snapshot.set(next);
        }
        debug!("panel snapshot stream closed");
    });

    spawn(async move {
        while let Some(notification) = notifications.recv().await {
            show_toast(toasts, notification);
        }
    });

    handle
}

/// Push a toast and schedule its dismissal.
pub(crate) fn show_toast(mut toasts: Signal<ToastQueue>, notification: Notification) {
    let id = toasts.write().push(notification);
    spawn(async move {
        sleep(TOAST_DURATION).await;
        toasts.write().dismiss(id);
    });
}
