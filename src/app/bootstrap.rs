use anyhow::Result;
use dioxus::LaunchBuilder;
use dioxus_desktop::tao::dpi::LogicalSize;
use dioxus_desktop::{Config, WindowBuilder};
use tracing::info;

use super::format::init_local_offset;
use super::logs::init_logging;

pub fn launch_desktop() -> Result<()> {
    init_logging()?;
    // Must run before the runtime spawns any threads.
    let offset = init_local_offset();
    info!(%offset, "starting QR code generator");

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title("QR Code Generator")
                    .with_inner_size(LogicalSize::new(1040.0, 860.0)),
            ),
        )
        .launch(super::App);

    Ok(())
}
