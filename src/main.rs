fn main() -> anyhow::Result<()> {
    qr_panel::launch_desktop()
}
