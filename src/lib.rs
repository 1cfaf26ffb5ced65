use mimalloc::MiMalloc;

pub mod app;

pub use app::{App, launch_desktop};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
