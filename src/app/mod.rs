mod actions;
mod bootstrap;
mod components;
mod debounce;
mod encoder;
mod format;
mod generator;
mod logs;
mod notify;
mod service;
mod settings;
mod state;
mod style;
mod tasks;
mod ui;
mod view;

pub use bootstrap::launch_desktop;
pub use ui::App;
