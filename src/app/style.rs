/// Stylesheet for the desktop window, embedded at compile time.
pub(crate) static STYLE: &str = include_str!("../../assets/app.css");
