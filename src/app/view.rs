use super::format::{format_date, format_time};
use super::state::PanelState;

pub(crate) const OUTPUT_FORMAT: &str = "PNG";

/// "Generated on / Time" block under the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) date: String,
    pub(crate) time: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Stats {
    /// Length of the field in UTF-16 code units, so astral characters count twice.
    pub(crate) characters: usize,
    pub(crate) generated_at: String,
    pub(crate) format: &'static str,
}

/// Everything the window needs to render, derived from the live field text
/// and the latest panel snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PanelView {
    pub(crate) show_copy: bool,
    pub(crate) image_src: Option<String>,
    pub(crate) summary: Option<Summary>,
    pub(crate) stats: Option<Stats>,
}

/// `text` is the field as typed, which may be ahead of `snapshot`.
pub(crate) fn panel_view(text: &str, snapshot: &PanelState) -> PanelView {
    let result = snapshot.result();

    PanelView {
        show_copy: !text.is_empty(),
        image_src: result.map(|result| result.image.data_uri().to_string()),
        summary: result.map(|result| Summary {
            date: format_date(result.generated_at),
            time: format_time(result.generated_at),
        }),
        stats: result.map(|result| Stats {
            characters: text.encode_utf16().count(),
            generated_at: format_time(result.generated_at),
            format: OUTPUT_FORMAT,
        }),
    }
}
