use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, Rgb, RgbImage};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Something that can turn text into a rendered QR symbol.
///
/// The panel only depends on this trait so the symbol library stays a
/// swappable collaborator. Implementations must be deterministic for a given
/// `(text, options)` pair.
pub(crate) trait QrEncoder: Send + Sync + 'static {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<EncodedImage, EncodingError>;
}

#[derive(Debug, Error)]
pub(crate) enum EncodingError {
    #[error("nothing to encode: the input is blank")]
    Blank,
    #[error("input of {len} bytes does not fit in any QR symbol version")]
    TooLong { len: usize },
    #[error("QR symbol construction failed: {0}")]
    Symbol(QrError),
    #[error("failed to write PNG: {0}")]
    Png(#[from] image::ImageError),
    #[error("the QR encoder panicked")]
    Panicked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) enum ErrorCorrection {
    #[serde(rename = "L")]
    Low,
    #[default]
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "Q")]
    Quartile,
    #[serde(rename = "H")]
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a #rrggbb colour")]
pub(crate) struct ColorParseError(String);

/// Opaque RGB colour written as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct HexColor([u8; 3]);

impl HexColor {
    pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    fn pixel(self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('#')
            .filter(|digits| digits.len() == 6 && digits.is_ascii())
            .ok_or_else(|| ColorParseError(trimmed.to_string()))?;

        let mut channels = [0u8; 3];
        for (index, channel) in channels.iter_mut().enumerate() {
            let pair = &digits[index * 2..index * 2 + 2];
            *channel =
                u8::from_str_radix(pair, 16).map_err(|_| ColorParseError(trimmed.to_string()))?;
        }
        Ok(Self(channels))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Largest canvas side the encoder will paint, in pixels.
pub(crate) const MAX_WIDTH: u32 = 4096;
/// Largest quiet zone the encoder will paint, in modules.
pub(crate) const MAX_MARGIN_MODULES: u32 = 16;

/// Rendering options handed to the encoder on every call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct EncodeOptions {
    /// Side length of the output image in pixels, at most [`MAX_WIDTH`].
    pub(crate) width: u32,
    /// Quiet zone around the symbol, in modules, at most [`MAX_MARGIN_MODULES`].
    pub(crate) margin_modules: u32,
    pub(crate) dark: HexColor,
    pub(crate) light: HexColor,
    pub(crate) error_correction: ErrorCorrection,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            width: 300,
            margin_modules: 2,
            dark: HexColor::rgb(0x1a, 0x1a, 0x1a),
            light: HexColor::rgb(0xff, 0xff, 0xff),
            error_correction: ErrorCorrection::Medium,
        }
    }
}

/// PNG bytes of a rendered symbol plus the matching `data:` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EncodedImage {
    png: Arc<[u8]>,
    data_uri: Arc<str>,
    side: u32,
}

impl EncodedImage {
    pub(crate) fn from_png(png: Vec<u8>, side: u32) -> Self {
        let encoded = STANDARD.encode(&png);
        Self {
            png: png.into(),
            data_uri: format!("data:image/png;base64,{encoded}").into(),
            side,
        }
    }

    pub(crate) fn png(&self) -> &[u8] {
        &self.png
    }

    pub(crate) fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub(crate) fn side(&self) -> u32 {
        self.side
    }
}

/// Production encoder backed by the `qrcode` crate.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct QrCodeEncoder;

impl QrEncoder for QrCodeEncoder {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<EncodedImage, EncodingError> {
        if text.trim().is_empty() {
            return Err(EncodingError::Blank);
        }

        let code = QrCode::with_error_correction_level(text.as_bytes(), options.error_correction.into())
            .map_err(|err| match err {
                QrError::DataTooLong => EncodingError::TooLong { len: text.len() },
                other => EncodingError::Symbol(other),
            })?;

        let raster = rasterize(&code, options);
        let side = raster.width();

        let mut png = Vec::new();
        raster.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        Ok(EncodedImage::from_png(png, side))
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Geometry {
    /// Canvas side in pixels.
    side: u32,
    /// Quiet zone in modules.
    margin: u32,
    /// Symbol plus quiet zone, in modules.
    total: u32,
}

impl Geometry {
    fn new(modules: usize, options: &EncodeOptions) -> Self {
        let margin = options.margin_modules.min(MAX_MARGIN_MODULES);
        let total = u32::try_from(modules)
            .unwrap_or(u32::MAX)
            .saturating_add(margin * 2);
        let side = options.width.min(MAX_WIDTH).max(total);
        Self { side, margin, total }
    }
}

/// Paint the module grid onto a square canvas of `options.width` pixels.
///
/// Modules get a fractional scale so the canvas hits the requested width
/// exactly; the canvas grows to one pixel per module when the width is too
/// small to hold the symbol. Width and margin are capped at [`MAX_WIDTH`] and
/// [`MAX_MARGIN_MODULES`].
fn rasterize(code: &QrCode, options: &EncodeOptions) -> RgbImage {
    let modules = code.width();
    let colors = code.to_colors();

    let Geometry { side, margin, total } = Geometry::new(modules, options);
    let scale = f64::from(side) / f64::from(total);
    let offset = (f64::from(margin) * scale).floor();

    let dark = options.dark.pixel();
    let mut canvas = RgbImage::from_pixel(side, side, options.light.pixel());

    for y in 0..side {
        let py = f64::from(y) - offset;
        if py < 0.0 {
            continue;
        }
        let row = (py / scale).floor() as usize;
        if row >= modules {
            continue;
        }

        for x in 0..side {
            let px = f64::from(x) - offset;
            if px < 0.0 {
                continue;
            }
            let col = (px / scale).floor() as usize;
            if col >= modules {
                continue;
            }

            if colors[row * modules + col] == Color::Dark {
                canvas.put_pixel(x, y, dark);
            }
        }
    }

    canvas
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Decode a PNG produced by the encoder back into its text payload.
    pub(crate) fn decode_png(png: &[u8]) -> String {
        let luma = image::load_from_memory(png)
            .expect("encoder output should be a readable PNG")
            .to_luma8();
        let (w, h) = luma.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            w as usize,
            h as usize,
            |x, y| luma.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        let grid = grids.first().expect("a QR grid should be detected");
        let (_, content) = grid.decode().expect("QR grid should decode");
        content
    }

    #[test]
    fn encodes_url_that_decodes_back() {
        let image = QrCodeEncoder
            .encode("https://example.com", &EncodeOptions::default())
            .expect("url should encode");

        assert!(image.data_uri().starts_with("data:image/png;base64,"));
        assert_eq!(decode_png(image.png()), "https://example.com");
    }

    #[test]
    fn output_is_exactly_the_requested_width_and_uses_configured_colours() {
        let image = QrCodeEncoder
            .encode("hello", &EncodeOptions::default())
            .expect("short text should encode");
        let decoded = image::load_from_memory(image.png())
            .expect("png should load")
            .to_rgb8();

        assert_eq!(image.side(), 300);
        assert_eq!(decoded.dimensions(), (300, 300));
        assert_eq!(decoded.get_pixel(0, 0).0, [0xff, 0xff, 0xff]);
        assert!(
            decoded.pixels().any(|pixel| pixel.0 == [0x1a, 0x1a, 0x1a]),
            "dark modules should use #1a1a1a"
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let options = EncodeOptions::default();
        let first = QrCodeEncoder.encode("same input", &options).expect("encode");
        let second = QrCodeEncoder.encode("same input", &options).expect("encode");

        assert_eq!(first.png(), second.png());
        assert_eq!(first.data_uri(), second.data_uri());
    }

    #[test]
    fn canvas_grows_when_width_cannot_hold_the_symbol() {
        let options = EncodeOptions {
            width: 10,
            ..EncodeOptions::default()
        };
        let image = QrCodeEncoder.encode("tiny", &options).expect("encode");

        // version 1 is 21 modules plus two modules of margin on each side
        assert_eq!(image.side(), 25);
    }

    #[test]
    fn oversized_margin_and_width_are_capped() {
        let options: EncodeOptions =
            serde_json::from_str(r#"{ "width": 100000, "margin_modules": 4294967295 }"#)
                .expect("options should parse");

        assert_eq!(
            Geometry::new(21, &options),
            Geometry {
                side: MAX_WIDTH,
                margin: MAX_MARGIN_MODULES,
                total: 21 + 2 * MAX_MARGIN_MODULES,
            }
        );

        let small = EncodeOptions {
            width: 300,
            ..options
        };
        let image = QrCodeEncoder.encode("hi", &small).expect("huge margin must not panic");
        assert_eq!(image.side(), 300);
        assert_eq!(decode_png(image.png()), "hi");
    }

    #[test]
    fn rejects_text_beyond_symbol_capacity() {
        let oversized = "x".repeat(4_000);
        let err = QrCodeEncoder
            .encode(&oversized, &EncodeOptions::default())
            .expect_err("4000 bytes cannot fit a QR symbol");

        assert!(matches!(err, EncodingError::TooLong { len: 4_000 }));
    }

    #[test]
    fn rejects_blank_text() {
        let err = QrCodeEncoder
            .encode("  \t ", &EncodeOptions::default())
            .expect_err("blank text must not be encoded");
        assert!(matches!(err, EncodingError::Blank));
    }

    #[test]
    fn hex_colors_parse_and_render() {
        let color: HexColor = "#1A1a1a".parse().expect("valid colour");
        assert_eq!(color, HexColor::rgb(0x1a, 0x1a, 0x1a));
        assert_eq!(color.to_string(), "#1a1a1a");

        assert!("1a1a1a".parse::<HexColor>().is_err());
        assert!("#12345".parse::<HexColor>().is_err());
        assert!("#gggggg".parse::<HexColor>().is_err());
    }

    #[test]
    fn options_deserialize_with_defaults_for_missing_fields() {
        let options: EncodeOptions =
            serde_json::from_str(r##"{ "dark": "#000000", "error_correction": "H" }"##)
                .expect("partial options should parse");

        assert_eq!(options.dark, HexColor::rgb(0, 0, 0));
        assert_eq!(options.error_correction, ErrorCorrection::High);
        assert_eq!(options.width, 300);
        assert_eq!(options.margin_modules, 2);
    }
}
