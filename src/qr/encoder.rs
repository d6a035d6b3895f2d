//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::{ErrorCorrectionLevel, RenderStyle};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use qrcode::{Color, QrCode};
use std::fmt::Write as _;

/// QR code encoder producing raster and vector renderings of one symbol
#[derive(Debug, Clone)]
pub struct QrEncoder {
    level: ErrorCorrectionLevel,
    style: RenderStyle,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (level Q, black on white, 4 module margin)
    pub fn new() -> Self {
        Self {
            level: ErrorCorrectionLevel::Q,
            style: RenderStyle::default(),
        }
    }

    /// Create a new QR encoder with a specific error correction level
    pub fn with_level(level: ErrorCorrectionLevel) -> Self {
        Self {
            level,
            ..Self::new()
        }
    }

    /// Replace the render style
    pub fn style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Error correction level used by [`QrEncoder::encode`]
    pub fn level(&self) -> ErrorCorrectionLevel {
        self.level
    }

    /// Build the QR symbol for `data`.
    ///
    /// Fails with [`Error::EncodingFailure`] when the data exceeds the capacity of
    /// the largest symbol at the configured level.
    pub fn encode(&self, data: &str) -> Result<QrCode> {
        QrCode::with_error_correction_level(data.as_bytes(), self.level.into()).map_err(|e| {
            Error::EncodingFailure {
                length: data.len(),
                level: self.level,
                reason: e.to_string(),
            }
        })
    }

    /// Rasterise a symbol to a square image `pixel_width` wide.
    ///
    /// When the symbol plus margin has more modules than `pixel_width`, the image is
    /// returned at one pixel per module instead of being shrunk.
    pub fn render_png(&self, code: &QrCode, pixel_width: u32) -> RgbImage {
        let foreground = Rgb(self.style.foreground.rgb());
        let background = Rgb(self.style.background.rgb());

        let modules = code
            .render::<Rgb<u8>>()
            .quiet_zone(false)
            .module_dimensions(1, 1)
            .dark_color(foreground)
            .light_color(background)
            .build();

        let side = modules.width() + 2 * self.style.margin;
        let mut canvas = RgbImage::from_pixel(side, side, background);
        imageops::overlay(
            &mut canvas,
            &modules,
            i64::from(self.style.margin),
            i64::from(self.style.margin),
        );

        if side >= pixel_width {
            if side > pixel_width {
                tracing::warn!(
                    modules = side,
                    pixel_width,
                    "QR symbol needs more pixels than requested, rendering one pixel per module"
                );
            }
            return canvas;
        }

        imageops::resize(&canvas, pixel_width, pixel_width, FilterType::Nearest)
    }

    /// Render a symbol as an SVG document whose width and height are `pixel_width`.
    pub fn render_svg(&self, code: &QrCode, pixel_width: u32) -> String {
        let width = code.width();
        let margin = self.style.margin as usize;
        let side = width + 2 * margin;
        let colors = code.to_colors();

        // One horizontal run per path command keeps the output compact.
        let mut path = String::new();
        for (y, row) in colors.chunks(width).enumerate() {
            let mut x = 0;
            while x < width {
                if row[x] != Color::Dark {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < width && row[x] == Color::Dark {
                    x += 1;
                }
                let run = x - start;
                let _ = write!(
                    path,
                    "M{},{}h{run}v1h-{run}z",
                    start + margin,
                    y + margin
                );
            }
        }

        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" ",
                "width=\"{px}\" height=\"{px}\" viewBox=\"0 0 {side} {side}\" ",
                "shape-rendering=\"crispEdges\">",
                "<rect width=\"{side}\" height=\"{side}\" fill=\"{bg}\"/>",
                "<path fill=\"{fg}\" d=\"{path}\"/>",
                "</svg>\n"
            ),
            px = pixel_width,
            side = side,
            bg = self.style.background,
            fg = self.style.foreground,
            path = path,
        )
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
