//! QR code encoding and read-back
//!
//! Symbol construction is delegated to the `qrcode` crate. This module wraps it
//! with the error-correction bookkeeping and visual style shared by the PNG and
//! SVG outputs, and exposes an `rqrr` based decoder for verifying what was
//! written.

mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::QrEncoder;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// QR error-correction level, ordered by increasing damage tolerance
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorCorrectionLevel {
    /// ~7% recoverable
    L,
    /// ~15% recoverable
    M,
    /// ~25% recoverable
    #[default]
    Q,
    /// ~30% recoverable
    H,
}

impl ErrorCorrectionLevel {
    /// All levels, lowest tolerance first.
    pub const ALL: [ErrorCorrectionLevel; 4] = [Self::L, Self::M, Self::Q, Self::H];

    /// Approximate share of the symbol that can be damaged and still decode.
    pub fn recovery_percent(self) -> u8 {
        match self {
            Self::L => 7,
            Self::M => 15,
            Self::Q => 25,
            Self::H => 30,
        }
    }

    /// Single-letter label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(format!(
                "Unknown error correction level '{value}', expected one of L, M, Q, H"
            )),
        }
    }
}

impl From<ErrorCorrectionLevel> for qrcode::EcLevel {
    fn from(level: ErrorCorrectionLevel) -> Self {
        match level {
            ErrorCorrectionLevel::L => qrcode::EcLevel::L,
            ErrorCorrectionLevel::M => qrcode::EcLevel::M,
            ErrorCorrectionLevel::Q => qrcode::EcLevel::Q,
            ErrorCorrectionLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// An `#RRGGBB` color usable by both the raster and vector renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor([u8; 3]);

impl HexColor {
    /// Pure black
    pub const BLACK: HexColor = HexColor([0x00, 0x00, 0x00]);
    /// Pure white
    pub const WHITE: HexColor = HexColor([0xFF, 0xFF, 0xFF]);

    /// Raw RGB channels
    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::Config(format!("Invalid color '{value}', expected #RRGGBB"));
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(HexColor(rgb))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

/// Visual parameters applied identically to every rendered format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    /// Quiet zone width in modules
    pub margin: u32,
    /// Dark module color
    pub foreground: HexColor,
    /// Light module / background color
    pub background: HexColor,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            margin: 4,
            foreground: HexColor::BLACK,
            background: HexColor::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing_is_case_insensitive() {
        assert_eq!("q".parse::<ErrorCorrectionLevel>(), Ok(ErrorCorrectionLevel::Q));
        assert_eq!(" H ".parse::<ErrorCorrectionLevel>(), Ok(ErrorCorrectionLevel::H));
        assert!("X".parse::<ErrorCorrectionLevel>().is_err());
    }

    #[test]
    fn test_recovery_percentages() {
        let percents: Vec<u8> = ErrorCorrectionLevel::ALL
            .iter()
            .map(|level| level.recovery_percent())
            .collect();
        assert_eq!(percents, vec![7, 15, 25, 30]);
        assert_eq!(ErrorCorrectionLevel::default(), ErrorCorrectionLevel::Q);
    }

    #[test]
    fn test_hex_color_parse() {
        let color: HexColor = "#1a2B3c".parse().unwrap();
        assert_eq!(color.rgb(), [0x1A, 0x2B, 0x3C]);
        assert_eq!(color.to_string(), "#1A2B3C");
        assert!("000000".parse::<HexColor>().is_err());
        assert!("#00000".parse::<HexColor>().is_err());
        assert!("#GG0000".parse::<HexColor>().is_err());
    }
}
