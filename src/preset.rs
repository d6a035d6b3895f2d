//! Size presets mapping print targets to pixel widths

use serde::Serialize;

/// A named pixel-width configuration for a physical print target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizePreset {
    /// Preset key used on the command line
    pub name: &'static str,
    /// Rendered image width in pixels
    pub pixel_width: u32,
    /// Human description of the intended use
    pub description: &'static str,
}

/// Name of the preset used when none (or an unknown one) is given
pub const DEFAULT_PRESET: &str = "digital";

/// The fixed preset table, in listing order
pub static SIZE_PRESETS: [SizePreset; 5] = [
    SizePreset {
        name: "business",
        pixel_width: 200,
        description: "Business cards (2cm x 2cm)",
    },
    SizePreset {
        name: "flyer",
        pixel_width: 300,
        description: "Flyers and handouts (4cm x 4cm)",
    },
    SizePreset {
        name: "poster",
        pixel_width: 500,
        description: "Posters and displays (10cm x 10cm)",
    },
    SizePreset {
        name: "signage",
        pixel_width: 750,
        description: "Large signage (15cm x 15cm)",
    },
    SizePreset {
        name: "digital",
        pixel_width: 400,
        description: "Digital displays and screens",
    },
];

/// Exact lookup without fallback
pub fn find_size_preset(name: &str) -> Option<&'static SizePreset> {
    SIZE_PRESETS.iter().find(|preset| preset.name == name)
}

/// Look up a preset by name, falling back to `digital` for unknown names.
pub fn resolve_size_preset(name: &str) -> &'static SizePreset {
    match find_size_preset(name) {
        Some(preset) => preset,
        None => {
            tracing::debug!(requested = name, "Unknown size preset, using {DEFAULT_PRESET}");
            default_preset()
        }
    }
}

/// The `digital` preset
pub fn default_preset() -> &'static SizePreset {
    &SIZE_PRESETS[4]
}

/// Approximate printed edge length, e.g. `"2cm x 2cm"` for 200 px.
pub fn print_size_label(pixels: u32) -> String {
    let cm = (f64::from(pixels) / 100.0 * 10.0).round() / 10.0;
    format!("{cm}cm x {cm}cm")
}

/// Human-readable file size using 1024-based units.
pub fn file_size_label(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{} KB", (bytes as f64 / KB as f64).round() as u64)
    } else {
        format!("{} MB", (bytes as f64 / MB as f64).round() as u64)
    }
}
