//! pagesqr - campaign QR codes for GitHub Pages redirect hosting
//!
//! Each campaign lives at `<base url>/<campaign id>` on a GitHub Pages site
//! whose redirect page forwards visitors to the campaign destination with UTM
//! parameters attached. This library resolves those URLs and renders the QR
//! codes that point at them.
//!
//! # Features
//!
//! - **Campaign catalog**: immutable, configuration-driven campaign table
//! - **URL composition**: redirect URLs and UTM-tagged destinations
//! - **Size presets**: print-target pixel widths with a permissive default
//! - **Artifacts**: PNG and SVG rendered from a single QR symbol
//! - **Analytics**: beacon payloads for page views and QR scans
//!
//! # Example
//!
//! ```no_run
//! use pagesqr::{CampaignCatalog, Generator, resolve_size_preset};
//!
//! fn main() -> pagesqr::Result<()> {
//!     let generator = Generator::new(CampaignCatalog::builtin())
//!         .base_url("https://acme.github.io/qr-hosting/");
//!
//!     let result = generator.generate_for_campaign("msft-2025", resolve_size_preset("poster"))?;
//!     println!("QR points at {}", result.redirect_url);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod analytics;
pub mod campaign;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod output;
pub mod preset;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use analytics::{Analytics, AnalyticsOptions, BeaconTransport, PageContext, TracingTransport};
pub use campaign::{Campaign, CampaignCatalog, build_tracked_url, resolve_redirect_url};
pub use config::{LogRotation, LoggingOptions, PagesQrConfig, StyleOptions};
pub use generator::{ArtifactFormat, ArtifactSet, BatchReport, CampaignArtifacts, Generator};
pub use preset::{SIZE_PRESETS, SizePreset, resolve_size_preset};
pub use qr::{ErrorCorrectionLevel, QrDecoder, QrEncoder, RenderStyle};
