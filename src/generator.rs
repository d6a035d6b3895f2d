//! Campaign resolution and QR artifact generation

use crate::campaign::{CampaignCatalog, build_tracked_url, resolve_redirect_url};
use crate::config::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR, PagesQrConfig};
use crate::error::{Error, Result};
use crate::preset::SizePreset;
use crate::qr::{ErrorCorrectionLevel, QrDecoder, QrEncoder, RenderStyle};
use image::ImageFormat;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Raster PNG
    Png,
    /// Vector SVG
    Svg,
}

impl ArtifactFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// A file written by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    /// Output format
    pub format: ArtifactFormat,
    /// Where the file was written
    pub path: PathBuf,
    /// File size in bytes
    pub bytes: u64,
}

/// PNG and SVG renderings of the same QR symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSet {
    /// Raster output
    pub png: GeneratedArtifact,
    /// Vector output
    pub svg: GeneratedArtifact,
    /// Requested pixel width
    pub pixel_width: u32,
    /// Error correction level both files were encoded at
    pub error_correction: ErrorCorrectionLevel,
}

/// Result of generating one campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignArtifacts {
    /// Campaign id
    pub campaign_id: String,
    /// GitHub Pages URL encoded in the QR code
    pub redirect_url: String,
    /// Destination with UTM parameters, where the redirect page forwards to
    pub tracked_url: String,
    /// Written files
    pub artifacts: ArtifactSet,
}

/// Per-campaign outcomes of a batch run, in catalog order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Outcome keyed by campaign id
    pub results: IndexMap<String, Result<CampaignArtifacts>>,
}

impl BatchReport {
    /// Successful campaigns
    pub fn successes(&self) -> impl Iterator<Item = &CampaignArtifacts> {
        self.results.values().filter_map(|r| r.as_ref().ok())
    }

    /// Failed campaigns with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.results
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| (id.as_str(), e)))
    }

    /// Whether any campaign failed
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Resolves campaigns and writes their QR artifacts
#[derive(Debug, Clone)]
pub struct Generator {
    catalog: Arc<CampaignCatalog>,
    base_url: String,
    output_dir: PathBuf,
    level: ErrorCorrectionLevel,
    style: RenderStyle,
    verify: bool,
}

impl Generator {
    /// Create a generator with default base URL, output directory and style
    pub fn new(catalog: CampaignCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            level: ErrorCorrectionLevel::Q,
            style: RenderStyle::default(),
            verify: false,
        }
    }

    /// Create a generator from loaded configuration
    pub fn from_config(config: &PagesQrConfig) -> Result<Self> {
        Ok(Self::new(config.catalog()?)
            .base_url(&config.base_url)
            .output_dir(&config.output_dir)
            .error_correction(config.error_correction)
            .style(config.render_style()?)
            .verify(config.verify))
    }

    /// Set the GitHub Pages base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the artifact directory
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the level used for campaign generation
    pub fn error_correction(mut self, level: ErrorCorrectionLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the render style
    pub fn style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Decode PNGs after writing them
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Campaign catalog
    pub fn catalog(&self) -> &CampaignCatalog {
        &self.catalog
    }

    /// Configured base URL
    pub fn configured_base_url(&self) -> &str {
        &self.base_url
    }

    /// Encode `data` once and write `<stem>.png` and `<stem>.svg` to the output directory.
    pub fn generate_artifacts(
        &self,
        data: &str,
        filename_stem: &str,
        preset: &SizePreset,
        level: ErrorCorrectionLevel,
    ) -> Result<ArtifactSet> {
        validate_stem(filename_stem)?;

        let encoder = QrEncoder::with_level(level).style(self.style);
        let code = encoder.encode(data)?;

        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;

        let png_path = self.artifact_path(filename_stem, ArtifactFormat::Png);
        let image = encoder.render_png(&code, preset.pixel_width);
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        fs::write(&png_path, &png).map_err(|e| Error::io(&png_path, e))?;

        let svg_path = self.artifact_path(filename_stem, ArtifactFormat::Svg);
        let svg = encoder.render_svg(&code, preset.pixel_width);
        fs::write(&svg_path, svg.as_bytes()).map_err(|e| Error::io(&svg_path, e))?;

        if self.verify {
            verify_png(&png_path, data)?;
        }

        tracing::debug!(
            stem = filename_stem,
            preset = preset.name,
            level = %level,
            data_len = data.len(),
            "Wrote QR artifacts"
        );

        Ok(ArtifactSet {
            png: GeneratedArtifact {
                format: ArtifactFormat::Png,
                path: png_path,
                bytes: png.len() as u64,
            },
            svg: GeneratedArtifact {
                format: ArtifactFormat::Svg,
                path: svg_path,
                bytes: svg.len() as u64,
            },
            pixel_width: preset.pixel_width,
            error_correction: level,
        })
    }

    /// Resolve a campaign and write a QR code pointing at its redirect URL.
    pub fn generate_for_campaign(
        &self,
        campaign_id: &str,
        preset: &SizePreset,
    ) -> Result<CampaignArtifacts> {
        let campaign = self.catalog.get(campaign_id)?;
        let redirect_url = resolve_redirect_url(&self.catalog, campaign_id, &self.base_url)?;
        let tracked_url = build_tracked_url(&campaign.destination_url, &campaign.utm_params)?;

        let artifacts = self.generate_artifacts(
            &redirect_url,
            &format!("{campaign_id}-qr"),
            preset,
            self.level,
        )?;

        tracing::info!(
            campaign = campaign_id,
            %redirect_url,
            %tracked_url,
            "Generated campaign QR code"
        );

        Ok(CampaignArtifacts {
            campaign_id: campaign_id.to_string(),
            redirect_url,
            tracked_url,
            artifacts,
        })
    }

    /// Generate every campaign concurrently; failures are recorded per campaign.
    pub async fn generate_for_all_campaigns(&self, preset: &'static SizePreset) -> BatchReport {
        let handles: Vec<(String, JoinHandle<Result<CampaignArtifacts>>)> = self
            .catalog
            .ids()
            .map(|id| {
                let generator = self.clone();
                let task_id = id.to_string();
                let handle = tokio::task::spawn_blocking(move || {
                    generator.generate_for_campaign(&task_id, preset)
                });
                (id.to_string(), handle)
            })
            .collect();

        let mut report = BatchReport::default();
        for (id, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::Other(format!(
                    "Generation task for '{id}' failed: {e}"
                ))),
            };
            if let Err(err) = &outcome {
                tracing::error!(campaign = %id, error = %err, "Error generating QR code");
            }
            report.results.insert(id, outcome);
        }

        report
    }

    fn artifact_path(&self, stem: &str, format: ArtifactFormat) -> PathBuf {
        self.output_dir
            .join(format!("{stem}.{}", format.extension()))
    }
}

fn validate_stem(stem: &str) -> Result<()> {
    let invalid = stem.trim().is_empty()
        || stem == "."
        || stem == ".."
        || stem.contains(['/', '\\']);
    if invalid {
        return Err(Error::InvalidFilename(stem.to_string()));
    }
    Ok(())
}

fn verify_png(path: &Path, expected: &str) -> Result<()> {
    let decoded = QrDecoder::new()
        .decode_file(path)
        .map_err(|e| Error::VerificationFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if decoded != expected {
        return Err(Error::VerificationFailed {
            path: path.to_path_buf(),
            reason: format!("decoded '{decoded}', expected '{expected}'"),
        });
    }
    Ok(())
}
