//! Helpers for rendering generation results and listings

use crate::campaign::{Campaign, CampaignCatalog};
use crate::error::Error;
use crate::generator::{ArtifactSet, BatchReport, CampaignArtifacts, GeneratedArtifact};
use crate::preset::{SIZE_PRESETS, file_size_label, print_size_label};
use serde_json::{Map, Value, json};

/// Combined structured and human-readable representation of a result
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

impl Rendered {
    fn new(json: Value, human: Vec<String>) -> Self {
        Self { json, human }
    }
}

/// Render the result of a single campaign generation.
pub fn render_campaign(result: &CampaignArtifacts, campaign: Option<&Campaign>) -> Rendered {
    let mut human = vec![format!(
        "Generated QR code for campaign '{}':",
        result.campaign_id
    )];
    human.push(format!("  Redirect URL: {}", result.redirect_url));
    if let Some(campaign) = campaign {
        human.push(format!("  Final destination: {}", campaign.destination_url));
    }
    human.push(format!("  Tracked URL: {}", result.tracked_url));
    human.extend(artifact_lines(&result.artifacts));

    let mut json = campaign_value(result);
    if let (Some(campaign), Some(obj)) = (campaign, json.as_object_mut()) {
        obj.insert(
            "destination_url".to_string(),
            Value::String(campaign.destination_url.clone()),
        );
    }

    Rendered::new(json, human)
}

/// Render the result of a raw-URL generation.
pub fn render_custom(url: &str, artifacts: &ArtifactSet) -> Rendered {
    let mut human = vec!["Generated custom QR code:".to_string()];
    human.push(format!("  URL: {url}"));
    human.extend(artifact_lines(artifacts));

    let json = json!({
        "url": url,
        "artifacts": artifact_set_value(artifacts),
    });

    Rendered::new(json, human)
}

/// Render every outcome of a batch run, followed by a summary line.
pub fn render_batch(report: &BatchReport, catalog: &CampaignCatalog) -> Rendered {
    let mut human = Vec::new();
    let mut results = Map::new();

    for (id, outcome) in &report.results {
        match outcome {
            Ok(artifacts) => {
                let rendered = render_campaign(artifacts, catalog.get(id).ok());
                human.extend(rendered.human);
                results.insert(id.clone(), json!({ "ok": rendered.json }));
            }
            Err(err) => {
                human.push(format!("Error generating QR for {id}: {err}"));
                results.insert(id.clone(), json!({ "error": error_value(err) }));
            }
        }
        human.push(String::new());
    }

    let succeeded = report.successes().count();
    let failed = report.failures().count();
    human.push(format!(
        "{succeeded} campaign(s) generated, {failed} failed"
    ));

    let json = json!({
        "results": Value::Object(results),
        "succeeded": succeeded,
        "failed": failed,
    });

    Rendered::new(json, human)
}

/// Render the campaign table.
pub fn render_campaign_list(catalog: &CampaignCatalog) -> Rendered {
    let mut human = vec!["Available Campaigns:".to_string(), "-".repeat(50)];
    let mut entries = Vec::new();

    for campaign in catalog.iter() {
        match &campaign.name {
            Some(name) => human.push(format!("{} ({name})", campaign.id)),
            None => human.push(campaign.id.clone()),
        }
        human.push(format!("   Destination: {}", campaign.destination_url));
        if campaign.utm_params.is_empty() {
            human.push("   UTM params: None".to_string());
        } else {
            let params: Vec<String> = campaign
                .utm_params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            human.push(format!("   UTM params: {}", params.join(", ")));
        }
        human.push(String::new());

        entries.push(json!({
            "id": campaign.id,
            "name": campaign.name,
            "destination_url": campaign.destination_url,
            "utm_params": campaign.utm_params,
        }));
    }

    Rendered::new(json!({ "campaigns": entries }), human)
}

/// Render the size preset table.
pub fn render_size_presets() -> Rendered {
    let mut human = vec!["Available Size Presets:".to_string(), "-".repeat(50)];
    let mut entries = Vec::new();

    for preset in &SIZE_PRESETS {
        human.push(format!(
            "{}: {} (width: {}px)",
            preset.name, preset.description, preset.pixel_width
        ));
        entries.push(json!({
            "name": preset.name,
            "pixel_width": preset.pixel_width,
            "description": preset.description,
            "print_size": print_size_label(preset.pixel_width),
        }));
    }

    Rendered::new(json!({ "sizes": entries }), human)
}

/// Structured representation of an error.
pub fn error_value(err: &Error) -> Value {
    let kind = match err {
        Error::UnknownCampaign { .. } => "unknown_campaign",
        Error::EncodingFailure { .. } => "encoding_failure",
        Error::IoFailure { .. } => "io_failure",
        Error::InvalidUrl { .. } => "invalid_url",
        Error::InvalidFilename(_) => "invalid_filename",
        Error::VerificationFailed { .. } => "verification_failed",
        Error::Config(_) => "config",
        _ => "other",
    };
    json!({ "kind": kind, "message": err.to_string() })
}

fn campaign_value(result: &CampaignArtifacts) -> Value {
    json!({
        "campaign_id": result.campaign_id,
        "redirect_url": result.redirect_url,
        "tracked_url": result.tracked_url,
        "artifacts": artifact_set_value(&result.artifacts),
    })
}

fn artifact_set_value(set: &ArtifactSet) -> Value {
    json!({
        "png": artifact_value(&set.png),
        "svg": artifact_value(&set.svg),
        "pixel_width": set.pixel_width,
        "print_size": print_size_label(set.pixel_width),
        "error_correction": set.error_correction,
        "recovery_percent": set.error_correction.recovery_percent(),
    })
}

fn artifact_value(artifact: &GeneratedArtifact) -> Value {
    json!({
        "path": artifact.path.display().to_string(),
        "bytes": artifact.bytes,
    })
}

fn artifact_lines(set: &ArtifactSet) -> Vec<String> {
    vec![
        format!(
            "  Size: {0}x{0}px (~{1})",
            set.pixel_width,
            print_size_label(set.pixel_width)
        ),
        format!(
            "  Error correction: {} ({}%)",
            set.error_correction,
            set.error_correction.recovery_percent()
        ),
        format!(
            "  Files: {} ({}), {} ({})",
            set.png.path.display(),
            file_size_label(set.png.bytes),
            set.svg.path.display(),
            file_size_label(set.svg.bytes)
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{ArtifactFormat, GeneratedArtifact};
    use crate::qr::ErrorCorrectionLevel;
    use std::path::PathBuf;

    fn sample() -> CampaignArtifacts {
        CampaignArtifacts {
            campaign_id: "msft-2025".to_string(),
            redirect_url: "https://x.github.io/site/msft-2025".to_string(),
            tracked_url: "https://accionlabs.com/microsoft-event?utm_source=msft_booth".to_string(),
            artifacts: ArtifactSet {
                png: GeneratedArtifact {
                    format: ArtifactFormat::Png,
                    path: PathBuf::from("assets/qr-codes/msft-2025-qr.png"),
                    bytes: 2048,
                },
                svg: GeneratedArtifact {
                    format: ArtifactFormat::Svg,
                    path: PathBuf::from("assets/qr-codes/msft-2025-qr.svg"),
                    bytes: 900,
                },
                pixel_width: 200,
                error_correction: ErrorCorrectionLevel::Q,
            },
        }
    }

    #[test]
    fn test_render_campaign() {
        let catalog = CampaignCatalog::builtin();
        let rendered = render_campaign(&sample(), catalog.get("msft-2025").ok());

        assert_eq!(rendered.human[0], "Generated QR code for campaign 'msft-2025':");
        assert!(rendered.human.iter().any(|l| l.contains("Size: 200x200px (~2cm x 2cm)")));
        assert!(rendered.human.iter().any(|l| l.contains("Error correction: Q (25%)")));
        assert!(rendered.human.iter().any(|l| l.contains("(2 KB)")));

        assert_eq!(
            rendered.json["destination_url"],
            "https://accionlabs.com/microsoft-event"
        );
        assert_eq!(rendered.json["artifacts"]["error_correction"], "Q");
        assert_eq!(rendered.json["artifacts"]["recovery_percent"], 25);
    }

    #[test]
    fn test_render_batch_with_failure() {
        let catalog = CampaignCatalog::builtin();
        let mut report = BatchReport::default();
        report.results.insert("msft-2025".to_string(), Ok(sample()));
        report.results.insert(
            "business-cards".to_string(),
            Err(Error::InvalidUrl {
                url: "bad".to_string(),
                reason: "relative URL without a base".to_string(),
            }),
        );

        let rendered = render_batch(&report, &catalog);
        assert_eq!(rendered.json["succeeded"], 1);
        assert_eq!(rendered.json["failed"], 1);
        assert_eq!(
            rendered.json["results"]["business-cards"]["error"]["kind"],
            "invalid_url"
        );
        assert_eq!(
            rendered.human.last().map(String::as_str),
            Some("1 campaign(s) generated, 1 failed")
        );
    }

    #[test]
    fn test_listings() {
        let campaigns = render_campaign_list(&CampaignCatalog::builtin());
        assert_eq!(campaigns.json["campaigns"].as_array().map(Vec::len), Some(2));
        assert!(
            campaigns
                .human
                .iter()
                .any(|l| l == "   UTM params: utm_source=msft_booth, utm_medium=qr, utm_campaign=2025")
        );

        let sizes = render_size_presets();
        assert_eq!(
            sizes.human[2],
            "business: Business cards (2cm x 2cm) (width: 200px)"
        );
        assert_eq!(sizes.json["sizes"][2]["pixel_width"], 500);
    }
}
