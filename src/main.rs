//! pagesqr command-line entrypoint

use clap::Parser;
use pagesqr::analytics::scan_metadata;
use pagesqr::output::{
    Rendered, render_batch, render_campaign, render_campaign_list, render_custom,
    render_size_presets,
};
use pagesqr::{
    Analytics, CampaignArtifacts, ErrorCorrectionLevel, Generator, PageContext,
    PagesQrConfig, Result, TracingTransport, logging, resolve_size_preset,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

const EXAMPLES: &str = "\
Examples:
  pagesqr --list-campaigns
  pagesqr --campaign msft-2025 --size poster
  pagesqr --all --size business
  pagesqr --url https://example.com --filename custom-qr";

#[derive(Parser, Debug)]
#[command(
    name = "pagesqr",
    version,
    about = "Generate campaign QR codes for GitHub Pages hosting",
    after_help = EXAMPLES
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to pagesqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the GitHub Pages site hosting the redirect pages
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Generate the QR code for one campaign
    #[arg(long, value_name = "ID", conflicts_with_all = ["all", "url"])]
    campaign: Option<String>,

    /// Generate QR codes for every campaign
    #[arg(long, conflicts_with = "url")]
    all: bool,

    /// Generate a QR code for an arbitrary URL (requires --filename)
    #[arg(long, value_name = "URL", requires = "filename")]
    url: Option<String>,

    /// Output file name without extension (used with --url)
    #[arg(long, value_name = "NAME", requires = "url")]
    filename: Option<String>,

    /// Size preset for the QR code
    #[arg(
        long,
        value_name = "PRESET",
        value_parser = ["business", "flyer", "poster", "signage", "digital"]
    )]
    size: Option<String>,

    /// Error correction level (L, M, Q, H)
    #[arg(long, value_name = "LEVEL")]
    error_correction: Option<ErrorCorrectionLevel>,

    /// Directory the PNG/SVG files are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Decode each PNG after writing it and compare with the encoded data
    #[arg(long)]
    verify: bool,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// List available campaigns and exit
    #[arg(long)]
    list_campaigns: bool,

    /// List available size presets and exit
    #[arg(long)]
    list_sizes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            if json {
                let payload = pagesqr::output::error_value(&err);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| err.to_string())
                );
            } else {
                eprintln!("Error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = PagesQrConfig::load(cli.config.as_deref())?;

    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(ref dir) = cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(ref size) = cli.size {
        config.size = size.clone();
    }
    if let Some(level) = cli.error_correction {
        config.error_correction = level;
    }
    if cli.verify {
        config.verify = true;
    }

    logging::init(&config.logging)?;

    let generator = Generator::from_config(&config)?;

    if cli.list_campaigns {
        emit(&render_campaign_list(generator.catalog()), cli.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.list_sizes {
        emit(&render_size_presets(), cli.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    let preset = resolve_size_preset(&config.size);
    info!(
        base_url = generator.configured_base_url(),
        output_dir = %config.output_dir.display(),
        preset = preset.name,
        level = %config.error_correction,
        "Starting QR generation"
    );

    if let Some(ref id) = cli.campaign {
        let result = generator.generate_for_campaign(id, preset)?;
        track_generated(&config, &result).await?;
        emit(
            &render_campaign(&result, generator.catalog().get(id).ok()),
            cli.json,
        )?;
        return Ok(ExitCode::SUCCESS);
    }

    if let (Some(url), Some(filename)) = (cli.url.as_deref(), cli.filename.as_deref()) {
        let artifacts =
            generator.generate_artifacts(url, filename, preset, config.error_correction)?;
        emit(&render_custom(url, &artifacts), cli.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.json {
        if cli.all {
            println!(
                "Generating QR codes for all campaigns (size: {})...",
                preset.name
            );
        } else {
            println!("No specific action specified. Generating all campaigns...");
            println!("Use --help to see all available options");
        }
    }

    let report = generator.generate_for_all_campaigns(preset).await;
    for result in report.successes() {
        track_generated(&config, result).await?;
    }
    emit(&render_batch(&report, generator.catalog()), cli.json)?;

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Record a `qr_generated` event for the campaign's redirect page.
async fn track_generated(config: &PagesQrConfig, result: &CampaignArtifacts) -> Result<()> {
    let page = PageContext::redirect_page(&result.redirect_url, &result.tracked_url);
    let analytics = Analytics::new(config.analytics.clone(), page, Arc::new(TracingTransport));
    analytics
        .track(
            "qr_generated",
            "campaign",
            scan_metadata(&result.campaign_id, Some(&result.tracked_url)),
        )
        .await?;
    Ok(())
}

fn emit(rendered: &Rendered, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
    }
    Ok(())
}
