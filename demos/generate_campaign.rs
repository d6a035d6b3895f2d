//! Generate the built-in campaigns' QR codes into a scratch directory
//!
//! Usage: cargo run --example generate_campaign

use pagesqr::output::render_batch;
use pagesqr::{CampaignCatalog, Generator, resolve_size_preset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let generator = Generator::new(CampaignCatalog::builtin())
        .base_url("https://example.github.io/qr-hosting/")
        .output_dir("demo-qr-codes")
        .verify(true);

    let report = generator
        .generate_for_all_campaigns(resolve_size_preset("flyer"))
        .await;

    for line in render_batch(&report, generator.catalog()).human {
        println!("{line}");
    }

    if let Some((id, err)) = report.failures().next() {
        anyhow::bail!("campaign {id} failed: {err}");
    }

    Ok(())
}
