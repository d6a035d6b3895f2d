use std::fs;

use pagesqr::{
    Campaign, CampaignCatalog, Error, ErrorCorrectionLevel, Generator, QrDecoder, QrEncoder,
    resolve_size_preset,
};
use tempfile::TempDir;

fn generator_in(dir: &TempDir) -> Generator {
    Generator::new(CampaignCatalog::builtin())
        .base_url("https://x.github.io/site/")
        .output_dir(dir.path())
}

#[test]
fn campaign_scenario_writes_matching_png_and_svg() {
    let dir = TempDir::new().expect("temp dir");
    let generator = generator_in(&dir).verify(true);

    let result = generator
        .generate_for_campaign("msft-2025", resolve_size_preset("business"))
        .expect("generate msft-2025");

    assert_eq!(result.redirect_url, "https://x.github.io/site/msft-2025");
    assert_eq!(
        result.tracked_url,
        "https://accionlabs.com/microsoft-event?utm_source=msft_booth&utm_medium=qr&utm_campaign=2025"
    );
    assert_eq!(result.artifacts.pixel_width, 200);
    assert_eq!(result.artifacts.error_correction, ErrorCorrectionLevel::Q);
    assert_eq!(result.artifacts.png.path, dir.path().join("msft-2025-qr.png"));
    assert_eq!(result.artifacts.svg.path, dir.path().join("msft-2025-qr.svg"));

    let png = image::open(&result.artifacts.png.path).expect("open png");
    assert_eq!((png.width(), png.height()), (200, 200));
    let decoded = QrDecoder::new().decode(&png).expect("decode png");
    assert_eq!(decoded, result.redirect_url);

    let svg = fs::read_to_string(&result.artifacts.svg.path).expect("read svg");
    assert!(svg.contains("width=\"200\" height=\"200\""));

    let encoder = QrEncoder::with_level(ErrorCorrectionLevel::Q);
    let code = encoder.encode(&decoded).expect("re-encode decoded data");
    assert_eq!(svg, encoder.render_svg(&code, 200));
}

#[test]
fn unknown_campaign_fails_without_writing() {
    let dir = TempDir::new().expect("temp dir");
    let generator = generator_in(&dir);

    let err = generator
        .generate_for_campaign("does-not-exist", resolve_size_preset("digital"))
        .expect_err("unknown campaign");
    assert!(matches!(err, Error::UnknownCampaign { .. }));
    assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

#[test]
fn unknown_size_falls_back_to_digital() {
    let dir = TempDir::new().expect("temp dir");
    let result = generator_in(&dir)
        .generate_for_campaign("business-cards", resolve_size_preset("billboard"))
        .expect("generate business-cards");
    assert_eq!(result.artifacts.pixel_width, 400);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn batch_isolates_failing_campaign() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = CampaignCatalog::new([
        Campaign::new("spring", "https://acme.example/spring").with_param("utm_medium", "qr"),
        Campaign::new("broken", "not a url").with_param("utm_medium", "qr"),
        Campaign::new("autumn", "https://acme.example/autumn"),
    ])
    .expect("catalog");

    let generator = Generator::new(catalog)
        .base_url("https://acme.github.io/qr")
        .output_dir(dir.path());

    let report = generator
        .generate_for_all_campaigns(resolve_size_preset("flyer"))
        .await;

    let ids: Vec<&str> = report.results.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["spring", "broken", "autumn"]);

    assert!(matches!(
        report.results["broken"],
        Err(Error::InvalidUrl { .. })
    ));
    assert!(report.has_failures());
    assert_eq!(report.successes().count(), 2);

    assert!(dir.path().join("spring-qr.png").exists());
    assert!(dir.path().join("autumn-qr.svg").exists());
    assert!(!dir.path().join("broken-qr.png").exists());

    let autumn = report.results["autumn"].as_ref().expect("autumn result");
    assert_eq!(autumn.redirect_url, "https://acme.github.io/qr/autumn");
    assert_eq!(autumn.tracked_url, "https://acme.example/autumn");
}

#[test]
fn capacity_overflow_depends_on_level() {
    let dir = TempDir::new().expect("temp dir");
    let generator = generator_in(&dir);
    let preset = resolve_size_preset("poster");

    let short = "s".repeat(500);
    generator
        .generate_artifacts(&short, "short-h", preset, ErrorCorrectionLevel::H)
        .expect("500 bytes fit at H");

    let long = "l".repeat(2000);
    let err = generator
        .generate_artifacts(&long, "long-h", preset, ErrorCorrectionLevel::H)
        .expect_err("2000 bytes exceed H capacity");
    match err {
        Error::EncodingFailure { length, level, .. } => {
            assert_eq!(length, 2000);
            assert_eq!(level, ErrorCorrectionLevel::H);
        }
        other => panic!("unexpected error: {other}"),
    }

    generator
        .generate_artifacts(&long, "long-l", preset, ErrorCorrectionLevel::L)
        .expect("2000 bytes fit at L");
}
