use imgrab::handlers::*;
use imgrab_harvester::{DownloadOutcome, HarvestReport};
use std::path::PathBuf;

fn sample_report() -> HarvestReport {
    HarvestReport {
        page_url: "https://x.test/gallery".to_string(),
        elements_seen: 3,
        unique_urls: vec![
            "https://x.test/a/pic.webp".to_string(),
            "https://x.test/broken.png".to_string(),
        ],
        outcomes: vec![
            DownloadOutcome::saved(
                "https://x.test/a/pic.webp".to_string(),
                200,
                Some("image/webp".to_string()),
                "pic.webp".to_string(),
                12,
            ),
            DownloadOutcome::failed(
                "https://x.test/broken.png".to_string(),
                404,
                "HTTP error: status 404".to_string(),
            ),
        ],
    }
}

#[test]
fn test_expand_output_dir_plain() {
    assert_eq!(expand_output_dir("./images"), PathBuf::from("./images"));
    assert_eq!(expand_output_dir("/tmp/out"), PathBuf::from("/tmp/out"));
}

#[test]
fn test_expand_output_dir_tilde() {
    let home = std::env::var("HOME").expect("HOME not set");
    assert_eq!(
        expand_output_dir("~/images"),
        PathBuf::from(format!("{}/images", home))
    );
}

#[test]
fn test_format_harvest_summary_counts() {
    let summary = format_harvest_summary(&sample_report());

    assert!(summary.contains("Page: https://x.test/gallery"));
    assert!(summary.contains("Candidate elements: 3"));
    assert!(summary.contains("Unique image URLs: 2"));
}

#[test]
fn test_format_harvest_summary_lists_outcomes() {
    let summary = format_harvest_summary(&sample_report());

    assert!(summary.contains("pic.webp (12 bytes)"));
    assert!(summary.contains("https://x.test/broken.png (HTTP error: status 404)"));
}

#[test]
fn test_report_counts() {
    let report = sample_report();
    assert_eq!(report.saved_count(), 1);
    assert_eq!(report.failed_count(), 1);
}
