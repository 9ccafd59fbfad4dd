use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use imgrab_harvester::{HarvestReport, Harvester};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Expand `~` in an output directory argument.
pub fn expand_output_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Render the run summary shown after all downloads settle.
pub fn format_harvest_summary(report: &HarvestReport) -> String {
    let mut summary = String::new();
    summary.push_str(&format!("\n{}\n", "━".repeat(52)));
    summary.push_str(&format!("  Page: {}\n", report.page_url));
    summary.push_str(&format!(
        "  Candidate elements: {}\n",
        report.elements_seen
    ));
    summary.push_str(&format!(
        "  Unique image URLs: {}\n",
        report.unique_urls.len()
    ));
    summary.push_str(&format!(
        "  {}: {}  {}: {}\n",
        "Saved".green().bold(),
        report.saved_count(),
        "Failed".red().bold(),
        report.failed_count()
    ));
    summary.push_str(&format!("{}\n", "━".repeat(52)));

    for outcome in &report.outcomes {
        if let (Some(filename), Some(bytes)) = (&outcome.filename, outcome.bytes_written) {
            summary.push_str(&format!(
                "  {} {} ({} bytes)\n",
                "✓".green().bold(),
                filename,
                bytes
            ));
        } else {
            let reason = outcome.error.as_deref().unwrap_or("unknown error");
            summary.push_str(&format!(
                "  {} {} ({})\n",
                "✗".red().bold(),
                outcome.url,
                reason
            ));
        }
    }

    summary
}

pub async fn handle_harvest(args: &ArgMatches) -> Result<()> {
    tracing_subscriber::fmt::init();

    let url = args.get_one::<Url>("url").unwrap();
    let output = args.get_one::<String>("output").unwrap();
    let timeout = args.get_one::<u64>("timeout").unwrap();
    let format = args.get_one::<String>("format").unwrap();

    let output_dir = expand_output_dir(output);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Fetching {}", url));

    // Spinner follows completed downloads as their callbacks fire.
    let completed = Arc::new(AtomicUsize::new(0));
    let pb_clone = pb.clone();
    let completed_clone = completed.clone();
    let harvester = Harvester::with_timeout(&output_dir, *timeout).with_progress_callback(
        Arc::new(move |_index, url| {
            let done = completed_clone.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!("[{}] {}", done, url));
            pb_clone.tick();
        }),
    );

    let session = harvester
        .harvest(url.as_str())
        .await
        .with_context(|| format!("Failed to harvest {}", url))?;

    if session.elements_seen == 0 {
        pb.finish_and_clear();
        warn!("No candidate elements found on {}", url);
        eprintln!(
            "{}",
            "No <img> or <source> elements found in the document."
                .yellow()
                .bold()
        );
        return Ok(());
    }
    if session.task_count() == 0 {
        pb.finish_and_clear();
        info!("No valid image URLs found on {}", url);
        return Ok(());
    }

    pb.set_message(format!("Downloading {} images...", session.task_count()));
    let report = session.wait().await;
    pb.finish_and_clear();

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", format_harvest_summary(&report)),
    }

    Ok(())
}

pub async fn handle_list(args: &ArgMatches) -> Result<()> {
    tracing_subscriber::fmt::init();

    let url = args.get_one::<Url>("url").unwrap();
    let timeout = args.get_one::<u64>("timeout").unwrap();

    let harvester = Harvester::with_timeout(".", *timeout);
    let (elements_seen, urls) = harvester
        .collect_urls(url.as_str())
        .await
        .with_context(|| format!("Failed to scan {}", url))?;

    if elements_seen == 0 {
        warn!("No candidate elements found on {}", url);
        eprintln!(
            "{}",
            "No <img> or <source> elements found in the document."
                .yellow()
                .bold()
        );
        return Ok(());
    }
    if urls.is_empty() {
        info!("No valid image URLs found on {}", url);
        return Ok(());
    }

    for url in &urls {
        println!("{}", url);
    }

    Ok(())
}
