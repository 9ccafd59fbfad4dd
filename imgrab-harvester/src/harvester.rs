use crate::error::{HarvestError, Result};
use crate::extract::{discover_candidates, normalize_candidates};
use crate::filename::{filename_from_url, synthesized_filename};
use crate::result::{DownloadOutcome, HarvestReport};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

/// Called with the 1-based index and address of each finished download.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub struct Harvester {
    client: Client,
    output_dir: PathBuf,
    progress_callback: Option<ProgressCallback>,
}

impl Harvester {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_timeout(output_dir, 10)
    }

    pub fn with_timeout(output_dir: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("imgrab/0.1 (https://github.com/imgrab/imgrab)")
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            output_dir: output_dir.into(),
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fetch a page and run discovery and normalization over its markup.
    ///
    /// Returns the number of candidate elements seen and the unique
    /// absolute addresses in first-seen order. No downloads are issued.
    pub async fn collect_urls(&self, page_url: &str) -> Result<(usize, Vec<String>)> {
        let page_url = Url::parse(page_url)
            .map_err(|e| HarvestError::InvalidUrl(format!("Invalid page URL: {}", e)))?;

        debug!("Fetching page {}", page_url);
        let response = self.client.get(page_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::PageStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let discovery = discover_candidates(&body);
        let unique = normalize_candidates(&discovery.candidates, &page_url);

        debug!(
            "Discovery on {}: {} candidate elements, {} unique URLs",
            page_url,
            discovery.elements_seen,
            unique.len()
        );
        Ok((discovery.elements_seen, unique))
    }

    /// Run the full pipeline against a page.
    ///
    /// Every download is issued back-to-back without awaiting any of them;
    /// the returned session holds the in-flight tasks. Dropping the session
    /// leaves the downloads running. Use [`HarvestSession::wait`] to join
    /// them and collect a report.
    pub async fn harvest(&self, page_url: &str) -> Result<HarvestSession> {
        let (elements_seen, unique_urls) = self.collect_urls(page_url).await?;

        if elements_seen == 0 {
            info!("No <img> or <source> elements found in {}", page_url);
            return Ok(HarvestSession::idle(page_url, 0));
        }
        if unique_urls.is_empty() {
            info!("No valid image URLs to download from {}", page_url);
            return Ok(HarvestSession::idle(page_url, elements_seen));
        }

        info!(
            "Found {} unique image URLs on {}. Issuing downloads...",
            unique_urls.len(),
            page_url
        );
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut pending = Vec::with_capacity(unique_urls.len());
        for (idx, url) in unique_urls.iter().enumerate() {
            let client = self.client.clone();
            let output_dir = self.output_dir.clone();
            let progress_cb = self.progress_callback.clone();
            let url = url.clone();
            let index = idx + 1;

            let task_url = url.clone();
            let handle = tokio::spawn(async move {
                let outcome =
                    Self::fetch_and_save(&client, &task_url, index, &output_dir).await;
                if let Some(callback) = progress_cb {
                    callback(index, task_url);
                }
                outcome
            });
            pending.push((url, handle));
        }

        Ok(HarvestSession {
            page_url: page_url.to_string(),
            elements_seen,
            unique_urls,
            pending,
        })
    }

    async fn fetch_and_save(
        client: &Client,
        url: &str,
        index: usize,
        output_dir: &Path,
    ) -> DownloadOutcome {
        match Self::try_fetch_and_save(client, url, index, output_dir).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to download {}: {}", url, e);
                DownloadOutcome::failed(url.to_string(), 0, e.to_string())
            }
        }
    }

    async fn try_fetch_and_save(
        client: &Client,
        url: &str,
        index: usize,
        output_dir: &Path,
    ) -> Result<DownloadOutcome> {
        debug!("Downloading [{}] {}", index, url);

        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("HTTP error for {}: status {}", url, status.as_u16());
            return Ok(DownloadOutcome::failed(
                url.to_string(),
                status.as_u16(),
                format!("HTTP error: status {}", status.as_u16()),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await?;

        let filename = filename_from_url(url)
            .unwrap_or_else(|| synthesized_filename(index, content_type.as_deref()));
        let destination = output_dir.join(&filename);
        tokio::fs::write(&destination, &bytes).await?;

        info!("Saved {} as {}", url, destination.display());
        Ok(DownloadOutcome::saved(
            url.to_string(),
            status.as_u16(),
            content_type,
            filename,
            bytes.len() as u64,
        ))
    }
}

impl Default for Harvester {
    fn default() -> Self {
        Self::new("images")
    }
}

/// Downloads in flight for one page.
///
/// The tasks run to completion whether or not the session is kept around.
#[derive(Debug)]
pub struct HarvestSession {
    pub page_url: String,
    pub elements_seen: usize,
    pub unique_urls: Vec<String>,
    pending: Vec<(String, JoinHandle<DownloadOutcome>)>,
}

impl HarvestSession {
    fn idle(page_url: &str, elements_seen: usize) -> Self {
        Self {
            page_url: page_url.to_string(),
            elements_seen,
            unique_urls: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Number of downloads issued.
    pub fn task_count(&self) -> usize {
        self.pending.len()
    }

    /// Join every download and assemble the report.
    pub async fn wait(self) -> HarvestReport {
        let (urls, handles): (Vec<_>, Vec<_>) = self.pending.into_iter().unzip();
        let joined = futures::future::join_all(handles).await;

        let mut outcomes = Vec::with_capacity(joined.len());
        for (url, joined) in urls.into_iter().zip(joined) {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!("Download task for {} failed: {}", url, e);
                    outcomes.push(DownloadOutcome::failed(url, 0, e.to_string()));
                }
            }
        }

        HarvestReport {
            page_url: self.page_url,
            elements_seen: self.elements_seen,
            unique_urls: self.unique_urls,
            outcomes,
        }
    }
}
