use serde::{Deserialize, Serialize};

/// Terminal record for one address: saved, or failed and logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub bytes_written: Option<u64>,
    pub error: Option<String>,
}

impl DownloadOutcome {
    pub fn saved(
        url: String,
        status_code: u16,
        content_type: Option<String>,
        filename: String,
        bytes_written: u64,
    ) -> Self {
        Self {
            url,
            status_code,
            content_type,
            filename: Some(filename),
            bytes_written: Some(bytes_written),
            error: None,
        }
    }

    pub fn failed(url: String, status_code: u16, error: String) -> Self {
        Self {
            url,
            status_code,
            content_type: None,
            filename: None,
            bytes_written: None,
            error: Some(error),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything a single run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestReport {
    pub page_url: String,
    /// Candidate elements seen during discovery, usable or not.
    pub elements_seen: usize,
    /// Unique absolute addresses, first-seen order.
    pub unique_urls: Vec<String>,
    pub outcomes: Vec<DownloadOutcome>,
}

impl HarvestReport {
    pub fn saved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.saved_count()
    }
}
