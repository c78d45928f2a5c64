use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{error, info};

use crate::config::Category;
use crate::parser;
use crate::store::ListingRecord;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Per-category accounting for one run. Partial failure is the normal
/// case: a page that could not be fetched or a fragment that could not be
/// extracted shows up here, never as a hard error.
#[derive(Debug, Default)]
pub struct CategoryStats {
    pub pages: usize,
    pub records: usize,
    pub rejected: usize,
    pub fetch_errors: usize,
}

pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")
}

/// Progress bar over the total page count of a run, advanced once per
/// page scanned.
pub fn page_progress(total_pages: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_pages);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages ({eta})")
            .expect("progress template is valid")
            .progress_chars("=> "),
    );
    pb
}

/// Walk pages 1..=N of one category, scanning each in turn. No dynamic
/// stop: a page past the end scans as empty at the caller's expense. A
/// fetch failure skips only that page; later pages and other categories
/// are unaffected.
pub async fn scrape_category(
    client: &Client,
    category: Category,
    pages: usize,
    pb: &ProgressBar,
) -> (Vec<ListingRecord>, CategoryStats) {
    let mut records = Vec::new();
    let mut stats = CategoryStats {
        pages,
        ..CategoryStats::default()
    };

    for page in 1..=pages {
        let url = category.page_url(page);
        match fetch_page(client, &url).await {
            Ok(html) => {
                let outcome = parser::scan_page(&html, category);
                stats.rejected += outcome.rejected;
                records.extend(outcome.records);
            }
            Err(e) => {
                error!("Fetch failed for {} page {}: {:#}", category.label(), page, e);
                stats.fetch_errors += 1;
            }
        }
        pb.inc(1);
    }

    stats.records = records.len();
    info!(
        "{}: {} records over {} pages ({} rejected, {} fetch errors)",
        category.label(),
        stats.records,
        stats.pages,
        stats.rejected,
        stats.fetch_errors
    );
    (records, stats)
}

async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()?;
    Ok(response.text().await?)
}
