use crate::crawlers::PageFetcher;
use crate::parsers::RecordExtractor;
use crate::progress::ProgressSink;
use crate::results::AlertRecord;
use crate::utils::page_url;
use std::time::Duration;
use url::Url;

/// Which pages to request and how fast
#[derive(Debug, Clone)]
pub struct PagePlan {
    pub base_url: Url,
    pub num_pages: u32,
    pub delay: Duration,
}

/// Why the page loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every planned page was requested
    PageLimit,
    /// A page (0-based index) came back without alert entries
    Exhausted { page: u32 },
    /// A page (0-based index) could not be fetched
    TransportFailure { page: u32, reason: String },
}

/// Records accumulated over one pagination run, in fetch order
#[derive(Debug, Clone)]
pub struct PaginationSummary {
    pub records: Vec<AlertRecord>,
    pub pages_attempted: u32,
    pub stop: StopReason,
}

/// Walk pages `0..num_pages` in order, accumulating alert records.
///
/// The loop stops early on the first page without entries or the first fetch
/// failure; whatever was collected before is kept. No page is retried.
pub async fn collect_alerts<F: PageFetcher>(
    fetcher: &F,
    extractor: &RecordExtractor,
    plan: &PagePlan,
    progress: &mut dyn ProgressSink,
) -> PaginationSummary {
    progress.emit(&format!(
        "Starting scrape of the first {} pages...",
        plan.num_pages
    ));

    let mut records = Vec::new();
    let mut pages_attempted = 0;
    let mut stop = StopReason::PageLimit;

    for page in 0..plan.num_pages {
        let url = page_url(&plan.base_url, page);
        progress.emit(&format!("Scraping page {}: {}", page + 1, url));
        pages_attempted += 1;

        let body = match fetcher.fetch(url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                ::log::warn!("Page {} failed: {}", page + 1, e);
                progress.emit(&format!(
                    "Request for page {} failed: {}. Stopping.",
                    page + 1,
                    e
                ));
                stop = StopReason::TransportFailure {
                    page,
                    reason: e.to_string(),
                };
                break;
            }
        };

        let page_records = extractor.extract(&body);
        if page_records.is_empty() {
            ::log::info!("Page {} has no alert entries", page + 1);
            progress.emit("No more alerts found. Stopping.");
            stop = StopReason::Exhausted { page };
            break;
        }

        progress.emit(&format!(
            "Found {} alerts on page {}.",
            page_records.len(),
            page + 1
        ));
        records.extend(page_records);

        // No request follows the last page
        if page + 1 < plan.num_pages && !plan.delay.is_zero() {
            tokio::time::sleep(plan.delay).await;
        }
    }

    ::log::info!(
        "Pagination finished after {} page(s) with {} records ({:?})",
        pages_attempted,
        records.len(),
        stop
    );

    PaginationSummary {
        records,
        pages_attempted,
        stop,
    }
}
