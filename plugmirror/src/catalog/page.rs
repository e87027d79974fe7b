//! Paginated catalog fetch.
//!
//! Walks the listing endpoint page by page, following `next_page_url` until
//! it runs out. Network and shape problems never fail the fetch: pagination
//! stops and whatever accumulated so far is returned, tagged with a
//! [`Truncation`] so callers can tell a complete walk from a cut-short one.

use crate::catalog::record::PluginRecord;
use crate::http::HttpClient;
use reqwest::Url;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Defensive cap on pages walked in one fetch.
///
/// The upstream paginator has been observed to behave, but a cyclic or
/// unbounded `next_page_url` chain must not hang the sync.
pub const MAX_PAGES: usize = 512;

/// Why a fetch stopped before exhausting the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Truncation {
    /// A page request failed (network error or non-success status).
    PageUnreachable { url: String },
    /// A page was not JSON or lacked the expected `data` array.
    MalformedPage { url: String },
    /// `next_page_url` pointed back at a page already visited.
    PaginationCycle { url: String },
    /// The defensive page cap was reached.
    PageLimitReached,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truncation::PageUnreachable { url } => write!(f, "page unreachable: {url}"),
            Truncation::MalformedPage { url } => write!(f, "malformed page: {url}"),
            Truncation::PaginationCycle { url } => write!(f, "pagination cycle at: {url}"),
            Truncation::PageLimitReached => write!(f, "page limit of {MAX_PAGES} reached"),
        }
    }
}

/// Outcome of a full catalog walk.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedCatalog {
    /// Records accumulated in arrival order.
    pub records: Vec<PluginRecord>,
    /// Set when pagination stopped early; `None` means the walk completed.
    pub truncation: Option<Truncation>,
}

impl FetchedCatalog {
    /// True when every page of the catalog was consumed.
    pub fn is_complete(&self) -> bool {
        self.truncation.is_none()
    }
}

/// Fetches the full plugin listing from a paginated endpoint.
pub struct PageFetcher<'a, H: HttpClient> {
    http: &'a H,
}

impl<'a, H: HttpClient> PageFetcher<'a, H> {
    pub fn new(http: &'a H) -> Self {
        Self { http }
    }

    /// Walks the catalog starting at `start_url`.
    ///
    /// Each page must be a JSON object with a `data` array and an optional
    /// `next_page_url`, which may be relative to the current page's host.
    pub async fn fetch_all(&self, start_url: &str) -> FetchedCatalog {
        let mut records = Vec::new();
        let mut visited = HashSet::new();
        let mut page_url = start_url.to_string();

        for _ in 0..MAX_PAGES {
            if !visited.insert(page_url.clone()) {
                warn!(url = %page_url, "next_page_url revisits an earlier page, stopping");
                return self.truncated(records, Truncation::PaginationCycle { url: page_url });
            }

            let body = match self.http.get(&page_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(url = %page_url, error = %e, "page fetch failed, stopping pagination");
                    return self.truncated(records, Truncation::PageUnreachable { url: page_url });
                }
            };

            let page: Value = match serde_json::from_slice(&body) {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %page_url, error = %e, "page is not valid JSON, stopping");
                    return self.truncated(records, Truncation::MalformedPage { url: page_url });
                }
            };

            let Some(data) = page.get("data").and_then(Value::as_array) else {
                warn!(url = %page_url, "page has no data array, stopping");
                return self.truncated(records, Truncation::MalformedPage { url: page_url });
            };

            debug!(url = %page_url, count = data.len(), "catalog page consumed");
            records.extend(data.iter().cloned().map(PluginRecord::from_value));

            match page.get("next_page_url").and_then(Value::as_str) {
                Some(next) if !next.is_empty() => {
                    match resolve_next_url(&page_url, next) {
                        Some(resolved) => page_url = resolved,
                        None => {
                            warn!(url = %page_url, next, "unresolvable next_page_url, stopping");
                            return self
                                .truncated(records, Truncation::MalformedPage { url: page_url });
                        }
                    };
                }
                // Absent, null, or empty: the catalog is exhausted.
                _ => {
                    return FetchedCatalog {
                        records,
                        truncation: None,
                    }
                }
            }
        }

        warn!(limit = MAX_PAGES, "page cap reached, stopping pagination");
        self.truncated(records, Truncation::PageLimitReached)
    }

    fn truncated(&self, records: Vec<PluginRecord>, reason: Truncation) -> FetchedCatalog {
        FetchedCatalog {
            records,
            truncation: Some(reason),
        }
    }
}

/// Resolves `next` against the page it came from.
///
/// The API sometimes hands back a bare path (`/recipes.json?page=2`); joining
/// against the current page URL restores the catalog host.
fn resolve_next_url(current: &str, next: &str) -> Option<String> {
    let base = Url::parse(current).ok()?;
    Some(base.join(next).ok()?.to_string())
}
