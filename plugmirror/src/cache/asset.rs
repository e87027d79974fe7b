//! Age-checked asset downloads.
//!
//! [`AssetCache::ensure_fresh`] is the single decision point for whether an
//! image gets (re)downloaded. Download failures are not errors: the previous
//! file, if any, stays in place and the caller is told nothing happened.

use crate::cache::CacheError;
use crate::http::HttpClient;
use crate::time::{file_age, Clock};
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Downloads remote assets into the cache, honoring a max-age policy.
pub struct AssetCache<'a, H: HttpClient, C: Clock> {
    http: &'a H,
    clock: &'a C,
}

impl<'a, H: HttpClient, C: Clock> AssetCache<'a, H, C> {
    pub fn new(http: &'a H, clock: &'a C) -> Self {
        Self { http, clock }
    }

    /// Ensures the file at `path` holds a fresh copy of `url`.
    ///
    /// The download is skipped when the file exists and either no `max_age`
    /// is given or its age is within `max_age` (the boundary is exclusive:
    /// only `age > max_age` triggers a refresh). On a failed fetch or an
    /// empty response body the existing file is left untouched.
    ///
    /// Returns `Ok(true)` only when a new copy was written. Local I/O
    /// failures while persisting the download are real errors.
    pub async fn ensure_fresh(
        &self,
        url: &str,
        path: &Path,
        max_age: Option<Duration>,
    ) -> Result<bool, CacheError> {
        let stale = match file_age(self.clock, path) {
            None => true,
            Some(age) => match max_age {
                Some(limit) => age > limit,
                None => false,
            },
        };
        if !stale {
            return Ok(false);
        }

        let body = match self.http.get(url).await {
            Ok(body) if !body.is_empty() => body,
            Ok(_) => {
                warn!(url, "empty response body, keeping existing file");
                return Ok(false);
            }
            Err(e) => {
                warn!(url, error = %e, "asset fetch failed, keeping existing file");
                return Ok(false);
            }
        };

        // Write the full body to a sibling temp file, then rename over the
        // target. A failed download can never truncate a good file.
        let tmp = temp_path(path);
        fs::write(&tmp, &body)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(url, path = %path.display(), bytes = body.len(), "asset downloaded");
        Ok(true)
    }
}

fn temp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockHttpClient;
    use crate::time::mock::FixedClock;
    use tempfile::TempDir;

    const URL: &str = "https://img.example/icon.png";

    #[tokio::test]
    async fn downloads_when_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        let http = MockHttpClient::new().respond(URL, b"body".to_vec());
        let clock = FixedClock::starting_now();

        let downloaded = AssetCache::new(&http, &clock)
            .ensure_fresh(URL, &path, Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(downloaded);
        assert_eq!(fs::read(&path).unwrap(), b"body");
    }

    #[tokio::test]
    async fn skips_fresh_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"old").unwrap();
        let http = MockHttpClient::new().respond(URL, b"new".to_vec());
        let clock = FixedClock::starting_now();

        let downloaded = AssetCache::new(&http, &clock)
            .ensure_fresh(URL, &path, Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(!downloaded);
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn existing_file_without_max_age_never_refreshes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"old").unwrap();
        let http = MockHttpClient::new().respond(URL, b"new".to_vec());
        let clock = FixedClock::starting_now();
        clock.advance(Duration::from_secs(1_000_000));

        let downloaded = AssetCache::new(&http, &clock)
            .ensure_fresh(URL, &path, None)
            .await
            .unwrap();

        assert!(!downloaded);
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[tokio::test]
    async fn redownloads_past_max_age() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"old").unwrap();
        let http = MockHttpClient::new().respond(URL, b"new".to_vec());
        let clock = FixedClock::starting_now();
        clock.advance(Duration::from_secs(61));

        let downloaded = AssetCache::new(&http, &clock)
            .ensure_fresh(URL, &path, Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(downloaded);
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn age_exactly_at_max_age_is_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"old").unwrap();
        let http = MockHttpClient::new().respond(URL, b"new".to_vec());

        let mtime = fs::metadata(&path).unwrap().modified().unwrap();
        let clock = FixedClock::new(mtime + Duration::from_secs(60));

        let downloaded = AssetCache::new(&http, &clock)
            .ensure_fresh(URL, &path, Some(Duration::from_secs(60)))
            .await
            .unwrap();

        // Boundary is exclusive: age == max_age does not refresh.
        assert!(!downloaded);
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[tokio::test]
    async fn fetch_failure_preserves_stale_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"old").unwrap();
        let http = MockHttpClient::new(); // no routes: every fetch fails
        let clock = FixedClock::starting_now();
        clock.advance(Duration::from_secs(3600));

        let downloaded = AssetCache::new(&http, &clock)
            .ensure_fresh(URL, &path, Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(!downloaded);
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[tokio::test]
    async fn empty_body_preserves_stale_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"old").unwrap();
        let http = MockHttpClient::new().respond(URL, Vec::new());
        let clock = FixedClock::starting_now();
        clock.advance(Duration::from_secs(3600));

        let downloaded = AssetCache::new(&http, &clock)
            .ensure_fresh(URL, &path, Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(!downloaded);
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[tokio::test]
    async fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        let http = MockHttpClient::new().respond(URL, b"body".to_vec());
        let clock = FixedClock::starting_now();

        AssetCache::new(&http, &clock)
            .ensure_fresh(URL, &path, None)
            .await
            .unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.path().extension().is_some_and(|x| x == "part"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
