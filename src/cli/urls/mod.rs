//! Legacy url existence checker.
//!
//! Each url in the table is mapped onto the target site and fetched once.
//! A page exists unless its `<title>` contains the not-found marker.

mod table;

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use rayon::prelude::*;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::cli::UrlsArgs;
use crate::config::{ToolConfig, UrlsConfig};
use crate::logger::ProgressLine;
use crate::utils::plural_count;
use crate::{debug, log};

use table::UrlTable;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title>(.*?)</title>").unwrap());

/// Failure while fetching a page. Every variant counts as "does not exist".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url `{0}`: {1}")]
    Url(String, url::ParseError),
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Request(String),
    #[error("cannot read body: {0}")]
    Body(String),
}

/// Source of page bodies.
pub trait PageFetcher: Sync {
    fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher with a per-request timeout.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().map_err(classify)?;
        response.text().map_err(|e| FetchError::Body(e.to_string()))
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Request(err.to_string())
    }
}

/// Counts from one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UrlSummary {
    pub total: usize,
    pub existing: usize,
}

impl UrlSummary {
    pub fn missing(&self) -> usize {
        self.total - self.existing
    }
}

/// Check every url in the configured table and rewrite it with the flag column.
pub fn check_urls(config: &ToolConfig, args: &UrlsArgs) -> Result<UrlSummary> {
    let urls = &config.urls;
    let path = config.root_join(&urls.file);

    let mut table = UrlTable::load(&path, &urls.url_column, &urls.flag_column)?;
    if table.is_empty() {
        log!("urls"; "no urls in {}, nothing to check", path.display());
        return Ok(UrlSummary::default());
    }
    log!("urls"; "checking {} against {}", plural_count(table.len(), "url"), urls.target);

    let fetcher = HttpFetcher::new(urls.timeout())?;
    let summary = annotate(&mut table, urls, &fetcher)?;

    log!(
        "urls";
        "{} exist, {} missing",
        plural_count(summary.existing, "page"),
        summary.missing()
    );

    if args.dry_run {
        log!("urls"; "dry run, {} left unchanged", path.display());
    } else {
        table.save(&path, &urls.flag_column)?;
        log!("urls"; "updated {}", path.display());
    }

    Ok(summary)
}

/// Set the `exists` flag of every record, fetching on a bounded pool.
///
/// Records keep their input order whatever order the fetches complete in.
pub fn annotate(
    table: &mut UrlTable,
    config: &UrlsConfig,
    fetcher: &dyn PageFetcher,
) -> Result<UrlSummary> {
    let base = Url::parse(&config.target)
        .with_context(|| format!("invalid target `{}`", config.target))?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.concurrency)
        .build()
        .context("failed to build worker pool")?;

    let progress = ProgressLine::new("urls", table.len(), &["checked", "missing"]);
    let flags: Vec<bool> = pool.install(|| {
        table
            .records
            .par_iter()
            .map(|record| {
                let exists = check_one(&record.url, &base, config, fetcher);
                if !exists {
                    progress.inc("missing");
                }
                progress.inc("checked");
                exists
            })
            .collect()
    });
    progress.finish();

    let mut summary = UrlSummary {
        total: flags.len(),
        existing: 0,
    };
    for (record, exists) in table.records.iter_mut().zip(flags) {
        record.exists = exists;
        summary.existing += usize::from(exists);
    }
    Ok(summary)
}

fn check_one(raw: &str, base: &Url, config: &UrlsConfig, fetcher: &dyn PageFetcher) -> bool {
    let path = derive_path(raw, &config.legacy_host);
    let result = target_url(base, &path).and_then(|url| fetcher.fetch(&url));
    match result {
        Ok(body) => page_exists(&body, &config.not_found_marker),
        Err(e) => {
            debug!("urls"; "{}: {}", path, e);
            false
        }
    }
}

/// Remove the legacy host and make sure the result starts with exactly one `/`.
pub fn derive_path(raw: &str, legacy_host: &str) -> String {
    let stripped = if legacy_host.is_empty() {
        raw.to_string()
    } else {
        raw.replace(legacy_host, "")
    };
    format!("/{}", stripped.trim_start_matches('/'))
}

/// Join a derived path onto the target origin.
pub fn target_url(base: &Url, path: &str) -> Result<Url, FetchError> {
    base.join(path)
        .map_err(|e| FetchError::Url(path.to_string(), e))
}

/// First `<title>` of a page, if any.
pub fn extract_title(body: &str) -> Option<&str> {
    TITLE_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A page exists unless its lowercased title contains `marker`.
/// A page without a title exists.
pub fn page_exists(body: &str, marker: &str) -> bool {
    let title = extract_title(body).unwrap_or_default().to_lowercase();
    !title.contains(&marker.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rustc_hash::FxHashMap;

    /// Serves canned bodies by path; unknown paths fail like a timeout.
    #[derive(Default)]
    struct FakeFetcher {
        pages: FxHashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn page(mut self, path: &str, title: &str) -> Self {
            self.pages.insert(
                path.to_string(),
                format!("<html><head><title>{title}</title></head></html>"),
            );
            self
        }
    }

    impl PageFetcher for FakeFetcher {
        fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.requested.lock().push(url.to_string());
            self.pages
                .get(url.path())
                .cloned()
                .ok_or(FetchError::Timeout)
        }
    }

    fn config() -> UrlsConfig {
        UrlsConfig {
            concurrency: 2,
            ..UrlsConfig::default()
        }
    }

    #[test]
    fn test_derive_path() {
        assert_eq!(derive_path("docs.statsig.com/guides/a", "docs.statsig.com"), "/guides/a");
        assert_eq!(derive_path("/guides/a", "docs.statsig.com"), "/guides/a");
        assert_eq!(derive_path("guides/a", "docs.statsig.com"), "/guides/a");
        assert_eq!(derive_path("docs.statsig.com", "docs.statsig.com"), "/");
        assert_eq!(derive_path("", "docs.statsig.com"), "/");
        assert_eq!(derive_path("//cdn/x", ""), "/cdn/x");
    }

    #[test]
    fn test_target_url_single_slash() {
        let base = Url::parse("https://statsig-4b2ff144.mintlify.app").unwrap();
        let url = target_url(&base, "/guides/a").unwrap();
        assert_eq!(url.as_str(), "https://statsig-4b2ff144.mintlify.app/guides/a");
    }

    #[test]
    fn test_extract_title_case_insensitive() {
        assert_eq!(extract_title("<TITLE>Home</TITLE>"), Some("Home"));
        assert_eq!(extract_title("<title>a</title><title>b</title>"), Some("a"));
        assert_eq!(extract_title("<p>no title</p>"), None);
    }

    #[test]
    fn test_page_exists() {
        assert!(page_exists("<title>Getting Started</title>", "page not found"));
        assert!(!page_exists("<title>Page Not Found - Docs</title>", "page not found"));
        assert!(page_exists("<html></html>", "page not found"));
        assert!(page_exists("", "page not found"));
    }

    #[test]
    fn test_annotate_sets_flags_in_order() {
        let mut table = UrlTable::parse(
            "f0_,cleaned_url\n\
             1,docs.statsig.com/a\n\
             2,docs.statsig.com/gone\n\
             3,docs.statsig.com/down\n\
             4,/b\n",
            "cleaned_url",
            "exists in mint docs",
        )
        .unwrap();
        let fetcher = FakeFetcher::default()
            .page("/a", "A")
            .page("/gone", "Page Not Found")
            .page("/b", "B");

        let summary = annotate(&mut table, &config(), &fetcher).unwrap();

        let flags: Vec<_> = table.records.iter().map(|r| r.exists).collect();
        assert_eq!(flags, vec![true, false, false, true]);
        assert_eq!(summary, UrlSummary { total: 4, existing: 2 });
        assert_eq!(summary.missing(), 2);
        assert_eq!(fetcher.requested.lock().len(), 4);
    }

    #[test]
    fn test_annotate_rewrites_table() {
        let mut table =
            UrlTable::parse("cleaned_url\ndocs.statsig.com/a\n", "cleaned_url", "exists in mint docs")
                .unwrap();
        let fetcher = FakeFetcher::default().page("/a", "A");
        annotate(&mut table, &config(), &fetcher).unwrap();
        assert_eq!(
            table.to_csv_string("exists in mint docs").unwrap(),
            "cleaned_url,exists in mint docs\ndocs.statsig.com/a,True\n"
        );
    }

    #[test]
    fn test_annotate_empty_table() {
        let mut table = UrlTable::parse("cleaned_url\n", "cleaned_url", "flag").unwrap();
        let summary = annotate(&mut table, &config(), &FakeFetcher::default()).unwrap();
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_check_urls_empty_table_left_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let content = "f0_,cleaned_url\n";
        std::fs::write(dir.path().join("urls.csv"), content).unwrap();
        let config = ToolConfig {
            root: dir.path().to_path_buf(),
            urls: UrlsConfig {
                file: "urls.csv".into(),
                ..config()
            },
            ..ToolConfig::default()
        };

        let summary = check_urls(&config, &UrlsArgs::default()).unwrap();
        assert_eq!(summary, UrlSummary::default());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("urls.csv")).unwrap(),
            content
        );
    }

    #[test]
    fn test_requested_urls_use_target() {
        let mut table = UrlTable::parse("cleaned_url\ndocs.statsig.com/x\n", "cleaned_url", "flag").unwrap();
        let fetcher = FakeFetcher::default();
        annotate(&mut table, &config(), &fetcher).unwrap();
        assert_eq!(
            fetcher.requested.lock().as_slice(),
            &["https://statsig-4b2ff144.mintlify.app/x".to_string()]
        );
    }
}
