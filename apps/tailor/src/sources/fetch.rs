//! Job posting retrieval: local file or HTTP page reduced to plain text.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use tracing::debug;

use crate::errors::{CollaboratorError, FetchError};
use crate::models::truncate_chars;

/// Job text beyond this is dropped before it reaches the prompt.
pub const MAX_JOB_TEXT_CHARS: usize = 8000;
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const NOISE_TAGS: &[&str] = &["script", "style", "noscript", "nav", "header", "footer", "aside"];

static RE_NOISE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NOISE_TAGS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).unwrap())
        .collect()
});
static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static RE_MAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<main\b[^>]*>(.*?)</main\s*>").unwrap());
static RE_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Where the job text comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum JobSource<'a> {
    File(&'a Path),
    Url(&'a str),
}

impl<'a> JobSource<'a> {
    /// A locator naming an existing file is read from disk; anything else is
    /// treated as a URL.
    pub fn classify(locator: &'a str) -> Self {
        let path = Path::new(locator);
        if path.is_file() {
            JobSource::File(path)
        } else {
            JobSource::Url(locator)
        }
    }
}

#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()?,
        })
    }

    /// Returns at most [`MAX_JOB_TEXT_CHARS`] of job text for `locator`.
    pub async fn job_text(&self, locator: &str) -> Result<String, CollaboratorError> {
        let text = match JobSource::classify(locator) {
            JobSource::File(path) => {
                debug!("Reading job description from file: {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CollaboratorError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?
            }
            JobSource::Url(url) => {
                debug!("Fetching: {url}");
                self.fetch_page_text(url).await?
            }
        };
        Ok(truncate_chars(&text, MAX_JOB_TEXT_CHARS).to_string())
    }

    async fn fetch_page_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let html = response.text().await?;
        let text = html_to_text(&html);
        if text.is_empty() {
            return Err(FetchError::Empty(url.to_string()));
        }
        Ok(text)
    }
}

/// Reduces an HTML page to its readable lines.
///
/// Drops scripts, styles and page chrome, prefers the `<main>` element over
/// the whole body, and emits one trimmed line per text run.
pub fn html_to_text(html: &str) -> String {
    let mut cleaned = RE_COMMENT.replace_all(html, "").into_owned();
    for re in RE_NOISE.iter() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }

    let content = RE_MAIN
        .captures(&cleaned)
        .or_else(|| RE_BODY.captures(&cleaned))
        .and_then(|c| c.get(1))
        .map_or(cleaned.as_str(), |m| m.as_str());

    let text = RE_TAG.replace_all(content, "\n");
    text.lines()
        .map(|line| decode_entities(line.trim()))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Jobs</title><style>body { color: red; }</style></head>
<body>
  <header><a href="/">Home</a></header>
  <nav><ul><li>Careers</li></ul></nav>
  <main id="job">
    <h1>Senior Rust Engineer</h1>
    <p>Build   distributed systems at <b>Acme &amp; Co</b>.</p>
    <!-- tracking pixel -->
    <script>window.dataLayer = [];</script>
    <ul><li>5+ years Rust</li><li>Tokio</li></ul>
  </main>
  <footer>© Acme</footer>
</body>
</html>"#;

    #[test]
    fn test_html_to_text_prefers_main_and_drops_chrome() {
        let text = html_to_text(PAGE);
        assert!(text.starts_with("Senior Rust Engineer"));
        assert!(text.contains("Acme & Co"));
        assert!(text.contains("5+ years Rust\nTokio"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("dataLayer"));
        assert!(!text.contains("tracking pixel"));
        assert!(!text.contains("© Acme"));
    }

    #[test]
    fn test_html_to_text_falls_back_to_body() {
        let html = "<html><body><div>Role: SRE</div><script>x()</script></body></html>";
        assert_eq!(html_to_text(html), "Role: SRE");
    }

    #[test]
    fn test_html_to_text_empty_page() {
        assert_eq!(html_to_text("<html><body><script>x()</script></body></html>"), "");
    }

    #[test]
    fn test_classify_file_and_url() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(JobSource::classify(path), JobSource::File(Path::new(path)));
        assert_eq!(
            JobSource::classify("https://jobs.example.com/1"),
            JobSource::Url("https://jobs.example.com/1")
        );
    }

    #[tokio::test]
    async fn test_job_text_reads_and_truncates_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, "x".repeat(MAX_JOB_TEXT_CHARS + 50).as_bytes())
            .unwrap();

        let fetcher = PageFetcher::new().unwrap();
        let text = fetcher
            .job_text(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(text.len(), MAX_JOB_TEXT_CHARS);
    }

    #[tokio::test]
    async fn test_unreachable_url_is_a_fetch_error() {
        let fetcher = PageFetcher::new().unwrap();
        let err = fetcher
            .job_text("http://127.0.0.1:9/jobs/1")
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Fetch(_)));
    }
}
