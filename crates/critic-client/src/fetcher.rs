use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use critic_core::error::FetchError;
use critic_core::models::{RawDocument, SourceLocation};
use critic_core::traits::Fetcher;
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

/// Desktop browser identifier sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
/// Request English content.
pub const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP fetcher using reqwest.
///
/// Downloads raw HTML with a fixed browser User-Agent, an English
/// `Accept-Language` and a bounded timeout. One request per call, no retries.
/// By default, SSRF protection is **enabled**: requests to private/reserved
/// IP ranges are blocked. Use [`allow_private_urls`](Self::allow_private_urls)
/// to disable this (e.g., for CLI usage where the user controls the machine).
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
    ssrf_protection: bool,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
        );

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
            ssrf_protection: true,
        })
    }

    /// Disable SSRF protection, allowing requests to private/reserved IPs.
    ///
    /// Only use this for CLI usage where the user controls the machine.
    pub fn allow_private_urls(mut self) -> Self {
        self.ssrf_protection = false;
        self
    }

    async fn fetch_url(&self, url: &str) -> Result<RawDocument, FetchError> {
        let parsed = parse_http_url(url)?;
        if self.ssrf_protection {
            validate_host(&parsed).await?;
        }

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                FetchError::Network(format!("Connection failed: {e}"))
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                location: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Decoded with the Content-Type charset, UTF-8 when none is given
        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Http(format!("Failed to read response body: {e}"))
            }
        })?;

        let document = RawDocument::from_html(html).with_status(status.as_u16());
        Ok(match content_type {
            Some(content_type) => document.with_content_type(content_type),
            None => document,
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, location: &SourceLocation) -> Result<RawDocument, FetchError> {
        match location {
            SourceLocation::Url(url) => self.fetch_url(url).await,
            SourceLocation::File(path) => Err(FetchError::InvalidLocation(format!(
                "{} is a local path; the HTTP fetcher only handles URLs",
                path.display()
            ))),
        }
    }
}

/// Reads documents saved on local storage.
///
/// Saved pages often carry a preamble before the markup (e.g. HTML embedded in
/// an RTF export); everything before the first `<!DOCTYPE html` or `<html` is
/// dropped. A file without either marker is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    pub fn new() -> Self {
        Self
    }

    async fn read(&self, path: &Path) -> Result<RawDocument, FetchError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {e}", path.display())))?;
        let content = String::from_utf8_lossy(&bytes);

        let start = markup_start(&content)
            .ok_or_else(|| FetchError::NoMarkup(path.display().to_string()))?;
        if start > 0 {
            tracing::debug!(skipped = start, "Dropped preamble before markup");
        }

        Ok(RawDocument::from_html(&content[start..]))
    }
}

impl Fetcher for FileFetcher {
    async fn fetch(&self, location: &SourceLocation) -> Result<RawDocument, FetchError> {
        match location {
            SourceLocation::File(path) => self.read(path).await,
            SourceLocation::Url(url) => Err(FetchError::InvalidLocation(format!(
                "{url} is a URL; the file fetcher only handles local paths"
            ))),
        }
    }
}

/// Byte offset of the first `<!DOCTYPE html`, else the first `<html`.
fn markup_start(content: &str) -> Option<usize> {
    let lower = content.to_ascii_lowercase();
    lower.find("<!doctype html").or_else(|| lower.find("<html"))
}

/// Dispatches each location to the network or the local-file fetcher.
#[derive(Clone)]
pub struct SourceFetcher {
    http: ReqwestFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    pub fn new(http: ReqwestFetcher) -> Self {
        Self {
            http,
            file: FileFetcher::new(),
        }
    }
}

impl Fetcher for SourceFetcher {
    async fn fetch(&self, location: &SourceLocation) -> Result<RawDocument, FetchError> {
        match location {
            SourceLocation::Url(_) => self.http.fetch(location).await,
            SourceLocation::File(_) => self.file.fetch(location).await,
        }
    }
}

// ---------------------------------------------------------------------------
// SSRF protection
// ---------------------------------------------------------------------------

/// Parse a location string, accepting only `http` and `https`.
fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidLocation(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidLocation(format!(
            "URL scheme '{scheme}' is not allowed (only http/https)"
        ))),
    }
}

/// Reject hosts that are, or resolve to, private/reserved addresses (SSRF guard).
async fn validate_host(parsed: &Url) -> Result<(), FetchError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| FetchError::InvalidLocation(format!("{parsed} has no host")))?;

    // IP literals are checked directly, without DNS
    let literal = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = literal.parse::<IpAddr>() {
        if is_private_ip(ip) {
            return Err(FetchError::Blocked(format!(
                "{host} resolves to private/reserved IP"
            )));
        }
        return Ok(());
    }

    let port = parsed.port_or_known_default().unwrap_or(80);
    let addr = format!("{host}:{port}");
    let addrs: Vec<_> = tokio::net::lookup_host(&addr)
        .await
        .map_err(|e| FetchError::Network(format!("DNS resolution failed for {host}: {e}")))?
        .collect();

    if addrs.is_empty() {
        return Err(FetchError::Network(format!(
            "DNS resolution returned no addresses for {host}"
        )));
    }

    for socket_addr in &addrs {
        if is_private_ip(socket_addr.ip()) {
            return Err(FetchError::Blocked(format!(
                "{host} resolves to private/reserved IP {}",
                socket_addr.ip()
            )));
        }
    }

    Ok(())
}

/// Check if an IP address is in a private/reserved/link-local range.
fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local() // 169.254.0.0/16 (cloud metadata)
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64 // 100.64.0.0/10 (CGN)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xFFC0) == 0xFE80 // fe80::/10
                || (v6.segments()[0] & 0xFE00) == 0xFC00 // fc00::/7
                || v6.to_ipv4_mapped().is_some_and(|v4| is_private_ip(IpAddr::V4(v4)))
        }
    }
}
