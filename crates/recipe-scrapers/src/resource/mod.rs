// ABOUTME: Content source: returns caller-supplied HTML untouched or fetches the page over HTTP.
// ABOUTME: Handles proxies, timeouts, content-length limits, and charset decoding.

use std::collections::HashMap;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::error::{Result, ScrapeError};
use crate::options::Timeout;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Desktop Firefox User-Agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:86.0) Gecko/20100101 Firefox/86.0";

/// What to extract from: a URL, raw content, or both.
#[derive(Debug, Clone, Default)]
pub struct Target {
    pub url: Option<String>,
    pub html: Option<String>,
}

impl Target {
    pub fn new(url: Option<String>, html: Option<String>) -> Self {
        Self { url, html }
    }

    /// Raw content, if any was supplied. Empty content counts as absent.
    pub fn raw_html(&self) -> Option<&str> {
        self.html.as_deref().filter(|h| !h.is_empty())
    }
}

/// Options for fetching a resource.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub proxies: HashMap<String, String>,
    pub timeout: Option<Timeout>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxies: HashMap::new(),
            timeout: None,
        }
    }
}

/// The text handed to the document model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub body: String,
    /// Final URL after redirects, or the caller's URL for raw content.
    pub url: Option<String>,
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body using the charset from the content-type header, or a detected one.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    lower.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|charset| charset.trim_matches('"').trim_matches('\'').to_string())
    })
}

/// Builds an HTTP client with rustls and the bundled webpki roots.
pub fn build_http_client(
    user_agent: &str,
    proxies: &HashMap<String, String>,
    timeout: Option<Timeout>,
) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .deflate(true);

    for (scheme, proxy_url) in proxies {
        let proxy = match scheme.as_str() {
            "all" => reqwest::Proxy::all(proxy_url),
            "http" => reqwest::Proxy::http(proxy_url),
            "https" => reqwest::Proxy::https(proxy_url),
            other => {
                return Err(ScrapeError::invalid_target(
                    proxy_url.as_str(),
                    "Fetch",
                    Some(anyhow::anyhow!("unsupported proxy scheme {:?}", other)),
                ))
            }
        }
        .map_err(|e| {
            ScrapeError::invalid_target(
                proxy_url.as_str(),
                "Fetch",
                Some(anyhow::anyhow!("invalid proxy: {}", e)),
            )
        })?;
        builder = builder.proxy(proxy);
    }

    builder = match timeout {
        Some(Timeout::Total(total)) => builder.timeout(total),
        Some(Timeout::Split { connect, read }) => builder.connect_timeout(connect).read_timeout(read),
        None => builder,
    };

    builder.build().map_err(|e| {
        ScrapeError::fetch(
            "",
            "Fetch",
            Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
        )
    })
}

/// Proxies and split timeouts are client-level settings in reqwest, so those
/// requests get a dedicated client. Everything else reuses `shared`.
fn client_for(shared: &reqwest::Client, opts: &FetchOptions) -> Result<reqwest::Client> {
    let needs_own = !opts.proxies.is_empty() || matches!(opts.timeout, Some(Timeout::Split { .. }));
    if needs_own {
        build_http_client(&opts.user_agent, &opts.proxies, opts.timeout)
    } else {
        Ok(shared.clone())
    }
}

/// Fetch a resource from the given URL.
pub async fn fetch(client: &reqwest::Client, url: &str, opts: &FetchOptions) -> Result<FetchResult> {
    if url.is_empty() {
        return Err(ScrapeError::invalid_target(url, "Fetch", None));
    }

    let parsed_url = url::Url::parse(url).map_err(|e| {
        ScrapeError::invalid_target(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScrapeError::invalid_target(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let client = client_for(client, opts)?;
    let mut request = client.get(url).header(USER_AGENT, &opts.user_agent);
    if let Some(Timeout::Total(total)) = opts.timeout {
        request = request.timeout(total);
    }

    let response = request.send().await.map_err(|e| {
        ScrapeError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
    })?;

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ScrapeError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    if status != 200 {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    let body = response.bytes().await.map_err(|e| {
        ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}

/// Produces the payload for `target`.
///
/// Non-empty raw content is returned as-is with the caller's URL and no I/O.
/// Otherwise the URL is fetched; a missing URL is an `InvalidTarget` error.
pub async fn acquire(
    client: &reqwest::Client,
    target: &Target,
    opts: &FetchOptions,
) -> Result<Payload> {
    if let Some(html) = target.raw_html() {
        return Ok(Payload {
            body: html.to_string(),
            url: target.url.clone(),
        });
    }

    let url = target
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            ScrapeError::invalid_target(
                "",
                "Acquire",
                Some(anyhow::anyhow!("either a URL or HTML content is required")),
            )
        })?;

    let fetched = fetch(client, url, opts).await?;
    Ok(Payload {
        body: fetched.text(),
        url: Some(fetched.final_url),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn test_client() -> reqwest::Client {
        build_http_client("test-agent", &HashMap::new(), None).unwrap()
    }

    #[tokio::test]
    async fn fetch_ok_utf8_with_default_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/recipe")
                .header("user-agent", DEFAULT_USER_AGENT);
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<h1>Soup</h1>");
        });

        let result = fetch(&test_client(), &server.url("/recipe"), &FetchOptions::default())
            .await
            .expect("fetch should succeed");
        mock.assert();

        assert_eq!(result.status, 200);
        assert_eq!(result.text(), "<h1>Soup</h1>");
        assert_eq!(result.final_url, server.url("/recipe"));
    }

    #[tokio::test]
    async fn fetch_non_200_is_fetch_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let err = fetch(&test_client(), &server.url("/missing"), &FetchOptions::default())
            .await
            .expect_err("should fail on 404");
        mock.assert();
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn fetch_follows_redirects() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/old");
            then.status(301).header("location", server.url("/new"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/new");
            then.status(200).body("moved");
        });

        let payload = acquire(
            &test_client(),
            &Target::new(Some(server.url("/old")), None),
            &FetchOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(payload.body, "moved");
        assert_eq!(payload.url.as_deref(), Some(server.url("/new").as_str()));
    }

    #[tokio::test]
    async fn raw_html_skips_network() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/r");
            then.status(200).body("fetched");
        });

        let target = Target::new(Some(server.url("/r")), Some("<p>raw</p>".to_string()));
        let payload = acquire(&test_client(), &target, &FetchOptions::default())
            .await
            .unwrap();
        mock.assert_hits(0);
        assert_eq!(payload.body, "<p>raw</p>");
        assert_eq!(payload.url, Some(server.url("/r")));
    }

    #[tokio::test]
    async fn empty_raw_html_is_fetched() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/r");
            then.status(200).body("fetched");
        });

        let target = Target::new(Some(server.url("/r")), Some(String::new()));
        let payload = acquire(&test_client(), &target, &FetchOptions::default())
            .await
            .unwrap();
        mock.assert();
        assert_eq!(payload.body, "fetched");
    }

    #[tokio::test]
    async fn missing_url_and_content_is_invalid_target() {
        let err = acquire(&test_client(), &Target::default(), &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_invalid_target());
    }

    #[tokio::test]
    async fn malformed_url_is_invalid_target() {
        for url in ["not a url", "ftp://x.com/r"] {
            let err = fetch(&test_client(), url, &FetchOptions::default())
                .await
                .unwrap_err();
            assert!(err.is_invalid_target(), "{}", url);
        }
    }

    #[tokio::test]
    async fn total_timeout_expires() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500)).body("late");
        });

        let opts = FetchOptions {
            timeout: Some(Timeout::Total(Duration::from_millis(50))),
            ..Default::default()
        };
        let err = fetch(&test_client(), &server.url("/slow"), &opts)
            .await
            .unwrap_err();
        assert!(err.is_fetch());
    }

    #[test]
    fn proxies_and_split_timeout_build() {
        let mut proxies = HashMap::new();
        proxies.insert("all".to_string(), "http://127.0.0.1:3128".to_string());
        let client = build_http_client(
            DEFAULT_USER_AGENT,
            &proxies,
            Some(Timeout::Split {
                connect: Duration::from_secs(1),
                read: Duration::from_secs(2),
            }),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn unknown_proxy_scheme_is_rejected() {
        let mut proxies = HashMap::new();
        proxies.insert("gopher".to_string(), "http://127.0.0.1:3128".to_string());
        let err = build_http_client(DEFAULT_USER_AGENT, &proxies, None).unwrap_err();
        assert!(err.is_invalid_target());
    }

    #[test]
    fn max_content_length_is_ten_megabytes() {
        assert_eq!(MAX_CONTENT_LENGTH, 10 * 1024 * 1024);
    }

    #[test]
    fn extract_charset_variants() {
        assert_eq!(
            extract_charset("text/html; charset=utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=ISO-8859-1"),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn decode_body_uses_declared_charset() {
        let latin1: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        assert_eq!(decode_body(latin1, Some("text/html; charset=iso-8859-1")), "caf\u{e9}");
        assert_eq!(decode_body("hello".as_bytes(), None), "hello");
    }
}
