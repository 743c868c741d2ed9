//! Processing service endpoint shared by the HTTP adapters

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Errors building an endpoint
#[derive(Debug, Clone, Error)]
pub enum EndpointError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Base URL of the processing service plus the HTTP client used to reach it.
///
/// Cloning is cheap: the client shares its connection pool.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
    client: reqwest::Client,
}

impl Endpoint {
    /// Create an endpoint for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EndpointError> {
        let base = parse_base(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EndpointError::Client(e.to_string()))?;

        Ok(Self { base, client })
    }

    /// The normalized base URL (always ends with `/`)
    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Resolve a reference against the base URL.
    ///
    /// Absolute URLs are returned as is; `/path` references are resolved
    /// against the server origin, like a browser would.
    pub fn resolve(&self, reference: &str) -> Result<Url, url::ParseError> {
        self.base.join(reference.trim())
    }
}

fn parse_base(base_url: &str) -> Result<Url, EndpointError> {
    let invalid = |reason: String| EndpointError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    // Joining relative paths onto "http://host/prefix" would drop "prefix"
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(base: &str) -> Endpoint {
        Endpoint::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_gets_trailing_slash() {
        assert_eq!(endpoint("http://localhost:8000").base().as_str(), "http://localhost:8000/");
        assert_eq!(
            endpoint("https://example.com/podcast").base().as_str(),
            "https://example.com/podcast/"
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(Endpoint::new("ftp://example.com", Duration::from_secs(1)).is_err());
        assert!(Endpoint::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn resolves_relative_references() {
        let ep = endpoint("https://example.com/podcast");
        assert_eq!(
            ep.resolve("api/process_audio").unwrap().as_str(),
            "https://example.com/podcast/api/process_audio"
        );
        assert_eq!(
            ep.resolve("/media/processed/a.wav").unwrap().as_str(),
            "https://example.com/media/processed/a.wav"
        );
    }

    #[test]
    fn absolute_references_pass_through() {
        let ep = endpoint("http://localhost:8000");
        assert_eq!(
            ep.resolve("https://cdn.example.com/a.wav").unwrap().as_str(),
            "https://cdn.example.com/a.wav"
        );
    }
}
