//! Quote lookup client.
//!
//! One blocking GET per call, no retries, no caching. Every failure comes
//! back as an empty payload so the caller sees "no results".

use std::time::Duration;

use tracing::{debug, warn};
use url::form_urlencoded;
use url::Url;

use quotefinder_core::config::LookupConfig;

use crate::error::{LookupError, SkillError};

/// Source of raw search payloads.
pub trait QuoteLookup {
    /// Fetch the raw payload for an already escaped phrase.
    ///
    /// Returns an empty string on any failure.
    fn fetch(&self, escaped_phrase: &str) -> String;
}

/// Percent-escape a phrase so it can be used as a single URL path segment.
pub fn escape_phrase(phrase: &str) -> String {
    // byte_serialize emits '+' for spaces and escapes literal '+' as %2B,
    // so swapping '+' for %20 yields a path-safe segment.
    form_urlencoded::byte_serialize(phrase.trim().as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

// =============================================================================
// HttpQuoteLookup
// =============================================================================

/// [`QuoteLookup`] backed by the remote quote search service.
pub struct HttpQuoteLookup {
    agent: ureq::Agent,
    base_url: Url,
}

impl HttpQuoteLookup {
    /// Build a client from lookup settings.
    pub fn new(config: &LookupConfig) -> Result<Self, SkillError> {
        if config.timeout_secs == 0 {
            return Err(SkillError::Config(
                "lookup timeout must be greater than 0".to_string(),
            ));
        }
        let base_url = config.base_url()?;
        let timeout = Duration::from_secs(config.timeout_secs);
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(&config.user_agent)
            .build();
        Ok(Self { agent, base_url })
    }

    /// Full request URL for an escaped phrase.
    pub fn request_url(&self, escaped_phrase: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            escaped_phrase
        )
    }

    fn try_fetch(&self, escaped_phrase: &str) -> Result<String, LookupError> {
        let url = self.request_url(escaped_phrase);
        debug!(url = %url, "Quote lookup request");

        let response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::Status(status, _) => {
                LookupError::NetworkFailure(format!("http status {}", status))
            }
            ureq::Error::Transport(transport) => {
                LookupError::NetworkFailure(transport.to_string())
            }
        })?;

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(LookupError::NetworkFailure(format!(
                "http status {}",
                status
            )));
        }

        response
            .into_string()
            .map_err(|e| LookupError::NetworkFailure(format!("reading body: {}", e)))
    }
}

impl QuoteLookup for HttpQuoteLookup {
    fn fetch(&self, escaped_phrase: &str) -> String {
        match self.try_fetch(escaped_phrase) {
            Ok(body) => {
                debug!(bytes = body.len(), "Quote lookup response received");
                body
            }
            Err(e) => {
                warn!(error = %e, "Quote lookup failed, treating as no results");
                String::new()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn config_for(base_url: String) -> LookupConfig {
        LookupConfig {
            base_url,
            timeout_secs: 2,
            user_agent: "quotefinder-test".to_string(),
        }
    }

    /// Serve exactly one canned HTTP response and hand back the request line.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 2048];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}/search/", addr), handle)
    }

    // ---- escape_phrase ----

    #[test]
    fn test_escape_spaces_as_percent_20() {
        assert_eq!(escape_phrase("I am your father"), "I%20am%20your%20father");
    }

    #[test]
    fn test_escape_reserved_characters() {
        assert_eq!(escape_phrase("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(escape_phrase("1+1"), "1%2B1");
    }

    #[test]
    fn test_escape_trims_and_keeps_unreserved() {
        assert_eq!(escape_phrase("  hello-world_v1.0  "), "hello-world_v1.0");
    }

    #[test]
    fn test_escape_apostrophe_and_comma() {
        assert_eq!(escape_phrase("No, I'm"), "No%2C%20I%27m");
    }

    // ---- HttpQuoteLookup ----

    #[test]
    fn test_new_rejects_zero_timeout() {
        let mut config = config_for("http://localhost/search/".to_string());
        config.timeout_secs = 0;
        assert!(matches!(
            HttpQuoteLookup::new(&config),
            Err(SkillError::Config(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let config = config_for("definitely not a url".to_string());
        assert!(HttpQuoteLookup::new(&config).is_err());
    }

    #[test]
    fn test_request_url_joins_segment() {
        let lookup = HttpQuoteLookup::new(&config_for("http://localhost/search/".to_string())).unwrap();
        assert_eq!(
            lookup.request_url("hello%20there"),
            "http://localhost/search/hello%20there"
        );

        let lookup = HttpQuoteLookup::new(&config_for("http://localhost/search".to_string())).unwrap();
        assert_eq!(lookup.request_url("x"), "http://localhost/search/x");
    }

    #[test]
    fn test_fetch_returns_body() {
        let (base, handle) = serve_once("200 OK", r#"{"docs": []}"#);
        let lookup = HttpQuoteLookup::new(&config_for(base)).unwrap();
        let body = lookup.fetch(&escape_phrase("show me the money"));
        assert_eq!(body, r#"{"docs": []}"#);

        let request_line = handle.join().unwrap();
        assert_eq!(
            request_line,
            "GET /search/show%20me%20the%20money HTTP/1.1"
        );
    }

    #[test]
    fn test_fetch_non_2xx_is_empty() {
        let (base, handle) = serve_once("503 Service Unavailable", "down");
        let lookup = HttpQuoteLookup::new(&config_for(base)).unwrap();
        assert_eq!(lookup.fetch("anything"), "");
        handle.join().unwrap();
    }

    #[test]
    fn test_fetch_connection_refused_is_empty() {
        // Bind then drop to get a port nothing listens on.
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let lookup = HttpQuoteLookup::new(&config_for(format!("http://{}/search/", addr))).unwrap();
        assert_eq!(lookup.fetch("anything"), "");
    }
}
