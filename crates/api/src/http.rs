use std::{env, time::Duration};

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Url, header};

/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Builds a `reqwest::Client` that authenticates every request with `bearer_token`.
pub(crate) fn bearer_client(bearer_token: &str) -> Result<Client> {
    let mut default_headers = header::HeaderMap::new();
    let mut authorization = header::HeaderValue::from_str(&format!("Bearer {}", bearer_token.trim()))
        .context("access token contains characters not allowed in a header")?;
    authorization.set_sensitive(true);
    default_headers.insert(header::AUTHORIZATION, authorization);
    default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(default_headers)
        .user_agent(format!("nudge/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS))
        .timeout(Duration::from_secs(30))
        .build()
        .context("build http client")
}

/// Validate that a base URL is acceptable for use by the clients.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
///
/// Returns the base URL without a trailing slash.
pub fn validate_base_url(base: &str) -> Result<String> {
    let parsed = Url::parse(base).map_err(|e| anyhow!("Invalid base URL '{}': {}", base, e))?;
    let host_name = parsed.host_str().ok_or_else(|| anyhow!("base URL '{}' must include a host", base))?;

    let is_local = LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed));
    if !is_local && parsed.scheme() != "https" {
        return Err(anyhow!(
            "base URL must use https for non-localhost hosts; got '{}://{}'",
            parsed.scheme(),
            host_name
        ));
    }

    Ok(base.trim_end_matches('/').to_string())
}

/// First part of a response body, for error messages.
pub(crate) fn excerpt(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((index, _)) => format!("{}…", &trimmed[..index]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_and_strips_trailing_slash() {
        assert_eq!(validate_base_url("https://slack.com/api/").expect("valid"), "https://slack.com/api");
    }

    #[test]
    fn allows_plain_http_on_localhost() {
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
        assert!(validate_base_url("http://LOCALHOST:9000/api").is_ok());
    }

    #[test]
    fn rejects_plain_http_on_remote_hosts() {
        let error = validate_base_url("http://slack.com/api").expect_err("http remote");
        assert!(error.to_string().contains("https"));
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let body = "x".repeat(500);
        let short = excerpt(&body);
        assert_eq!(short.chars().count(), 201);
        assert_eq!(excerpt("  ok  "), "ok");
    }
}
