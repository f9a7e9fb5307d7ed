use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization:\s*)(\S+(?:\s+\S+)?)",
        r"(?i)(bearer\s+)([\w\-\.=:/+]+)",
        r#"(?i)("(?:token|accessToken|access_token|password|secret)"\s*:\s*")([^"]+)"#,
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
        r"()(xox[abprs]-[\w-]+)",
        r"()(ya29\.[\w\-\.]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in REDACT_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |caps: &Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_json_token_fields() {
        let rendered = r#"{"slack": {"token": "xoxb-1234-abcd", "channelId": "C01"}}"#;
        let redacted = redact_sensitive(rendered);
        assert!(!redacted.contains("xoxb-1234-abcd"));
        assert!(redacted.contains(r#""channelId": "C01""#));
    }

    #[test]
    fn redacts_bare_provider_tokens() {
        let redacted = redact_sensitive("using ya29.a0AfH6SMB and xoxb-99-zz");
        assert_eq!(redacted, "using <redacted> and <redacted>");
    }

    #[test]
    fn redacts_env_style_assignments() {
        assert_eq!(redact_sensitive("SLACK_TOKEN=abc123"), "SLACK_TOKEN=<redacted>");
    }
}
