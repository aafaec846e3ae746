//! Logging utilities with sensitive data redaction.

use http::HeaderMap;

/// Form fields whose values never reach the logs
const SENSITIVE_PARAMS: [&str; 5] = ["token", "key", "secret", "password", "api_key"];

/// Headers whose values never reach the logs
const SENSITIVE_HEADERS: [&str; 3] = ["authorization", "cookie", "proxy-authorization"];

/// Redact token from a string, preserving prefix for debugging
pub fn redact_token(token: &str) -> String {
    match token.get(..5) {
        Some(prefix) if token.len() > 8 => format!("{}...[REDACTED]", prefix),
        _ => "[REDACTED]".to_string(),
    }
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_PARAMS.iter().any(|s| key.eq_ignore_ascii_case(s))
}

/// Redact a URL, hiding any tokens in query parameters
pub fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive(key) => format!("{}=[REDACTED]", key),
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", base, pairs.join("&"))
}

/// Render form fields for a trace dump, masking sensitive values
pub fn redact_fields(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            if is_sensitive(key) {
                format!("{}={}", key, redact_token(value))
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Render request headers for a trace dump, masking credentials
pub fn redact_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                format!("{}: [REDACTED]", name)
            } else {
                format!("{}: {}", name, value.to_str().unwrap_or("<binary>"))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
