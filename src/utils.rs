const SENSITIVE_FIELDS: &[&str] = &["access_token", "appsecret", "secret", "token"];

/// Replace the values of credential-bearing query parameters for logging.
pub(crate) fn redact_url(url: &str) -> String {
    let Some(idx) = url.find('?') else {
        return url.to_string();
    };

    let base = &url[..idx];
    let query = &url[idx + 1..];
    let redacted_query = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some((key, _)) if SENSITIVE_FIELDS.iter().any(|s| key.eq_ignore_ascii_case(s)) => {
                format!("{key}=[REDACTED]")
            }
            _ => param.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{base}?{redacted_query}")
}
