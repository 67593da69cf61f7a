use url::Url;

const MIN_URL_LEN: usize = 4;
const MAX_URL_LEN: usize = 2048;
const MAX_LABEL_LEN: usize = 63;

/// Hosts that would make the shortener redirect back to the visitor's own machine.
const BLOCKED_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("URL is too short")]
    TooShort,

    #[error("URL is too long (max 2048 characters)")]
    TooLong,

    #[error("URL must use http or https protocol")]
    UnsupportedScheme,

    #[error("Invalid URL format: {0}")]
    Malformed(String),

    #[error("URL must contain a valid domain")]
    MissingDomain,

    #[error("URL contains invalid domain format")]
    InvalidDomain,

    #[error("Cannot shorten localhost URLs")]
    Localhost,
}

/// Trim, default the scheme to `http://`, and check the domain.
///
/// The returned string is the caller's input with only those two changes
/// applied; it is what the store indexes, so two submissions normalize to the
/// same key exactly when they differ only by surrounding whitespace or a
/// missing `http://`.
pub fn normalize_url(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let len = trimmed.chars().count();
    if len < MIN_URL_LEN {
        return Err(UrlError::TooShort);
    }
    if len > MAX_URL_LEN {
        return Err(UrlError::TooLong);
    }

    // The stored string ends up verbatim in a `Location` header.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlError::Malformed("contains control characters".into()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let normalized = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_owned()
    } else if trimmed.contains("://") {
        return Err(UrlError::UnsupportedScheme);
    } else {
        format!("http://{trimmed}")
    };

    let parsed = Url::parse(&normalized).map_err(|e| UrlError::Malformed(e.to_string()))?;
    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(UrlError::MissingDomain),
    };

    if !is_valid_domain(host) {
        return Err(UrlError::InvalidDomain);
    }
    if BLOCKED_HOSTS.iter().any(|b| host.eq_ignore_ascii_case(b)) {
        return Err(UrlError::Localhost);
    }

    Ok(normalized)
}

/// Dot-separated labels of letters, digits and inner hyphens, 1–63 chars each.
fn is_valid_domain(host: &str) -> bool {
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}
