//! Address-bar input resolution.
//!
//! Input that already names a location (an absolute URL, or a bare
//! fully-qualified domain name optionally followed by a path) is passed
//! through untouched; anything else becomes a search query.

use url::Url;

use crate::types::settings::NavigationSettings;

/// Placeholder replaced by the encoded query in a search template.
pub const QUERY_PLACEHOLDER: &str = "{}";

/// Schemes accepted without a host component.
const HOSTLESS_SCHEMES: &[&str] = &["about", "data", "file"];

/// Resolves raw input into the URL to load.
///
/// Empty input resolves to `settings.default_url`.
pub fn resolve(input: &str, settings: &NavigationSettings) -> String {
    let input = input.trim();
    if input.is_empty() {
        return settings.default_url.clone();
    }
    process_search_string(input, &settings.search_url)
}

/// Returns `input` verbatim when it is a URL or FQDN, else a search URL built from `template`.
pub fn process_search_string(input: &str, template: &str) -> String {
    let input = input.trim();
    if is_absolute_url(input) || is_fqdn_location(input) {
        return input.to_string();
    }
    search_url(input, template)
}

/// Fills the search template with the form-encoded query.
pub fn search_url(query: &str, template: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    if template.contains(QUERY_PLACEHOLDER) {
        template.replacen(QUERY_PLACEHOLDER, &encoded, 1)
    } else {
        format!("{}{}", template, encoded)
    }
}

/// `scheme://host...` or one of the host-less schemes.
pub fn is_absolute_url(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    match Url::parse(input) {
        Ok(url) => url.has_host() || HOSTLESS_SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}

/// A fully-qualified domain name, optionally with a port and a path, query or fragment.
pub fn is_fqdn_location(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let end = input.find(['/', '?', '#']).unwrap_or(input.len());
    let authority = &input[..end];
    let host = match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => host,
        Some(_) => return false,
        None => authority,
    };
    is_fqdn(host)
}

/// At least two dot-separated labels, the last one an alphabetic TLD.
pub fn is_fqdn(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let valid_label = |label: &&str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    };
    if !labels.iter().all(valid_label) {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.starts_with("xn--") || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
}
