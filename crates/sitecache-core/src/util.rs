//! Small text and URL helpers.

use url::{Position, Url};

/// Trim optional text, mapping blank values to `None`.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Whether a value carries an `http` or `https` scheme, in any case
pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Canonical form of a site endpoint URL used for duplicate detection.
///
/// Scheme and host are lowercased, a port matching the scheme default is
/// dropped, and trailing slashes are removed from the path. Path case is
/// preserved. Values that do not parse as absolute URLs are only trimmed.
pub fn canonical_endpoint(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let Ok(url) = Url::parse(value) else {
        return Some(value.trim_end_matches('/').to_string());
    };

    let path = url.path().trim_end_matches('/');
    Some(format!(
        "{}{path}{}",
        &url[..Position::BeforePath],
        &url[Position::AfterPath..]
    ))
}

/// Current Unix timestamp in milliseconds.
pub fn unix_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_site_names_become_none() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("\t \n".to_string())), None);
        assert_eq!(
            normalize_text_option(Some("  My Travel Blog ".to_string())).as_deref(),
            Some("My Travel Blog")
        );
    }

    #[test]
    fn xmlrpc_endpoints_need_http_scheme() {
        assert!(is_http_url("https://blog.example.org/xmlrpc.php"));
        assert!(is_http_url("http://127.0.0.1:8080/xmlrpc.php"));
        assert!(!is_http_url("blog.example.org/xmlrpc.php"));
        assert!(is_http_url("HTTPS://blog.example.org"));
        assert!(!is_http_url("ftp://blog.example.org/xmlrpc.php"));
    }

    #[test]
    fn canonical_endpoint_lowercases_scheme_and_host() {
        assert_eq!(
            canonical_endpoint("HTTPS://Example.COM/Blog/xmlrpc.php").as_deref(),
            Some("https://example.com/Blog/xmlrpc.php")
        );
    }

    #[test]
    fn canonical_endpoint_drops_default_port_and_trailing_slash() {
        assert_eq!(
            canonical_endpoint("http://example.com:80/xmlrpc.php/").as_deref(),
            Some("http://example.com/xmlrpc.php")
        );
        assert_eq!(
            canonical_endpoint("https://example.com:8443/xmlrpc.php").as_deref(),
            Some("https://example.com:8443/xmlrpc.php")
        );
    }

    #[test]
    fn canonical_endpoint_keeps_scheme_distinct() {
        assert_ne!(
            canonical_endpoint("http://example.com/xmlrpc.php"),
            canonical_endpoint("https://example.com/xmlrpc.php")
        );
    }

    #[test]
    fn canonical_endpoint_drops_empty_port() {
        assert_eq!(
            canonical_endpoint("https://example.com:/xmlrpc.php"),
            canonical_endpoint("https://example.com/xmlrpc.php")
        );
    }

    #[test]
    fn canonical_endpoint_handles_ipv6_hosts() {
        assert_eq!(
            canonical_endpoint("http://[::1]:80/xmlrpc.php"),
            canonical_endpoint("http://[::1]/xmlrpc.php")
        );
        assert_eq!(
            canonical_endpoint("http://[::1]:80/xmlrpc.php").as_deref(),
            Some("http://[::1]/xmlrpc.php")
        );
    }

    #[test]
    fn canonical_endpoint_lowercases_host_after_credentials() {
        assert_eq!(
            canonical_endpoint("https://user:pw@Example.com/xmlrpc.php").as_deref(),
            Some("https://user:pw@example.com/xmlrpc.php")
        );
    }

    #[test]
    fn canonical_endpoint_keeps_query() {
        assert_eq!(
            canonical_endpoint("https://Example.com/xmlrpc.php/?blog=2").as_deref(),
            Some("https://example.com/xmlrpc.php?blog=2")
        );
        assert_eq!(
            canonical_endpoint("https://example.com/").as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn canonical_endpoint_handles_blank_and_bare_values() {
        assert_eq!(canonical_endpoint("  "), None);
        assert_eq!(
            canonical_endpoint("example.com/xmlrpc.php/").as_deref(),
            Some("example.com/xmlrpc.php")
        );
    }
}
