//! URL helper functions

use percent_encoding::percent_decode_str;

/// Generate a URL under the site root
///
/// # Examples
/// ```ignore
/// url_for("/blog/", "/posts/hello/") // -> "/blog/posts/hello/"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com", "/", "/resume/") // -> "https://example.com/resume/"
/// ```
pub fn full_url_for(site_url: &str, root: &str, path: &str) -> String {
    format!("{}{}", site_url.trim_end_matches('/'), url_for(root, path))
}

/// Whether a URL starts with a scheme such as `https:` or `mailto:`
pub fn has_scheme(url: &str) -> bool {
    match url.find(':') {
        Some(pos) if pos > 0 => url[..pos]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'),
        _ => false,
    }
}

/// Whether a URL points at a file relative to the current document
pub fn is_relative_path(url: &str) -> bool {
    !url.is_empty()
        && !url.starts_with('/')
        && !url.starts_with('#')
        && !url.starts_with('?')
        && !has_scheme(url)
}

/// Host part of an absolute http(s) or protocol-relative URL, lowercased
pub fn host_of(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .or_else(|| url.strip_prefix("//"))?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// Whether a link leaves the site
pub fn is_external(url: &str, site_host: Option<&str>) -> bool {
    match host_of(url) {
        Some(host) => site_host.map_or(true, |site| !site.eq_ignore_ascii_case(&host)),
        None => false,
    }
}

/// Split a relative URL into its decoded path and the `?query#fragment` suffix
pub fn split_relative(url: &str) -> (String, &str) {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = percent_decode_str(&url[..end])
        .decode_utf8_lossy()
        .into_owned();
    (path, &url[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("/", "posts/hello/"), "/posts/hello/");
        assert_eq!(url_for("/blog/", "/posts/hello/"), "/blog/posts/hello/");
        assert_eq!(url_for("/", ""), "/");
        assert_eq!(url_for("/blog", ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        assert_eq!(
            full_url_for("https://example.com/", "/", "resume/"),
            "https://example.com/resume/"
        );
    }

    #[test]
    fn test_relative_detection() {
        assert!(is_relative_path("notes.pdf"));
        assert!(is_relative_path("../files/a%20b.zip"));
        assert!(!is_relative_path("/posts/x/"));
        assert!(!is_relative_path("#top"));
        assert!(!is_relative_path("https://example.com"));
        assert!(!is_relative_path("mailto:me@example.com"));
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://GitHub.com/x"), Some("github.com".to_string()));
        assert_eq!(host_of("http://user@host:8080/p"), Some("host".to_string()));
        assert_eq!(host_of("//cdn.example.com/a.js"), Some("cdn.example.com".to_string()));
        assert_eq!(host_of("/local"), None);
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://github.com", Some("example.com")));
        assert!(!is_external("https://example.com/about", Some("example.com")));
        assert!(is_external("https://example.com/about", None));
        assert!(!is_external("/about", Some("example.com")));
    }

    #[test]
    fn test_split_relative() {
        let (path, suffix) = split_relative("my%20file.pdf#page=2");
        assert_eq!(path, "my file.pdf");
        assert_eq!(suffix, "#page=2");
    }
}
