//! HTML helper functions

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Strip HTML tags from content
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Collapse whitespace and cut plain text to at most `length` characters
pub fn summarize(text: &str, length: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= length {
        collapsed
    } else {
        let truncated: String = collapsed.chars().take(length).collect();
        format!("{}…", truncated.trim_end())
    }
}

/// Render an optional attribute, empty when there is no value
pub fn attr(name: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!(r#" {}="{}""#, name, escape_html(v)),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"CI&T <b>"x"</b> it's"#),
            "CI&amp;T &lt;b&gt;&quot;x&quot;&lt;/b&gt; it&#39;s"
        );
        assert_eq!(escape_html("/posts/a/"), "/posts/a/");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <em>there</em></p>"), "Hello there");
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize("  a\n  b  ", 10), "a b");
        assert_eq!(summarize("abcdef ghij", 6), "abcdef…");
    }

    #[test]
    fn test_attr() {
        assert_eq!(attr("rel", Some("nofollow")), r#" rel="nofollow""#);
        assert_eq!(attr("rel", Some("")), "");
        assert_eq!(attr("target", None), "");
    }
}
