// src/extract/html.rs

use once_cell::sync::Lazy;
use regex::Regex;

static HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]+)""#).unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Value of the first double-quoted `href` attribute in `s`.
pub fn first_href(s: &str) -> Option<&str> {
    HREF_RE
        .captures(s)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Remove every `<...>` tag and trim the remainder.
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_yields_link_and_name() {
        let cell = r#"<a href="/x">Name</a>"#;
        assert_eq!(first_href(cell), Some("/x"));
        assert_eq!(strip_tags(cell), "Name");
    }

    #[test]
    fn first_href_wins() {
        let cell = r#"<a class="p" href="https://a.example/1">A</a> <a href="/2">B</a>"#;
        assert_eq!(first_href(cell), Some("https://a.example/1"));
        assert_eq!(strip_tags(cell), "A B");
    }

    #[test]
    fn no_href_and_plain_text() {
        assert_eq!(first_href("<span>Plain</span>"), None);
        assert_eq!(first_href(r#"<a href="">empty</a>"#), None);
        assert_eq!(strip_tags("  \n <b>Road</b> Sector Project\t"), "Road Sector Project");
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn only_double_quoted_hrefs_match() {
        assert_eq!(first_href("<a href='/single'>x</a>"), None);
    }
}
