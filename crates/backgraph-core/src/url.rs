//! Link string canonicalization.
//!
//! Backlink providers report URLs in mixed shapes (`https://www.a.com/`,
//! `www.a.com`, bare `a.com`). Graph node identity needs one canonical form,
//! so every linking column is passed through [`normalize`] before projection.

/// Prefixes stripped from links, checked in priority order.
const LINK_PREFIXES: &[&str] = &["https://www.", "http://www.", "www.", "http://", "https://"];

/// Canonicalize a link: strip the first matching scheme/www prefix and one
/// trailing slash.
///
/// `"https://www.google.com/"` becomes `"google.com"`. Strings that carry no
/// known prefix pass through unchanged. Idempotent on its own output.
pub fn normalize(link: &str) -> String {
    let stripped = LINK_PREFIXES
        .iter()
        .find_map(|prefix| link.strip_prefix(prefix))
        .unwrap_or(link);
    stripped.strip_suffix('/').unwrap_or(stripped).to_string()
}

/// [`normalize`] lifted over missing values: absent input yields `""`.
pub fn normalize_opt(link: Option<&str>) -> String {
    link.map(normalize).unwrap_or_default()
}

/// The domain segment of a scheme-qualified URL, or `""` when there is none.
///
/// `"https://a.com/x/y"` yields `"a.com"`.
pub fn host_of(url: &str) -> &str {
    url.split('/').nth(2).unwrap_or("")
}

/// The path after the domain segment, without a leading slash.
///
/// `"https://a.com/x/y"` yields `"x/y"`; a bare domain yields `""`.
pub fn path_of(url: &str) -> String {
    url.splitn(4, '/').nth(3).unwrap_or("").to_string()
}

/// Normalize a topical-flow label into one token: `/`, space, and `-`
/// become `_`.
pub fn normalize_topic(raw: &str) -> String {
    raw.replace(['/', ' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_scheme_and_www() {
        assert_eq!(normalize("https://www.Example.com/"), "Example.com");
        assert_eq!(normalize("http://www.example.com"), "example.com");
        assert_eq!(normalize("www.example.com/"), "example.com");
        assert_eq!(normalize("http://example.com"), "example.com");
        assert_eq!(normalize("https://example.com/path"), "example.com/path");
    }

    #[test]
    fn test_normalize_passes_through_non_urls() {
        assert_eq!(normalize("not a url"), "not a url");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_strips_single_trailing_slash() {
        assert_eq!(normalize("example.com//"), "example.com/");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in [
            "https://www.example.com/",
            "http://sub.example.com/a/b/",
            "example.com",
            "not a url",
            "",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_normalize_opt_missing_is_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("https://www.a.com/")), "a.com");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://a.com/x/y"), "a.com");
        assert_eq!(host_of("http://www.a.com"), "www.a.com");
        assert_eq!(host_of("a.com/x"), "");
    }

    #[test]
    fn test_path_of() {
        assert_eq!(path_of("https://a.com/x/y"), "x/y");
        assert_eq!(path_of("https://a.com/x"), "x");
        assert_eq!(path_of("https://a.com"), "");
        assert_eq!(path_of(""), "");
    }

    #[test]
    fn test_normalize_topic() {
        assert_eq!(normalize_topic("Sports/Gambling"), "Sports_Gambling");
        assert_eq!(normalize_topic("Real Estate"), "Real_Estate");
        assert_eq!(normalize_topic("E-Commerce"), "E_Commerce");
        assert_eq!(normalize_topic("News"), "News");
    }
}
