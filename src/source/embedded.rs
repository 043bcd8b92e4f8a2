use lazy_static::lazy_static;
use regex::Regex;

/// Finds the inline `embedded-posts` JSON block of the site's index page.
pub fn extract_embedded(html: &str) -> Option<&str> {
    lazy_static! {
        static ref EMBEDDED_REGEX: Regex = Regex::new(
            r#"(?s)<script[^>]*\bid=["']embedded-posts["'][^>]*>(?P<json>.*?)</script>"#
        ).unwrap();
    }

    EMBEDDED_REGEX.captures(html)
        .and_then(|cap| cap.name("json"))
        .map(|json| json.as_str().trim())
        .filter(|json| !json.is_empty())
}
