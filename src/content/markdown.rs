//! The small markdown dialect accepted in prose paragraphs.
//!
//! Only three productions exist: a `## ` heading line, `**strong**` and
//! `*emphasis*`. Input must already be escaped, so the only tags in the output
//! are the ones emitted here.

use lazy_static::lazy_static;
use regex::Regex;

const HEADING_PREFIX: &str = "## ";

pub fn heading_text(line: &str) -> Option<&str> {
    line.strip_prefix(HEADING_PREFIX)
}

pub fn render_inline(escaped: &str) -> String {
    lazy_static! {
        static ref STRONG_REGEX: Regex = Regex::new(r"\*\*(?P<text>.+?)\*\*").unwrap();
        static ref EM_REGEX: Regex = Regex::new(r"\*(?P<text>[^*]+?)\*").unwrap();
    }

    let strong = STRONG_REGEX.replace_all(escaped, "<strong>$text</strong>");
    EM_REGEX.replace_all(&strong, "<em>$text</em>").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_text() {
        assert_eq!(heading_text("## Capítulo uno"), Some("Capítulo uno"));
        assert_eq!(heading_text("##sin espacio"), None);
        assert_eq!(heading_text("texto ## no"), None);
    }

    #[test]
    fn test_render_inline() {
        assert_eq!(render_inline("**x**"), "<strong>x</strong>");
        assert_eq!(render_inline("una *palabra* suelta"), "una <em>palabra</em> suelta");
        assert_eq!(render_inline("**fuerte** y *suave*"), "<strong>fuerte</strong> y <em>suave</em>");
        assert_eq!(render_inline("2 * 3 = 6"), "2 * 3 = 6");
    }

    #[test]
    fn test_emphasis_spans_spaces() {
        // any pair of single asterisks on a line is emphasis, spaces included
        assert_eq!(render_inline("2 * 3 * 4"), "2 <em> 3 </em> 4");
        assert_eq!(render_inline("*dos palabras*"), "<em>dos palabras</em>");
    }
}
