use chrono::{DateTime, Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

/// Escapes the five reserved markup characters.
pub fn escape_html(text: &str) -> String {
    let mut buf = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&#39;"),
            _ => buf.push(c),
        }
    }
    buf
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp.
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

pub fn format_long_date(date: &NaiveDate) -> String {
    format!("{} de {} de {}", date.day(), MONTHS_ES[date.month0() as usize], date.year())
}

/// Turns a title into the identifier used in the URL fragment.
///
/// Accents are transliterated away, anything outside `[a-z0-9]`, whitespace and
/// `-` is dropped, whitespace runs become a single `-`.
pub fn slugify(title: &str) -> String {
    lazy_static! {
        static ref INVALID_CHARS: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
        static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
        static ref DASHES: Regex = Regex::new(r"-+").unwrap();
    }

    let ascii = unidecode::unidecode(title).to_lowercase();
    let slug = INVALID_CHARS.replace_all(&ascii, "");
    let slug = WHITESPACE.replace_all(slug.trim(), "-");
    let slug = DASHES.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}
