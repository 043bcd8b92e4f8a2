use lazy_static::lazy_static;
use regex::Regex;

use crate::content::markdown::{heading_text, render_inline};
use crate::content::{Content, Item};
use crate::text_utils::escape_html;

/// One block of rendered detail markup. Inner strings are already safe HTML.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Paragraph(String),
    Heading(String),
    Stanza(String),
}

impl Fragment {
    pub fn to_html(&self) -> String {
        match self {
            Fragment::Paragraph(inner) => format!("<p>{}</p>", inner),
            Fragment::Heading(inner) => format!("<h3>{}</h3>", inner),
            Fragment::Stanza(inner) => format!("<p class=\"stanza\">{}</p>", inner),
        }
    }
}

pub fn render(content: &Content) -> Vec<Fragment> {
    let mut fragments = vec![];
    match content {
        Content::Plain(text) => render_prose(text, &mut fragments),
        Content::Paragraphs(items) => {
            for item in items {
                match item {
                    Item::Text(text) => render_prose(text, &mut fragments),
                    Item::Stanza(lines) => fragments.push(render_stanza(lines)),
                }
            }
        }
        Content::Literal(text) => {
            if !text.is_empty() {
                fragments.push(Fragment::Paragraph(escape_html(text)));
            }
        }
    }
    fragments
}

/// Full replacement markup for the detail body.
pub fn render_html(content: &Content) -> String {
    render(content)
        .iter()
        .map(Fragment::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turns escaped `\r\n` / `\n` sequences into real line breaks, then folds
/// `\r\n` into `\n`.
fn normalize_newlines(text: &str) -> String {
    text.replace("\\r\\n", "\r\n")
        .replace("\\n", "\n")
        .replace("\r\n", "\n")
}

fn split_paragraphs(text: &str) -> Vec<&str> {
    lazy_static! {
        static ref BLANK_LINES: Regex = Regex::new(r"\n\s*\n+").unwrap();
    }

    BLANK_LINES.split(text)
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect()
}

fn render_prose(text: &str, fragments: &mut Vec<Fragment>) {
    let text = normalize_newlines(text);
    for paragraph in split_paragraphs(&text) {
        let mut lines: Vec<String> = vec![];
        for line in paragraph.split('\n') {
            if let Some(heading) = heading_text(line) {
                if !lines.is_empty() {
                    fragments.push(Fragment::Paragraph(lines.join("<br>")));
                    lines.clear();
                }
                fragments.push(Fragment::Heading(render_inline(&escape_html(heading))));
            } else {
                lines.push(render_inline(&escape_html(line)));
            }
        }
        if !lines.is_empty() {
            fragments.push(Fragment::Paragraph(lines.join("<br>")));
        }
    }
}

// Verse is literal: escaped line by line, never markdown.
fn render_stanza(lines: &[String]) -> Fragment {
    let escaped: Vec<String> = lines.iter().map(|line| escape_html(line)).collect();
    Fragment::Stanza(escaped.join("<br>"))
}
