use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::view::page_meta::{MetaTag, PageMeta};

const REDIRECT_TEMPLATE: &str = include_str!("../../res/templates/redirect.tpl");

#[derive(ramhorns::Content)]
struct RedirectPage<'a> {
    title: &'a str,
    heading: &'a str,
    url: &'a str,
    url_json: String,
    tags: Vec<MetaTag>,
}

/// Static page carrying a post's social preview tags that sends the visitor
/// on to `<site>/#<slug>`.
pub struct RedirectRenderer<'a> {
    pub template: Template<'a>,
}

impl RedirectRenderer<'static> {
    pub fn with_default_template() -> io::Result<Self> {
        RedirectRenderer::new(REDIRECT_TEMPLATE)
    }
}

impl<'a> RedirectRenderer<'a> {
    pub fn new(tpl_src: &'a str) -> io::Result<RedirectRenderer<'a>> {
        let template = match Template::new(tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing redirect template: {}", e)));
            }
        };

        Ok(RedirectRenderer {
            template,
        })
    }

    pub fn render(&self, meta: &PageMeta) -> String {
        self.template.render(&RedirectPage {
            title: &meta.title,
            heading: &meta.heading,
            url: &meta.url,
            url_json: script_string(&meta.url),
            tags: meta.tags(),
        })
    }
}

// JSON string literal safe to place inside a <script> element.
fn script_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace('<', "\\u003c")
}
