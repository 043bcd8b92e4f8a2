use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::content::renderer::render_html;
use crate::post::Post;
use crate::view::Figure;

const VIEW_TEMPLATE: &str = include_str!("../../res/templates/view.tpl");

/// Everything the detail view shows for one open post.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub slug: String,
    pub title: String,
    pub type_label: &'static str,
    pub date: String,
    pub figure: Option<Figure>,
    pub body: String,
}

impl DetailView {
    pub fn from_post(post: &Post) -> Self {
        DetailView {
            slug: post.slug.clone(),
            title: post.title.clone(),
            type_label: post.kind.label(),
            date: post.date.display(),
            figure: Figure::for_post(post),
            body: render_html(&post.content),
        }
    }
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    slug: &'a str,
    title: &'a str,
    type_label: &'a str,
    date: &'a str,
    figure: Option<Figure>,
    body: &'a str,
    share_label: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'static> {
    pub fn with_default_template() -> io::Result<Self> {
        PostRenderer::new(VIEW_TEMPLATE)
    }
}

impl<'a> PostRenderer<'a> {
    pub fn new(view_tpl_src: &'a str) -> io::Result<PostRenderer<'a>> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post view template: {}", e)));
            }
        };

        Ok(PostRenderer {
            template,
        })
    }

    pub fn render(&self, detail: &DetailView, share_label: &str) -> String {
        self.template.render(&ViewItem {
            slug: &detail.slug,
            title: &detail.title,
            type_label: detail.type_label,
            date: &detail.date,
            figure: detail.figure.clone(),
            body: &detail.body,
            share_label,
        })
    }
}
