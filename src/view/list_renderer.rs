use std::fmt::{self, Display, Formatter};
use std::io;
use std::io::ErrorKind;
use std::str::FromStr;

use ramhorns::Template;

use crate::post::{Post, PostType};
use crate::source::Collection;
use crate::view::Figure;

const LIST_TEMPLATE: &str = include_str!("../../res/templates/list.tpl");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(PostType),
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Only(PostType::Relato), Filter::Only(PostType::Poesia)];

    pub fn accepts(&self, post: &Post) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(kind) => post.kind == *kind,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "Todo",
            Filter::Only(PostType::Relato) => "Relatos",
            Filter::Only(PostType::Poesia) => "Poesía",
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Only(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Filter::All),
            other => other.parse::<PostType>()
                .map(Filter::Only)
                .map_err(|_| format!("Unknown filter: {}", other)),
        }
    }
}

/// Posts visible under `filter`, in collection order. Never mutates the collection.
pub fn apply(collection: &Collection, filter: Filter) -> Vec<&Post> {
    collection.posts()
        .iter()
        .filter(|post| filter.accepts(post))
        .collect()
}

#[derive(Debug, PartialEq)]
pub enum ListState<'a> {
    /// Sources still resolving and nothing to show yet.
    Loading,
    /// Every source resolved (or the filter matched nothing).
    Empty,
    Cards(Vec<&'a Post>),
}

pub fn list_state(collection: &Collection, filter: Filter, loaded: bool) -> ListState<'_> {
    let visible = apply(collection, filter);
    if !visible.is_empty() {
        ListState::Cards(visible)
    } else if collection.is_empty() && !loaded {
        ListState::Loading
    } else {
        ListState::Empty
    }
}

#[derive(ramhorns::Content)]
struct ListPage {
    filters: Vec<ViewFilter>,
    loading: bool,
    empty: bool,
    post_list: Vec<PostCard>,
}

#[derive(ramhorns::Content)]
struct ViewFilter {
    value: String,
    label: &'static str,
    active: bool,
}

#[derive(ramhorns::Content)]
struct PostCard {
    slug: String,
    title: String,
    type_label: &'static str,
    date: String,
    excerpt: String,
    image: Option<Figure>,
}

impl PostCard {
    fn from(post: &Post) -> Self {
        PostCard {
            slug: post.slug.clone(),
            title: post.title.clone(),
            type_label: post.kind.label(),
            date: post.date.display(),
            excerpt: post.excerpt.clone(),
            image: Figure::for_post(post),
        }
    }
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'static> {
    pub fn with_default_template() -> io::Result<Self> {
        ListRenderer::new(LIST_TEMPLATE)
    }
}

impl<'a> ListRenderer<'a> {
    pub fn new(list_tpl_src: &'a str) -> io::Result<ListRenderer<'a>> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing list template: {}", e)));
            }
        };

        Ok(ListRenderer {
            template,
        })
    }

    pub fn render(&self, state: &ListState, filter: Filter) -> String {
        let filters = Filter::ALL.iter()
            .map(|f| ViewFilter { value: f.to_string(), label: f.label(), active: *f == filter })
            .collect();

        let post_list = match state {
            ListState::Cards(posts) => posts.iter().map(|post| PostCard::from(post)).collect(),
            _ => vec![],
        };

        self.template.render(&ListPage {
            filters,
            loading: *state == ListState::Loading,
            empty: *state == ListState::Empty,
            post_list,
        })
    }
}
