//! Which post is open, kept in step with the URL fragment and browser history.

use serde::{Deserialize, Serialize};
use spdlog::debug;

use crate::config::Site;
use crate::post::Post;
use crate::source::Collection;
use crate::view::page_meta::PageMeta;
use crate::view::post_renderer::DetailView;

/// State object stored with each history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    #[serde(rename = "postSlug")]
    pub post_slug: String,
}

pub trait History {
    /// Current URL fragment without the leading `#`.
    fn fragment(&self) -> Option<String>;
    /// Adds a new entry pointing at `#fragment`.
    fn push_state(&mut self, state: HistoryState, fragment: &str);
    /// Rewrites the current entry in place. `None` drops the fragment.
    fn replace_state(&mut self, state: Option<HistoryState>, fragment: Option<&str>);
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryEntry {
    pub state: Option<HistoryState>,
    pub fragment: Option<String>,
}

/// Session history kept in memory, for hosts without a browser.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        MemoryHistory {
            entries: vec![HistoryEntry::default()],
            index: 0,
        }
    }
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History whose first page was loaded with `#fragment`.
    pub fn with_fragment(fragment: &str) -> Self {
        MemoryHistory {
            entries: vec![HistoryEntry { state: None, fragment: normalize_fragment(fragment) }],
            index: 0,
        }
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves one entry back; `false` when already at the first entry.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

impl History for MemoryHistory {
    fn fragment(&self) -> Option<String> {
        self.current().fragment.clone()
    }

    fn push_state(&mut self, state: HistoryState, fragment: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry { state: Some(state), fragment: normalize_fragment(fragment) });
        self.index += 1;
    }

    fn replace_state(&mut self, state: Option<HistoryState>, fragment: Option<&str>) {
        self.entries[self.index] = HistoryEntry {
            state,
            fragment: fragment.and_then(normalize_fragment),
        };
    }
}

pub fn normalize_fragment(fragment: &str) -> Option<String> {
    let fragment = fragment.trim().trim_start_matches('#');
    if fragment.is_empty() {
        None
    } else {
        Some(fragment.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavState {
    Closed,
    Open(Post),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Page,
    CloseControl,
}

/// What the page shows after the last transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub meta: PageMeta,
    pub detail: Option<DetailView>,
    pub focus: Focus,
    pub scroll_locked: bool,
}

pub struct Navigator<H> {
    history: H,
    site: Site,
    state: NavState,
    surface: Surface,
}

impl<H: History> Navigator<H> {
    pub fn new(history: H, site: Site) -> Self {
        let surface = Surface {
            meta: PageMeta::site_default(&site),
            detail: None,
            focus: Focus::Page,
            scroll_locked: false,
        };
        Navigator {
            history,
            site,
            state: NavState::Closed,
            surface,
        }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn open_post(&self) -> Option<&Post> {
        match self.state {
            NavState::Open(ref post) => Some(post),
            NavState::Closed => None,
        }
    }

    /// Card activation. Always adds a history entry, even when another post is open.
    pub fn activate(&mut self, post: &Post) {
        self.history.push_state(HistoryState { post_slug: post.slug.clone() }, &post.slug);
        self.show(post);
    }

    /// Opens the post named by the current fragment without touching history.
    ///
    /// Only acts while closed, so it can run after every collection update
    /// until a deep link resolves. Returns whether a post was opened.
    pub fn sync_with_fragment(&mut self, collection: &Collection) -> bool {
        if self.state != NavState::Closed {
            return false;
        }
        let Some(fragment) = self.history.fragment() else {
            return false;
        };
        match collection.find(&fragment) {
            Some(post) => {
                self.show(post);
                true
            }
            None => false,
        }
    }

    /// Back/forward arrived at a new entry.
    pub fn pop_state(&mut self, collection: &Collection) {
        let fragment = self.history.fragment();
        match fragment.as_deref().and_then(|slug| collection.find(slug)) {
            Some(post) => self.show(post),
            None => {
                if fragment.is_some() {
                    self.history.replace_state(None, None);
                }
                self.hide();
            }
        }
    }

    /// Close button, backdrop click or escape.
    pub fn close(&mut self) {
        if self.state == NavState::Closed {
            return;
        }
        self.history.replace_state(None, None);
        self.hide();
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        if key == "Escape" && self.state != NavState::Closed {
            self.close();
            return true;
        }
        false
    }

    fn show(&mut self, post: &Post) {
        debug!("Opening post {}", post.slug);
        self.surface = Surface {
            meta: PageMeta::for_post(&self.site, post),
            detail: Some(DetailView::from_post(post)),
            focus: Focus::CloseControl,
            scroll_locked: true,
        };
        self.state = NavState::Open(post.clone());
    }

    fn hide(&mut self) {
        self.surface = Surface {
            meta: PageMeta::site_default(&self.site),
            detail: None,
            focus: Focus::Page,
            scroll_locked: false,
        };
        self.state = NavState::Closed;
    }
}
