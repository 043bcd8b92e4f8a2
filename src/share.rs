use std::time::{Duration, Instant};

use reqwest::Url;
use spdlog::{debug, warn};
use thiserror::Error;

use crate::config::Share;
use crate::post::Post;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShareError {
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
    #[error("Clipboard write rejected: {0}")]
    WriteRejected(String),
    #[error("Invalid page location {0}")]
    InvalidLocation(String),
}

/// Asynchronous clipboard of the host.
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), ShareError>;
}

/// Synchronous copy through a temporary off-screen input.
pub trait LegacyCopy {
    fn copy_via_input(&self, text: &str) -> bool;
}

/// Host without clipboard API.
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::ClipboardUnavailable("API not supported".to_string()))
    }
}

/// Page location the share link is built from. Query and fragment are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub origin: String,
    pub path: String,
}

impl Location {
    pub fn parse(url: &str) -> Result<Location, ShareError> {
        let url = Url::parse(url).map_err(|e| ShareError::InvalidLocation(format!("{}: {}", url, e)))?;
        Ok(Location {
            origin: url.origin().ascii_serialization(),
            path: url.path().to_string(),
        })
    }

    pub fn share_url(&self, slug: &str) -> String {
        format!("{}{}#{}", self.origin, self.path, slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CopyMethod {
    Clipboard,
    Fallback,
    /// Nothing was copied. The button still confirms.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub url: String,
    pub method: CopyMethod,
}

/// Copies the canonical link of `post`. Never fails from the caller's view.
pub async fn share<C: Clipboard, L: LegacyCopy>(post: &Post, location: &Location, clipboard: &C, fallback: &L) -> Confirmation {
    let url = location.share_url(&post.slug);
    let method = match clipboard.write_text(&url).await {
        Ok(()) => CopyMethod::Clipboard,
        Err(e) => {
            debug!("{}, trying fallback copy", e);
            if fallback.copy_via_input(&url) {
                CopyMethod::Fallback
            } else {
                warn!("Could not copy {} to the clipboard", url);
                CopyMethod::Failed
            }
        }
    };
    Confirmation { url, method }
}

/// Label state of the share control in the detail view.
#[derive(Debug, Clone)]
pub struct ShareButton {
    default_label: String,
    confirm_label: String,
    revert_after: Duration,
    confirmed_at: Option<Instant>,
}

impl Default for ShareButton {
    fn default() -> Self {
        ShareButton::from_config(&Share::default())
    }
}

impl ShareButton {
    pub fn from_config(share: &Share) -> Self {
        ShareButton {
            default_label: share.default_label.clone(),
            confirm_label: share.confirm_label.clone(),
            revert_after: Duration::from_millis(share.revert_after_ms),
            confirmed_at: None,
        }
    }

    pub fn label(&self, now: Instant) -> &str {
        match self.confirmed_at {
            Some(at) if now.saturating_duration_since(at) < self.revert_after => &self.confirm_label,
            _ => &self.default_label,
        }
    }

    pub fn confirm(&mut self, now: Instant) {
        self.confirmed_at = Some(now);
    }

    /// Opening another post shows the default label again.
    pub fn reset(&mut self) {
        self.confirmed_at = None;
    }

    pub async fn press<C: Clipboard, L: LegacyCopy>(&mut self, post: &Post, location: &Location,
                                                  clipboard: &C, fallback: &L, now: Instant) -> Confirmation {
        let confirmation = share(post, location, clipboard, fallback).await;
        self.confirm(now);
        confirmation
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::post::Post;
    use crate::test_data::STORY_JSON;

    use super::*;

    #[derive(Default)]
    struct MemoryClipboard {
        text: RefCell<Option<String>>,
    }

    impl Clipboard for MemoryClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ShareError> {
            self.text.replace(Some(text.to_string()));
            Ok(())
        }
    }

    /// Clipboard present but the page lacks permission to write.
    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), ShareError> {
            Err(ShareError::WriteRejected("NotAllowedError".to_string()))
        }
    }

    struct FakeInput {
        works: bool,
        text: RefCell<Option<String>>,
    }

    impl FakeInput {
        fn new(works: bool) -> Self {
            FakeInput { works, text: RefCell::new(None) }
        }
    }

    impl LegacyCopy for FakeInput {
        fn copy_via_input(&self, text: &str) -> bool {
            if self.works {
                self.text.replace(Some(text.to_string()));
            }
            self.works
        }
    }

    fn location() -> Location {
        Location::parse("https://example.com/blog/?utm=x#otro").unwrap()
    }

    #[test]
    fn test_location() {
        let loc = location();
        assert_eq!(loc.origin, "https://example.com");
        assert_eq!(loc.path, "/blog/");
        assert_eq!(loc.share_url("mi-post"), "https://example.com/blog/#mi-post");
        assert!(Location::parse("not a url").is_err());
    }

    #[tokio::test]
    async fn test_share_with_clipboard() {
        let post = Post::from_json(STORY_JSON).unwrap();
        let clipboard = MemoryClipboard::default();
        let input = FakeInput::new(true);

        let res = share(&post, &location(), &clipboard, &input).await;
        assert_eq!(res.method, CopyMethod::Clipboard);
        assert_eq!(clipboard.text.borrow().as_deref(), Some("https://example.com/blog/#sin-buscarlo"));
        assert_eq!(*input.text.borrow(), None);
    }

    #[tokio::test]
    async fn test_permission_denied_falls_back() {
        let post = Post::from_json(STORY_JSON).unwrap();
        let input = FakeInput::new(true);

        let res = share(&post, &location(), &DeniedClipboard, &input).await;
        assert_eq!(res.method, CopyMethod::Fallback);
        assert_eq!(input.text.borrow().as_deref(), Some(res.url.as_str()));
    }

    #[tokio::test]
    async fn test_share_falls_back() {
        let post = Post::from_json(STORY_JSON).unwrap();
        let input = FakeInput::new(true);

        let res = share(&post, &location(), &NoClipboard, &input).await;
        assert_eq!(res.method, CopyMethod::Fallback);
        assert_eq!(input.text.borrow().as_deref(), Some("https://example.com/blog/#sin-buscarlo"));
    }

    #[tokio::test]
    async fn test_press_confirms_even_when_copy_fails() {
        let post = Post::from_json(STORY_JSON).unwrap();
        let mut button = ShareButton::default();
        let start = Instant::now();
        assert_eq!(button.label(start), "Compartir");

        let res = button.press(&post, &location(), &NoClipboard, &FakeInput::new(false), start).await;
        assert_eq!(res.method, CopyMethod::Failed);
        assert_eq!(button.label(start), "¡Enlace copiado!");
        assert_eq!(button.label(start + Duration::from_millis(1999)), "¡Enlace copiado!");
        assert_eq!(button.label(start + Duration::from_millis(2000)), "Compartir");
    }

    #[test]
    fn test_reset() {
        let mut button = ShareButton::from_config(&Share {
            default_label: "Share".to_string(),
            confirm_label: "Copied".to_string(),
            revert_after_ms: 10,
        });
        let now = Instant::now();
        button.confirm(now);
        assert_eq!(button.label(now), "Copied");
        button.reset();
        assert_eq!(button.label(now), "Share");
    }
}
