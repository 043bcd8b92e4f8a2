use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spdlog::warn;
use thiserror::Error;

use crate::config::CollisionPolicy;
use crate::post::Post;

pub mod embedded;
pub mod fetcher;
pub mod loader;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Source unavailable {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error("Malformed document {path}: {reason}")]
    MalformedDocument { path: String, reason: String },
}

impl SourceError {
    pub fn unavailable(path: &str, reason: impl ToString) -> Self {
        SourceError::SourceUnavailable { path: path.to_string(), reason: reason.to_string() }
    }

    pub fn malformed(path: &str, reason: impl ToString) -> Self {
        SourceError::MalformedDocument { path: path.to_string(), reason: reason.to_string() }
    }
}

/// Reads a site-relative document. The only suspension point of loading.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, path: &str) -> Result<String, SourceError>;
}

/// `{ "posts": [filename, ...], "lastUpdated": timestamp }`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IndexDocument {
    pub posts: Vec<String>,
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: String,
}

#[derive(Deserialize)]
struct PostsDocument {
    posts: Vec<serde_json::Value>,
}

/// Parses a `{ "posts": [...] }` document.
///
/// A document without a `posts` array is malformed as a whole; a single post
/// that fails validation is logged and skipped.
pub fn parse_posts_document(json: &str, path: &str) -> Result<Vec<Post>, SourceError> {
    let doc: PostsDocument = serde_json::from_str(json)
        .map_err(|e| SourceError::malformed(path, e))?;

    let mut posts = Vec::with_capacity(doc.posts.len());
    for (i, value) in doc.posts.into_iter().enumerate() {
        match Post::from_value(value) {
            Ok(post) => posts.push(post),
            Err(e) => warn!("Skipping post #{} of {}: {}", i, path, e),
        }
    }
    Ok(posts)
}

pub fn parse_index_document(json: &str, path: &str) -> Result<IndexDocument, SourceError> {
    serde_json::from_str(json).map_err(|e| SourceError::malformed(path, e))
}

/// Ordered, immutable set of posts as seen by the views.
///
/// Updates build a new collection; the shared vector is never mutated.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    posts: Arc<Vec<Post>>,
}

impl Collection {
    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        sort_newest_first(&mut posts);
        Collection { posts: Arc::new(posts) }
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.as_slice()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    /// New collection with `extra` appended after the current posts.
    pub fn merged(&self, extra: Vec<Post>, policy: CollisionPolicy) -> Collection {
        let mut posts: Vec<Post> = self.posts.as_ref().clone();
        match policy {
            CollisionPolicy::Concatenate => posts.extend(extra),
            CollisionPolicy::LastWriteWins => {
                let mut by_slug: HashMap<String, usize> = posts.iter()
                    .enumerate()
                    .map(|(i, post)| (post.slug.clone(), i))
                    .collect();
                for post in extra {
                    match by_slug.get(&post.slug) {
                        Some(&i) => posts[i] = post,
                        None => {
                            by_slug.insert(post.slug.clone(), posts.len());
                            posts.push(post);
                        }
                    }
                }
            }
        }
        Collection::from_posts(posts)
    }

    pub fn same_as(&self, other: &Collection) -> bool {
        Arc::ptr_eq(&self.posts, &other.posts)
    }
}

// sort_by is stable: equal dates keep document order.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| a.date.cmp_desc(&b.date));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Embedded,
    Primary,
    Individual,
}

/// Fully resolved collection after one loading stage.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub stage: Stage,
    pub collection: Collection,
}

#[cfg(test)]
mod tests {
    use crate::post::PostType;
    use crate::test_data::{INDEX_DOC, PRIMARY_DOC};

    use super::*;

    fn post(slug: &str, date: &str, title: &str) -> Post {
        Post::from_json(&format!(
            r#"{{"title": "{}", "type": "relato", "slug": "{}", "date": "{}", "content": ""}}"#,
            title, slug, date)).unwrap()
    }

    #[test]
    fn test_parse_posts_document() {
        let posts = parse_posts_document(PRIMARY_DOC, "posts/posts.json").unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[2].kind, PostType::Poesia);
    }

    #[test]
    fn test_posts_must_be_an_array() {
        let err = parse_posts_document(r#"{"posts": "nope"}"#, "posts/posts.json").unwrap_err();
        assert!(matches!(err, SourceError::MalformedDocument { .. }));
        let err = parse_posts_document("not json", "posts/posts.json").unwrap_err();
        assert!(matches!(err, SourceError::MalformedDocument { .. }));
    }

    #[test]
    fn test_invalid_post_is_skipped() {
        let json = r#"{"posts": [
            {"title": "bien", "type": "relato", "date": "2024-01-01"},
            {"title": "mal", "type": "ensayo", "date": "2024-01-01"}
        ]}"#;
        let posts = parse_posts_document(json, "posts/posts.json").unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "bien");
    }

    #[test]
    fn test_parse_index_document() {
        let index = parse_index_document(INDEX_DOC, "posts/individual-posts-index.json").unwrap();
        assert_eq!(index.posts, vec!["cancion-del-agua.json", "perdido.json"]);
        assert_eq!(index.last_updated, "2024-04-02T10:00:00.000Z");
    }

    #[test]
    fn test_collection_is_sorted_newest_first() {
        let collection = Collection::from_posts(vec![
            post("b", "2023-01-01", "B"),
            post("x", "fecha rota", "X"),
            post("a", "2024-01-01", "A"),
            post("c", "2023-01-01", "C"),
        ]);
        let slugs: Vec<&str> = collection.posts().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "b", "c", "x"]);
    }

    #[test]
    fn test_merge_concatenate_keeps_duplicates() {
        let base = Collection::from_posts(vec![post("a", "2024-01-01", "viejo")]);
        let merged = base.merged(vec![post("a", "2024-01-01", "nuevo")], CollisionPolicy::Concatenate);
        assert_eq!(merged.len(), 2);
        assert_eq!(base.len(), 1);
        assert!(!merged.same_as(&base));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let base = Collection::from_posts(vec![post("a", "2024-01-01", "viejo"), post("b", "2023-01-01", "B")]);
        let merged = base.merged(vec![post("a", "2024-01-01", "nuevo"), post("c", "2025-01-01", "C")],
                                 CollisionPolicy::LastWriteWins);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.find("a").unwrap().title, "nuevo");
        assert_eq!(merged.posts()[0].slug, "c");
    }
}
