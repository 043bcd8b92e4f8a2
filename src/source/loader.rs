use spdlog::{info, warn};

use crate::config::Sources;
use crate::post::Post;
use crate::source::{parse_index_document, parse_posts_document, Collection, Fetcher, Snapshot, SourceError, Stage};

const EMBEDDED_SOURCE: &str = "embedded-posts";

/// Merges the embedded snapshot, the primary feed and the individually
/// addressed posts into one collection.
pub struct SourceLoader<F> {
    fetcher: F,
    sources: Sources,
    embedded: Option<String>,
}

impl<F: Fetcher> SourceLoader<F> {
    pub fn new(fetcher: F, sources: Sources) -> Self {
        SourceLoader {
            fetcher,
            sources,
            embedded: None,
        }
    }

    pub fn with_embedded(mut self, json: impl Into<String>) -> Self {
        self.embedded = Some(json.into());
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Loads every source, calling `on_snapshot` each time a stage yields a
    /// fully resolved collection. Never fails: broken sources are logged and
    /// contribute nothing.
    ///
    /// Stages run one after the other, so snapshots arrive in stage order.
    pub async fn load_all<C>(&self, mut on_snapshot: C) -> Collection
        where
            C: FnMut(Snapshot),
    {
        let mut collection = Collection::default();

        if let Some(ref json) = self.embedded {
            match parse_posts_document(json, EMBEDDED_SOURCE) {
                Ok(posts) => {
                    collection = Collection::from_posts(posts);
                    info!("Loaded {} embedded posts", collection.len());
                    on_snapshot(Snapshot { stage: Stage::Embedded, collection: collection.clone() });
                }
                Err(e) => warn!("Embedded posts present but not valid: {}", e),
            }
        }

        match self.load_primary().await {
            Ok(posts) => {
                // The primary feed replaces the baseline instead of merging with it
                collection = Collection::from_posts(posts);
                info!("Loaded {} posts from {}", collection.len(), self.sources.primary);
                on_snapshot(Snapshot { stage: Stage::Primary, collection: collection.clone() });
            }
            Err(e) => {
                if collection.is_empty() {
                    warn!("No posts available from {}: {}", self.sources.primary, e);
                } else {
                    warn!("Could not sync posts from {}, keeping embedded posts: {}", self.sources.primary, e);
                }
            }
        }

        match self.load_individual().await {
            Ok(posts) => {
                let count = posts.len();
                collection = collection.merged(posts, self.sources.collision_policy);
                info!("Loaded {} individual posts", count);
                on_snapshot(Snapshot { stage: Stage::Individual, collection: collection.clone() });
            }
            Err(e) => warn!("Individual posts not loaded: {}", e),
        }

        collection
    }

    async fn load_primary(&self) -> Result<Vec<Post>, SourceError> {
        let body = self.fetcher.fetch(&self.sources.primary).await?;
        parse_posts_document(&body, &self.sources.primary)
    }

    async fn load_individual(&self) -> Result<Vec<Post>, SourceError> {
        let body = self.fetcher.fetch(&self.sources.index).await?;
        let index = parse_index_document(&body, &self.sources.index)?;

        let mut posts = vec![];
        for file_name in index.posts.iter() {
            match self.load_post_file(file_name).await {
                Ok(post) => posts.push(post),
                Err(e) => warn!("Skipping individual post: {}", e),
            }
        }
        Ok(posts)
    }

    async fn load_post_file(&self, file_name: &str) -> Result<Post, SourceError> {
        if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            return Err(SourceError::unavailable(file_name, "Invalid post file name"));
        }
        let path = self.sources.post_file(file_name);
        let body = self.fetcher.fetch(&path).await?;
        Post::from_json(&body).map_err(|e| SourceError::malformed(&path, e))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use crate::config::CollisionPolicy;
    use crate::test_data::{EMBEDDED_DOC, INDEX_DOC, POEM_JSON, PRIMARY_DOC};

    use super::*;

    /// In-memory site used by loader and application tests.
    #[derive(Default)]
    pub struct MapFetcher {
        pub files: HashMap<String, String>,
    }

    impl MapFetcher {
        pub fn with(mut self, path: &str, body: &str) -> Self {
            self.files.insert(path.to_string(), body.to_string());
            self
        }

        pub fn full_site() -> Self {
            MapFetcher::default()
                .with("posts/posts.json", PRIMARY_DOC)
                .with("posts/individual-posts-index.json", INDEX_DOC)
                .with("posts/cancion-del-agua.json", POEM_JSON)
        }
    }

    impl Fetcher for MapFetcher {
        async fn fetch(&self, path: &str) -> Result<String, SourceError> {
            self.files.get(path)
                .cloned()
                .ok_or_else(|| SourceError::unavailable(path, "404"))
        }
    }

    fn slugs(collection: &Collection) -> Vec<&str> {
        collection.posts().iter().map(|p| p.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_full_load() {
        let loader = SourceLoader::new(MapFetcher::full_site(), Sources::default())
            .with_embedded(EMBEDDED_DOC);

        let mut stages = vec![];
        let collection = loader.load_all(|snapshot| stages.push((snapshot.stage, snapshot.collection.len()))).await;

        assert_eq!(stages, vec![(Stage::Embedded, 1), (Stage::Primary, 3), (Stage::Individual, 4)]);
        // primary replaced the embedded baseline; the missing individual file was skipped
        assert_eq!(slugs(&collection), ["cancion-del-agua", "sin-buscarlo", "luna", "mar-de-fondo"]);
    }

    #[tokio::test]
    async fn test_primary_failure_keeps_embedded() {
        let fetcher = MapFetcher::default().with("posts/posts.json", r#"{"posts": {}}"#);
        let loader = SourceLoader::new(fetcher, Sources::default()).with_embedded(EMBEDDED_DOC);

        let mut stages = vec![];
        let collection = loader.load_all(|snapshot| stages.push(snapshot.stage)).await;
        assert_eq!(stages, vec![Stage::Embedded]);
        assert_eq!(slugs(&collection), ["antiguo"]);
    }

    #[tokio::test]
    async fn test_nothing_available() {
        let loader = SourceLoader::new(MapFetcher::default(), Sources::default());
        let mut calls = 0;
        let collection = loader.load_all(|_| calls += 1).await;
        assert!(collection.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_individual_posts_without_primary() {
        let fetcher = MapFetcher::full_site().with("posts/posts.json", "<html>404</html>");
        let loader = SourceLoader::new(fetcher, Sources::default());
        let collection = loader.load_all(|_| {}).await;
        assert_eq!(slugs(&collection), ["cancion-del-agua"]);
    }

    #[tokio::test]
    async fn test_collision_policy() {
        let duplicate = POEM_JSON.replace("Canción del agua", "Luna").replace("\"id\": 100", "\"id\": 101");
        let index = r#"{"posts": ["luna.json"], "lastUpdated": ""}"#;
        let fetcher = || MapFetcher::default()
            .with("posts/posts.json", PRIMARY_DOC)
            .with("posts/individual-posts-index.json", index)
            .with("posts/luna.json", &duplicate);

        let loader = SourceLoader::new(fetcher(), Sources::default());
        let collection = loader.load_all(|_| {}).await;
        assert_eq!(collection.posts().iter().filter(|p| p.slug == "luna").count(), 2);

        let sources = Sources { collision_policy: CollisionPolicy::LastWriteWins, ..Sources::default() };
        let loader = SourceLoader::new(fetcher(), sources);
        let collection = loader.load_all(|_| {}).await;
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.find("luna").unwrap().id, 101);
    }

    #[tokio::test]
    async fn test_rejects_unsafe_file_names() {
        let index = r#"{"posts": ["../secret.json"], "lastUpdated": ""}"#;
        let fetcher = MapFetcher::default()
            .with("posts/individual-posts-index.json", index)
            .with("secret.json", POEM_JSON);
        let loader = SourceLoader::new(fetcher, Sources::default());
        assert!(loader.load_all(|_| {}).await.is_empty());
    }
}
