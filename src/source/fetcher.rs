use std::path::{Component, Path, PathBuf};

use spdlog::debug;

use crate::source::{Fetcher, SourceError};

/// Serves documents from a site directory on disk.
pub struct FsFetcher {
    pub root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsFetcher { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(path);
        let escapes = relative.components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(SourceError::unavailable(path, "Access forbidden"));
        }
        Ok(self.root.join(relative))
    }
}

impl Fetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let full_path = self.resolve(path)?;
        debug!("Reading {}", full_path.display());
        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| SourceError::unavailable(path, e))
    }
}

/// Fetches documents relative to a deployed site URL.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        HttpFetcher {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let url = self.url_for(path);
        debug!("GET {}", url);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| SourceError::unavailable(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::unavailable(path, format!("HTTP {}", status)));
        }

        response.text()
            .await
            .map_err(|e| SourceError::unavailable(path, e))
    }
}
