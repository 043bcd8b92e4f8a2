use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use spdlog::info;

use rincon::config::{Config, Sources};
use rincon::source::IndexDocument;

use crate::SiteArgs;

fn file_name(path: &str) -> Option<&str> {
    Path::new(path).file_name().and_then(|name| name.to_str())
}

/// Every individually authored post file in the posts dir, sorted by name.
pub fn individual_post_files(site_dir: &Path, sources: &Sources) -> Result<Vec<String>> {
    let posts_dir = site_dir.join(&sources.posts_dir);
    let excluded = [file_name(&sources.primary), file_name(&sources.index)];

    let mut files = Vec::new();
    let entries = fs::read_dir(&posts_dir)
        .with_context(|| format!("Error reading posts dir {}", posts_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if excluded.contains(&Some(name)) {
            continue;
        }
        files.push(name.to_string());
    }

    files.sort();
    Ok(files)
}

pub fn index_path(site_dir: &Path, sources: &Sources) -> PathBuf {
    site_dir.join(&sources.index)
}

pub fn update_index(site_dir: &Path, sources: &Sources) -> Result<IndexDocument> {
    let index = IndexDocument {
        posts: individual_post_files(site_dir, sources)?,
        last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let path = index_path(site_dir, sources);
    let json = serde_json::to_string_pretty(&index)?;
    fs::write(&path, json).with_context(|| format!("Error writing index {}", path.display()))?;
    info!("Index {} updated with {} posts", path.display(), index.posts.len());

    Ok(index)
}

pub fn index_cmd(args: SiteArgs, config: &Config) -> Result<()> {
    let index = update_index(&args.site_dir, &config.sources)?;
    for name in &index.posts {
        println!("{}", name);
    }
    Ok(())
}
