use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spdlog::{info, warn};

use rincon::config::{Config, Site, Sources};
use rincon::post::Post;
use rincon::source::{parse_posts_document, Collection};
use rincon::util::os_helper::get_name;
use rincon::view::page_meta::PageMeta;
use rincon::view::redirect_renderer::RedirectRenderer;

use crate::index::individual_post_files;
use crate::SiteArgs;

const STATIC_DIR: &str = "static";

/// Primary feed plus every individual post file found on disk.
pub fn load_site(site_dir: &Path, sources: &Sources) -> Result<Collection> {
    let primary_path = site_dir.join(&sources.primary);
    let json = fs::read_to_string(&primary_path)
        .with_context(|| format!("Error reading {}", primary_path.display()))?;
    let primary = parse_posts_document(&json, &sources.primary)?;

    let mut individual = Vec::new();
    for name in individual_post_files(site_dir, sources)? {
        let path = site_dir.join(sources.post_file(&name));
        let json = fs::read_to_string(&path)?;
        match Post::from_json(&json) {
            Ok(post) => individual.push(post),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    Ok(Collection::from_posts(primary).merged(individual, sources.collision_policy))
}

/// Writes one redirect page per post. Returns the written paths.
pub fn write_static_pages(site_dir: &Path, site: &Site, sources: &Sources,
                          collection: &Collection) -> Result<Vec<PathBuf>> {
    let renderer = RedirectRenderer::with_default_template()?;
    let out_dir = site_dir.join(&sources.posts_dir).join(STATIC_DIR);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Error creating {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(collection.len());
    for post in collection.posts() {
        if post.slug.is_empty() {
            warn!("Post {} has no slug. Skipping", post.id);
            continue;
        }
        let meta = PageMeta::for_post(site, post);
        let path = out_dir.join(format!("{}.html", post.slug));
        fs::write(&path, renderer.render(&meta))
            .with_context(|| format!("Error writing {}", path.display()))?;
        written.push(path);
    }

    info!("Generated {} static pages in {}", written.len(), out_dir.display());
    Ok(written)
}

pub fn static_pages_cmd(args: SiteArgs, config: &Config) -> Result<()> {
    let mut site = config.site.clone();
    if site.author.is_none() {
        site.author = Some(get_name());
    }

    let collection = load_site(&args.site_dir, &config.sources)?;
    for path in write_static_pages(&args.site_dir, &site, &config.sources, &collection)? {
        println!("{}", path.display());
    }
    Ok(())
}
