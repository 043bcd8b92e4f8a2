use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use spdlog::{info, warn};

use rincon::config::{Config, Sources};
use rincon::content::{Content, Item};
use rincon::post::{Post, PostDate, PostType};
use rincon::text_utils::{parse_post_date, slugify};

use crate::index::{individual_post_files, update_index};
use crate::PostArgs;

const END_MARKER: &str = "FIN";
const STANZA_BREAK: &str = "---";

/// Reads the body until `FIN` or end of input.
///
/// Stories get one paragraph per line. Poems collect lines into stanzas
/// separated by `---`.
pub fn read_body<R: BufRead>(reader: R, kind: PostType) -> io::Result<Content> {
    let mut items = Vec::new();
    let mut stanza: Vec<String> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line == END_MARKER {
            break;
        }
        match kind {
            PostType::Relato => {
                if !line.is_empty() {
                    items.push(Item::Text(line.to_string()));
                }
            }
            PostType::Poesia => {
                if line == STANZA_BREAK {
                    if !stanza.is_empty() {
                        items.push(Item::Stanza(std::mem::take(&mut stanza)));
                    }
                } else if !line.is_empty() {
                    stanza.push(line.to_string());
                }
            }
        }
    }
    if !stanza.is_empty() {
        items.push(Item::Stanza(stanza));
    }

    Ok(Content::Paragraphs(items))
}

/// Highest id among individual posts plus one, never below 100.
pub fn next_id(site_dir: &Path, sources: &Sources) -> Result<u64> {
    let mut max_id = None;
    for name in individual_post_files(site_dir, sources)? {
        let path = site_dir.join(sources.post_file(&name));
        let json = fs::read_to_string(&path)?;
        match Post::from_json(&json) {
            Ok(post) => max_id = max_id.max(Some(post.id)),
            Err(e) => warn!("Ignoring {} while looking for the next id: {}", path.display(), e),
        }
    }
    Ok(max_id.map_or(100, |id| (id + 1).max(100)))
}

pub fn write_post(site_dir: &Path, sources: &Sources, post: &Post) -> Result<PathBuf> {
    if post.slug.is_empty() {
        bail!("Title '{}' produces an empty slug", post.title);
    }
    let path = site_dir.join(sources.post_file(&format!("{}.json", post.slug)));
    if path.exists() {
        bail!("Post {} already exists", path.display());
    }
    let json = serde_json::to_string_pretty(post)?;
    fs::write(&path, json).with_context(|| format!("Error writing post {}", path.display()))?;
    Ok(path)
}

pub fn post_cmd(args: PostArgs, config: &Config) -> Result<()> {
    let kind = PostType::from(args.kind);
    let date = match args.date {
        Some(date) => {
            if parse_post_date(&date).is_none() {
                bail!("Invalid date {}. Expected YYYY-MM-DD", date);
            }
            PostDate::from(date.as_str())
        }
        None => PostDate::from(Local::now().date_naive()),
    };

    println!("Write the post. End with {} on its own line", END_MARKER);
    if kind == PostType::Poesia {
        println!("Separate stanzas with {}", STANZA_BREAK);
    }
    let content = read_body(io::stdin().lock(), kind)?;

    let site_dir = &args.site.site_dir;
    let sources = &config.sources;
    let post = Post {
        id: next_id(site_dir, sources)?,
        slug: slugify(&args.title),
        title: args.title,
        kind,
        date,
        excerpt: args.excerpt,
        content,
        image: args.image.filter(|image| !image.trim().is_empty()),
    };

    let path = write_post(site_dir, sources, &post)?;
    info!("Created post {} with id {}", path.display(), post.id);
    update_index(site_dir, sources)?;

    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_story_body() {
        let input = "Primera línea.\n\nSegunda línea.\nFIN\nignorado\n";
        let content = read_body(input.as_bytes(), PostType::Relato).unwrap();
        assert_eq!(content, Content::Paragraphs(vec![
            Item::Text("Primera línea.".to_string()),
            Item::Text("Segunda línea.".to_string()),
        ]));
    }

    #[test]
    fn test_read_poem_body() {
        let input = "verso uno\nverso dos\n---\n---\nverso tres\n";
        let content = read_body(input.as_bytes(), PostType::Poesia).unwrap();
        assert_eq!(content, Content::Paragraphs(vec![
            Item::Stanza(vec!["verso uno".to_string(), "verso dos".to_string()]),
            Item::Stanza(vec!["verso tres".to_string()]),
        ]));
    }

    fn post(id: u64, title: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
            kind: PostType::Relato,
            slug: slugify(title),
            date: PostDate::from("2024-05-01"),
            excerpt: String::new(),
            content: Content::Plain("texto".to_string()),
            image: None,
        }
    }

    #[test]
    fn test_write_post_and_next_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        let sources = Sources::default();
        assert_eq!(next_id(dir.path(), &sources).unwrap(), 100);

        let path = write_post(dir.path(), &sources, &post(100, "Un día más")).unwrap();
        assert!(path.ends_with("posts/un-dia-mas.json"));
        assert_eq!(next_id(dir.path(), &sources).unwrap(), 101);

        let written = Post::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, post(100, "Un día más"));

        assert!(write_post(dir.path(), &sources, &post(101, "Un día más")).is_err());
        assert!(write_post(dir.path(), &sources, &post(101, "¿?")).is_err());
    }
}
