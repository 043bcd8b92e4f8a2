use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Site {
    pub name: String,
    pub url: String,
    pub description: String,
    pub author: Option<String>,
    pub default_image: Option<String>,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            name: "El Rincón Franco".to_string(),
            url: "https://emilioantunez.github.io/elrinconfranco/".to_string(),
            description: "Relatos y poesía".to_string(),
            author: None,
            default_image: None,
        }
    }
}

impl Site {
    /// Site root, always ending with `/`.
    pub fn base_url(&self) -> String {
        if self.url.ends_with('/') {
            self.url.clone()
        } else {
            format!("{}/", self.url)
        }
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}#{}", self.base_url(), slug)
    }

    /// Resolves a site-relative asset path; absolute URLs are kept.
    pub fn asset_url(&self, path: &str) -> String {
        if path.contains("://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url(), path.trim_start_matches('/'))
        }
    }
}

#[derive(Deserialize, Copy, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Posts sharing a slug are all kept.
    #[default]
    Concatenate,
    /// A later post replaces an earlier one with the same slug.
    LastWriteWins,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Sources {
    pub primary: String,
    pub index: String,
    pub posts_dir: String,
    pub embedded_page: Option<String>,
    pub collision_policy: CollisionPolicy,
}

impl Default for Sources {
    fn default() -> Self {
        Sources {
            primary: "posts/posts.json".to_string(),
            index: "posts/individual-posts-index.json".to_string(),
            posts_dir: "posts".to_string(),
            embedded_page: Some("index.html".to_string()),
            collision_policy: CollisionPolicy::Concatenate,
        }
    }
}

impl Sources {
    pub fn post_file(&self, file_name: &str) -> String {
        format!("{}/{}", self.posts_dir.trim_end_matches('/'), file_name)
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Share {
    pub default_label: String,
    pub confirm_label: String,
    pub revert_after_ms: u64,
}

impl Default for Share {
    fn default() -> Self {
        Share {
            default_label: "Compartir".to_string(),
            confirm_label: "¡Enlace copiado!".to_string(),
            revert_after_ms: 2000,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub site: Site,
    pub sources: Sources,
    pub share: Share,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    match (exe_dir, path.to_str()) {
        (Some(exe_dir), Some(str_path)) => {
            PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
        }
        _ => path,
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
