use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use spdlog::warn;

use rincon::logger::configure_logger;
use rincon::post::PostType;

use crate::config::open_config;
use crate::index::index_cmd;
use crate::post::post_cmd;
use crate::preview::preview_cmd;
use crate::static_pages::static_pages_cmd;

mod config;
mod index;
mod post;
mod preview;
mod static_pages;

const CFG_FILE_NAME: &str = "rincon.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config path
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Args,
}

#[derive(clap::Subcommand, Debug)]
enum Args {
    /// Create an individual post from stdin
    Post(PostArgs),
    /// Rewrite the individual posts index
    UpdateIndex(SiteArgs),
    /// Generate redirect pages with social meta tags
    StaticPages(SiteArgs),
    /// Load the site and print what the browser would show
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct SiteArgs {
    /// Root directory of the site
    #[arg(short, long, default_value = ".")]
    site_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct PostArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Kind of post
    #[arg(short, long, value_enum, default_value = "relato")]
    kind: KindArg,

    /// Short summary shown in the card
    #[arg(short, long, default_value = "")]
    excerpt: String,

    /// Publication date (YYYY-MM-DD). Today if empty
    #[arg(short, long)]
    date: Option<String>,

    /// Image path relative to the site root
    #[arg(short, long)]
    image: Option<String>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Site directory or base URL
    #[arg(short, long, default_value = ".")]
    site: String,

    /// all, relato or poesia
    #[arg(short, long, default_value = "all")]
    filter: String,

    /// Open this slug as if the page was loaded with #slug
    #[arg(short, long)]
    open: Option<String>,

    /// Share the opened post
    #[arg(long)]
    share: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Relato,
    Poesia,
}

impl From<KindArg> for PostType {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Relato => PostType::Relato,
            KindArg::Poesia => PostType::Poesia,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match open_config(cli.config_path.map(PathBuf::from)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run rincon-tool --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match cli.command {
        Args::Post(args) => post_cmd(args, &config),
        Args::UpdateIndex(args) => index_cmd(args, &config),
        Args::StaticPages(args) => static_pages_cmd(args, &config),
        Args::Preview(args) => preview_cmd(args, &config).await,
    }
}
