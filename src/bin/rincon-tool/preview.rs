use std::time::Instant;

use anyhow::{anyhow, Result};
use spdlog::{info, warn};

use rincon::app::{App, UiEvent};
use rincon::config::{Config, Sources};
use rincon::navigation::MemoryHistory;
use rincon::share::{LegacyCopy, NoClipboard};
use rincon::source::embedded::extract_embedded;
use rincon::source::fetcher::{FsFetcher, HttpFetcher};
use rincon::source::loader::SourceLoader;
use rincon::source::Fetcher;
use rincon::view::list_renderer::Filter;

use crate::PreviewArgs;

/// Terminal stand-in for the off-screen input copy: prints the link.
struct PrintCopy;

impl LegacyCopy for PrintCopy {
    fn copy_via_input(&self, text: &str) -> bool {
        println!("Enlace: {}", text);
        true
    }
}

async fn embedded_posts<F: Fetcher>(fetcher: &F, sources: &Sources) -> Option<String> {
    let page = sources.embedded_page.as_ref()?;
    match fetcher.fetch(page).await {
        Ok(html) => extract_embedded(&html).map(|json| json.to_string()),
        Err(e) => {
            warn!("No embedded posts: {}", e);
            None
        }
    }
}

async fn run<F: Fetcher>(fetcher: F, args: PreviewArgs, config: &Config) -> Result<()> {
    let filter: Filter = args.filter.parse().map_err(|e| anyhow!("{}", e))?;
    let history = match args.open {
        Some(ref slug) => MemoryHistory::with_fragment(slug),
        None => MemoryHistory::new(),
    };
    let mut app = App::new(history, config)?;

    let mut loader = SourceLoader::new(fetcher, config.sources.clone());
    if let Some(json) = embedded_posts(loader.fetcher(), &config.sources).await {
        loader = loader.with_embedded(json);
    }
    let collection = loader.load_all(|snapshot| {
        app.apply_snapshot(snapshot);
    }).await;
    app.finish_loading(collection);
    info!("Loaded {} posts", app.collection().len());

    app.dispatch(UiEvent::FilterClicked(filter));
    println!("{}", app.render_list());

    if let Some(ref slug) = args.open {
        if app.open_post().is_none() {
            println!("Post {} not found", slug);
            return Ok(());
        }
    }

    let now = Instant::now();
    if args.share {
        app.share_open_post(&NoClipboard, &PrintCopy, now).await;
    }

    if let Some(detail) = app.render_detail(now) {
        let surface = app.surface();
        println!("<title>{}</title>", surface.meta.title);
        for tag in surface.meta.tags() {
            println!("<meta {}=\"{}\" content=\"{}\">", tag.attr, tag.key, tag.content);
        }
        println!("{}", detail);
    }
    Ok(())
}

pub async fn preview_cmd(args: PreviewArgs, config: &Config) -> Result<()> {
    if args.site.starts_with("http://") || args.site.starts_with("https://") {
        let fetcher = HttpFetcher::new(&args.site);
        run(fetcher, args, config).await
    } else {
        let fetcher = FsFetcher::new(&args.site);
        run(fetcher, args, config).await
    }
}
