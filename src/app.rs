//! Ties the loader output, the list, the detail view and sharing together
//! behind a single event entry point.

use std::io;
use std::time::Instant;

use spdlog::{debug, warn};

use crate::config::Config;
use crate::navigation::{History, Navigator, Surface};
use crate::post::Post;
use crate::share::{Clipboard, Confirmation, LegacyCopy, Location, ShareButton};
use crate::source::{Collection, Snapshot, Stage};
use crate::view::list_renderer::{list_state, Filter, ListRenderer, ListState};
use crate::view::post_renderer::PostRenderer;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    FilterClicked(Filter),
    ReadClicked(String),
    CloseClicked,
    BackdropClicked,
    KeyDown(String),
    /// History already moved to another entry.
    PopState,
}

pub struct App<'a, H> {
    collection: Collection,
    stage: Option<Stage>,
    loaded: bool,
    filter: Filter,
    navigator: Navigator<H>,
    list_renderer: ListRenderer<'a>,
    post_renderer: PostRenderer<'a>,
    share_button: ShareButton,
    location: Location,
}

impl<H: History> App<'static, H> {
    pub fn new(history: H, config: &Config) -> io::Result<Self> {
        let location = Location::parse(&config.site.base_url())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        Ok(App {
            collection: Collection::default(),
            stage: None,
            loaded: false,
            filter: Filter::default(),
            navigator: Navigator::new(history, config.site.clone()),
            list_renderer: ListRenderer::with_default_template()?,
            post_renderer: PostRenderer::with_default_template()?,
            share_button: ShareButton::from_config(&config.share),
            location,
        })
    }
}

impl<'a, H: History> App<'a, H> {
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn navigator(&self) -> &Navigator<H> {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator<H> {
        &mut self.navigator
    }

    pub fn surface(&self) -> &Surface {
        self.navigator.surface()
    }

    pub fn open_post(&self) -> Option<&Post> {
        self.navigator.open_post()
    }

    /// Replaces the collection with a newer snapshot. Snapshots from an
    /// earlier stage than the one already applied are ignored.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> bool {
        if let Some(last) = self.stage {
            if snapshot.stage < last {
                debug!("Ignoring {:?} snapshot, already at {:?}", snapshot.stage, last);
                return false;
            }
        }
        debug!("Applying {:?} snapshot with {} posts", snapshot.stage, snapshot.collection.len());
        self.stage = Some(snapshot.stage);
        self.collection = snapshot.collection;
        self.navigator.sync_with_fragment(&self.collection);
        true
    }

    /// Every source resolved. An empty list now reads as empty instead of loading.
    pub fn finish_loading(&mut self, collection: Collection) {
        if !self.collection.same_as(&collection) {
            self.collection = collection;
        }
        self.loaded = true;
        self.navigator.sync_with_fragment(&self.collection);
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::FilterClicked(filter) => self.filter = filter,
            UiEvent::ReadClicked(slug) => match self.collection.find(&slug) {
                Some(post) => {
                    self.share_button.reset();
                    self.navigator.activate(post);
                }
                None => warn!("Read requested for unknown post {}", slug),
            },
            UiEvent::CloseClicked | UiEvent::BackdropClicked => self.navigator.close(),
            UiEvent::KeyDown(key) => {
                self.navigator.key_down(&key);
            }
            UiEvent::PopState => {
                self.share_button.reset();
                self.navigator.pop_state(&self.collection);
            }
        }
    }

    pub fn list_state(&self) -> ListState<'_> {
        list_state(&self.collection, self.filter, self.loaded)
    }

    pub fn render_list(&self) -> String {
        self.list_renderer.render(&self.list_state(), self.filter)
    }

    pub fn render_detail(&self, now: Instant) -> Option<String> {
        self.surface().detail.as_ref()
            .map(|detail| self.post_renderer.render(detail, self.share_button.label(now)))
    }

    pub fn share_label(&self, now: Instant) -> &str {
        self.share_button.label(now)
    }

    /// Share control of the open post. `None` when nothing is open.
    pub async fn share_open_post<C: Clipboard, L: LegacyCopy>(&mut self, clipboard: &C, fallback: &L,
                                                            now: Instant) -> Option<Confirmation> {
        let post = self.navigator.open_post()?.clone();
        Some(self.share_button.press(&post, &self.location, clipboard, fallback, now).await)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::Sources;
    use crate::navigation::{MemoryHistory, NavState};
    use crate::post::PostType;
    use crate::share::{CopyMethod, NoClipboard};
    use crate::source::loader::tests::MapFetcher;
    use crate::source::loader::SourceLoader;
    use crate::test_data::EMBEDDED_DOC;

    use super::*;

    struct NoInput;

    impl LegacyCopy for NoInput {
        fn copy_via_input(&self, _text: &str) -> bool {
            false
        }
    }

    fn app(history: MemoryHistory) -> App<'static, MemoryHistory> {
        App::new(history, &Config::default()).unwrap()
    }

    async fn load(app: &mut App<'static, MemoryHistory>, fetcher: MapFetcher) {
        let loader = SourceLoader::new(fetcher, Sources::default()).with_embedded(EMBEDDED_DOC);
        let collection = loader.load_all(|snapshot| {
            app.apply_snapshot(snapshot);
        }).await;
        app.finish_loading(collection);
    }

    fn slugs<H: History>(app: &App<H>) -> Vec<String> {
        match app.list_state() {
            ListState::Cards(posts) => posts.iter().map(|p| p.slug.clone()).collect(),
            _ => vec![],
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        let app = app(MemoryHistory::new());
        assert_eq!(app.list_state(), ListState::Loading);
        assert!(app.render_list().contains("Cargando entradas..."));
        assert_eq!(app.render_detail(Instant::now()), None);
    }

    #[tokio::test]
    async fn test_load_and_filter() {
        let mut app = app(MemoryHistory::new());
        load(&mut app, MapFetcher::full_site()).await;

        assert!(app.is_loaded());
        assert_eq!(slugs(&app), vec!["cancion-del-agua", "sin-buscarlo", "luna", "mar-de-fondo"]);

        app.dispatch(UiEvent::FilterClicked(Filter::Only(PostType::Poesia)));
        assert_eq!(slugs(&app), vec!["cancion-del-agua", "luna"]);
        assert_eq!(app.collection().len(), 4);

        app.dispatch(UiEvent::FilterClicked(Filter::All));
        assert_eq!(slugs(&app).len(), 4);
    }

    #[tokio::test]
    async fn test_everything_fails_shows_empty() {
        let mut app = app(MemoryHistory::new());
        let loader = SourceLoader::new(MapFetcher::default(), Sources::default());
        let collection = loader.load_all(|snapshot| {
            app.apply_snapshot(snapshot);
        }).await;
        assert_eq!(app.list_state(), ListState::Loading);

        app.finish_loading(collection);
        assert_eq!(app.list_state(), ListState::Empty);
        assert!(app.render_list().contains("No hay entradas para mostrar."));
    }

    #[tokio::test]
    async fn test_stale_snapshot_ignored() {
        let mut app = app(MemoryHistory::new());
        load(&mut app, MapFetcher::full_site()).await;

        let stale = Snapshot {
            stage: Stage::Embedded,
            collection: Collection::default(),
        };
        assert!(!app.apply_snapshot(stale));
        assert_eq!(app.collection().len(), 4);
    }

    #[tokio::test]
    async fn test_deep_link_to_individual_post() {
        let mut app = app(MemoryHistory::with_fragment("#cancion-del-agua"));
        load(&mut app, MapFetcher::full_site()).await;

        assert_eq!(app.open_post().unwrap().slug, "cancion-del-agua");
        let detail = app.render_detail(Instant::now()).unwrap();
        assert!(detail.contains("Canción del agua"));
        assert!(detail.contains("El agua canta<br>bajo el puente *viejo*"));
    }

    #[tokio::test]
    async fn test_read_close_and_back() {
        let mut app = app(MemoryHistory::new());
        load(&mut app, MapFetcher::full_site()).await;

        app.dispatch(UiEvent::ReadClicked("luna".to_string()));
        assert_eq!(app.open_post().unwrap().slug, "luna");
        assert!(app.surface().scroll_locked);

        app.dispatch(UiEvent::KeyDown("Escape".to_string()));
        assert_eq!(app.navigator().state(), &NavState::Closed);

        app.dispatch(UiEvent::ReadClicked("sin-buscarlo".to_string()));
        app.dispatch(UiEvent::BackdropClicked);
        assert_eq!(app.navigator().state(), &NavState::Closed);

        app.dispatch(UiEvent::ReadClicked("no-existe".to_string()));
        assert_eq!(app.navigator().state(), &NavState::Closed);

        app.dispatch(UiEvent::ReadClicked("luna".to_string()));
        app.navigator_mut().history_mut().back();
        app.dispatch(UiEvent::PopState);
        assert_eq!(app.navigator().state(), &NavState::Closed);
    }

    #[tokio::test]
    async fn test_share_open_post() {
        let mut app = app(MemoryHistory::new());
        load(&mut app, MapFetcher::full_site()).await;
        let now = Instant::now();
        assert_eq!(app.share_open_post(&NoClipboard, &NoInput, now).await, None);

        app.dispatch(UiEvent::ReadClicked("luna".to_string()));
        let res = app.share_open_post(&NoClipboard, &NoInput, now).await.unwrap();
        assert_eq!(res.url, "https://emilioantunez.github.io/elrinconfranco/#luna");
        assert_eq!(res.method, CopyMethod::Failed);
        assert!(app.render_detail(now).unwrap().contains("¡Enlace copiado!"));
        assert_eq!(app.share_label(now + Duration::from_secs(3)), "Compartir");
    }
}
