//! View model.
//!
//! [`Library`] owns the catalog cache and produces typed views for the
//! renderer. Every list view follows the same pipeline: make sure the catalog
//! is loaded, filter it, fetch all covers concurrently, and only then hand a
//! complete view back. Failures become [`Notice`]s; nothing here returns an
//! error to the caller.

use crate::api::NovelApi;
use crate::batch::{BatchCoordinator, Superseded};
use crate::carousel::{Carousel, MountedCarousel};
use crate::catalog::{CatalogCache, CatalogSnapshot};
use crate::config::{CarouselConfig, Config};
use crate::diagnostics::DiagnosticLog;
use crate::genres::{GenreMenu, genre_index};
use crate::images::{CoverSource, ImageResolver};
use crate::models::{Chapter, Novel};
use crate::navigation::{DetailRoute, Links};
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Inline messages shown in place of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoResults,
    SearchPrompt,
    EmptyGenre(String),
    LoadFailed,
    NovelNotFound,
    NoGenres,
    GenresFailed,
}

impl Notice {
    pub fn text(&self) -> String {
        match self {
            Notice::NoResults => "No results".to_string(),
            Notice::SearchPrompt => "Type a novel title to search.".to_string(),
            Notice::EmptyGenre(genre) => format!("No novels in genre \"{}\".", genre),
            Notice::LoadFailed => "Failed to load data.".to_string(),
            Notice::NovelNotFound => "Novel not found.".to_string(),
            Notice::NoGenres => "No genres.".to_string(),
            Notice::GenresFailed => "Failed to load genres.".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::LoadFailed | Notice::GenresFailed)
    }
}

/// Which novels a list view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Lowercased, trimmed title fragment.
    Title(String),
    /// Exact genre tag.
    Genre(String),
    All,
}

impl Filter {
    pub fn title(query: &str) -> Self {
        Filter::Title(query.trim().to_lowercase())
    }

    pub fn matches(&self, novel: &Novel) -> bool {
        match self {
            Filter::Title(needle) => novel.title_contains(needle),
            Filter::Genre(genre) => novel.has_genre(genre),
            Filter::All => true,
        }
    }
}

/// One rendered novel with its resolved cover.
#[derive(Debug, Clone)]
pub struct Card {
    pub novel: Novel,
    pub cover: CoverSource,
}

#[derive(Debug, Clone)]
pub enum ResultsView {
    Cards(Vec<Card>),
    Message(Notice),
}

impl ResultsView {
    pub fn cards(&self) -> &[Card] {
        match self {
            ResultsView::Cards(cards) => cards,
            ResultsView::Message(_) => &[],
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            ResultsView::Message(notice) => Some(notice),
            ResultsView::Cards(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum GenreMenuView {
    Menu(GenreMenu),
    Message(Notice),
}

#[derive(Debug, Clone)]
pub enum CarouselView {
    Slides { slides: Vec<Card>, state: Carousel },
    Message(Notice),
}

/// Outcome of a batch-backed view: a newer request may have replaced it.
#[derive(Debug, Clone)]
pub enum RenderOutcome<T> {
    Ready(T),
    Superseded,
}

impl<T> RenderOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            RenderOutcome::Ready(view) => Some(view),
            RenderOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, RenderOutcome::Superseded)
    }
}

/// Chapter list ordering on the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChapterOrder {
    /// As received from the API.
    #[default]
    Newest,
    /// Reversed.
    Oldest,
}

#[derive(Debug, Clone)]
pub struct Detail {
    pub novel: Novel,
    pub cover: CoverSource,
    order: ChapterOrder,
}

impl Detail {
    pub fn order(&self) -> ChapterOrder {
        self.order
    }

    pub fn set_order(&mut self, order: ChapterOrder) {
        self.order = order;
    }

    pub fn ordered_chapters(&self) -> Vec<&Chapter> {
        match self.order {
            ChapterOrder::Newest => self.novel.chapters.iter().collect(),
            ChapterOrder::Oldest => self.novel.chapters.iter().rev().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DetailView {
    Ready(Detail),
    Message(Notice),
}

/// The front-end view model.
pub struct Library {
    api: Arc<dyn NovelApi>,
    cache: tokio::sync::Mutex<CatalogCache>,
    images: ImageResolver,
    results_batch: BatchCoordinator,
    carousel_batch: BatchCoordinator,
    menu: Mutex<GenreMenu>,
    carousel: Mutex<Option<MountedCarousel>>,
    carousel_config: CarouselConfig,
    links: Links,
    diagnostics: DiagnosticLog,
}

impl Library {
    pub fn new(api: Arc<dyn NovelApi>, config: &Config) -> Self {
        let diagnostics = DiagnosticLog::new(config.diagnostics.capacity);
        Self {
            cache: tokio::sync::Mutex::new(CatalogCache::new(
                api.clone(),
                &config.api,
                diagnostics.clone(),
            )),
            images: ImageResolver::new(api.clone(), &config.api, diagnostics.clone()),
            api,
            results_batch: BatchCoordinator::new(),
            carousel_batch: BatchCoordinator::new(),
            menu: Mutex::new(GenreMenu::default()),
            carousel: Mutex::new(None),
            carousel_config: config.carousel.clone(),
            links: Links::new(config.pages.clone()),
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Cached catalog, loading it if empty.
    pub async fn catalog(&self) -> CatalogSnapshot {
        self.cache.lock().await.ensure_loaded().await
    }

    /// Drops the cached catalog and loads it again.
    pub async fn refresh(&self) -> CatalogSnapshot {
        let mut cache = self.cache.lock().await;
        cache.invalidate();
        cache.load().await
    }

    /// Search on every keystroke. An empty query shows "no results".
    pub async fn search_live(&self, query: &str) -> RenderOutcome<ResultsView> {
        if query.trim().is_empty() {
            return self.show_results(ResultsView::Message(Notice::NoResults)).await;
        }
        self.render_results(Filter::title(query), Notice::NoResults)
            .await
    }

    /// Search on explicit request. An empty query shows a prompt.
    pub async fn search(&self, query: &str) -> RenderOutcome<ResultsView> {
        if query.trim().is_empty() {
            return self.show_results(ResultsView::Message(Notice::SearchPrompt)).await;
        }
        self.render_results(Filter::title(query), Notice::NoResults)
            .await
    }

    /// Marks `genre` active in the menu and lists its novels.
    ///
    /// The menu is rebuilt from the loaded catalog first, so the selection
    /// holds even if [`Library::genre_menu`] was never called.
    pub async fn browse_genre(&self, genre: &str) -> RenderOutcome<ResultsView> {
        self.render_results(
            Filter::Genre(genre.to_string()),
            Notice::EmptyGenre(genre.to_string()),
        )
        .await
    }

    /// Builds the genre menu, keeping the current selection when possible.
    pub async fn genre_menu(&self) -> GenreMenuView {
        let snapshot = self.catalog().await;
        if snapshot.failed() {
            return GenreMenuView::Message(Notice::GenresFailed);
        }
        if snapshot.catalog.is_empty() {
            return GenreMenuView::Message(Notice::NoGenres);
        }

        let mut menu = self.lock_menu();
        menu.rebuild(genre_index(&snapshot.catalog));
        GenreMenuView::Menu(menu.clone())
    }

    /// Loads every novel as a slide and mounts a fresh carousel.
    ///
    /// Any previously mounted carousel is released, timer included.
    pub async fn carousel(&self) -> RenderOutcome<CarouselView> {
        let snapshot = self.catalog().await;
        if snapshot.failed() {
            self.unmount_carousel();
            return RenderOutcome::Ready(CarouselView::Message(Notice::LoadFailed));
        }

        let novels: Vec<Novel> = snapshot.catalog.iter().cloned().collect();
        let Ok(slides) = self.carousel_batch.run(self.resolve_cards(novels)).await else {
            return RenderOutcome::Superseded;
        };

        let mounted = MountedCarousel::mount(slides.len(), &self.carousel_config);
        let state = mounted.snapshot();
        *self.lock_carousel() = Some(mounted);
        log::info!("Carousel mounted with {} slides", slides.len());
        self.diagnostics
            .record(format!("carousel loaded: {}", slides.len()));

        RenderOutcome::Ready(CarouselView::Slides { slides, state })
    }

    /// Current carousel state, if one is mounted.
    pub fn carousel_state(&self) -> Option<Carousel> {
        self.lock_carousel().as_ref().map(MountedCarousel::snapshot)
    }

    /// Drives the mounted carousel (pointer events, resize, manual steps).
    pub fn with_carousel<R>(&self, f: impl FnOnce(&mut Carousel) -> R) -> Option<R> {
        self.lock_carousel().as_ref().map(|mounted| mounted.with(f))
    }

    /// Releases the mounted carousel and its timer, and cancels a pending load.
    pub fn unmount_carousel(&self) -> bool {
        self.carousel_batch.cancel();
        self.lock_carousel().take().is_some()
    }

    /// Detail page for the novel named by the `id` parameter of `location`.
    pub async fn detail(&self, location: &str) -> DetailView {
        let route = match DetailRoute::parse(location) {
            Ok(route) => route,
            Err(err) => {
                log::warn!("Cannot open detail view: {}", err);
                self.diagnostics.record(format!("detail: {}", err));
                return DetailView::Message(Notice::LoadFailed);
            }
        };

        let mut novel = match self.api.fetch_novel(&route.novel_id).await {
            Ok(Some(novel)) => novel,
            Ok(None) => return DetailView::Message(Notice::NovelNotFound),
            Err(err) => {
                log::error!("Failed to load novel {}: {}", route.novel_id, err);
                self.diagnostics
                    .record(format!("detail load failed for {}: {}", route.novel_id, err));
                return DetailView::Message(Notice::LoadFailed);
            }
        };

        novel.img = self.images.normalize(&novel.img);
        let cover = self.images.resolve(&novel.img).await;
        DetailView::Ready(Detail {
            novel,
            cover,
            order: ChapterOrder::default(),
        })
    }

    /// Runs the whole results pipeline (catalog, filter, covers) as one batch,
    /// so a newer request supersedes this one at any stage.
    async fn render_results(&self, filter: Filter, empty: Notice) -> RenderOutcome<ResultsView> {
        let pipeline = async move {
            let snapshot = self.catalog().await;
            if snapshot.failed() {
                return ResultsView::Message(Notice::LoadFailed);
            }

            if let Filter::Genre(genre) = &filter {
                let mut menu = self.lock_menu();
                menu.rebuild(genre_index(&snapshot.catalog));
                if !menu.select(genre) {
                    log::debug!("genre {:?} not in menu", genre);
                }
            }

            let matches: Vec<Novel> = snapshot
                .catalog
                .iter()
                .filter(|novel| filter.matches(novel))
                .cloned()
                .collect();
            if matches.is_empty() {
                return ResultsView::Message(empty);
            }
            ResultsView::Cards(self.resolve_cards(matches).await)
        };

        self.finish_results(self.results_batch.run(pipeline).await)
    }

    /// Shows `view` immediately, superseding any batch still in flight.
    async fn show_results(&self, view: ResultsView) -> RenderOutcome<ResultsView> {
        self.finish_results(self.results_batch.run(std::future::ready(view)).await)
    }

    fn finish_results(&self, result: Result<ResultsView, Superseded>) -> RenderOutcome<ResultsView> {
        match result {
            Ok(view) => RenderOutcome::Ready(view),
            Err(superseded) => {
                log::debug!("results batch {} superseded", superseded.0.get());
                RenderOutcome::Superseded
            }
        }
    }

    /// Fetches all covers concurrently; the result keeps input order.
    async fn resolve_cards(&self, novels: Vec<Novel>) -> Vec<Card> {
        let covers = join_all(novels.iter().map(|novel| self.images.resolve(&novel.img))).await;
        novels
            .into_iter()
            .zip(covers)
            .map(|(novel, cover)| Card { novel, cover })
            .collect()
    }

    fn lock_menu(&self) -> MutexGuard<'_, GenreMenu> {
        self.menu.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_carousel(&self) -> MutexGuard<'_, Option<MountedCarousel>> {
        self.carousel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
