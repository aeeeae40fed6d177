// src/app/view.rs
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use super::data::{Catalog, CatalogKind};
use super::filters::{Debouncer, Direction, SortKey, ViewState};
use super::lazy::{eager_for, LazyGrid, Ticket};

/// One catalog page: its sort/search state, the live render pass and the
/// search box contents (which lag `state.query` by the debounce delay).
#[derive(Debug)]
pub struct CatalogView {
    pub state: ViewState,
    pub grid: LazyGrid,
    pub query_input: String,
    debounce: Debouncer,
    eager_threshold: usize,
    catalog: Option<Arc<Catalog>>,
    mounted: bool,
}

impl CatalogView {
    pub fn new(kind: CatalogKind, margin: f32, debounce: Duration, eager_threshold: usize) -> Self {
        Self {
            state: ViewState::new(kind),
            grid: LazyGrid::new(margin),
            query_input: String::new(),
            debounce: Debouncer::new(debounce),
            eager_threshold,
            catalog: None,
            mounted: false,
        }
    }

    pub const fn kind(&self) -> CatalogKind {
        self.state.kind
    }

    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        self.catalog.as_ref()
    }

    /// Restores a persisted sort without rendering.
    pub fn restore_sort(&mut self, key: SortKey, direction: Direction) {
        if SortKey::options(self.kind()).contains(&key) {
            self.state.key = key;
            self.state.direction = direction;
        }
    }

    fn mount(&mut self, ready: Option<Arc<Catalog>>) -> Vec<Ticket> {
        self.mounted = true;
        match ready {
            Some(catalog) => self.on_data_ready(catalog),
            None => Vec::new(),
        }
    }

    /// A search still waiting on the debounce is applied, so the box and
    /// the grid agree when the view is mounted again.
    fn unmount(&mut self) {
        self.mounted = false;
        if self.debounce.is_pending() {
            self.state.set_query(&self.query_input.to_lowercase());
        }
        self.debounce.cancel();
        self.grid.teardown();
    }

    /// Applies a freshly loaded catalog and renders the first pass.
    pub fn on_data_ready(&mut self, catalog: Arc<Catalog>) -> Vec<Ticket> {
        self.catalog = Some(catalog);
        self.rerender()
    }

    /// Tears down the current pass and starts a new one from the full catalog.
    pub fn rerender(&mut self) -> Vec<Ticket> {
        let Some(catalog) = self.catalog.as_ref() else {
            return Vec::new();
        };
        let items = self.state.derive(catalog);
        let eager = eager_for(self.state.has_query(), items.len(), self.eager_threshold);
        debug!(
            "{}: pass over {} item(s), eager={eager}",
            self.kind().label(),
            items.len()
        );
        self.grid.begin_pass(items, eager)
    }

    pub fn select_key(&mut self, key: SortKey) -> Vec<Ticket> {
        self.state.select_key(key);
        self.rerender()
    }

    /// Call after every edit of `query_input`.
    pub fn query_edited(&mut self, now: Instant) {
        self.debounce.touch(now);
    }

    pub fn debounce_remaining(&self, now: Instant) -> Option<Duration> {
        self.debounce.remaining(now)
    }

    /// Re-renders once the search box has been quiet long enough.
    pub fn tick(&mut self, now: Instant) -> Option<Vec<Ticket>> {
        if !self.debounce.fire(now) {
            return None;
        }
        let query = self.query_input.to_lowercase();
        if query == self.state.query {
            return None;
        }
        self.state.set_query(&query);
        Some(self.rerender())
    }
}

/// The three catalog views. At most one is mounted; data-ready only reaches
/// a mounted view, and a view mounting after its data arrived picks it up
/// on mount.
#[derive(Debug)]
pub struct ViewSet {
    views: [CatalogView; 3],
    mounted: Option<CatalogKind>,
}

const fn view_index(kind: CatalogKind) -> usize {
    match kind {
        CatalogKind::Movies => 0,
        CatalogKind::TvShows => 1,
        CatalogKind::Music => 2,
    }
}

impl ViewSet {
    pub fn new(margin: f32, debounce: Duration, eager_threshold: usize) -> Self {
        Self {
            views: CatalogKind::ALL
                .map(|kind| CatalogView::new(kind, margin, debounce, eager_threshold)),
            mounted: None,
        }
    }

    pub fn get(&self, kind: CatalogKind) -> &CatalogView {
        &self.views[view_index(kind)]
    }

    pub fn get_mut(&mut self, kind: CatalogKind) -> &mut CatalogView {
        &mut self.views[view_index(kind)]
    }

    pub const fn mounted(&self) -> Option<CatalogKind> {
        self.mounted
    }

    pub fn mounted_view_mut(&mut self) -> Option<&mut CatalogView> {
        let kind = self.mounted?;
        Some(self.get_mut(kind))
    }

    /// Mounts `kind` (unmounting any other view first).
    pub fn mount(&mut self, kind: CatalogKind, ready: Option<Arc<Catalog>>) -> Vec<Ticket> {
        self.unmount();
        self.mounted = Some(kind);
        self.get_mut(kind).mount(ready)
    }

    pub fn unmount(&mut self) {
        if let Some(kind) = self.mounted.take() {
            self.get_mut(kind).unmount();
        }
    }

    /// `None` when no view for `kind` is mounted; the catalog is then
    /// applied at the next mount instead.
    pub fn data_ready(&mut self, kind: CatalogKind, catalog: Arc<Catalog>) -> Option<Vec<Ticket>> {
        if self.mounted != Some(kind) {
            return None;
        }
        Some(self.get_mut(kind).on_data_ready(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(titles: &[&str]) -> Arc<Catalog> {
        let movies: Vec<String> = titles
            .iter()
            .map(|t| format!(r#"{{ "title": "{t}" }}"#))
            .collect();
        let json = format!(r#"{{ "movies": [{}] }}"#, movies.join(","));
        Arc::new(Catalog::parse(CatalogKind::Movies, json.as_bytes()).unwrap())
    }

    fn set() -> ViewSet {
        ViewSet::new(200.0, Duration::from_millis(300), usize::MAX)
    }

    #[test]
    fn data_ready_waits_for_mount() {
        let mut views = set();
        let cat = movies(&["B", "A"]);
        assert!(views.data_ready(CatalogKind::Movies, Arc::clone(&cat)).is_none());
        assert!(views.get(CatalogKind::Movies).grid.is_empty());

        views.mount(CatalogKind::Movies, Some(cat));
        let view = views.get(CatalogKind::Movies);
        assert!(view.is_mounted());
        assert_eq!(view.grid.items(), &[1, 0]);
        // lazy pass: nothing materialised until observed
        assert_eq!(view.grid.placeholder_count(), 2);
    }

    #[test]
    fn data_ready_renders_mounted_view() {
        let mut views = set();
        views.mount(CatalogKind::Movies, None);
        assert!(views.get(CatalogKind::Movies).grid.is_empty());
        let got = views.data_ready(CatalogKind::Movies, movies(&["X"]));
        assert!(got.is_some());
        assert_eq!(views.get(CatalogKind::Movies).grid.len(), 1);
        // another kind isn't mounted
        assert!(views.data_ready(CatalogKind::Music, movies(&["Y"])).is_none());
    }

    #[test]
    fn switching_views_tears_down_the_old_pass() {
        let mut views = set();
        views.mount(CatalogKind::Movies, Some(movies(&["A"])));
        let old_pass = views.get(CatalogKind::Movies).grid.pass();
        views.mount(CatalogKind::TvShows, None);
        let movies_view = views.get(CatalogKind::Movies);
        assert!(!movies_view.is_mounted());
        assert!(movies_view.grid.is_empty());
        assert_ne!(movies_view.grid.pass(), old_pass);
        assert_eq!(views.mounted(), Some(CatalogKind::TvShows));
    }

    #[test]
    fn debounced_query_renders_eagerly() {
        let mut views = set();
        views.mount(CatalogKind::Movies, Some(movies(&["The Dark Knight", "Heat"])));
        let view = views.get_mut(CatalogKind::Movies);

        let t0 = Instant::now();
        view.query_input = "DARK".into();
        view.query_edited(t0);
        assert!(view.tick(t0 + Duration::from_millis(100)).is_none());
        let tickets = view.tick(t0 + Duration::from_millis(300)).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(view.grid.items(), &[0]);
        assert_eq!(view.grid.placeholder_count(), 0);
        assert!(view.tick(t0 + Duration::from_millis(900)).is_none());
    }

    #[test]
    fn whitespace_query_still_filters() {
        let mut views = set();
        views.mount(CatalogKind::Movies, Some(movies(&["The Dark Knight", "Heat"])));
        let view = views.get_mut(CatalogKind::Movies);

        let t0 = Instant::now();
        view.query_input = " ".into();
        view.query_edited(t0);
        view.tick(t0 + Duration::from_millis(300)).unwrap();
        assert_eq!(view.state.query, " ");
        assert_eq!(view.grid.items(), &[0]);
    }

    #[test]
    fn leaving_mid_debounce_applies_the_typed_query() {
        let mut views = set();
        let cat = movies(&["The Dark Knight", "Heat"]);
        views.mount(CatalogKind::Movies, Some(Arc::clone(&cat)));
        let view = views.get_mut(CatalogKind::Movies);
        view.query_input = "Heat".into();
        view.query_edited(Instant::now());

        views.mount(CatalogKind::TvShows, None);
        let view = views.get(CatalogKind::Movies);
        assert_eq!(view.state.query, "heat");
        assert_eq!(view.query_input, "Heat");

        views.mount(CatalogKind::Movies, Some(cat));
        let view = views.get_mut(CatalogKind::Movies);
        assert_eq!(view.grid.items(), &[1]);
        assert!(view.tick(Instant::now() + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn restore_sort_ignores_keys_of_other_catalogs() {
        let mut views = set();
        let view = views.get_mut(CatalogKind::Movies);
        view.restore_sort(SortKey::Artist, Direction::Descending);
        assert_eq!(view.state.key, SortKey::Title);
        view.restore_sort(SortKey::Date, Direction::Descending);
        assert_eq!(view.state.key, SortKey::Date);
        assert_eq!(view.state.direction, Direction::Descending);
    }
}
