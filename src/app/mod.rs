// src/app/mod.rs — catalog loads, lazy grids, detail overlay and the recommendation board

// ---- Standard lib imports ----
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ---- Crates ----
use eframe::egui as eg;
use tracing::{debug, error, info, warn};

// ---- Local modules ----
pub mod cache;
pub mod capability;
pub mod cards;
pub mod data;
pub mod detail;
pub mod filters;
pub mod gfx;
pub mod lazy;
pub mod loader;
pub mod prefetch;
pub mod prefs;
pub mod recommend;
pub mod types;
pub mod ui;
pub mod utils;
pub mod view;

use crate::config::{load_config, resolve_relative_path, AppConfig};

use self::capability::{DismissTracker, InputCapability};
use self::data::CatalogKind;
use self::detail::DetailOverlay;
use self::lazy::Ticket;
use self::loader::{LoadOutcome, Loader, SnapshotSource};
use self::prefetch::{ArtworkBook, ArtworkPool};
use self::recommend::{
    JsonFileStore, NotificationPayload, Notifier, RecommendForm, RecommendationBoard,
    RecommendationStore, Snapshot, Subscription, ToastNotifier,
};
use self::types::{GridId, Page};
use self::view::ViewSet;

// ---- Tunables ----
const MAX_DONE_PER_FRAME: usize = 12;
const MAX_UPLOADS_PER_FRAME: usize = 4;
const MAX_SNAPSHOTS_PER_FRAME: usize = 4;
const IDLE_REPAINT: Duration = Duration::from_millis(250);

pub struct ShelfApp {
    cfg: AppConfig,
    capability: InputCapability,

    // catalogs
    loader: Loader,
    views: ViewSet,
    page: Page,

    // detail overlay
    overlay: Option<DetailOverlay>,
    overlay_opened_frame: u64,
    dismiss: DismissTracker,
    scroll_locked: bool,

    // main scroll
    scroll_to_top: bool,
    main_offset: f32,

    // artwork
    art: ArtworkBook,

    // recommendations
    store: Arc<dyn RecommendationStore>,
    form: RecommendForm,
    form_note: Option<&'static str>,
    board: RecommendationBoard,
    board_rx: Option<Receiver<Snapshot>>,
    subscription: Option<Subscription>,
    notifier: ToastNotifier,
    permission_asked: bool,

    // prefs
    prefs_dirty: bool,
    prefs_last_write: Instant,

    // one-time init guard
    did_init: bool,
}

impl ShelfApp {
    pub fn new() -> Self {
        Self::with_config(load_config())
    }

    pub fn with_config(cfg: AppConfig) -> Self {
        let capability = InputCapability::detect(cfg.input_mode);
        let loader = Loader::new(SnapshotSource::from_config(&cfg.data_source));
        let views = ViewSet::new(
            cfg.lookahead_px,
            Duration::from_millis(cfg.search_debounce_ms),
            cfg.eager_threshold,
        );
        let art = ArtworkBook::new(ArtworkPool::start(
            cfg.artwork_workers,
            cache::artwork_cache_dir(),
        ));

        let store_path = cfg.recommendations_file.as_deref().map_or_else(
            || cache::cache_dir().join("recommendations.json"),
            resolve_relative_path,
        );
        info!("recommendations stored at {}", store_path.display());
        let store: Arc<dyn RecommendationStore> = Arc::new(JsonFileStore::new(store_path));

        Self {
            capability,
            loader,
            views,
            page: Page::Home,
            overlay: None,
            overlay_opened_frame: 0,
            dismiss: DismissTracker::new(capability),
            scroll_locked: false,
            scroll_to_top: false,
            main_offset: 0.0,
            art,
            store,
            form: RecommendForm::default(),
            form_note: None,
            board: RecommendationBoard::default(),
            board_rx: None,
            subscription: None,
            notifier: ToastNotifier::default(),
            permission_asked: false,
            prefs_dirty: false,
            prefs_last_write: Instant::now(),
            did_init: false,
            cfg,
        }
    }

    pub const fn page(&self) -> Page {
        self.page
    }

    /// Switches pages. The outgoing page is torn down first, then the
    /// incoming one is mounted; a catalog already loaded renders right away.
    pub(crate) fn navigate(&mut self, page: Page) {
        self.close_detail();
        if self.page == Page::Recommend && page != Page::Recommend {
            self.leave_board();
        }
        self.views.unmount();
        self.page = page;
        self.scroll_to_top = true;
        self.main_offset = 0.0;
        debug!("navigate → {}", page.as_str());

        match page {
            Page::Home => {
                for kind in CatalogKind::ALL {
                    self.loader.request(kind);
                }
            }
            Page::Catalog(kind) => {
                self.loader.request(kind);
                let ready = self.loader.catalog(kind);
                let tickets = self.views.mount(kind, ready);
                self.request_main_artwork(kind, &tickets);
            }
            Page::Recommend => self.enter_board(),
        }
        self.mark_dirty();
    }

    pub(crate) fn request_main_artwork(&mut self, kind: CatalogKind, tickets: &[Ticket]) {
        if tickets.is_empty() {
            return;
        }
        let view = self.views.get(kind);
        let Some(catalog) = view.catalog() else {
            return;
        };
        for t in tickets {
            let Some(item) = view.grid.item(t.position) else {
                continue;
            };
            if let Some(src) =
                utils::image_source(&self.cfg.image_base, kind, catalog.rating_key(item))
            {
                self.art.request(GridId::Main, *t, src);
            }
        }
    }

    // ---- recommendation board ----
    fn enter_board(&mut self) {
        if !self.permission_asked {
            self.permission_asked = true;
            match self.notifier.request_permission() {
                Ok(Some(token)) => debug!("notifier token {token}"),
                Ok(None) => info!("notifications not permitted"),
                Err(e) => warn!("notification permission failed: {e}"),
            }
        }
        let (tx, rx) = mpsc::channel();
        match self.store.subscribe(tx) {
            Ok(sub) => {
                self.subscription = Some(sub);
                self.board_rx = Some(rx);
            }
            Err(e) => error!("recommendation subscribe failed: {e}"),
        }
    }

    fn leave_board(&mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.cancel();
        }
        self.board_rx = None;
        self.form_note = None;
    }

    fn poll_board(&mut self) {
        let Some(rx) = &self.board_rx else {
            return;
        };
        let snapshots: Vec<Snapshot> = rx.try_iter().take(MAX_SNAPSHOTS_PER_FRAME).collect();
        for snap in snapshots {
            for req in self.board.apply(&snap) {
                self.notifier
                    .on_message(NotificationPayload::for_request(&req));
            }
        }
    }

    // ---- background results ----
    fn poll_loads(&mut self) {
        for outcome in self.loader.poll(MAX_DONE_PER_FRAME) {
            match outcome {
                LoadOutcome::Ready(kind, catalog) => {
                    if let Some(tickets) = self.views.data_ready(kind, catalog) {
                        self.request_main_artwork(kind, &tickets);
                    }
                }
                LoadOutcome::Failed(_) => {}
            }
        }
    }

    fn poll_artwork(&mut self) {
        let views = &self.views;
        let overlay = &self.overlay;
        self.art.pump(MAX_DONE_PER_FRAME, |grid, ticket| match grid {
            GridId::Main => views
                .mounted()
                .is_some_and(|kind| views.get(kind).grid.accepts(ticket)),
            GridId::Detail => overlay.as_ref().is_some_and(|o| o.grid.accepts(ticket)),
        });
    }

    fn tick_search(&mut self, ctx: &eg::Context) {
        let now = Instant::now();
        let Some(view) = self.views.mounted_view_mut() else {
            return;
        };
        let kind = view.kind();
        if let Some(tickets) = view.tick(now) {
            self.scroll_to_top = true;
            self.request_main_artwork(kind, &tickets);
        } else if let Some(wait) = view.debounce_remaining(now) {
            ctx.request_repaint_after(wait);
        }
    }

    fn first_frame(&mut self) {
        let prefs = prefs::read_prefs(&prefs::prefs_path());
        self.apply_prefs(&prefs);
        let page = prefs.page.unwrap_or(Page::Home);
        info!("starting on {}", page.as_str());
        self.navigate(page);
        self.prefs_dirty = false;
    }
}

impl Default for ShelfApp {
    fn default() -> Self {
        Self::new()
    }
}

// ========== App impl ==========
impl eframe::App for ShelfApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        if !self.did_init {
            self.did_init = true;
            self.first_frame();
        }

        self.poll_loads();
        self.poll_artwork();
        self.poll_board();
        self.tick_search(ctx);

        let mut uploads_left = MAX_UPLOADS_PER_FRAME;

        eg::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.add_space(4.0);
            self.ui_render_nav(ui);
            ui.add_space(2.0);
        });

        eg::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Home => self.ui_render_home(ui),
            Page::Catalog(kind) => self.ui_render_catalog_page(ui, kind, &mut uploads_left),
            Page::Recommend => self.ui_render_recommend(ui),
        });

        self.ui_render_detail_overlay(ctx, &mut uploads_left);
        self.ui_render_scroll_top(ctx);
        self.ui_render_toasts(ctx);

        self.maybe_save_prefs();

        // background work reports over channels; keep polling while idle
        ctx.request_repaint_after(IDLE_REPAINT);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.leave_board();
        if self.prefs_dirty {
            self.save_prefs();
        }
    }
}
