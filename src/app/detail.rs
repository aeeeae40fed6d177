// src/app/detail.rs
// show/artist overlay with its own child grid
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui as eg;
use tracing::debug;

use super::capability::InputCapability;
use super::cards::{album_card, artist_card, season_card, show_card, CardText};
use super::data::{Album, Catalog, CatalogKind, Season};
use super::filters::parse_year_range;
use super::lazy::{LazyGrid, Ticket};
use super::types::{GridId, PosterState};
use super::ui::grid::{paint_card, show_lazy_grid, CardSource, GridOpts};
use super::utils::image_source;

/// Newest first by the leading year; unknown (0) last, ties keep order.
pub fn season_order(seasons: &[Season]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..seasons.len()).collect();
    idx.sort_by_key(|&i| Reverse(parse_year_range(&seasons[i].year_range)));
    idx
}

/// Newest first; albums without a year last.
pub fn album_order(albums: &[Album]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..albums.len()).collect();
    idx.sort_by_key(|&i| Reverse(albums[i].year.filter(|y| *y != 0)));
    idx
}

/// A parent entry and the catalog it lives in.
pub struct Family {
    catalog: Arc<Catalog>,
    parent: usize,
}

impl Family {
    pub fn kind(&self) -> CatalogKind {
        self.catalog.kind()
    }

    pub fn parent_card(&self) -> Option<CardText> {
        match self.catalog.as_ref() {
            Catalog::TvShows(s) => s.shows.get(self.parent).map(show_card),
            Catalog::Music(s) => s.artists.get(self.parent).map(artist_card),
            Catalog::Movies(_) => None,
        }
    }

    pub fn parent_rating_key(&self) -> &str {
        self.catalog.rating_key(self.parent)
    }

    pub fn child_card(&self, child: usize) -> Option<CardText> {
        match self.catalog.as_ref() {
            Catalog::TvShows(s) => s
                .shows
                .get(self.parent)
                .and_then(|sh| sh.seasons.get(child))
                .map(season_card),
            Catalog::Music(s) => s
                .artists
                .get(self.parent)
                .and_then(|a| a.albums.get(child))
                .map(album_card),
            Catalog::Movies(_) => None,
        }
    }

    pub fn child_rating_key(&self, child: usize) -> &str {
        match self.catalog.as_ref() {
            Catalog::TvShows(s) => s
                .shows
                .get(self.parent)
                .and_then(|sh| sh.seasons.get(child))
                .map_or("", |se| se.season_rating_key.as_str()),
            Catalog::Music(s) => s
                .artists
                .get(self.parent)
                .and_then(|a| a.albums.get(child))
                .map_or("", |al| al.rating_key.as_str()),
            Catalog::Movies(_) => "",
        }
    }
}

pub struct DetailOverlay {
    pub family: Family,
    pub grid: LazyGrid,
}

impl DetailOverlay {
    /// `None` for movies (no children) or an out-of-range parent.
    pub fn open(
        catalog: Arc<Catalog>,
        parent: usize,
        capability: InputCapability,
        margin: f32,
    ) -> Option<(Self, Vec<Ticket>)> {
        let children = match catalog.as_ref() {
            Catalog::TvShows(s) => season_order(&s.shows.get(parent)?.seasons),
            Catalog::Music(s) => album_order(&s.artists.get(parent)?.albums),
            Catalog::Movies(_) => return None,
        };
        let mut grid = LazyGrid::new(margin);
        let tickets = grid.begin_pass(children, capability.eager_children());
        Some((
            Self {
                family: Family { catalog, parent },
                grid,
            },
            tickets,
        ))
    }
}

impl crate::app::ShelfApp {
    pub(crate) fn open_detail(&mut self, catalog: Arc<Catalog>, parent: usize, frame_nr: u64) {
        let Some((overlay, tickets)) = DetailOverlay::open(
            catalog,
            parent,
            self.capability,
            self.cfg.lookahead_px,
        ) else {
            return;
        };
        debug!(
            "detail overlay for {} #{parent}: {} child card(s)",
            overlay.family.kind().label(),
            overlay.grid.len()
        );
        self.dismiss.on_open(Instant::now());
        self.scroll_locked = true;
        self.overlay_opened_frame = frame_nr;
        self.overlay = Some(overlay);
        self.request_detail_artwork(&tickets);
    }

    pub(crate) fn close_detail(&mut self) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.grid.teardown();
        }
        self.scroll_locked = false;
    }

    fn request_detail_artwork(&mut self, tickets: &[Ticket]) {
        let Some(overlay) = self.overlay.as_ref() else {
            return;
        };
        let kind = overlay.family.kind();
        for t in tickets {
            let Some(child) = overlay.grid.item(t.position) else {
                continue;
            };
            let key = overlay.family.child_rating_key(child);
            if let Some(src) = image_source(&self.cfg.image_base, kind, key) {
                self.art.request(GridId::Detail, *t, src);
            }
        }
    }

    /// Feeds this frame's pointer events to the dismiss tracker.
    fn detail_dismiss_requested(&mut self, ctx: &eg::Context, card_rects: &[eg::Rect]) -> bool {
        if ctx.frame_nr() == self.overlay_opened_frame {
            return false;
        }
        if ctx.input(|i| i.key_pressed(eg::Key::Escape)) {
            return true;
        }
        let outside = |pos: eg::Pos2| !card_rects.iter().any(|r| r.contains(pos));
        let now = Instant::now();
        let events = ctx.input(|i| i.events.clone());
        let mut close = false;
        for ev in events {
            match ev {
                eg::Event::PointerButton {
                    pos,
                    button: eg::PointerButton::Primary,
                    pressed,
                    ..
                } => match self.capability {
                    InputCapability::Pointer if !pressed => {
                        close |= self.dismiss.pointer_click(now, outside(pos));
                    }
                    InputCapability::Pointer => {}
                    InputCapability::Touch if pressed => self.dismiss.touch_start(now, pos.y),
                    InputCapability::Touch => {
                        close |= self.dismiss.touch_end(now, pos.y, outside(pos));
                    }
                },
                eg::Event::PointerMoved(pos) => self.dismiss.touch_move(pos.y),
                _ => {}
            }
        }
        close
    }

    pub(crate) fn ui_render_detail_overlay(&mut self, ctx: &eg::Context, uploads_left: &mut usize) {
        let Some(mut overlay) = self.overlay.take() else {
            return;
        };

        let screen = ctx.screen_rect();
        let mut card_rects: Vec<eg::Rect> = Vec::new();
        let mut new_tickets: Vec<Ticket> = Vec::new();
        let kind = overlay.family.kind();
        let card_h = kind.card_height();
        let image_base = self.cfg.image_base.clone();
        let art = &mut self.art;

        eg::Area::new(eg::Id::new("detail_overlay"))
            .order(eg::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.set_min_size(screen.size());
                ui.painter()
                    .rect_filled(screen, 0.0, eg::Color32::from_black_alpha(215));

                let inner = screen.shrink2(eg::vec2(screen.width() * 0.06, 24.0));
                ui.allocate_ui_at_rect(inner, |ui| {
                    let family = &overlay.family;
                    let grid = &mut overlay.grid;

                    // parent card on top
                    let (parent_rect, _) = ui.allocate_exact_size(
                        eg::vec2(card_h / 1.5, card_h),
                        eg::Sense::hover(),
                    );
                    if let Some(text) = family.parent_card() {
                        let src = image_source(&image_base, kind, family.parent_rating_key());
                        let tex = src
                            .as_deref()
                            .and_then(|s| art.texture(ctx, s, uploads_left));
                        let waiting = src.as_deref().is_some_and(|s| {
                            matches!(art.state(s), Some(PosterState::Pending | PosterState::Cached))
                        });
                        paint_card(ui.painter(), parent_rect, &text, tex.as_ref(), waiting);
                        card_rects.push(parent_rect);
                    }
                    ui.add_space(12.0);

                    let text_of = |child: usize| family.child_card(child);
                    let image_of = |child: usize| {
                        image_source(&image_base, kind, family.child_rating_key(child))
                    };
                    let out = show_lazy_grid(
                        ui,
                        grid,
                        &CardSource {
                            text: &text_of,
                            image: &image_of,
                        },
                        art,
                        uploads_left,
                        GridOpts {
                            id_salt: "detail_grid",
                            card_h,
                            scrolling: true,
                            scroll_to_top: false,
                        },
                    );
                    card_rects.extend(out.card_rects);
                    new_tickets = out.new_tickets;
                });
            });

        self.overlay = Some(overlay);
        self.request_detail_artwork(&new_tickets);

        if self.detail_dismiss_requested(ctx, &card_rects) {
            self.close_detail();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shows() -> Arc<Catalog> {
        let json = r#"{ "shows": [ { "title": "Lost", "ratingKey": "1", "seasons": [
            { "seasonNumber": 1, "yearRange": "2004", "seasonRatingKey": "11" },
            { "seasonNumber": 0, "yearRange": "" },
            { "seasonNumber": 3, "yearRange": "2006-2007" },
            { "seasonNumber": 2, "yearRange": "2005" }
        ] } ] }"#;
        Arc::new(Catalog::parse(CatalogKind::TvShows, json.as_bytes()).unwrap())
    }

    #[test]
    fn seasons_newest_first_unknown_last() {
        let Catalog::TvShows(s) = shows().as_ref().clone() else {
            unreachable!()
        };
        assert_eq!(season_order(&s.shows[0].seasons), vec![2, 3, 0, 1]);
    }

    #[test]
    fn albums_newest_first_missing_year_last() {
        let albums = vec![
            Album { year: Some(1997), ..Album::default() },
            Album { year: None, ..Album::default() },
            Album { year: Some(2001), ..Album::default() },
            Album { year: Some(1997), ..Album::default() },
        ];
        assert_eq!(album_order(&albums), vec![2, 0, 3, 1]);
    }

    #[test]
    fn pointer_sessions_render_children_lazily() {
        let (overlay, tickets) =
            DetailOverlay::open(shows(), 0, InputCapability::Pointer, 200.0).unwrap();
        assert!(tickets.is_empty());
        assert_eq!(overlay.grid.placeholder_count(), 4);
        assert_eq!(overlay.family.child_card(1).map(|c| c.title).as_deref(), Some("Specials"));
    }

    #[test]
    fn touch_sessions_batch_render_children() {
        let (overlay, tickets) =
            DetailOverlay::open(shows(), 0, InputCapability::Touch, 200.0).unwrap();
        assert_eq!(tickets.len(), 4);
        assert_eq!(overlay.grid.placeholder_count(), 0);
        assert_eq!(overlay.family.child_rating_key(overlay.grid.item(0).unwrap()), "");
        assert_eq!(overlay.family.child_rating_key(0), "11");
    }

    #[test]
    fn movies_have_no_overlay() {
        let cat = Arc::new(
            Catalog::parse(CatalogKind::Movies, br#"{ "movies": [ { "title": "Heat" } ] }"#)
                .unwrap(),
        );
        assert!(DetailOverlay::open(cat, 0, InputCapability::Pointer, 200.0).is_none());
        assert!(DetailOverlay::open(shows(), 9, InputCapability::Pointer, 200.0).is_none());
    }
}
