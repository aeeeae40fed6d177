// src/app/ui/mod.rs
pub mod grid;
pub mod home;
pub mod recommend;
pub mod topbar;

use std::time::Instant;

use eframe::egui as eg;

use crate::app::cards::catalog_card;
use crate::app::data::CatalogKind;
use crate::app::loader::CatalogSlot;
use crate::app::utils::image_source;

use self::grid::{show_lazy_grid, CardSource, GridOpts, SCROLL_TOP_AFTER};

pub const LOAD_ERROR_MESSAGE: &str = "Error loading content. Please try again later.";

impl crate::app::ShelfApp {
    pub(crate) fn ui_render_catalog_page(
        &mut self,
        ui: &mut eg::Ui,
        kind: CatalogKind,
        uploads_left: &mut usize,
    ) {
        self.ui_render_catalog_toolbar(ui, kind);
        ui.separator();

        match self.loader.slot(kind) {
            CatalogSlot::Failed(_) => {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| ui.label(LOAD_ERROR_MESSAGE));
                return;
            }
            CatalogSlot::Idle | CatalogSlot::Loading => {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.add(eg::Spinner::new().size(18.0));
                    ui.label(format!("Loading {}…", kind.label()));
                });
                return;
            }
            CatalogSlot::Ready(_) => {}
        }

        let image_base = self.cfg.image_base.clone();
        let scroll_to_top = std::mem::take(&mut self.scroll_to_top);
        let scrolling = !self.scroll_locked;
        let blocked = self.overlay.is_some();

        let view = self.views.get_mut(kind);
        let Some(catalog) = view.catalog().cloned() else {
            return;
        };
        if view.grid.is_empty() && view.state.has_query() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| ui.weak("Nothing matches your search."));
            return;
        }

        let text_of = |item: usize| catalog_card(&catalog, item);
        let image_of = |item: usize| image_source(&image_base, kind, catalog.rating_key(item));
        let out = show_lazy_grid(
            ui,
            &mut view.grid,
            &CardSource {
                text: &text_of,
                image: &image_of,
            },
            &mut self.art,
            uploads_left,
            GridOpts {
                id_salt: kind.as_str(),
                card_h: kind.card_height(),
                scrolling,
                scroll_to_top,
            },
        );

        self.main_offset = out.offset_y;
        self.request_main_artwork(kind, &out.new_tickets);

        if let Some(item) = out.clicked.filter(|_| !blocked) {
            if catalog.has_children() {
                self.open_detail(catalog, item, ui.ctx().frame_nr());
            }
        }
    }

    pub(crate) fn ui_render_scroll_top(&mut self, ctx: &eg::Context) {
        if self.overlay.is_some() || self.main_offset <= SCROLL_TOP_AFTER {
            return;
        }
        eg::Area::new(eg::Id::new("scroll_top"))
            .anchor(eg::Align2::RIGHT_BOTTOM, eg::vec2(-18.0, -18.0))
            .order(eg::Order::Foreground)
            .show(ctx, |ui| {
                if ui.button("↑ Top").clicked() {
                    self.scroll_to_top = true;
                }
            });
    }

    pub(crate) fn ui_render_toasts(&mut self, ctx: &eg::Context) {
        let toasts: Vec<_> = self.notifier.visible(Instant::now()).cloned().collect();
        if toasts.is_empty() {
            return;
        }
        eg::Area::new(eg::Id::new("toasts"))
            .anchor(eg::Align2::RIGHT_TOP, eg::vec2(-16.0, 48.0))
            .order(eg::Order::Tooltip)
            .interactable(false)
            .show(ctx, |ui| {
                for toast in toasts {
                    eg::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(280.0);
                        ui.strong(&toast.payload.title);
                        ui.label(&toast.payload.body);
                    });
                    ui.add_space(6.0);
                }
            });
    }
}
