// src/app/ui/topbar.rs
use std::time::Instant;

use eframe::egui as eg;

use crate::app::data::CatalogKind;
use crate::app::filters::SortKey;
use crate::app::types::Page;

impl crate::app::ShelfApp {
    // ---------- NAV BAR ----------
    pub(crate) fn ui_render_nav(&mut self, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            ui.heading("mediashelf");
            ui.separator();

            let mut pick = None;
            let pages = [
                Page::Home,
                Page::Catalog(CatalogKind::Movies),
                Page::Catalog(CatalogKind::TvShows),
                Page::Catalog(CatalogKind::Music),
                Page::Recommend,
            ];
            for page in pages {
                if ui.selectable_label(self.page == page, page.label()).clicked() {
                    pick = Some(page);
                }
            }
            if let Some(page) = pick.filter(|p| *p != self.page) {
                self.navigate(page);
            }
        });
    }

    // ---------- CATALOG TOOLBAR ----------
    /// Search box and sort buttons for the mounted catalog view.
    pub(crate) fn ui_render_catalog_toolbar(&mut self, ui: &mut eg::Ui, kind: CatalogKind) {
        let mut tickets = None;
        let mut sort_changed = false;
        let view = self.views.get_mut(kind);

        ui.horizontal(|ui| {
            let resp = ui.add(
                eg::TextEdit::singleline(&mut view.query_input)
                    .hint_text(kind.search_hint())
                    .desired_width(220.0),
            );
            if resp.changed() {
                view.query_edited(Instant::now());
            }

            ui.separator();
            ui.label("Sort:");

            for key in SortKey::options(kind) {
                let active = view.state.key == key;
                let label = if active {
                    format!("{} {}", key.label(), key.arrow(view.state.direction))
                } else {
                    key.label().to_string()
                };
                if ui.selectable_label(active, label).clicked() {
                    tickets = Some(view.select_key(key));
                    sort_changed = true;
                }
            }

            if let Some(catalog) = view.catalog() {
                ui.separator();
                ui.weak(format!("{} of {}", view.grid.len(), catalog.len()));
            }
        });

        if sort_changed {
            self.mark_dirty();
        }
        if let Some(tickets) = tickets {
            self.request_main_artwork(kind, &tickets);
        }
    }
}
