// src/app/ui/home.rs
use eframe::egui as eg;

use crate::app::data::{Catalog, CatalogKind};
use crate::app::loader::CatalogSlot;
use crate::app::types::Page;
use crate::app::utils::format_number;

/// Label/value rows from a snapshot's metadata block.
pub fn catalog_totals(catalog: &Catalog) -> Vec<(&'static str, String)> {
    match catalog {
        Catalog::Movies(s) => vec![
            ("Movies", format_number(s.metadata.total_movies)),
            ("Total size", s.metadata.total_size_human.clone()),
        ],
        Catalog::TvShows(s) => vec![
            ("Shows", format_number(s.metadata.total_show)),
            ("Seasons", format_number(s.metadata.total_season_count)),
            ("Episodes", format_number(s.metadata.total_episode)),
            ("Total size", s.metadata.total_size_human.clone()),
        ],
        Catalog::Music(s) => vec![
            ("Artists", format_number(s.metadata.total_artists)),
            ("Albums", format_number(s.metadata.total_albums)),
            ("Tracks", format_number(s.metadata.total_tracks)),
            ("Total size", s.metadata.total_size_human.clone()),
            ("Total duration", s.metadata.total_duration_human.clone()),
        ],
    }
}

impl crate::app::ShelfApp {
    pub(crate) fn ui_render_home(&mut self, ui: &mut eg::Ui) {
        ui.add_space(12.0);
        let mut open = None;

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = eg::vec2(16.0, 16.0);
            for kind in CatalogKind::ALL {
                let frame = eg::Frame::group(ui.style()).inner_margin(14.0);
                let resp = frame
                    .show(ui, |ui| {
                        ui.set_min_size(eg::vec2(220.0, 140.0));
                        ui.heading(kind.label());
                        ui.separator();
                        match self.loader.slot(kind) {
                            CatalogSlot::Ready(catalog) => {
                                eg::Grid::new(("totals", kind.as_str()))
                                    .num_columns(2)
                                    .spacing([12.0, 4.0])
                                    .show(ui, |ui| {
                                        for (label, value) in catalog_totals(catalog) {
                                            ui.weak(label);
                                            ui.strong(value);
                                            ui.end_row();
                                        }
                                    });
                            }
                            CatalogSlot::Failed(_) => {
                                ui.label(super::LOAD_ERROR_MESSAGE);
                            }
                            CatalogSlot::Idle | CatalogSlot::Loading => {
                                ui.add(eg::Spinner::new().size(16.0));
                            }
                        }
                    })
                    .response;
                let id = eg::Id::new(("home_card", kind.as_str()));
                if ui.interact(resp.rect, id, eg::Sense::click()).clicked() {
                    open = Some(kind);
                }
            }
        });

        if let Some(kind) = open {
            self.navigate(Page::Catalog(kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn music_totals_are_grouped() {
        let cat = Catalog::parse(
            CatalogKind::Music,
            br#"{ "metadata": { "totalArtists": 1204, "totalAlbums": 9876,
                 "totalTracks": 123456, "totalSizeHuman": "1.2 TB",
                 "totalDurationHuman": "300 days" }, "artists": [] }"#,
        )
        .unwrap();
        let totals = catalog_totals(&cat);
        assert_eq!(totals[0], ("Artists", "1,204".to_string()));
        assert_eq!(totals[2], ("Tracks", "123,456".to_string()));
        assert_eq!(totals[4].1, "300 days");
    }
}
