// src/app/ui/recommend.rs
use eframe::egui as eg;

use crate::app::recommend::{Category, SubmitOutcome, EMPTY_MESSAGE};
use crate::app::utils::now_ms;

impl crate::app::ShelfApp {
    pub(crate) fn ui_render_recommend(&mut self, ui: &mut eg::Ui) {
        ui.add_space(8.0);
        ui.heading("Recommend new media");
        ui.add_space(4.0);

        let mut submit = false;
        eg::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                for category in Category::ALL {
                    if ui
                        .selectable_label(self.form.category == category, category.label())
                        .clicked()
                    {
                        self.form.set_category(category);
                    }
                }
            });

            eg::Grid::new("recommend_form")
                .num_columns(2)
                .spacing([10.0, 6.0])
                .show(ui, |ui| {
                    ui.label(self.form.category.primary_label());
                    let resp = ui.add(
                        eg::TextEdit::singleline(&mut self.form.primary).desired_width(260.0),
                    );
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();

                    if let Some(label) = self.form.category.secondary_label() {
                        ui.label(label);
                        ui.add(
                            eg::TextEdit::singleline(&mut self.form.secondary)
                                .desired_width(260.0),
                        );
                        ui.end_row();
                    }
                });

            ui.horizontal(|ui| {
                if ui.button("Submit").clicked() {
                    submit = true;
                }
                if let Some(prompt) = &self.form.prompt {
                    ui.colored_label(ui.visuals().warn_fg_color, prompt);
                }
            });
        });

        if submit {
            let outcome = self.form.submit(self.store.as_ref(), now_ms());
            self.form_note = match outcome {
                SubmitOutcome::Sent => Some("Thanks! Your request was sent."),
                SubmitOutcome::Rejected | SubmitOutcome::WriteFailed => None,
            };
        }
        if let Some(note) = self.form_note {
            ui.weak(note);
        }

        ui.add_space(12.0);
        ui.separator();
        ui.heading("Requested so far");

        if !self.board.has_snapshot() {
            ui.add(eg::Spinner::new().size(16.0));
            return;
        }

        eg::ScrollArea::vertical()
            .id_source("recommend_board")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.columns(Category::ALL.len(), |cols| {
                    for (ui, category) in cols.iter_mut().zip(Category::ALL) {
                        ui.strong(category.label());
                        ui.separator();
                        let entries = self.board.entries(category);
                        if entries.is_empty() {
                            ui.weak(EMPTY_MESSAGE);
                        }
                        for entry in entries {
                            ui.label(eg::RichText::new(&entry.heading).strong());
                            if let Some(detail) = &entry.detail {
                                ui.label(detail);
                            }
                            ui.weak(&entry.when);
                            ui.add_space(6.0);
                        }
                    }
                });
            });
    }
}
