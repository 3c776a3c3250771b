use super::state::ActionProgress;
use super::CollectionUploader;
use crate::utils::file_size::format_size;
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;

impl CollectionUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Collection File Uploader");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Drop documents, audio or notebooks to add them to a collection")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_collection_input(ui);

                ui.add_space(20.0);
                self.render_drop_zone(ui, hovering);

                ui.add_space(10.0);
                self.render_pending(ui);

                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    let busy = self.controller.is_busy() || self.state.is_uploading();
                    ui.add_enabled_ui(!busy, |ui| {
                        let label = if busy { "⏳ Uploading..." } else { "📤 Upload Files" };
                        let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
                        if ui.add(button).clicked() {
                            self.start_upload(ctx);
                        }
                    });
                });

                if !matches!(self.state.progress, ActionProgress::NotStarted) {
                    ui.add_space(20.0);
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            if self.state.is_uploading() {
                                ui.spinner();
                            }
                            ui.label(self.state.get_status_text());
                        });
                    });
                }
            });
        });
    }

    fn render_collection_input(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("Destination collection ID");
            ui.add_space(4.0);
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.state.collection_input)
                    .desired_width(ui.available_width())
                    .font(egui::TextStyle::Monospace)
                    .hint_text("00000000-0000-0000-0000-000000000000"),
            );
            if response.changed() {
                self.update_collection();
            }
            if self.state.collection_invalid {
                ui.colored_label(Color32::from_rgb(220, 50, 50), "Not a valid collection ID");
            }
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui, hovering: bool) {
        let stroke = if hovering {
            egui::Stroke::new(2.0, Color32::from_rgb(161, 89, 225))
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };

        egui::Frame::group(ui.style())
            .stroke(stroke)
            .inner_margin(20.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label("Drop files or folders here");
                    ui.add_space(8.0);
                    if ui.button("📁 Add files").clicked() {
                        let extensions = self.policy.file_dialog_extensions();
                        if let Some(paths) = FileDialog::new()
                            .add_filter("Supported files", extensions.as_slice())
                            .pick_files()
                        {
                            self.add_paths(paths);
                        }
                    }
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(format!(
                            "Text, Markdown, CSV, PDF, Office, EPUB, audio, mp4, notebooks and Python, up to {} each",
                            format_size(self.policy.max_size())
                        ))
                        .small()
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });
            });
    }

    fn render_pending(&self, ui: &mut egui::Ui) {
        let pending = self.controller.pending();
        if pending.is_empty() {
            return;
        }

        ui.label(format!("{} file(s) ready to upload", pending.len()));
        egui::ScrollArea::vertical()
            .id_source("pending_files")
            .max_height(200.0)
            .show(ui, |ui| {
                egui::Frame::none()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        for file in &pending {
                            ui.horizontal(|ui| {
                                ui.label("📄");
                                ui.label(file.name.as_str());
                                ui.label(
                                    RichText::new(format_size(file.size))
                                        .color(Color32::from_rgb(150, 150, 150)),
                                );
                            });
                        }
                    });
            });
    }
}
