use super::state::{tab_flags, MessageSlot, Rows, IMAGE_TEXTS, PRODUCT_TEXTS};
use super::{Dashboard, Dialogs, Dispatch, Health, StatusCard, Tab};
use crate::utils::color::{message_color, status_color, ACCENT};
use crate::utils::file_size::format_size;
use crate::utils::uri::preview_uri;
use eframe::egui::{self, Align2, Color32, Id, RichText};
use rfd::FileDialog;
use std::time::Instant;

/// A click inside a table row, applied once the row borrow has ended.
enum RowAction {
    OpenTask(String),
    ViewProduct(u64),
    EditProduct(u64),
    DeleteProduct(u64),
    ViewImage(String),
    CopyUrl(String),
}

impl<D: Dispatch, G: Dialogs> Dashboard<D, G> {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(10.0);
            self.render_header(ui);
            ui.add_space(8.0);
            self.render_tab_bar(ui);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                let action = match self.state.active_tab {
                    Tab::Upload => self.render_upload(ui),
                    Tab::Tasks => {
                        self.render_tasks(ui);
                        None
                    }
                    Tab::Products => self.render_products(ui),
                    Tab::Images => self.render_images(ui),
                };
                if let Some(action) = action {
                    self.run_action(action);
                }
            });
        });

        self.render_modals(ctx);
    }

    fn run_action(&mut self, action: RowAction) {
        match action {
            RowAction::OpenTask(id) => self.open_task(&id, Instant::now()),
            RowAction::ViewProduct(id) => self.view_product(id),
            RowAction::EditProduct(id) => self.edit_product(id),
            RowAction::DeleteProduct(id) => self.delete_product(id),
            RowAction::ViewImage(url) => self.view_image(&url),
            RowAction::CopyUrl(url) => self.copy_url(&url),
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading("Image Processing Dashboard");
                ui.label(
                    RichText::new("Upload product CSVs, follow tasks and manage processed images")
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .small_button("↻")
                    .on_hover_text("Check server health")
                    .clicked()
                {
                    self.check_health();
                }
                let (color, text) = match &self.state.health {
                    Health::Unchecked => (Color32::GRAY, "● not checked".to_string()),
                    Health::Checking => (Color32::GRAY, "● checking...".to_string()),
                    Health::Healthy { service } => (
                        Color32::from_rgb(0, 180, 0),
                        format!("● {}", service.as_deref().unwrap_or("healthy")),
                    ),
                    Health::Degraded(status) => {
                        (Color32::from_rgb(220, 160, 0), format!("● {}", status))
                    }
                    Health::Unreachable(_) => {
                        (Color32::from_rgb(220, 50, 50), "● unreachable".to_string())
                    }
                };
                let badge = ui.colored_label(color, text);
                if let Health::Unreachable(error) = &self.state.health {
                    badge.on_hover_text(error.as_str());
                }
            });
        });
    }

    fn render_tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (tab, active) in tab_flags(self.state.active_tab) {
                let text = if active {
                    RichText::new(tab.title()).strong().color(ACCENT)
                } else {
                    RichText::new(tab.title())
                };
                if ui.selectable_label(active, text).clicked() {
                    self.switch_tab(tab);
                }
            }
        });
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) -> Option<RowAction> {
        ui.group(|ui| {
            ui.label(RichText::new("Upload a product CSV").strong());
            ui.label(
                RichText::new("Columns: Serial Number, Product Name, Input Image Urls")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("📁 Choose File").clicked() {
                    if let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).pick_file() {
                        self.select_csv(path);
                    }
                }
                match &self.state.upload.selected {
                    Some(file) => match file.size {
                        Some(size) => ui.label(format!("{} ({})", file.name, format_size(size))),
                        None => ui.label(file.name.as_str()),
                    },
                    None => ui.label("Choose CSV file..."),
                };
            });
        });

        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            let label = if self.state.upload.in_flight {
                "⏳ Uploading..."
            } else {
                "Upload & Process"
            };
            let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(!self.state.upload.in_flight, button).clicked() {
                self.submit_upload(Instant::now());
            }
        });

        ui.add_space(8.0);
        render_message(ui, &self.state.upload.message);

        let mut action = None;
        if !self.state.upload.task_ids.is_empty() {
            ui.add_space(12.0);
            ui.group(|ui| {
                ui.label(RichText::new("Task IDs:").strong());
                ui.add_space(4.0);
                for task_id in &self.state.upload.task_ids {
                    ui.horizontal(|ui| {
                        ui.code(task_id.as_str());
                        if ui.small_button("Check").clicked() {
                            action = Some(RowAction::OpenTask(task_id.clone()));
                        }
                    });
                }
            });
        }
        action
    }

    fn render_tasks(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Check task status").strong());
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let input = egui::TextEdit::singleline(&mut self.state.tasks.task_id_input)
                    .hint_text("Enter task ID")
                    .font(egui::TextStyle::Monospace)
                    .desired_width(320.0);
                let response = ui.add(input);
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                let label = if self.state.tasks.in_flight {
                    "⏳ Checking..."
                } else {
                    "Check Status"
                };
                let clicked = ui
                    .add_enabled(!self.state.tasks.in_flight, egui::Button::new(label))
                    .clicked();
                if clicked || submitted {
                    self.check_status(Instant::now());
                }
            });
        });

        ui.add_space(8.0);
        render_message(ui, &self.state.tasks.message);

        if let Some(card) = &self.state.tasks.card {
            ui.add_space(8.0);
            render_status_card(ui, card);
        }
    }

    fn render_products(&mut self, ui: &mut egui::Ui) -> Option<RowAction> {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Products").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("➕ Add Product").clicked() {
                    self.open_new_product();
                }
            });
        });
        ui.add_space(6.0);
        render_message(ui, &self.state.products.message);

        let mut action = None;
        let deleting = &self.state.products.deleting;
        egui::Grid::new("products_table")
            .striped(true)
            .num_columns(5)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for heading in ["ID", "Serial Number", "Product Name", "Images", "Actions"] {
                    ui.label(RichText::new(heading).strong());
                }
                ui.end_row();

                match self.state.products.list.rows(&PRODUCT_TEXTS) {
                    Rows::Placeholder(text) => {
                        ui.label(RichText::new(text).italics());
                        ui.end_row();
                    }
                    Rows::Items(products) => {
                        for product in products {
                            ui.label(product.id.to_string());
                            ui.label(RichText::new(&product.serial_number).strong());
                            ui.label(product.product_name.as_str());
                            ui.label(format!("{} images", product.image_count));
                            ui.horizontal(|ui| {
                                if ui.small_button("👁").on_hover_text("View").clicked() {
                                    action = Some(RowAction::ViewProduct(product.id));
                                }
                                if ui.small_button("✏").on_hover_text("Edit").clicked() {
                                    action = Some(RowAction::EditProduct(product.id));
                                }
                                let can_delete = !deleting.contains(&product.id);
                                if ui
                                    .add_enabled(can_delete, egui::Button::new("🗑").small())
                                    .on_hover_text("Delete")
                                    .clicked()
                                {
                                    action = Some(RowAction::DeleteProduct(product.id));
                                }
                            });
                            ui.end_row();
                        }
                    }
                }
            });
        action
    }

    fn render_images(&mut self, ui: &mut egui::Ui) -> Option<RowAction> {
        ui.label(RichText::new("Processed Images").strong());
        ui.add_space(6.0);
        render_message(ui, &self.state.images.message);

        let mut action = None;
        egui::Grid::new("images_table")
            .striped(true)
            .num_columns(6)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for heading in ["ID", "Product", "Serial Number", "Input", "Output", "Actions"] {
                    ui.label(RichText::new(heading).strong());
                }
                ui.end_row();

                match self.state.images.list.rows(&IMAGE_TEXTS) {
                    Rows::Placeholder(text) => {
                        ui.label(RichText::new(text).italics());
                        ui.end_row();
                    }
                    Rows::Items(images) => {
                        for image in images {
                            ui.label(image.id.to_string());
                            ui.label(image.product_name.as_str());
                            ui.label(RichText::new(&image.serial_number).strong());
                            if ui.link("View Input").clicked() {
                                action = Some(RowAction::ViewImage(image.input_image_url.clone()));
                            }
                            match &image.output_image_url {
                                Some(url) => {
                                    if ui.link("View Output").clicked() {
                                        action = Some(RowAction::ViewImage(url.clone()));
                                    }
                                }
                                None => {
                                    ui.label(RichText::new("Not processed").weak());
                                }
                            }
                            if ui
                                .small_button("📋")
                                .on_hover_text("Copy Input URL")
                                .clicked()
                            {
                                action = Some(RowAction::CopyUrl(image.input_image_url.clone()));
                            }
                            ui.end_row();
                        }
                    }
                }
            });
        action
    }

    fn render_modals(&mut self, ctx: &egui::Context) {
        if !self.state.modals.any_open() {
            return;
        }

        let backdrop_clicked = egui::Area::new(Id::new("modal_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen = ui.ctx().screen_rect();
                let response = ui.allocate_rect(screen, egui::Sense::click());
                ui.painter()
                    .rect_filled(screen, 0.0, Color32::from_black_alpha(150));
                response.clicked()
            })
            .inner;

        if self.state.modals.product_form {
            self.render_product_modal(ctx);
        }
        if let Some(url) = self.state.modals.image_preview.clone() {
            self.render_image_modal(ctx, &url);
        }

        if backdrop_clicked {
            self.backdrop_clicked();
        }
    }

    fn render_product_modal(&mut self, ctx: &egui::Context) {
        modal_area("product_modal").show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .inner_margin(egui::Margin::same(16.0))
                .show(ui, |ui| {
                    ui.set_width(360.0);
                    ui.heading(self.state.products.form.title());
                    ui.add_space(10.0);

                    let form = &mut self.state.products.form;
                    egui::Grid::new("product_form")
                        .num_columns(2)
                        .spacing([10.0, 8.0])
                        .show(ui, |ui| {
                            ui.label("Serial Number");
                            ui.text_edit_singleline(&mut form.serial_number);
                            ui.end_row();
                            ui.label("Product Name");
                            ui.text_edit_singleline(&mut form.product_name);
                            ui.end_row();
                        });

                    ui.add_space(12.0);
                    ui.horizontal(|ui| {
                        let can_save =
                            self.state.products.form.is_complete() && !self.state.products.saving;
                        let label = if self.state.products.saving {
                            "⏳ Saving..."
                        } else {
                            "Save"
                        };
                        if ui.add_enabled(can_save, egui::Button::new(label)).clicked() {
                            self.submit_product_form();
                        }
                        if ui.button("Cancel").clicked() {
                            self.close_product_modal();
                        }
                    });
                });
        });
    }

    fn render_image_modal(&mut self, ctx: &egui::Context, url: &str) {
        modal_area("image_modal").show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .inner_margin(egui::Margin::same(16.0))
                .show(ui, |ui| {
                    ui.label(RichText::new(url).monospace().small());
                    ui.add_space(8.0);
                    ui.add(
                        egui::Image::new(preview_uri(url))
                            .max_size(egui::vec2(640.0, 480.0))
                            .shrink_to_fit(),
                    );
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Open in browser").clicked() {
                            if let Err(e) = open::that(url) {
                                log::warn!("Failed to open {}: {}", url, e);
                            }
                        }
                        if ui.button("Close").clicked() {
                            self.close_image_modal();
                        }
                    });
                });
        });
    }
}

fn modal_area(id: &str) -> egui::Area {
    egui::Area::new(Id::new(id))
        .order(egui::Order::Foreground)
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
}

fn render_message(ui: &mut egui::Ui, slot: &MessageSlot) {
    if let Some(message) = slot.current() {
        ui.colored_label(message_color(message.kind), message.text.as_str());
    }
}

fn render_status_card(ui: &mut egui::Ui, card: &StatusCard) {
    let color = status_color(card.state);
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.5, color))
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.label(RichText::new(card.title()).heading().color(color));
            ui.horizontal(|ui| {
                ui.label(RichText::new("Task ID:").strong());
                ui.code(card.task_id.as_str());
            });
            if let Some(result) = &card.result {
                ui.add_space(6.0);
                ui.label(RichText::new("Result:").strong());
                egui::ScrollArea::vertical()
                    .max_height(240.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(result).monospace());
                    });
            }
        });
}
