use std::time::Duration;

use chrono::Local;
use client_core::{qr, Coordinator, FormView, Screen, ScreenView, Transition};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui::{self, TextureHandle};
use shared::domain::VisitType;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

/// Format produced by a local date/time picker.
pub const PICKER_FORMAT: &str = "%Y-%m-%dT%H:%M";
const FORM_WIDTH: f32 = 400.0;
const QR_SIZE: f32 = 300.0;

pub struct PreregistroApp {
    coordinator: Coordinator,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
    qr_texture: Option<TextureHandle>,
    qr_decode_failed: bool,
}

impl PreregistroApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            coordinator: Coordinator::new(),
            cmd_tx,
            ui_rx,
            status: String::new(),
            qr_texture: None,
            qr_decode_failed: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::WorkerReady { endpoint } => {
                tracing::info!(%endpoint, "backend worker ready");
                self.status = format!("Servidor: {endpoint}");
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::CheckBackend,
                    &mut self.status,
                );
            }
            UiEvent::WorkerFailed(message) => {
                self.status = message;
            }
            UiEvent::SubmitFinished { token, outcome } => {
                if self.coordinator.complete(token, outcome) == Transition::Displayed {
                    self.qr_texture = None;
                    self.qr_decode_failed = false;
                }
            }
            UiEvent::BackendHealth { ok, service } => {
                self.status = match (ok, service) {
                    (true, Some(service)) => format!("Servidor disponible: {service}"),
                    (true, None) => "Servidor disponible".to_string(),
                    (false, _) => "Servidor sin respuesta".to_string(),
                };
            }
        }
    }

    fn submit(&mut self) {
        let pending = match self.coordinator.begin_submit() {
            Ok(pending) => pending,
            Err(refused) => {
                tracing::debug!(reason = %refused, "submit ignored");
                return;
            }
        };
        let token = pending.token;
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Submit {
                token,
                request: pending.request,
            },
            &mut self.status,
        );
        if !queued {
            self.coordinator.abandon(token);
        }
    }

    fn back(&mut self) {
        if self.coordinator.back() {
            self.qr_texture = None;
            self.qr_decode_failed = false;
        }
    }

    fn ensure_qr_texture(&mut self, ctx: &egui::Context) {
        if self.qr_texture.is_some() || self.qr_decode_failed {
            return;
        }
        let Screen::Display(result) = self.coordinator.screen() else {
            return;
        };
        match decode_qr_image(&result.qr_base64) {
            Ok(image) => {
                self.qr_texture =
                    Some(ctx.load_texture("preregistro-qr", image, egui::TextureOptions::NEAREST));
            }
            Err(err) => {
                tracing::warn!("failed to decode qr image: {err}");
                self.qr_decode_failed = true;
            }
        }
    }

    fn show_form(&mut self, ctx: &egui::Context, view: &FormView) {
        let mut submit_clicked = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.set_max_width(FORM_WIDTH);
                ui.heading(view.title);
                ui.add_space(12.0);

                let form = self.coordinator.form_mut();
                ui.add(
                    egui::TextEdit::singleline(&mut form.visitor_name)
                        .hint_text("Nombre del visitante")
                        .desired_width(FORM_WIDTH),
                );
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut form.visit_datetime)
                            .hint_text("AAAA-MM-DDTHH:MM"),
                    );
                    if ui.button("Ahora").clicked() {
                        form.visit_datetime = picker_now();
                    }
                });
                egui::ComboBox::from_label("Tipo de visita")
                    .selected_text(form.visit_type.label())
                    .show_ui(ui, |ui| {
                        for kind in VisitType::ALL {
                            ui.selectable_value(&mut form.visit_type, kind, kind.label());
                        }
                    });
                ui.add(
                    egui::TextEdit::singleline(&mut form.plate)
                        .hint_text("Placas (opcional)")
                        .desired_width(FORM_WIDTH),
                );
                ui.add(
                    egui::TextEdit::multiline(&mut form.notes)
                        .hint_text("Notas")
                        .desired_width(FORM_WIDTH),
                );

                ui.add_space(12.0);
                submit_clicked = ui
                    .add_enabled(
                        view.submit_enabled,
                        egui::Button::new(view.submit_label).min_size(egui::vec2(FORM_WIDTH, 36.0)),
                    )
                    .clicked();

                if !self.status.is_empty() {
                    ui.add_space(8.0);
                    ui.weak(&self.status);
                }
            });
        });

        if submit_clicked {
            self.submit();
        }
    }

    fn show_display(&mut self, ctx: &egui::Context) {
        self.ensure_qr_texture(ctx);
        let ScreenView::Display(view) = self.coordinator.view() else {
            return;
        };
        let (title, back_label) = (view.title, view.back_label);

        let mut back_clicked = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(30.0);
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new(title).size(32.0).strong());
                ui.add_space(20.0);

                match &self.qr_texture {
                    Some(texture) => {
                        ui.add(egui::Image::new((texture.id(), egui::vec2(QR_SIZE, QR_SIZE))));
                    }
                    None => {
                        ui.weak("No se pudo mostrar la imagen del QR");
                    }
                }

                ui.add_space(20.0);
                back_clicked = ui
                    .add(egui::Button::new(back_label).min_size(egui::vec2(QR_SIZE, 44.0)))
                    .clicked();
            });
        });

        if back_clicked {
            self.back();
        }
    }
}

impl eframe::App for PreregistroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let form_view = match self.coordinator.view() {
            ScreenView::Form(view) => Some(view),
            ScreenView::Display(_) => None,
        };
        match form_view {
            Some(view) => self.show_form(ctx, &view),
            None => self.show_display(ctx),
        }

        if self.coordinator.is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

fn picker_now() -> String {
    Local::now().format(PICKER_FORMAT).to_string()
}

fn decode_qr_image(qr_base64: &str) -> Result<egui::ColorImage, String> {
    let bytes = qr::decode_png(qr_base64).map_err(|err| err.to_string())?;
    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
        .map_err(|err| err.to_string())?;
    let rgba = decoded.to_rgba8();
    let [w, h] = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied([w, h], rgba.as_raw()))
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
