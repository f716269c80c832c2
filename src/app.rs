//! Application shell — header toolbar, scrollable canvas area, and the
//! routing of pointer/keyboard input into the picker controller.

use crate::canvas::{Surface, SurfaceView};
use crate::color;
use crate::config::Config;
use crate::picker::{self, PickerController, PickerEvent};
use eframe::egui;
use egui::{Color32, Pos2, Rect, RichText, Vec2};

/// How long the copy-confirmation notice stays up.
const NOTICE_SECS: f64 = 2.0;

const NOTICE_OK_COLOR: Color32 = Color32::from_rgb(95, 190, 110);
const NOTICE_ERR_COLOR: Color32 = Color32::from_rgb(230, 95, 85);

/// Transient header message (copy confirmation, load errors).
struct Notice {
    text: String,
    color: Color32,
    until: f64,
}

pub struct HuePickApp {
    config: Config,
    surface: Surface,
    picker: PickerController,
    active_button_color: Color32,
    notice: Option<Notice>,
}

impl HuePickApp {
    pub fn new(config: Config, surface: Surface) -> Result<Self, String> {
        let active_button_color = color::parse_hex_color(&config.active_button_color)
            .ok_or_else(|| {
                format!("invalid activeButtonColor {:?}", config.active_button_color)
            })?;
        let picker = PickerController::new(&config)?;
        Ok(Self {
            config,
            surface,
            picker,
            active_button_color,
            notice: None,
        })
    }

    // -- Input ------------------------------------------------------------

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (escape, zoom_in, zoom_out) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && i.key_pressed(egui::Key::PlusEquals),
                i.modifiers.command && i.key_pressed(egui::Key::Minus),
            )
        });
        if escape && self.picker.is_active() {
            let event = self.picker.toggle();
            self.note_event(ctx, event);
        }
        if zoom_in {
            self.picker.zoom_in();
        }
        if zoom_out {
            self.picker.zoom_out();
        }
    }

    fn note_event(&mut self, ctx: &egui::Context, event: PickerEvent) {
        match event {
            PickerEvent::Activated => log_info!("picker activated"),
            PickerEvent::Deactivated => log_info!("picker deactivated"),
            PickerEvent::ColorCommitted(hex) => {
                log_info!("copied {} to clipboard", hex);
                self.notice = Some(Notice {
                    text: format!("Copied {} to clipboard", hex),
                    color: NOTICE_OK_COLOR,
                    until: ctx.input(|i| i.time) + NOTICE_SECS,
                });
            }
        }
    }

    fn try_commit(&mut self, ctx: &egui::Context) {
        let Some(hex) = self.picker.commit() else {
            return;
        };
        match picker::copy_text_to_system_clipboard(&hex) {
            Ok(()) => {
                if let Some(event) = self.picker.complete_commit() {
                    self.note_event(ctx, event);
                }
            }
            Err(e) => {
                // Stay active so the user can simply click again.
                log_err!("clipboard write failed for {}: {}", hex, e);
            }
        }
    }

    // -- Header -----------------------------------------------------------

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .exact_height(self.config.header_height)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if ui.button("Open…").clicked() {
                        self.open_image(ctx);
                    }
                    let expand_label = if self.surface.expanded {
                        "Fit width"
                    } else {
                        "Actual size"
                    };
                    if ui.button(expand_label).clicked() {
                        self.surface.expanded = !self.surface.expanded;
                    }
                    ui.separator();

                    let mut pick_button = egui::Button::new("Pick color");
                    if self.picker.is_active() {
                        pick_button = pick_button.fill(self.active_button_color);
                    }
                    if ui.add(pick_button).clicked() {
                        let event = self.picker.toggle();
                        self.note_event(ctx, event);
                    }

                    let current = self.picker.zoom_factor();
                    egui::ComboBox::from_id_source("zoom_factor")
                        .selected_text(format!("{}×", current))
                        .width(56.0)
                        .show_ui(ui, |ui| {
                            let range = self.config.magnifier.min_zoom_factor
                                ..=self.config.magnifier.max_zoom_factor;
                            for zoom in range {
                                if ui
                                    .selectable_label(current == zoom, format!("{}×", zoom))
                                    .clicked()
                                {
                                    self.picker.set_zoom_factor(zoom);
                                }
                            }
                        });
                    ui.separator();

                    if let Some(hex) = self.picker.color().map(str::to_owned) {
                        let swatch = color::parse_hex_color(&hex).unwrap_or(Color32::BLACK);
                        let text = color::contrast_text_color(&hex);
                        ui.label(
                            RichText::new(hex)
                                .monospace()
                                .background_color(swatch)
                                .color(text),
                        );
                    }

                    self.show_notice(ui);
                });
            });
    }

    fn show_notice(&mut self, ui: &mut egui::Ui) {
        let Some(notice) = &self.notice else {
            return;
        };
        if ui.input(|i| i.time) >= notice.until {
            self.notice = None;
            return;
        }
        ui.label(RichText::new(&notice.text).color(notice.color));
        ui.ctx()
            .request_repaint_after(std::time::Duration::from_millis(200));
    }

    fn open_image(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter(
                "Images",
                &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tga", "ico", "tif", "tiff"],
            )
            .pick_file()
        else {
            return;
        };
        match Surface::from_path(&path) {
            Ok(mut surface) => {
                log_info!(
                    "opened {} ({}×{})",
                    path.display(),
                    surface.width(),
                    surface.height()
                );
                surface.expanded = self.surface.expanded;
                self.surface = surface;
                // The retained preview would show the previous image.
                self.picker.pointer_left();
            }
            Err(e) => {
                log_err!("{}", e);
                self.notice = Some(Notice {
                    text: e,
                    color: NOTICE_ERR_COLOR,
                    until: ctx.input(|i| i.time) + NOTICE_SECS,
                });
            }
        }
    }

    // -- Canvas -----------------------------------------------------------

    fn show_canvas(&mut self, ctx: &egui::Context) {
        let mut hover: Option<Pos2> = None;
        let mut clicked = false;
        let mut double_clicked = false;
        let mut surface_rect = Rect::NOTHING;
        let mut display_size = Vec2::ZERO;

        let scroll = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let output = egui::ScrollArea::both()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        display_size = self.surface.display_size(ui.available_width());
                        let response = ui.allocate_response(display_size, egui::Sense::click());
                        surface_rect = response.rect;

                        let texture = self.surface.texture_id(ui.ctx());
                        ui.painter().image(
                            texture,
                            surface_rect,
                            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                            Color32::WHITE,
                        );

                        hover = response.hover_pos();
                        clicked = response.clicked();
                        double_clicked = response.double_clicked();
                    });
                output.state.offset
            })
            .inner;

        let view = SurfaceView {
            rect: surface_rect,
            display_size,
            scroll,
        };

        if double_clicked {
            let event = self.picker.toggle();
            self.note_event(ctx, event);
        } else if self.picker.is_active() {
            match hover {
                Some(pos) => self.picker.sample(ctx, &self.surface, pos, &view),
                None => self.picker.pointer_left(),
            }
            if clicked {
                self.try_commit(ctx);
            }
        }

        self.picker.magnifier.show(ctx, scroll);
    }
}

impl eframe::App for HuePickApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.show_header(ctx);
        self.show_canvas(ctx);
    }
}
