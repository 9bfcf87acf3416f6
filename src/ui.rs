// ui.rs — egui 宿主界面：平面图、全景工具栏、操作说明、视口提示与状态栏

use egui::{Align2, Color32, RichText};

use crate::i18n::{tr, tr_with};
use crate::panorama::OrbitState;
use crate::shell::{HostShell, ViewState, ViewportMessage};

/// Requests raised by widgets in one frame; main applies them to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    EnterPanorama,
    ExitPanorama,
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
}

pub struct UiShell {
    canvas: (u32, u32),
    pixel_ratio: f32,
    visible: ViewState,
    message: Option<ViewportMessage>,
    show_instructions: bool,
    instructions_seen: bool,
}

impl UiShell {
    pub fn new(canvas: (u32, u32), pixel_ratio: f32) -> Self {
        Self {
            canvas,
            pixel_ratio,
            visible: ViewState::Floorplan,
            message: None,
            show_instructions: false,
            instructions_seen: false,
        }
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas = (width, height);
    }

    pub fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    pub fn draw(&mut self, ctx: &egui::Context, orbit: &OrbitState) -> Vec<UiAction> {
        let mut actions = Vec::new();
        match self.visible {
            ViewState::Floorplan => draw_floorplan(ctx, &mut actions),
            ViewState::Panorama => {
                draw_toolbar(ctx, &mut actions);
                self.draw_instructions(ctx);
                if let Some(message) = &self.message {
                    draw_message(ctx, message);
                }
                draw_status(ctx, orbit);
            }
        }
        actions
    }

    fn draw_instructions(&mut self, ctx: &egui::Context) {
        if !self.show_instructions {
            return;
        }
        egui::Window::new(tr("instructions.title"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::RIGHT_TOP, [-12.0, 56.0])
            .show(ctx, |ui| {
                ui.label(tr("instructions.drag"));
                ui.label(tr("instructions.zoom"));
                ui.label(tr("instructions.back"));
                ui.add_space(6.0);
                if ui.button(tr("instructions.close")).clicked() {
                    self.show_instructions = false;
                }
            });
    }
}

impl HostShell for UiShell {
    fn show_view(&mut self, view: ViewState) {
        // 说明只在第一次进入全景时弹出
        if view == ViewState::Panorama && !self.instructions_seen {
            self.instructions_seen = true;
            self.show_instructions = true;
        }
        self.visible = view;
    }

    fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn set_viewport_message(&mut self, message: Option<ViewportMessage>) {
        self.message = message;
    }
}

/// Localized lines for the viewport overlay; the first one is the heading.
pub fn message_lines(message: &ViewportMessage) -> Vec<String> {
    match message {
        ViewportMessage::Loading { percent: None } => {
            vec![tr("viewport.loading"), tr("viewport.please_wait")]
        }
        ViewportMessage::Loading { percent: Some(p) } => vec![
            tr_with("viewport.loading_percent", &[("percent", format!("{:.0}", p))]),
            tr("viewport.please_wait"),
        ],
        ViewportMessage::LoadFailed { path, reason } => vec![
            tr("viewport.error.title"),
            tr_with(
                "viewport.error.detail",
                &[("path", path.display().to_string())],
            ),
            reason.clone(),
            tr("viewport.error.check"),
            tr("viewport.error.hint_exists"),
            tr("viewport.error.hint_name"),
            tr("viewport.error.hint_format"),
        ],
    }
}

fn draw_floorplan(ctx: &egui::Context, actions: &mut Vec<UiAction>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading(tr("floorplan.heading"));
            ui.label(tr("floorplan.hint"));
        });
        ui.add_space(12.0);

        let area = ui.available_rect_before_wrap().shrink(24.0);
        let room = egui::Rect::from_center_size(
            area.center(),
            egui::vec2(area.width().min(480.0), area.height().min(320.0)),
        );
        let painter = ui.painter();
        painter.rect_filled(room, 6.0, Color32::from_rgb(0x1e, 0x29, 0x3b));
        painter.rect_stroke(room, 6.0, egui::Stroke::new(2.0, Color32::from_gray(160)));
        painter.text(
            room.left_top() + egui::vec2(12.0, 12.0),
            Align2::LEFT_TOP,
            tr("floorplan.room"),
            egui::FontId::proportional(16.0),
            Color32::from_gray(220),
        );

        // 房间中心的热点
        let hotspot = egui::Rect::from_center_size(room.center(), egui::vec2(56.0, 56.0));
        let button = egui::Button::new(RichText::new("360°").strong())
            .fill(Color32::from_rgb(0x63, 0x66, 0xf1))
            .rounding(28.0);
        if ui
            .put(hotspot, button)
            .on_hover_text(tr("floorplan.hint"))
            .clicked()
        {
            actions.push(UiAction::EnterPanorama);
        }
    });
}

fn draw_toolbar(ctx: &egui::Context, actions: &mut Vec<UiAction>) {
    egui::Area::new("panorama_back")
        .anchor(Align2::LEFT_TOP, [12.0, 12.0])
        .show(ctx, |ui| {
            if ui.button(tr("panorama.back")).clicked() {
                actions.push(UiAction::ExitPanorama);
            }
        });

    egui::Area::new("panorama_controls")
        .anchor(Align2::RIGHT_TOP, [-12.0, 12.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(tr("panorama.zoom_in")).clicked() {
                    actions.push(UiAction::ZoomIn);
                }
                if ui.button(tr("panorama.zoom_out")).clicked() {
                    actions.push(UiAction::ZoomOut);
                }
                if ui.button(tr("panorama.fullscreen")).clicked() {
                    actions.push(UiAction::ToggleFullscreen);
                }
            });
        });
}

fn draw_message(ctx: &egui::Context, message: &ViewportMessage) {
    let lines = message_lines(message);
    let heading_color = match message {
        ViewportMessage::Loading { .. } => Color32::WHITE,
        ViewportMessage::LoadFailed { .. } => Color32::from_rgb(0xf8, 0x71, 0x71),
    };

    egui::Area::new("viewport_message")
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    let mut lines = lines.iter();
                    if let Some(heading) = lines.next() {
                        ui.label(RichText::new(heading).heading().color(heading_color));
                    }
                    for line in lines {
                        ui.label(line);
                    }
                });
            });
        });
}

fn draw_status(ctx: &egui::Context, orbit: &OrbitState) {
    egui::Area::new("status_line")
        .anchor(Align2::LEFT_BOTTOM, [12.0, -12.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(tr_with("status.fov", &[("value", format!("{:.1}", orbit.fov()))]));
                ui.label("|");
                ui.label(tr_with(
                    "status.longitude",
                    &[("value", format!("{:.1}", orbit.longitude()))],
                ));
                ui.label("|");
                ui.label(tr_with(
                    "status.latitude",
                    &[("value", format!("{:.1}", orbit.latitude()))],
                ));
            });
        });
}
