mod footer;
mod header;
mod image_viewer;
mod notification;
mod settings_panel;
pub mod styles;

use std::time::Instant;

use crate::types::AppState;

pub struct UI;

impl UI {
    pub fn draw_settings_panel(ui: &mut egui::Ui, state: &mut AppState, now: Instant) {
        settings_panel::draw_settings_panel(ui, state, now)
    }

    pub fn draw_preview(ui: &mut egui::Ui, state: &AppState, texture: Option<&egui::TextureHandle>) {
        image_viewer::draw_preview(ui, state, texture)
    }

    pub fn draw_header(ui: &mut egui::Ui, state: &mut AppState) {
        header::draw_header(ui, state)
    }

    pub fn draw_footer(ui: &mut egui::Ui, state: &mut AppState) {
        footer::draw_footer(ui, state)
    }

    pub fn draw_notification(ctx: &egui::Context, state: &mut AppState) {
        notification::draw_notification(ctx, state)
    }
}
