use crate::preview::{PREVIEW_SIZE, PreviewState};
use crate::types::AppState;
use egui::{Color32, Vec2};

pub fn draw_preview(ui: &mut egui::Ui, state: &AppState, texture: Option<&egui::TextureHandle>) {
    ui.centered_and_justified(|ui| match state.preview.state() {
        PreviewState::Placeholder => draw_placeholder(ui),
        PreviewState::Rendering => {
            ui.spinner();
        }
        PreviewState::Ready(image) => match texture {
            Some(texture) => draw_qr_image(ui, texture, image.request.background.to_color32()),
            // Texture upload happens on the next frame
            None => {
                ui.spinner();
            }
        },
        PreviewState::Failed(message) => {
            ui.label(
                egui::RichText::new(format!("⚠ Could not render QR code\n{message}"))
                    .color(Color32::from_rgb(255, 180, 0)),
            );
        }
    });
}

fn draw_placeholder(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 2.0 - 40.0);
        ui.label(egui::RichText::new("📱").size(40.0));
        ui.heading("Your QR code will appear here");
        ui.label(egui::RichText::new("Enter text and adjust the style to see a preview").weak());
    });
}

fn draw_qr_image(ui: &mut egui::Ui, texture: &egui::TextureHandle, background: Color32) {
    let size = Vec2::splat(PREVIEW_SIZE as f32);
    let (rect, _response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
    let image_rect = egui::Rect::from_center_size(rect.center(), size);

    // Checkerboard shows through transparent backgrounds
    let painter = ui.painter_at(rect);
    draw_checkerboard(&painter, image_rect.expand(8.0));
    painter.rect_filled(image_rect.expand(8.0), 4.0, background);
    painter.image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::WHITE,
    );
}

fn draw_checkerboard(painter: &egui::Painter, rect: egui::Rect) {
    const CELL: f32 = 8.0;
    let cols = (rect.width() / CELL).ceil() as i32;
    let rows = (rect.height() / CELL).ceil() as i32;
    for row in 0..rows {
        for col in 0..cols {
            let color = if (row + col) % 2 == 0 {
                Color32::from_gray(200)
            } else {
                Color32::from_gray(240)
            };
            let min = rect.min + Vec2::new(col as f32 * CELL, row as f32 * CELL);
            let cell = egui::Rect::from_min_size(min, Vec2::splat(CELL)).intersect(rect);
            painter.rect_filled(cell, 0.0, color);
        }
    }
}
