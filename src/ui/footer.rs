use super::styles;
use crate::types::app_state::AppStateRequest;
use crate::types::{AppState, ExportFormat};

pub fn draw_footer(ui: &mut egui::Ui, state: &mut AppState) {
    ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
        ui.scope(|ui| {
            styles::apply_primary_button_style(ui);
            if ui.button("✨ Generate QR Code").clicked() {
                state.generate_and_show_download();
            }
        });

        if state.export_visible {
            ui.separator();
            draw_export_controls(ui, state);
        } else if state.debounce_pending() || state.preview.is_rendering() {
            ui.label(egui::RichText::new("Updating preview…").small().weak());
        }
    });
}

fn draw_export_controls(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label("💾 Download:");
    for format in ExportFormat::all() {
        if ui
            .button(format.display_name())
            .on_hover_text(format!("Save as {}", format.file_name()))
            .clicked()
        {
            state.pending_app_state_request = Some(AppStateRequest::Export { format: *format });
        }
    }

    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        ui.menu_button("📋 Copy data URI", |ui| {
            for format in ExportFormat::all() {
                if ui.button(format.display_name()).clicked() {
                    state.pending_app_state_request =
                        Some(AppStateRequest::CopyDataUri { format: *format });
                    ui.close();
                }
            }
        });
    });
}
