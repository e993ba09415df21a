use crate::types::{AppState, AppearanceMode};

pub fn draw_header(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new("▦ QR Studio").strong().size(16.0));
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.menu_button("Settings", |ui| {
                if ui.button("Reset Preferences").clicked() {
                    state.reset_preferences();
                    ui.close();
                }
            });
            ui.menu_button("View", |ui| {
                for (mode, label) in [
                    (AppearanceMode::System, "System"),
                    (AppearanceMode::Light, "Light"),
                    (AppearanceMode::Dark, "Dark"),
                ] {
                    ui.radio_value(&mut state.preferences.appearance_mode, mode, label);
                }
            });
        });
    });
}
