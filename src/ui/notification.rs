use super::styles;
use crate::types::{AppState, NotificationLevel};
use egui::Color32;

/// Shows the oldest pending notification as a modal until it is dismissed.
pub fn draw_notification(ctx: &egui::Context, state: &mut AppState) {
    let Some(notification) = state.current_notification().cloned() else {
        return;
    };

    let mut dismissed = false;
    let modal = egui::Modal::new(egui::Id::new("notification_modal")).show(ctx, |ui| {
        ui.set_min_width(280.0);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(notification.level.icon())
                    .size(28.0)
                    .color(level_color(notification.level)),
            );
            ui.heading(&notification.title);
            ui.label(&notification.message);
            ui.add_space(8.0);
            ui.scope(|ui| {
                styles::apply_primary_button_style(ui);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });
    });

    if dismissed || modal.should_close() {
        state.dismiss_notification();
    }
}

fn level_color(level: NotificationLevel) -> Color32 {
    match level {
        NotificationLevel::Info => styles::COLOR_TINT,
        NotificationLevel::Warning => Color32::from_rgb(255, 180, 0),
        NotificationLevel::Error => Color32::from_rgb(230, 80, 80),
    }
}
