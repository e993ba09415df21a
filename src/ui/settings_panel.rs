use std::time::Instant;

use super::styles::UiMarginExt;
use crate::types::size::MAX_EXPORT_SIZE;
use crate::types::{AppState, ErrorCorrection, QrColor, SizeSource};

const SIZE_STEP: i64 = 10;

pub fn draw_settings_panel(ui: &mut egui::Ui, state: &mut AppState, now: Instant) {
    draw_content_settings(ui, state, now);

    ui.separator();

    // Colors and error correction refresh the preview right away
    let mut style_changed = draw_color_settings(ui, state);
    ui.separator();
    style_changed |= draw_error_correction_settings(ui, state);
    if style_changed {
        state.on_style_changed();
    }

    ui.separator();

    draw_size_settings(ui, state, now);

    ui.separator();

    draw_export_settings(ui, state);
}

fn draw_content_settings(ui: &mut egui::Ui, state: &mut AppState, now: Instant) {
    ui.heading_with_margin("Content");

    let response = ui.add(
        egui::TextEdit::multiline(&mut state.text)
            .hint_text("Text or URL")
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        state.on_text_changed(now);
    }
}

fn draw_color_settings(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut changed = false;

    ui.subheading_with_margin("Colors");
    changed |= draw_color_row(ui, "Foreground:", &mut state.foreground, "fg_hex");
    changed |= draw_color_row(ui, "Background:", &mut state.background, "bg_hex");

    changed
}

fn draw_color_row(ui: &mut egui::Ui, label: &str, color: &mut QrColor, id_salt: &str) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label(label);

        let mut rgb = color.to_srgb();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            *color = QrColor::from_srgb(rgb);
            changed = true;
        }

        // Hex text is kept in temp memory while being edited
        let id = ui.id().with(id_salt);
        let mut hex = ui
            .data_mut(|d| d.get_temp::<String>(id))
            .unwrap_or_else(|| color.to_hex());
        let response = ui
            .add(egui::TextEdit::singleline(&mut hex).desired_width(72.0))
            .on_hover_text("#rrggbb");
        if response.changed()
            && let Some(parsed) = QrColor::from_hex(&hex)
        {
            let parsed = QrColor { a: 0xFF, ..parsed };
            if parsed != *color {
                *color = parsed;
                changed = true;
            }
        }
        if response.has_focus() {
            ui.data_mut(|d| d.insert_temp(id, hex));
        } else {
            ui.data_mut(|d| d.remove::<String>(id));
        }
    });

    changed
}

fn draw_error_correction_settings(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut changed = false;

    ui.subheading_with_margin("Error Correction");
    ui.horizontal_wrapped(|ui| {
        for level in ErrorCorrection::all() {
            changed |= ui
                .radio_value(&mut state.ec_level, *level, level.display_name())
                .on_hover_text("Higher levels survive more damage but hold less data")
                .changed();
        }
    });

    changed
}

fn draw_size_settings(ui: &mut egui::Ui, state: &mut AppState, now: Instant) {
    ui.subheading_with_margin("Export Size");

    let range = state.size.range();

    ui.horizontal(|ui| {
        if ui.small_button("−").clicked() {
            state.step_size(-SIZE_STEP, now);
        }

        let slider = ui.add(
            egui::Slider::new(&mut state.size.slider, range.min..=range.max).show_value(false),
        );
        if slider.changed() {
            state.on_size_changed(SizeSource::Slider, now);
        }

        if ui.small_button("+").clicked() {
            state.step_size(SIZE_STEP, now);
        }

        // The field is applied when editing ends, like a committed number input
        let field = ui.add(egui::TextEdit::singleline(&mut state.size.field).desired_width(48.0));
        if field.lost_focus() {
            state.on_size_changed(SizeSource::Field, now);
        }
        ui.label("px");
    });

    ui.add(
        egui::ProgressBar::new(state.size.fill_fraction())
            .desired_height(4.0)
            .fill(state.foreground.to_color32()),
    );
    ui.label(
        egui::RichText::new(format!("{} – {} px", range.min, range.max))
            .small()
            .weak(),
    );
}

fn draw_export_settings(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("Preferences")
        .default_open(false)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("JPEG quality:");
                ui.add(egui::Slider::new(&mut state.preferences.jpeg_quality, 1..=100));
            });
            ui.horizontal(|ui| {
                ui.label("Text delay:");
                ui.add(
                    egui::DragValue::new(&mut state.preferences.text_debounce_ms)
                        .range(0..=2000)
                        .suffix(" ms"),
                );
                ui.label("Size delay:");
                ui.add(
                    egui::DragValue::new(&mut state.preferences.size_debounce_ms)
                        .range(0..=2000)
                        .suffix(" ms"),
                );
            });
            ui.horizontal(|ui| {
                ui.label("Size range:");
                ui.add(
                    egui::DragValue::new(&mut state.preferences.size_range.min)
                        .range(16..=MAX_EXPORT_SIZE),
                );
                ui.label("to");
                ui.add(
                    egui::DragValue::new(&mut state.preferences.size_range.max)
                        .range(16..=MAX_EXPORT_SIZE),
                );
            });
            if let Some(dir) = &state.preferences.export_directory {
                ui.label(
                    egui::RichText::new(format!("Last export folder: {}", dir.display()))
                        .small()
                        .weak(),
                );
            }
        });
}
