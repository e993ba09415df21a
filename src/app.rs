use std::time::Instant;

use crate::exporter::DialogSink;
use crate::preview::PreviewState;
use crate::types::app_state::AppStateRequest;
use crate::types::{AppState, AppearanceMode, Notification};
use crate::ui::UI;
use eframe::egui;
use egui::Margin;

/// GPU copy of the current preview raster, tagged with its render generation.
struct PreviewTexture {
    generation: u64,
    texture: egui::TextureHandle,
}

pub struct QrStudioApp {
    state: AppState,
    preview_texture: Option<PreviewTexture>,
}

impl Default for QrStudioApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
            preview_texture: None,
        }
    }
}

impl QrStudioApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let ctx = &cc.egui_ctx;
        crate::ui::styles::init_styles(ctx);

        let mut app = Self::default();
        app.state.initialize();
        app
    }

    fn apply_theme(&self, ctx: &egui::Context) {
        let visuals = match self.state.preferences.appearance_mode {
            AppearanceMode::Dark => egui::Visuals::dark(),
            AppearanceMode::Light => egui::Visuals::light(),
            AppearanceMode::System => match ctx.system_theme() {
                Some(egui::Theme::Dark) => egui::Visuals::dark(),
                Some(egui::Theme::Light) => egui::Visuals::light(),
                None => egui::Visuals::dark(),
            },
        };
        if ctx.style().visuals != visuals {
            ctx.set_visuals(visuals);
        }
    }

    fn check_preview_completion(&mut self) {
        self.state.preview.poll();
    }

    /// Keeps the texture in step with the preview: uploads new renders and
    /// releases the old texture as soon as the preview no longer shows it.
    fn sync_preview_texture(&mut self, ctx: &egui::Context) {
        let PreviewState::Ready(image) = self.state.preview.state() else {
            if self.preview_texture.take().is_some() {
                log::debug!("Preview texture released");
            }
            return;
        };
        if self
            .preview_texture
            .as_ref()
            .is_some_and(|t| t.generation == image.generation)
        {
            return;
        }

        // Drop the previous texture before uploading the next one
        self.preview_texture = None;
        let size = [image.raster.width() as usize, image.raster.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.raster.as_raw());
        let texture = ctx.load_texture("qr_preview", color_image, egui::TextureOptions::NEAREST);
        self.preview_texture = Some(PreviewTexture {
            generation: image.generation,
            texture,
        });
    }

    fn handle_requests(&mut self, ctx: &egui::Context) {
        let Some(app_state_request) = self.state.pending_app_state_request.take() else {
            return;
        };
        match app_state_request {
            AppStateRequest::Export { format } => {
                let mut sink = DialogSink::new(self.state.preferences.export_directory.clone());
                if let Some(path) = self.state.export_to(format, &mut sink) {
                    log::info!("Export completed: {}", path.display());
                }
            }
            AppStateRequest::CopyDataUri { format } => {
                if let Some(uri) = self.state.export_data_uri(format) {
                    ctx.copy_text(uri);
                    self.state.notify(Notification::info(
                        "Copied",
                        format!("{} data URI copied to the clipboard.", format.display_name()),
                    ));
                }
            }
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        // Rendering in flight: poll again next frame
        if self.state.preview.is_rendering() {
            ctx.request_repaint();
        } else if let Some(remaining) = self.state.next_debounce_deadline(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl Drop for QrStudioApp {
    fn drop(&mut self) {
        self.state.preview.release();
        log::debug!("QrStudioApp dropped, resources cleaned up");
    }
}

impl eframe::App for QrStudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // apply theme
        self.apply_theme(ctx);

        // Debounced refreshes whose quiet period has ended
        self.state.poll_debouncers(now);

        // Check preview completion
        self.check_preview_completion();
        self.sync_preview_texture(ctx);

        // Handle export requests
        self.handle_requests(ctx);

        // Save preferences
        self.state.check_and_save_preferences();

        // Top（Menu）
        egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
            egui::Frame::NONE
                .inner_margin(Margin::symmetric(0, 4))
                .show(ui, |ui| {
                    UI::draw_header(ui, &mut self.state);
                });
        });

        // Side（Settings）
        egui::SidePanel::left("settings_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    UI::draw_settings_panel(ui, &mut self.state, now);
                });
            });

        // Footer（Generate / Export）
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            egui::Frame::NONE
                .inner_margin(Margin::symmetric(0, 4))
                .show(ui, |ui| {
                    UI::draw_footer(ui, &mut self.state);
                });
        });

        // Main（Preview）
        egui::CentralPanel::default().show(ctx, |ui| {
            let texture = self.preview_texture.as_ref().map(|t| &t.texture);
            UI::draw_preview(ui, &self.state, texture);
        });

        UI::draw_notification(ctx, &mut self.state);

        self.schedule_repaint(ctx);
    }
}
