use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::{
    export::ExportFormat,
    notification::Notification,
    preferences::UserPreferences,
    render::{ErrorCorrection, QrColor, RenderRequest},
    size::{LinkedSize, SizeSource},
};
use crate::debounce::Debouncer;
use crate::exporter::{self, ArtifactSink};
use crate::preview::PreviewRenderer;

// Requests raised by the UI and handled by the app between frames
#[derive(Debug, Clone, PartialEq)]
pub enum AppStateRequest {
    Export { format: ExportFormat },
    CopyDataUri { format: ExportFormat },
}

pub struct AppState {
    // Inputs
    pub text: String,
    pub foreground: QrColor,
    pub background: QrColor,
    pub ec_level: ErrorCorrection,
    pub size: LinkedSize,

    // Preview
    pub preview: PreviewRenderer,
    pub export_visible: bool,
    // Debounced inputs are read when the quiet period ends, not when the edit happens
    text_debounce: Debouncer<()>,
    size_debounce: Debouncer<()>,

    // Settings
    pub preferences: UserPreferences,
    last_preferences: UserPreferences,

    // Blocking messages, oldest first
    notifications: VecDeque<Notification>,

    // Export requests
    pub pending_app_state_request: Option<AppStateRequest>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_preferences(UserPreferences::load())
    }
}

impl AppState {
    pub fn with_preferences(preferences: UserPreferences) -> Self {
        Self {
            text: String::new(),
            foreground: QrColor::BLACK,
            background: QrColor::WHITE,
            ec_level: ErrorCorrection::default(),
            size: LinkedSize::new(preferences.size_range, preferences.default_size),

            preview: PreviewRenderer::new(),
            export_visible: false,
            text_debounce: Debouncer::new(preferences.text_debounce()),
            size_debounce: Debouncer::new(preferences.size_debounce()),

            last_preferences: preferences.clone(),
            preferences,

            notifications: VecDeque::new(),
            pending_app_state_request: None,
        }
    }

    /// Snapshot of the current inputs.
    pub fn render_request(&self) -> RenderRequest {
        RenderRequest {
            text: self.text.trim().to_string(),
            size: self.size.value(),
            foreground: self.foreground,
            background: self.background,
            ec_level: self.ec_level,
        }
    }

    /// Startup: empty text, size synced from the slider, placeholder shown.
    pub fn initialize(&mut self) {
        self.text.clear();
        self.size.commit_slider();
        let request = self.render_request();
        self.refresh_preview(&request);
    }

    pub fn refresh_preview(&mut self, request: &RenderRequest) {
        if !self.preview.render_preview(request) {
            self.export_visible = false;
        }
    }

    pub fn on_text_changed(&mut self, now: Instant) {
        self.text_debounce.call((), now);
        self.export_visible = false;
    }

    pub fn on_size_changed(&mut self, source: SizeSource, now: Instant) -> u32 {
        let value = match source {
            SizeSource::Slider => self.size.commit_slider(),
            SizeSource::Field => self.size.commit_field(),
        };
        self.size_debounce.call((), now);
        self.export_visible = false;
        value
    }

    pub fn step_size(&mut self, delta: i64, now: Instant) {
        if self.size.step(delta) {
            self.size_debounce.call((), now);
            self.export_visible = false;
        }
    }

    /// Colors and error correction apply immediately, without debouncing.
    pub fn on_style_changed(&mut self) {
        let request = self.render_request();
        self.refresh_preview(&request);
        self.export_visible = false;
    }

    /// Fires any debounced refresh whose quiet period has elapsed.
    pub fn poll_debouncers(&mut self, now: Instant) {
        let text_fired = self.text_debounce.poll(now).is_some();
        let size_fired = self.size_debounce.poll(now).is_some();
        if text_fired || size_fired {
            let request = self.render_request();
            self.refresh_preview(&request);
        }
    }

    pub fn debounce_pending(&self) -> bool {
        self.text_debounce.is_pending() || self.size_debounce.is_pending()
    }

    pub fn next_debounce_deadline(&self, now: Instant) -> Option<Duration> {
        [
            self.text_debounce.remaining(now),
            self.size_debounce.remaining(now),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// The "Generate" button: validates, refreshes and reveals export controls.
    pub fn generate_and_show_download(&mut self) {
        let request = self.render_request();
        if !request.has_text() {
            self.notify(Notification::missing_text());
            return;
        }
        self.text_debounce.cancel();
        self.size_debounce.cancel();
        self.refresh_preview(&request);
        self.export_visible = true;
    }

    /// Exports the current inputs through `sink`. Failures become notifications.
    pub fn export_to(&mut self, format: ExportFormat, sink: &mut dyn ArtifactSink) -> Option<PathBuf> {
        let request = self.render_request();
        match exporter::deliver(format, &request, self.preferences.jpeg_quality, sink) {
            Ok(saved) => {
                if let Some(dir) = saved.as_ref().and_then(|p| p.parent()) {
                    self.preferences.export_directory = Some(dir.to_path_buf());
                }
                saved
            }
            Err(e) if e.is_validation() => {
                self.notify(Notification::missing_text());
                None
            }
            Err(e) => {
                log::error!("Export of {} failed: {e}", format.file_name());
                self.notify(Notification::error("Export failed", e.to_string()));
                None
            }
        }
    }

    /// Builds the export and returns it as a data URI.
    pub fn export_data_uri(&mut self, format: ExportFormat) -> Option<String> {
        let request = self.render_request();
        match exporter::export(format, &request, self.preferences.jpeg_quality) {
            Ok(artifact) => Some(artifact.to_data_uri()),
            Err(e) if e.is_validation() => {
                self.notify(Notification::missing_text());
                None
            }
            Err(e) => {
                log::error!("Data URI export failed: {e}");
                self.notify(Notification::error("Export failed", e.to_string()));
                None
            }
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        log::debug!("Notification: {}", notification.title);
        self.notifications.push_back(notification);
    }

    pub fn current_notification(&self) -> Option<&Notification> {
        self.notifications.front()
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.pop_front();
    }

    #[cfg(test)]
    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    pub fn check_and_save_preferences(&mut self) {
        if self.preferences != self.last_preferences {
            self.apply_preferences();
            self.last_preferences = self.preferences.clone();
            if let Err(e) = self.preferences.save() {
                log::error!("Failed to save preferences: {e}");
            }
        }
    }

    fn apply_preferences(&mut self) {
        self.text_debounce.set_wait(self.preferences.text_debounce());
        self.size_debounce.set_wait(self.preferences.size_debounce());
        if self.size.range() != self.preferences.size_range {
            self.size.set_range(self.preferences.size_range);
        }
    }

    pub fn reset_preferences(&mut self) {
        self.preferences = UserPreferences::default();
    }
}
