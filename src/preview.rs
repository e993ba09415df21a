use std::time::Duration;

use image::RgbaImage;

use crate::renderer::{QrRenderer, RenderResult};
use crate::types::RenderRequest;

/// On-screen preview size in pixels. Independent of the export size.
pub const PREVIEW_SIZE: u32 = 250;

pub struct PreviewImage {
    pub generation: u64,
    pub raster: RgbaImage,
    pub request: RenderRequest,
}

pub enum PreviewState {
    Placeholder,
    Rendering,
    Ready(PreviewImage),
    Failed(String),
}

/// Owns the single live preview. Each render releases the previous one first.
pub struct PreviewRenderer {
    renderer: QrRenderer,
    state: PreviewState,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self {
            renderer: QrRenderer::new(),
            state: PreviewState::Placeholder,
        }
    }
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.state, PreviewState::Placeholder)
    }

    pub fn is_rendering(&self) -> bool {
        self.renderer.is_rendering()
    }

    #[cfg(test)]
    pub fn image(&self) -> Option<&PreviewImage> {
        match &self.state {
            PreviewState::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Shows `request` in the preview, or the placeholder when it has no text.
    /// Returns whether a render was started.
    pub fn render_preview(&mut self, request: &RenderRequest) -> bool {
        self.release();
        if !request.has_text() {
            return false;
        }
        let generation = self.renderer.start_render(request.clone(), PREVIEW_SIZE);
        log::debug!("Preview render {generation} started");
        self.state = PreviewState::Rendering;
        true
    }

    /// Drops the displayed surface and any in-flight render.
    pub fn release(&mut self) {
        if self.renderer.is_rendering() {
            self.renderer.cancel_current_render();
        }
        self.state = PreviewState::Placeholder;
    }

    /// Picks up a finished render. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        match self.renderer.check_render_complete() {
            Some(result) => self.finish(result),
            None => false,
        }
    }

    /// Blocking variant of [`poll`](Self::poll).
    pub fn wait(&mut self, timeout: Duration) -> bool {
        match self.renderer.wait_render_complete(timeout) {
            Some(result) => self.finish(result),
            None => false,
        }
    }

    fn finish(&mut self, result: Result<RenderResult, crate::error::RenderError>) -> bool {
        self.state = match result {
            Ok(RenderResult {
                raster,
                request,
                generation_id,
            }) => PreviewState::Ready(PreviewImage {
                generation: generation_id,
                raster,
                request,
            }),
            Err(e) => {
                log::error!("Failed to render preview: {e}");
                PreviewState::Failed(e.to_string())
            }
        };
        true
    }
}
