use crate::encoder;
use crate::error::RenderError;
use crate::types::RenderRequest;
use image::RgbaImage;
use std::sync::mpsc;
use std::time::Duration;

#[derive(Debug)]
pub struct RenderResult {
    pub raster: RgbaImage,
    pub request: RenderRequest,
    pub generation_id: u64,
}

/// Runs QR renders on a worker thread. Completion is reported over a channel and
/// tagged with a generation id so superseded renders can be dropped.
pub struct QrRenderer {
    render_thread: Option<std::thread::JoinHandle<()>>,
    result_receiver: Option<mpsc::Receiver<Result<RenderResult, RenderError>>>,
    cancel_sender: Option<mpsc::Sender<()>>,
    current_generation_id: u64,
    active_threads: Vec<std::thread::JoinHandle<()>>,
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self {
            render_thread: None,
            result_receiver: None,
            cancel_sender: None,
            current_generation_id: 0,
            active_threads: Vec::new(),
        }
    }
}

impl QrRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts rendering `request` at `dimension` pixels. Returns the generation id.
    pub fn start_render(&mut self, request: RenderRequest, dimension: u32) -> u64 {
        // Cancel any existing render
        self.cancel_current_render();

        let (result_sender, result_receiver) = mpsc::channel();
        let (cancel_sender, cancel_receiver) = mpsc::channel();
        let generation_id = self.current_generation_id;

        self.result_receiver = Some(result_receiver);
        self.cancel_sender = Some(cancel_sender);

        let thread = std::thread::spawn(move || {
            let result = Self::render(request, dimension, cancel_receiver, generation_id);
            let _ = result_sender.send(result);
        });
        self.render_thread = Some(thread);
        generation_id
    }

    /// Non-blocking check for the current render's completion message.
    pub fn check_render_complete(&mut self) -> Option<Result<RenderResult, RenderError>> {
        self.cleanup_finished_threads();
        let outcome = match &self.result_receiver {
            Some(receiver) => match receiver.try_recv() {
                Ok(result) => result,
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => Err(RenderError::WorkerLost),
            },
            None => return None,
        };
        self.accept(outcome)
    }

    /// Blocks until the current render reports back or `timeout` elapses.
    pub fn wait_render_complete(
        &mut self,
        timeout: Duration,
    ) -> Option<Result<RenderResult, RenderError>> {
        let outcome = match &self.result_receiver {
            Some(receiver) => match receiver.recv_timeout(timeout) {
                Ok(result) => result,
                Err(mpsc::RecvTimeoutError::Timeout) => return None,
                Err(mpsc::RecvTimeoutError::Disconnected) => Err(RenderError::WorkerLost),
            },
            None => return None,
        };
        self.accept(outcome)
    }

    fn accept(
        &mut self,
        outcome: Result<RenderResult, RenderError>,
    ) -> Option<Result<RenderResult, RenderError>> {
        self.render_thread = None;
        self.result_receiver = None;
        self.cancel_sender = None;

        match outcome {
            Ok(result) if result.generation_id != self.current_generation_id => {
                log::debug!(
                    "Ignoring outdated render from generation {} (current: {})",
                    result.generation_id,
                    self.current_generation_id
                );
                None
            }
            Ok(result) => {
                log::debug!("Accepting render from generation {}", result.generation_id);
                Some(Ok(result))
            }
            Err(RenderError::Cancelled) => None,
            Err(e) => Some(Err(e)),
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.render_thread.is_some()
    }

    /// Drops the in-flight render, if any. Its result will be ignored.
    pub fn cancel_current_render(&mut self) {
        if let Some(cancel_sender) = &self.cancel_sender {
            let _ = cancel_sender.send(());
        }

        // Let the old thread finish in the background; its result is ignored
        if let Some(old_thread) = self.render_thread.take() {
            self.active_threads.push(old_thread);
        }

        self.render_thread = None;
        self.result_receiver = None;
        self.cancel_sender = None;

        // Bump the generation so late results are recognised as stale
        self.current_generation_id += 1;

        self.cleanup_finished_threads();
    }

    fn cleanup_finished_threads(&mut self) {
        self.active_threads.retain(|thread| !thread.is_finished());
    }

    fn render(
        request: RenderRequest,
        dimension: u32,
        cancel_receiver: mpsc::Receiver<()>,
        generation_id: u64,
    ) -> Result<RenderResult, RenderError> {
        log::debug!("Starting render at {dimension}px (generation {generation_id})");

        if cancel_receiver.try_recv().is_ok() {
            log::debug!("Render cancelled for generation {generation_id}");
            return Err(RenderError::Cancelled);
        }

        let raster = encoder::render(&request, Some(dimension))?;

        Ok(RenderResult {
            raster,
            request,
            generation_id,
        })
    }
}

impl Drop for QrRenderer {
    fn drop(&mut self) {
        self.cancel_current_render();
    }
}
