#![windows_subsystem = "windows"]
mod app;
mod debounce;
mod encoder;
mod error;
mod exporter;
mod preview;
mod renderer;
mod types;
mod ui;
mod vectorize;

use app::QrStudioApp;
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("QR Studio - QR Code Generator"),
        ..Default::default()
    };

    eframe::run_native(
        "QR Studio - QR Code Generator",
        options,
        Box::new(|cc| Ok(Box::new(QrStudioApp::new(cc)))),
    )
}
