pub mod app_state;
pub mod export;
pub mod notification;
pub mod preferences;
pub mod render;
pub mod size;

// Re-export all public types for convenience
pub use app_state::AppState;
pub use export::ExportFormat;
pub use notification::{Notification, NotificationLevel};
pub use preferences::AppearanceMode;
pub use render::{ErrorCorrection, QrColor, RenderRequest};
pub use size::SizeSource;
