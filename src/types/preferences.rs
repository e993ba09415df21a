use std::path::PathBuf;
use std::time::Duration;

use super::size::SizeRange;
use crate::exporter::DEFAULT_JPEG_QUALITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AppearanceMode {
    System,
    Light,
    Dark,
}

impl Default for AppearanceMode {
    fn default() -> Self {
        AppearanceMode::System
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub appearance_mode: AppearanceMode,
    pub size_range: SizeRange,
    pub default_size: u32,
    pub text_debounce_ms: u64,
    pub size_debounce_ms: u64,
    pub jpeg_quality: u8,
    pub export_directory: Option<PathBuf>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            appearance_mode: AppearanceMode::default(),
            size_range: SizeRange::default(),
            default_size: 300,
            text_debounce_ms: 500,
            size_debounce_ms: 300,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            export_directory: None,
        }
    }
}

impl UserPreferences {
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("QRStudio").join("preferences.json")
        } else {
            PathBuf::from("preferences.json")
        }
    }

    pub fn load() -> Self {
        let path = Self::config_path();
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(prefs) => {
                log::debug!("Preferences loaded from {}", path.display());
                prefs.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable preferences at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Brings hand-edited values back into the ranges the UI allows.
    fn sanitized(mut self) -> Self {
        self.size_range = self.size_range.validated();
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn text_debounce(&self) -> Duration {
        Duration::from_millis(self.text_debounce_ms)
    }

    pub fn size_debounce(&self) -> Duration {
        Duration::from_millis(self.size_debounce_ms)
    }
}
