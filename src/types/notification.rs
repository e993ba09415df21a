#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "❌",
        }
    }
}

/// A blocking message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn missing_text() -> Self {
        Self {
            title: "Please enter some data".to_string(),
            message: "Type text or a URL to create a QR code.".to_string(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }
}
