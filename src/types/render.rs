use std::sync::LazyLock;

use regex::Regex;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})?$")
        .expect("hex color pattern is valid")
});

/// QR error correction tier. Higher levels trade capacity for damage resilience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    H,
}

impl Default for ErrorCorrection {
    fn default() -> Self {
        ErrorCorrection::M
    }
}

impl ErrorCorrection {
    pub fn all() -> &'static [ErrorCorrection] {
        &[
            ErrorCorrection::L,
            ErrorCorrection::M,
            ErrorCorrection::Q,
            ErrorCorrection::H,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ErrorCorrection::L => "L (7%)",
            ErrorCorrection::M => "M (15%)",
            ErrorCorrection::Q => "Q (25%)",
            ErrorCorrection::H => "H (30%)",
        }
    }

    pub fn to_ec_level(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrection::L => qrcode::EcLevel::L,
            ErrorCorrection::M => qrcode::EcLevel::M,
            ErrorCorrection::Q => qrcode::EcLevel::Q,
            ErrorCorrection::H => qrcode::EcLevel::H,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QrColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl QrColor {
    pub const BLACK: QrColor = QrColor::rgb(0, 0, 0);
    pub const WHITE: QrColor = QrColor::rgb(255, 255, 255);
    pub const TRANSPARENT: QrColor = QrColor {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`; the leading `#` is optional.
    pub fn from_hex(s: &str) -> Option<Self> {
        let caps = HEX_COLOR.captures(s.trim())?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();
        let a = match caps.get(4) {
            Some(m) => u8::from_str_radix(m.as_str(), 16).ok()?,
            None => 0xFF,
        };
        Some(Self {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
            a,
        })
    }

    /// `#rrggbb`, alpha dropped. This is the form written into SVG fills.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn same_rgb(&self, rgba: [u8; 4]) -> bool {
        self.r == rgba[0] && self.g == rgba[1] && self.b == rgba[2]
    }

    pub fn to_rgba(&self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }

    pub fn to_color32(&self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    pub fn to_srgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_srgb(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }
}

/// Everything needed to render one QR code image.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    pub text: String,
    pub size: u32,
    pub foreground: QrColor,
    pub background: QrColor,
    pub ec_level: ErrorCorrection,
}

impl RenderRequest {
    pub fn new(text: &str, size: u32) -> Self {
        Self {
            text: text.trim().to_string(),
            size,
            foreground: QrColor::BLACK,
            background: QrColor::WHITE,
            ec_level: ErrorCorrection::default(),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn with_background(&self, background: QrColor) -> Self {
        Self {
            background,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(QrColor::from_hex("#FF8000"), Some(QrColor::rgb(255, 128, 0)));
        assert_eq!(QrColor::from_hex("ff8000"), Some(QrColor::rgb(255, 128, 0)));
        assert_eq!(
            QrColor::from_hex("#00000000"),
            Some(QrColor::TRANSPARENT)
        );
        assert_eq!(QrColor::from_hex("#12345"), None);
        assert_eq!(QrColor::from_hex("#GG0000"), None);
        assert_eq!(QrColor::rgb(255, 128, 0).to_hex(), "#ff8000");
    }

    #[test]
    fn test_request_trims_text() {
        let request = RenderRequest::new("  hello \n", 300);
        assert_eq!(request.text, "hello");
        assert!(request.has_text());
        assert!(!RenderRequest::new("   ", 300).has_text());
    }
}
