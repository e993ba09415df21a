#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Svg,
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "SVG",
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    /// `qr-code.<ext>`
    pub fn file_name(&self) -> String {
        format!("qr-code.{}", self.extension())
    }

    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Svg, ExportFormat::Png, ExportFormat::Jpeg]
    }
}
