use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use rfd::FileDialog;

use crate::encoder;
use crate::error::ExportError;
use crate::types::{ExportFormat, QrColor, RenderRequest};
use crate::vectorize::raster_to_svg;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// An encoded export, ready to be written or copied.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn file_name(&self) -> String {
        self.format.file_name()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// Where finished exports go.
pub trait ArtifactSink {
    /// Returns the written path, or `None` when the user backed out.
    fn save(&mut self, artifact: &ExportArtifact) -> Result<Option<PathBuf>, ExportError>;
}

/// Native save dialog, pre-filled with `qr-code.<ext>`. Existing files are
/// overwritten without further checks.
#[derive(Default)]
pub struct DialogSink {
    pub directory: Option<PathBuf>,
}

impl DialogSink {
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self { directory }
    }
}

impl ArtifactSink for DialogSink {
    fn save(&mut self, artifact: &ExportArtifact) -> Result<Option<PathBuf>, ExportError> {
        let mut dialog = FileDialog::new()
            .set_file_name(artifact.file_name())
            .add_filter(artifact.format.display_name(), &[artifact.format.extension()]);
        if let Some(directory) = &self.directory {
            dialog = dialog.set_directory(directory);
        }
        let Some(path) = dialog.save_file() else {
            log::debug!("Export of {} cancelled", artifact.file_name());
            return Ok(None);
        };
        std::fs::write(&path, &artifact.bytes)?;
        self.directory = path.parent().map(Path::to_path_buf);
        Ok(Some(path))
    }
}

/// Renders `request` off-screen and encodes it as `format`.
pub fn export(
    format: ExportFormat,
    request: &RenderRequest,
    jpeg_quality: u8,
) -> Result<ExportArtifact, ExportError> {
    if !request.has_text() {
        return Err(ExportError::EmptyText);
    }

    let bytes = match format {
        ExportFormat::Svg => {
            // Native resolution in black on white; the vector conversion scales
            // modules up and paints them in the chosen foreground.
            let mono = RenderRequest {
                foreground: QrColor::BLACK,
                background: QrColor::WHITE,
                ..request.clone()
            };
            let raster = encoder::render(&mono, None)?;
            raster_to_svg(&raster, request.size, request.foreground, QrColor::WHITE)
                .into_bytes()
        }
        ExportFormat::Png => {
            let raster = render_transparent(request)?;
            encode_png(raster)?
        }
        ExportFormat::Jpeg => {
            let raster = render_transparent(request)?;
            encode_jpeg(&composite_on_white(&raster), jpeg_quality)?
        }
    };

    log::info!(
        "Exported {} ({}x{}, {} bytes)",
        format.file_name(),
        request.size,
        request.size,
        bytes.len()
    );
    Ok(ExportArtifact { format, bytes })
}

/// Exports and hands the artifact to `sink`. Nothing reaches the sink on failure.
pub fn deliver(
    format: ExportFormat,
    request: &RenderRequest,
    jpeg_quality: u8,
    sink: &mut dyn ArtifactSink,
) -> Result<Option<PathBuf>, ExportError> {
    let artifact = export(format, request, jpeg_quality)?;
    let saved = sink.save(&artifact)?;
    if let Some(path) = &saved {
        log::info!("Saved {} to {}", artifact.file_name(), path.display());
    }
    Ok(saved)
}

fn render_transparent(request: &RenderRequest) -> Result<RgbaImage, ExportError> {
    let request = request.with_background(QrColor::TRANSPARENT);
    Ok(encoder::render(&request, Some(request.size))?)
}

fn encode_png(raster: RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(raster).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    {
        let mut jpeg = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
        jpeg.encode_image(image)?;
    }
    Ok(bytes)
}

/// Flattens `raster` over opaque white. JPEG has no alpha channel, so transparent
/// regions would otherwise come out black.
pub fn composite_on_white(raster: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(raster.width(), raster.height(), |x, y| {
        let [r, g, b, a] = raster.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCorrection;
    use image::{GenericImageView, Rgba};

    #[derive(Default)]
    struct RecordingSink {
        saved: Vec<ExportArtifact>,
    }

    impl ArtifactSink for RecordingSink {
        fn save(&mut self, artifact: &ExportArtifact) -> Result<Option<PathBuf>, ExportError> {
            self.saved.push(artifact.clone());
            Ok(Some(PathBuf::from(artifact.file_name())))
        }
    }

    fn request() -> RenderRequest {
        let mut request = RenderRequest::new("hello world", 210);
        request.ec_level = ErrorCorrection::L;
        request
    }

    // Center of the light separator module at (7, 3) for a 21-module symbol at 10px.
    const SEPARATOR_PIXEL: (u32, u32) = (75, 35);

    #[test]
    fn test_empty_text_is_rejected_for_every_format() {
        for format in ExportFormat::all() {
            let mut sink = RecordingSink::default();
            let result = deliver(*format, &RenderRequest::new("  ", 300), 90, &mut sink);
            assert!(matches!(result, Err(ExportError::EmptyText)));
            assert!(sink.saved.is_empty());
        }
    }

    #[test]
    fn test_png_keeps_transparency() {
        let artifact = export(ExportFormat::Png, &request(), 90).unwrap();
        let img = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!(img.dimensions(), (210, 210));
        assert!(img.color().has_alpha());
        let (x, y) = SEPARATOR_PIXEL;
        assert_eq!(img.get_pixel(x, y).0[3], 0);
        assert_eq!(img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_jpeg_has_no_transparency() {
        let artifact = export(ExportFormat::Jpeg, &request(), 90).unwrap();
        let img = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!(img.dimensions(), (210, 210));
        assert!(!img.color().has_alpha());
        let (x, y) = SEPARATOR_PIXEL;
        let pixel = img.to_rgb8().get_pixel(x, y).0;
        assert!(pixel.iter().all(|c| *c > 230), "expected white, got {pixel:?}");
    }

    #[test]
    fn test_composite_on_white() {
        let mut raster = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        raster.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let flat = composite_on_white(&raster);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_svg_export_scales_native_raster() {
        let request = request();
        let artifact = export(ExportFormat::Svg, &request, 90).unwrap();
        let svg = String::from_utf8(artifact.bytes).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"210\""));
        let matrix = encoder::encode(&request.text, request.ec_level).unwrap();
        assert_eq!(svg.matches("<rect").count(), matrix.dark_count());
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"10\" height=\"10\" fill=\"#000000\" />"));
    }

    #[test]
    fn test_svg_export_ignores_background_choice() {
        let mut request = request();
        request.foreground = QrColor::rgb(40, 40, 40);
        request.background = QrColor::rgb(40, 40, 40);
        let artifact = export(ExportFormat::Svg, &request, 90).unwrap();
        let svg = String::from_utf8(artifact.bytes).unwrap();

        let matrix = encoder::encode(&request.text, request.ec_level).unwrap();
        assert_eq!(svg.matches("<rect").count(), matrix.dark_count());
        assert!(svg.contains("fill=\"#282828\""));
    }

    #[test]
    fn test_encoder_failure_surfaces() {
        let mut request = RenderRequest::new(&"x".repeat(5000), 300);
        request.ec_level = ErrorCorrection::H;
        let mut sink = RecordingSink::default();
        let result = deliver(ExportFormat::Png, &request, 90, &mut sink);
        assert!(matches!(result, Err(ExportError::Render(_))));
        assert!(sink.saved.is_empty());
    }

    #[test]
    fn test_artifact_naming_and_data_uri() {
        let artifact = ExportArtifact {
            format: ExportFormat::Jpeg,
            bytes: b"abc".to_vec(),
        };
        assert_eq!(artifact.file_name(), "qr-code.jpeg");
        assert_eq!(artifact.to_data_uri(), "data:image/jpeg;base64,YWJj");
    }
}
