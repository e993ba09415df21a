use image::{ImageBuffer, RgbaImage};
use qrcode::QrCode;

use crate::error::RenderError;
use crate::types::{ErrorCorrection, QrColor, RenderRequest};

/// Dark/light modules of an encoded symbol, row-major, no quiet zone.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    #[cfg(test)]
    pub fn from_rows(rows: &[&[bool]]) -> Self {
        let width = rows.len();
        let dark = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self { width, dark }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.dark[y * self.width + x]
    }

    pub fn dark_count(&self) -> usize {
        self.dark.iter().filter(|d| **d).count()
    }
}

pub fn encode(text: &str, ec_level: ErrorCorrection) -> Result<ModuleMatrix, RenderError> {
    if text.trim().is_empty() {
        return Err(RenderError::EmptyText);
    }
    let code = QrCode::with_error_correction_level(text.as_bytes(), ec_level.to_ec_level())?;
    let width = code.width();
    let dark = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();
    let matrix = ModuleMatrix { width, dark };
    log::debug!(
        "Encoded {} bytes at level {:?} into {width}x{width} modules ({} dark)",
        text.len(),
        ec_level,
        matrix.dark_count()
    );
    Ok(matrix)
}

/// Paints `matrix` onto a `dimension`×`dimension` surface. Each pixel takes the
/// color of the module it falls into, so modules may differ by a pixel in size
/// when `dimension` is not a multiple of the matrix width.
pub fn rasterize(
    matrix: &ModuleMatrix,
    dimension: u32,
    foreground: QrColor,
    background: QrColor,
) -> Result<RgbaImage, RenderError> {
    if dimension == 0 || matrix.width() == 0 {
        return Err(RenderError::InvalidSurface {
            width: dimension,
            height: dimension,
        });
    }
    let dark = foreground.to_rgba();
    let light = background.to_rgba();
    let modules = matrix.width() as u64;
    let dim = dimension as u64;

    Ok(ImageBuffer::from_fn(dimension, dimension, |x, y| {
        let mx = (x as u64 * modules / dim) as usize;
        let my = (y as u64 * modules / dim) as usize;
        if matrix.is_dark(mx, my) { dark } else { light }
    }))
}

/// Encodes and rasterizes at `dimension` pixels, or at one pixel per module when
/// `dimension` is `None`.
pub fn render(request: &RenderRequest, dimension: Option<u32>) -> Result<RgbaImage, RenderError> {
    let matrix = encode(&request.text, request.ec_level)?;
    let dimension = dimension.unwrap_or(matrix.width() as u32);
    rasterize(&matrix, dimension, request.foreground, request.background)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_version_1() {
        // Short text fits in a version 1 symbol: 21x21 modules.
        let matrix = encode("HELLO", ErrorCorrection::M).unwrap();
        assert_eq!(matrix.width(), 21);
        // Finder pattern corner is always dark.
        assert!(matrix.is_dark(0, 0));
        assert!(matrix.dark_count() > 0);
    }

    #[test]
    fn test_encode_empty_text() {
        assert_eq!(encode("  ", ErrorCorrection::L), Err(RenderError::EmptyText));
    }

    #[test]
    fn test_encode_too_long() {
        let text = "x".repeat(5000);
        assert!(matches!(
            encode(&text, ErrorCorrection::H),
            Err(RenderError::Encode(_))
        ));
    }

    #[test]
    fn test_rasterize_scales_modules() {
        let matrix = ModuleMatrix::from_rows(&[&[true, false], &[false, true]]);
        let img = rasterize(&matrix, 4, QrColor::BLACK, QrColor::WHITE).unwrap();
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(2, 1).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(3, 3).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_render_native_resolution() {
        let request = RenderRequest::new("HELLO", 300);
        let img = render(&request, None).unwrap();
        assert_eq!(img.dimensions(), (21, 21));
        let img = render(&request, Some(250)).unwrap();
        assert_eq!(img.dimensions(), (250, 250));
    }

    #[test]
    fn test_rasterize_zero_dimension() {
        let matrix = ModuleMatrix::from_rows(&[&[true]]);
        assert!(matches!(
            rasterize(&matrix, 0, QrColor::BLACK, QrColor::WHITE),
            Err(RenderError::InvalidSurface { .. })
        ));
    }
}
