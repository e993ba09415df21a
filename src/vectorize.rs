use std::fmt::Write;

use image::RgbaImage;

use crate::types::QrColor;

/// Converts a rendered QR raster into a standalone SVG document of
/// `output_size`×`output_size`.
///
/// Every pixel whose RGB differs from `background` becomes one square of side
/// `output_size / raster width`, filled with `foreground`. Alpha is ignored.
/// Adjacent squares are not merged.
pub fn raster_to_svg(
    raster: &RgbaImage,
    output_size: u32,
    foreground: QrColor,
    background: QrColor,
) -> String {
    let (width, height) = raster.dimensions();
    let module_size = if width == 0 {
        0.0
    } else {
        output_size as f64 / width as f64
    };
    let fill = foreground.to_hex();

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\">",
        output_size
    );
    for y in 0..height {
        for x in 0..width {
            if background.same_rgb(raster.get_pixel(x, y).0) {
                continue;
            }
            // Writing into a String cannot fail.
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{ms}\" height=\"{ms}\" fill=\"{fill}\" />",
                x as f64 * module_size,
                y as f64 * module_size,
                ms = module_size,
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn rect_count(svg: &str) -> usize {
        svg.matches("<rect").count()
    }

    #[test]
    fn test_blank_raster_has_no_rects() {
        let raster = RgbaImage::from_pixel(8, 8, WHITE);
        let svg = raster_to_svg(&raster, 80, QrColor::BLACK, QrColor::WHITE);
        assert_eq!(rect_count(&svg), 0);
        assert_eq!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"80\" height=\"80\" viewBox=\"0 0 80 80\"></svg>"
        );
    }

    #[test]
    fn test_single_pixel_scaled() {
        let mut raster = RgbaImage::from_pixel(8, 8, WHITE);
        raster.put_pixel(0, 0, BLACK);
        let svg = raster_to_svg(&raster, 80, QrColor::BLACK, QrColor::WHITE);
        assert_eq!(rect_count(&svg), 1);
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"10\" height=\"10\" fill=\"#000000\" />"));
    }

    #[test]
    fn test_rect_count_matches_ink_pixels() {
        let mut raster = RgbaImage::from_pixel(5, 5, WHITE);
        let ink = [(1, 0), (4, 4), (2, 3), (0, 4)];
        for (x, y) in ink {
            raster.put_pixel(x, y, Rgba([10, 20, 30, 255]));
        }
        let svg = raster_to_svg(&raster, 100, QrColor::rgb(255, 0, 0), QrColor::WHITE);
        assert_eq!(rect_count(&svg), ink.len());
        assert!(svg.contains("<rect x=\"80\" y=\"80\" width=\"20\" height=\"20\" fill=\"#ff0000\" />"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut raster = RgbaImage::from_pixel(21, 21, WHITE);
        for i in 0..21 {
            raster.put_pixel(i, i, BLACK);
        }
        let a = raster_to_svg(&raster, 300, QrColor::BLACK, QrColor::WHITE);
        let b = raster_to_svg(&raster, 300, QrColor::BLACK, QrColor::WHITE);
        assert_eq!(a, b);
        assert_eq!(rect_count(&a), 21);
    }

    #[test]
    fn test_non_white_background_is_not_ink() {
        let bg = QrColor::rgb(255, 255, 200);
        let mut raster = RgbaImage::from_pixel(4, 4, bg.to_rgba());
        raster.put_pixel(3, 2, BLACK);
        let svg = raster_to_svg(&raster, 40, QrColor::BLACK, bg);
        assert_eq!(rect_count(&svg), 1);
        assert!(svg.contains("x=\"30\" y=\"20\""));
    }

    #[test]
    fn test_alpha_is_ignored() {
        let mut raster = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 0]));
        raster.put_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let svg = raster_to_svg(&raster, 20, QrColor::BLACK, QrColor::WHITE);
        assert_eq!(rect_count(&svg), 1);
    }
}
