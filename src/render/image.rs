//! Raster images for embedding: decoding and fit-to-box scaling.

use std::path::Path;

use crate::error::{CardError, CardResult};

/// 8-bit RGB samples plus an optional 8-bit alpha plane.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

/// Decode a PNG or JPEG file.
pub fn decode(path: &Path) -> CardResult<DecodedImage> {
    let img = image::open(path).map_err(|source| CardError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let has_alpha = img.color().has_alpha();
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels = rgba.as_raw();
    let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(if has_alpha { pixels.len() / 4 } else { 0 });
    for px in pixels.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
        if has_alpha {
            alpha.push(px[3]);
        }
    }

    Ok(DecodedImage {
        width,
        height,
        rgb,
        alpha: has_alpha.then_some(alpha),
    })
}

/// Largest size with the image's aspect ratio that fits inside `fit`.
pub fn fit_size(width: u32, height: u32, fit: (f32, f32)) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (0.0, 0.0);
    }
    let (w, h) = (width as f32, height as f32);
    let scale = (fit.0 / w).min(fit.1 / h);
    (w * scale, h * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_ratio() {
        assert_eq!(fit_size(200, 100, (50.0, 50.0)), (50.0, 25.0));
        assert_eq!(fit_size(100, 200, (50.0, 50.0)), (25.0, 50.0));
        assert_eq!(fit_size(10, 10, (72.0, 15.0)), (15.0, 15.0));
    }

    #[test]
    fn decodes_png_with_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let mut img = image::RgbaImage::new(2, 3);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 128]));
        img.save(&path).unwrap();

        let decoded = decode(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 3));
        assert_eq!(decoded.rgb.len(), 2 * 3 * 3);
        assert_eq!(&decoded.rgb[..3], &[255, 0, 0]);
        assert_eq!(decoded.alpha.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(matches!(decode(&path), Err(CardError::Image { .. })));
    }
}
