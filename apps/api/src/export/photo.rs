//! Header photo decoding: base64 (or `data:` URI) PNG/JPEG → square RGB pixels.

use base64::Engine;
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};

use crate::layout::LayoutError;

/// Longest edge kept in the exported file.
pub const MAX_PHOTO_PX: u32 = 512;

/// Decoded, centre-cropped photo ready to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoImage {
    pub width: u32,
    pub height: u32,
    /// Packed 8-bit RGB, row-major from the top.
    pub rgb: Vec<u8>,
}

/// Accepts raw base64 or a `data:image/...;base64,` URI.
pub fn decode_photo_base64(payload: &str) -> Result<PhotoImage, LayoutError> {
    let (mime, encoded) = match payload.trim().split_once(',') {
        Some((header, data)) if header.starts_with("data:") => (Some(header), data),
        _ => (None, payload.trim()),
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| LayoutError::Photo(format!("invalid base64: {e}")))?;
    decode_photo(&bytes, mime)
}

pub fn decode_photo(data: &[u8], mime: Option<&str>) -> Result<PhotoImage, LayoutError> {
    let format = match mime {
        Some(m) if m.contains("png") => ImageFormat::Png,
        Some(m) if m.contains("jpeg") || m.contains("jpg") => ImageFormat::Jpeg,
        Some(m) => return Err(LayoutError::Photo(format!("unsupported media type {m}"))),
        None => image::guess_format(data)
            .map_err(|e| LayoutError::Photo(format!("unrecognised image: {e}")))?,
    };
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(LayoutError::Photo(format!("unsupported image format {format:?}")));
    }
    let decoded = image::load_from_memory_with_format(data, format)
        .map_err(|e| LayoutError::Photo(e.to_string()))?;
    Ok(square_rgb(&decoded))
}

fn square_rgb(img: &DynamicImage) -> PhotoImage {
    let (w, h) = img.dimensions();
    let side = w.min(h);
    let mut square = img.crop_imm((w - side) / 2, (h - side) / 2, side, side);
    if side > MAX_PHOTO_PX {
        square = square.resize_exact(MAX_PHOTO_PX, MAX_PHOTO_PX, FilterType::Triangle);
    }
    let rgb = square.to_rgb8();
    let (width, height) = rgb.dimensions();
    PhotoImage {
        width,
        height,
        rgb: rgb.into_raw(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut src = RgbImage::new(width, height);
        for (x, y, px) in src.enumerate_pixels_mut() {
            *px = Rgb([(x % 256) as u8, (y % 256) as u8, 128]);
        }
        let mut bytes = Vec::new();
        src.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decodes_raw_base64_png() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(4, 4));
        let photo = decode_photo_base64(&encoded).unwrap();
        assert_eq!((photo.width, photo.height), (4, 4));
        assert_eq!(photo.rgb.len(), 4 * 4 * 3);
    }

    #[test]
    fn test_decodes_data_uri() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(2, 2));
        let uri = format!("data:image/png;base64,{encoded}");
        assert!(decode_photo_base64(&uri).is_ok());
    }

    #[test]
    fn test_crops_to_centre_square() {
        let photo = decode_photo(&png_bytes(10, 4), None).unwrap();
        assert_eq!((photo.width, photo.height), (4, 4));
        // First pixel comes from column 3 of the source.
        assert_eq!(&photo.rgb[..3], &[3, 0, 128]);
    }

    #[test]
    fn test_large_photo_is_downsampled() {
        let photo = decode_photo(&png_bytes(600, 600), None).unwrap();
        assert_eq!((photo.width, photo.height), (MAX_PHOTO_PX, MAX_PHOTO_PX));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            decode_photo_base64("not base64!!"),
            Err(LayoutError::Photo(_))
        ));
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"plain text");
        assert!(matches!(
            decode_photo_base64(&encoded),
            Err(LayoutError::Photo(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_media_type() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(2, 2));
        let uri = format!("data:image/gif;base64,{encoded}");
        assert!(matches!(decode_photo_base64(&uri), Err(LayoutError::Photo(_))));
    }
}
