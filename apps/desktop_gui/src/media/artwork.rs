//! Scene artwork decoding. Runs on the backend worker so the UI thread only uploads pixels.

use image::GenericImageView;

/// Longest edge kept for scene artwork.
pub const MAX_SCENE_DIMENSION: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.rgba)
    }
}

pub fn decode_scene_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    if bytes.is_empty() {
        return Err("scene image response was empty".to_string());
    }
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let (width, height) = decoded.dimensions();
    let decoded = if width.max(height) > MAX_SCENE_DIMENSION {
        decoded.thumbnail(MAX_SCENE_DIMENSION, MAX_SCENE_DIMENSION)
    } else {
        decoded
    };
    let rgba = decoded.to_rgba8();
    Ok(PreviewImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([120, 80, 40, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_into_rgba_pixels() {
        let image = decode_scene_image(&encode_png(4, 2)).expect("decode");
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.rgba.len(), 4 * 2 * 4);
        assert_eq!(&image.rgba[..4], &[120, 80, 40, 255]);
    }

    #[test]
    fn oversized_artwork_is_scaled_down() {
        let image = decode_scene_image(&encode_png(2048, 512)).expect("decode");
        assert_eq!(image.width, MAX_SCENE_DIMENSION as usize);
        assert_eq!(image.height, 256);
    }

    #[test]
    fn garbage_and_empty_bytes_are_rejected() {
        assert!(decode_scene_image(b"not an image").is_err());
        assert!(decode_scene_image(&[]).is_err());
    }
}
