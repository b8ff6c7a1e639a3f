//! アップロード前の画像縮小
//!
//! アスペクト比を保って上限サイズに収め、JPEGで再エンコードする。

use crate::error::{MemeGenError, Result};
use crate::upload::LocalImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use meme_gen_common::{fit_within, ResizeOptions};

pub fn resize_image(file: &LocalImage, options: &ResizeOptions) -> Result<LocalImage> {
    let img = image::load_from_memory(&file.bytes)
        .map_err(|e| MemeGenError::ImageLoad(format!("{}: {}", file.file_name, e)))?;

    let (width, height) = fit_within(img.width(), img.height(), options.max_width, options.max_height);
    let resized = if (width, height) != (img.width(), img.height()) {
        img.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        img
    };

    let mut bytes = Vec::new();
    resized
        .to_rgb8()
        .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, options.jpeg_quality()))
        .map_err(|e| MemeGenError::Resize(e.to_string()))?;

    log::debug!(
        "resized {} to {}x{} ({} -> {} bytes)",
        file.file_name,
        width,
        height,
        file.bytes.len(),
        bytes.len()
    );

    Ok(LocalImage {
        path: file.path.clone(),
        file_name: jpeg_file_name(&file.file_name),
        mime_type: "image/jpeg".to_string(),
        bytes,
    })
}

fn jpeg_file_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    format!("{}.jpg", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn png_image(width: u32, height: u32) -> LocalImage {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 100, 50]));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        LocalImage {
            path: PathBuf::from("cat.png"),
            file_name: "cat.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: cursor.into_inner(),
        }
    }

    #[test]
    fn test_resize_downscales_preserving_ratio() {
        let file = png_image(2048, 1024);
        let resized = resize_image(&file, &ResizeOptions::default()).unwrap();

        let decoded = image::load_from_memory(&resized.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1024, 512));
        assert_eq!(resized.mime_type, "image/jpeg");
        assert_eq!(resized.file_name, "cat.jpg");
    }

    #[test]
    fn test_resize_keeps_small_dimensions() {
        let file = png_image(300, 200);
        let resized = resize_image(&file, &ResizeOptions::default()).unwrap();

        let decoded = image::load_from_memory(&resized.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 200));
    }

    #[test]
    fn test_resize_invalid_image() {
        let mut file = png_image(10, 10);
        file.bytes = b"not an image".to_vec();
        assert!(matches!(
            resize_image(&file, &ResizeOptions::default()),
            Err(MemeGenError::ImageLoad(_))
        ));
    }

    #[test]
    fn test_jpeg_file_name() {
        assert_eq!(jpeg_file_name("cat.png"), "cat.jpg");
        assert_eq!(jpeg_file_name("my.cat.webp"), "my.cat.jpg");
        assert_eq!(jpeg_file_name("cat"), "cat.jpg");
    }
}
