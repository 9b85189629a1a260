//! 画像 → Data URL 変換
//!
//! 長辺が max_image_size を超える画像だけ縮小してJPEGに再エンコードする。

use crate::error::{ReceiptAiError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use receipt_ai_common::build_data_url;
use std::io::Cursor;
use std::path::Path;

pub fn encode_data_url(path: &Path, max_image_size: u32) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| ReceiptAiError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    encode_image_bytes(&bytes, max_image_size).map_err(|e| match e {
        ReceiptAiError::ImageLoad(msg) => ReceiptAiError::ImageLoad(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// 画像バイト列をData URLに変換（max_image_size = 0 なら縮小しない）
pub fn encode_image_bytes(bytes: &[u8], max_image_size: u32) -> Result<String> {
    let format = image::guess_format(bytes).map_err(|e| ReceiptAiError::ImageLoad(e.to_string()))?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP) {
        return Err(ReceiptAiError::ImageLoad(format!("対応していない画像形式: {:?}", format)));
    }

    if max_image_size == 0 {
        return Ok(build_data_url(format.to_mime_type(), &STANDARD.encode(bytes)));
    }

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ReceiptAiError::ImageLoad(e.to_string()))?;
    let (width, height) = img.dimensions();

    if width <= max_image_size && height <= max_image_size {
        return Ok(build_data_url(format.to_mime_type(), &STANDARD.encode(bytes)));
    }

    // アルファはJPEGで扱えないのでRGBに落とす
    let resized = img.resize(max_image_size, max_image_size, FilterType::Triangle);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buffer = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .map_err(|e| ReceiptAiError::ImageLoad(format!("JPEG変換エラー: {}", e)))?;

    Ok(build_data_url("image/jpeg", &STANDARD.encode(&buffer)))
}
