//! Data URLユーティリティ
//!
//! "data:image/jpeg;base64,/9j/4AAQ..." 形式の画像参照を扱う

use crate::error::{Error, Result};

/// 分解済みのData URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

/// Data URLを分解
///
/// base64エンコードされた画像のみ受け付ける。
pub fn parse_data_url(data_url: &str) -> Result<DataUrl<'_>> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidDataUrl(preview(data_url)))?;
    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidDataUrl(preview(data_url)))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::InvalidDataUrl(format!("not base64 encoded: {}", preview(data_url))))?;

    if !mime_type.starts_with("image/") {
        return Err(Error::InvalidDataUrl(format!("not an image: {}", mime_type)));
    }
    if data.is_empty() {
        return Err(Error::InvalidDataUrl("empty image data".into()));
    }

    Ok(DataUrl { mime_type, data })
}

/// 画像のData URLかどうか
pub fn is_image_data_url(data_url: &str) -> bool {
    parse_data_url(data_url).is_ok()
}

/// Data URLからBase64データ部分を抽出
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split_once(',').map(|(_, data)| data)
}

/// Data URLからMIMEタイプを抽出（不明なら"image/jpeg"）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|s| s.split([';', ',']).next())
        .filter(|s| !s.is_empty())
        .unwrap_or("image/jpeg")
}

/// MIMEタイプとBase64データからData URLを組み立てる
pub fn build_data_url(mime_type: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}

fn preview(data_url: &str) -> String {
    data_url.chars().take(40).collect()
}
