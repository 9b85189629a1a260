mod encode;

pub use encode::{encode_data_url, encode_image_bytes};

use crate::error::{ReceiptAiError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(ReceiptAiError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_file() && has_image_extension(path) {
            images.push(image_info(path));
        }
    }

    // ファイル名でソート（複数ページのレシートは順番が意味を持つ）
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// ファイル/フォルダの混在指定から画像を集める
///
/// ファイルは指定順、フォルダは中身をファイル名順で展開する。
pub fn collect_images(inputs: &[PathBuf]) -> Result<Vec<ImageInfo>> {
    let mut images = Vec::new();

    for input in inputs {
        if input.is_dir() {
            images.extend(scan_folder(input)?);
        } else if input.is_file() {
            if !has_image_extension(input) {
                return Err(ReceiptAiError::ImageLoad(format!(
                    "対応していない形式です: {}",
                    input.display()
                )));
            }
            images.push(image_info(input));
        } else {
            return Err(ReceiptAiError::FileNotFound(input.display().to_string()));
        }
    }

    Ok(images)
}

fn image_info(path: &Path) -> ImageInfo {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    ImageInfo {
        path: path.to_path_buf(),
        file_name,
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

/// Check if a file extension is a supported image format
fn is_image_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
