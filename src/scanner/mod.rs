//! 画像の取り込み
//!
//! シーケンサに渡す前のアップロード検証を担当する:
//! - 画像形式（拡張子から判定、`image/*` のみ）
//! - サイズ上限

use crate::error::{ForgeDetectError, Result};
use forge_detect_common::ImageFile;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 取り込み済みの画像（元パスを保持）
#[derive(Debug, Clone)]
pub struct ScannedImage {
    pub path: PathBuf,
    pub file: ImageFile,
}

/// 拡張子からメディアタイプを判定（画像以外はNone）
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
        .filter(|mime| mime.starts_with("image/"))
}

/// 単一ファイルを検証してImageFileを作る
pub fn load_image_file(path: &Path, max_bytes: u64) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(ForgeDetectError::FileNotFound(path.display().to_string()));
    }

    let media_type = media_type_for(path)
        .ok_or_else(|| ForgeDetectError::UnsupportedMediaType(path.display().to_string()))?;

    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(ForgeDetectError::FileTooLarge {
            path: path.display().to_string(),
            size,
            limit: max_bytes,
        });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImageFile::new(name, size, media_type))
}

/// フォルダ内の画像パスを列挙（ファイル名順）
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(ForgeDetectError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| media_type_for(p).is_some())
        .collect();

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    Ok(paths)
}

/// ファイルまたはフォルダから解析対象を集める
///
/// フォルダ指定時、上限超過のファイルは警告してスキップする。
pub fn collect_inputs(path: &Path, recursive: bool, max_bytes: u64) -> Result<Vec<ScannedImage>> {
    if path.is_file() {
        let file = load_image_file(path, max_bytes)?;
        return Ok(vec![ScannedImage {
            path: path.to_path_buf(),
            file,
        }]);
    }

    let mut files = Vec::new();
    for image_path in scan_folder(path, recursive)? {
        match load_image_file(&image_path, max_bytes) {
            Ok(file) => files.push(ScannedImage {
                path: image_path,
                file,
            }),
            Err(e @ ForgeDetectError::FileTooLarge { .. }) => {
                tracing::warn!(error = %e, "skipping oversized image");
            }
            Err(e) => return Err(e),
        }
    }

    if files.is_empty() {
        return Err(ForgeDetectError::NoImagesFound(path.display().to_string()));
    }

    Ok(files)
}
