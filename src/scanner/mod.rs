//! 解析対象画像の収集
//!
//! - ファイル選択: 指定ファイルはそのまま、フォルダは直下の画像を収集
//! - クリップボード貼り付け: 画像タイプの項目のみ採用（clipboard.rs）

mod clipboard;

pub use clipboard::{images_from_clipboard, ClipboardItem};

use crate::error::{AdvisorError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 保留中の画像（エンコード前）
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// ファイル選択で追加
    File(PathBuf),
    /// 貼り付けで追加（宣言されたMIMEタイプ付き）
    Pasted { mime_type: String, bytes: Vec<u8> },
}

impl ImageSource {
    /// 表示用ラベル
    pub fn label(&self) -> String {
        match self {
            ImageSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            ImageSource::Pasted { mime_type, bytes } => {
                format!("clipboard ({}, {} bytes)", mime_type, bytes.len())
            }
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// フォルダ直下の画像をファイル名順で収集
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(AdvisorError::FileNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

/// ファイル/フォルダ指定から保留画像のリストを作る
///
/// 指定順を保つ。フォルダは直下の画像に展開する。
pub fn collect_images(paths: &[PathBuf]) -> Result<Vec<ImageSource>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_dir() {
            sources.extend(scan_folder(path)?.into_iter().map(ImageSource::File));
        } else if path.is_file() {
            sources.push(ImageSource::File(path.clone()));
        } else {
            return Err(AdvisorError::FileNotFound(path.display().to_string()));
        }
    }

    Ok(sources)
}
