//! 画像エンコード
//!
//! 保留画像を `EncodedImage`（Base64 + MIMEタイプ）に変換する。
//! 複数画像は並行して読み込み、全件成功した場合のみ結果を返す。

use crate::error::Result;
use crate::scanner::ImageSource;
use autorestaurant_common::EncodedImage;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::future::try_join_all;
use image::ImageFormat;
use std::path::Path;

/// 宣言も判定もできなかった場合のMIMEタイプ
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// 拡張子から宣言MIMEタイプを決める
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    ImageFormat::from_path(path).ok().map(|f| f.to_mime_type())
}

/// バイト列をエンコード
///
/// MIMEタイプは 宣言値 → 内容からの判定 → フォールバック の順で決める。
pub fn encode_bytes(bytes: &[u8], declared: Option<&str>) -> EncodedImage {
    let mime_type = declared
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .or_else(|| image::guess_format(bytes).ok().map(|f| f.to_mime_type().to_string()))
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

    EncodedImage::new(mime_type, BASE64.encode(bytes))
}

/// 保留画像1件をエンコード
pub async fn encode_image(source: &ImageSource) -> Result<EncodedImage> {
    let encoded = match source {
        ImageSource::File(path) => {
            let bytes = tokio::fs::read(path).await?;
            encode_bytes(&bytes, mime_type_for_path(path))
        }
        ImageSource::Pasted { mime_type, bytes } => encode_bytes(bytes, Some(mime_type)),
    };

    tracing::debug!(
        source = %source.label(),
        mime_type = encoded.mime_type(),
        base64_len = encoded.data().len(),
        "画像をエンコード"
    );

    Ok(encoded)
}

/// 全画像をエンコード（1件でも失敗したら全体を失敗にする）
pub async fn encode_all(sources: &[ImageSource]) -> Result<Vec<EncodedImage>> {
    try_join_all(sources.iter().map(encode_image)).await
}
