use super::ImageSource;

/// 貼り付けイベントの1項目
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ClipboardItem {
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    fn is_image(&self) -> bool {
        self.mime_type.starts_with("image")
    }
}

/// 画像タイプの項目だけを保留画像にする（それ以外は黙って捨てる）
pub fn images_from_clipboard(items: impl IntoIterator<Item = ClipboardItem>) -> Vec<ImageSource> {
    items
        .into_iter()
        .filter(ClipboardItem::is_image)
        .map(|item| ImageSource::Pasted {
            mime_type: item.mime_type,
            bytes: item.bytes,
        })
        .collect()
}
