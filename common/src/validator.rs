//! アップロード画像の検証
//!
//! 送信前にMIMEタイプとサイズを確認する。ネットワークには触れない。

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;

/// 受け付けるMIMEタイプ
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// 最大アップロードサイズ（5MiB）
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// 検証に必要なファイル情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// `image/*` かどうか（アップローダーの受付判定）
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// ファイルを検証
///
/// 形式チェックを先に行い、その後サイズをチェックする。
/// 5MiBちょうどは許可。
pub fn validate(file: &FileMeta) -> Result<(), ValidationError> {
    if !ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(ValidationError::UnsupportedFormat {
            mime_type: file.mime_type.clone(),
        });
    }

    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size: file.size,
            max: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

/// 拡張子からMIMEタイプを推定（ネイティブ用）
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_supported_formats() {
        for mime in ACCEPTED_MIME_TYPES {
            let file = FileMeta::new("photo", *mime, 1024);
            assert!(validate(&file).is_ok(), "{} should be accepted", mime);
        }
    }

    #[test]
    fn test_rejects_unsupported_format() {
        let file = FileMeta::new("anim.gif", "image/gif", 1024);
        assert_eq!(
            validate(&file),
            Err(ValidationError::UnsupportedFormat { mime_type: "image/gif".into() })
        );
    }

    #[test]
    fn test_rejects_too_large() {
        // 6MBのPNG
        let file = FileMeta::new("big.png", "image/png", 6 * 1024 * 1024);
        assert!(matches!(validate(&file), Err(ValidationError::TooLarge { .. })));
    }

    #[test]
    fn test_limit_is_inclusive() {
        let file = FileMeta::new("edge.jpg", "image/jpeg", MAX_UPLOAD_BYTES);
        assert!(validate(&file).is_ok());

        let file = FileMeta::new("edge.jpg", "image/jpeg", MAX_UPLOAD_BYTES + 1);
        assert!(validate(&file).is_err());
    }

    #[test]
    fn test_format_checked_before_size() {
        let file = FileMeta::new("huge.bmp", "image/bmp", 50 * 1024 * 1024);
        assert!(matches!(
            validate(&file),
            Err(ValidationError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension("cat.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_extension("cat.jpeg"), Some("image/jpeg"));
        assert_eq!(mime_from_extension("dir.v2/cat.png"), Some("image/png"));
        assert_eq!(mime_from_extension("cat.webp"), Some("image/webp"));
        assert_eq!(mime_from_extension("cat.gif"), None);
        assert_eq!(mime_from_extension("README"), None);
    }

    #[test]
    fn test_is_image() {
        assert!(FileMeta::new("a.gif", "image/gif", 1).is_image());
        assert!(!FileMeta::new("a.txt", "text/plain", 1).is_image());
    }
}
