//! アップロード対象のローカル画像

use crate::error::{MemeGenError, Result};
use meme_gen_common::validator::{mime_from_extension, MAX_UPLOAD_BYTES};
use meme_gen_common::{FileMeta, Rejection, SelectedImage, UploadSource, ValidationError};
use std::path::{Path, PathBuf};

/// 拡張子から判定できない場合のMIMEタイプ（検証で弾かれる）
const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct LocalImage {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl LocalImage {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(MemeGenError::FileNotFound(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = mime_from_extension(&file_name).unwrap_or(UNKNOWN_MIME).to_string();

        // 上限を超えるファイルは読み込まない
        let size = std::fs::metadata(path)?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(MemeGenError::Rejected(Rejection::Invalid(ValidationError::TooLarge {
                size,
                max: MAX_UPLOAD_BYTES,
            })));
        }
        let bytes = std::fs::read(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            bytes,
        })
    }

    /// セッションに渡す選択画像（プレビューはファイルパス）
    pub fn into_selected(self) -> SelectedImage<LocalImage> {
        let preview = self.path.display().to_string();
        let name = self.file_name.clone();
        SelectedImage::new(self, preview, name)
    }
}

impl UploadSource for LocalImage {
    fn meta(&self) -> FileMeta {
        FileMeta::new(&self.file_name, &self.mime_type, self.bytes.len() as u64)
    }
}
