//! 画像アップローダーの状態

use serde::{Deserialize, Serialize};
use crate::validator::FileMeta;

/// 選択中の画像
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage<F> {
    pub file: F,
    /// プレビュー用のData URL
    pub preview: String,
    pub name: String,
}

impl<F> SelectedImage<F> {
    pub fn new(file: F, preview: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file,
            preview: preview.into(),
            name: name.into(),
        }
    }
}

/// ドロップゾーンのドラッグ状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropZone {
    drag_over: bool,
}

impl DropZone {
    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn drag_enter(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// ドロップ時：ドラッグ状態を解除し、受け付けるファイルの添字を返す
    pub fn drop_files<'a, I>(&mut self, files: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a FileMeta>,
    {
        self.drag_over = false;
        pick_first_image(files)
    }
}

/// 先頭ファイルが画像ならその添字（0）を返す
///
/// 複数ドロップされても見るのは先頭だけ。
pub fn pick_first_image<'a, I>(files: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a FileMeta>,
{
    files
        .into_iter()
        .next()
        .filter(|f| f.is_image())
        .map(|_| 0)
}

/// ファイルサイズをMB表記にする ("2.00 MB")
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}
