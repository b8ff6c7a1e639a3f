//! 生成結果ギャラリー

/// 生成された画像
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage<H> {
    pub handle: H,
    /// 一覧表示用のキー（セッション内でのみ一意）
    pub id: String,
}

/// 結果IDを生成 ("generated-{millis}-{index}")
pub fn generated_id(timestamp_ms: u64, index: usize) -> String {
    format!("generated-{}-{}", timestamp_ms, index)
}

/// ダウンロード時のファイル名
pub fn download_file_name(index: usize) -> String {
    format!("meme-{}.png", index + 1)
}

/// 一括ダウンロード時の1枚ごとの間隔（ミリ秒）
pub const BULK_DOWNLOAD_STAGGER_MS: u32 = 500;

/// 一括ダウンロードで `index` 枚目を開始するまでの待ち時間
pub fn bulk_download_delay_ms(index: usize) -> u32 {
    (index as u32).saturating_mul(BULK_DOWNLOAD_STAGGER_MS)
}

/// `index` 枚目がまだ `handle` のままか（予約済みの一括ダウンロードの実行前に確認する）
pub fn is_listed<H: PartialEq>(images: &[GeneratedImage<H>], index: usize, handle: &H) -> bool {
    images.get(index).is_some_and(|image| &image.handle == handle)
}

/// ギャラリーの操作状態（拡大表示・ダウンロード中フラグ）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryState {
    preview: Option<usize>,
    downloading: Option<usize>,
}

impl GalleryState {
    pub fn open_preview(&mut self, index: usize) {
        self.preview = Some(index);
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    pub fn preview(&self) -> Option<usize> {
        self.preview
    }

    /// ダウンロード開始。同じ画像をダウンロード中なら `false`
    pub fn start_download(&mut self, index: usize) -> bool {
        if self.downloading == Some(index) {
            return false;
        }
        self.downloading = Some(index);
        true
    }

    pub fn finish_download(&mut self) {
        self.downloading = None;
    }

    pub fn is_downloading(&self, index: usize) -> bool {
        self.downloading == Some(index)
    }

    /// 結果が入れ替わったときに状態をリセット
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
