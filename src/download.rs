//! 生成結果の保存（一括ダウンロード）

use crate::error::{MemeGenError, Result};
use meme_gen_common::gallery::download_file_name;
use meme_gen_common::{GeneratedImage, MemoryHandleStore};
use std::path::{Path, PathBuf};

/// 結果を `meme-{n}.png` として保存し、保存先パスを返す
pub fn save_all(
    store: &MemoryHandleStore,
    results: &[GeneratedImage<String>],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut saved = Vec::with_capacity(results.len());
    for (index, result) in results.iter().enumerate() {
        let bytes = store.bytes(&result.handle).ok_or_else(|| {
            MemeGenError::Config(format!("解放済みのハンドルです: {}", result.handle))
        })?;

        let path = output_dir.join(download_file_name(index));
        std::fs::write(&path, bytes)?;
        log::debug!("saved {} ({} bytes)", path.display(), bytes.len());
        saved.push(path);
    }

    Ok(saved)
}
