//! CLIの生成ステップ
//!
//! セッションのワークフローを1回実行し、拒否・失敗を `MemeGenError` に変換する。

use crate::error::{MemeGenError, Result};
use crate::upload::LocalImage;
use meme_gen_common::error::GENERIC_GENERATION_ERROR;
use meme_gen_common::{Finish, GenerationBackend, HandleStore, Session};

/// 生成して結果をセッションに取り込む。戻り値は (取り込んだ枚数, 破損で除外した枚数)
pub async fn run<B, S>(
    session: &mut Session<LocalImage, String>,
    backend: &B,
    store: &mut S,
    now_ms: u64,
) -> Result<(usize, usize)>
where
    B: GenerationBackend<File = LocalImage>,
    S: HandleStore<Handle = String>,
{
    match session.generate(backend, store, now_ms).await? {
        Finish::Succeeded { installed, skipped } => Ok((installed, skipped)),
        Finish::Failed | Finish::Stale => Err(MemeGenError::Generation(
            session.error().unwrap_or(GENERIC_GENERATION_ERROR).to_string(),
        )),
    }
}
