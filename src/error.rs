use thiserror::Error;
use meme_gen_common::Rejection;

#[derive(Error, Debug)]
pub enum MemeGenError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像の縮小に失敗: {0}")]
    Resize(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("生成を開始できません: {0}")]
    Rejected(#[from] Rejection),

    /// 生成失敗（バナーと同じ利用者向けメッセージ）
    #[error("{0}")]
    Generation(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MemeGenError>;
