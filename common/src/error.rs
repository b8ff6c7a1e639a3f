//! エラー型定義

use thiserror::Error;

/// 生成失敗時の汎用メッセージ（サーバーがエラー内容を返さない場合）
pub const GENERIC_GENERATION_ERROR: &str = "画像の生成に失敗しました。もう一度お試しください。";

/// 通信失敗時のメッセージ
pub const GENERIC_NETWORK_ERROR: &str = "サーバーに接続できませんでした。しばらくしてから再度お試しください。";

/// アップロードファイルの検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("対応していない画像形式です（{mime_type}）。JPG、PNG、WebPを使用してください。")]
    UnsupportedFormat { mime_type: String },

    #[error("画像が大きすぎます（{size} bytes）。最大サイズは5MBです。")]
    TooLarge { size: u64, max: u64 },
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// バナーに表示する利用者向けメッセージ
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(e) => e.to_string(),
            Error::Generation(msg) if !msg.trim().is_empty() => msg.clone(),
            Error::Network(_) => GENERIC_NETWORK_ERROR.to_string(),
            _ => GENERIC_GENERATION_ERROR.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
