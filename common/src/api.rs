//! バックエンドAPIの契約
//!
//! - `GET  /api/health`   : 2xxならオンライン
//! - `POST /api/generate` : multipart (`image`, `description`) → `{ images: [base64; 4] }`
//!
//! 実際のHTTP呼び出しはプラットフォームごと（WASM: fetch、CLI: reqwest）に
//! `GenerationBackend` を実装する。

use serde::{Deserialize, Serialize};
use crate::error::{Error, Result, GENERIC_GENERATION_ERROR};
use crate::validator::FileMeta;

/// 開発環境のデフォルトバックエンド
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

pub const HEALTH_PATH: &str = "/api/health";
pub const GENERATE_PATH: &str = "/api/generate";

/// multipartのフィールド名
pub const IMAGE_FIELD: &str = "image";
pub const DESCRIPTION_FIELD: &str = "description";

/// バックエンドのベースURL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("ベースURLが空です".into()));
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }

    pub fn generate_url(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_PATH)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// 生成APIのレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// エラーレスポンス `{ "error": "..." }`
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// 非2xxレスポンスを `Error::Generation` に変換
///
/// ボディの `error` が空でなければそれを使い、なければ汎用メッセージ。
pub fn generation_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty());

    match message {
        Some(message) => Error::Generation(message),
        None => {
            log::warn!("generate failed with status {} and no error message", status);
            Error::Generation(GENERIC_GENERATION_ERROR.to_string())
        }
    }
}

/// 2xxレスポンスのボディをパース
pub fn parse_generate_response(body: &str) -> Result<GenerateResponse> {
    serde_json::from_str(body).map_err(|e| {
        log::warn!("unexpected generate response: {}", e);
        Error::Generation(GENERIC_GENERATION_ERROR.to_string())
    })
}

/// アップロード対象ファイル
pub trait UploadSource: Clone {
    fn meta(&self) -> FileMeta;
}

/// 画像生成バックエンド
#[allow(async_fn_in_trait)]
pub trait GenerationBackend {
    type File: UploadSource;

    /// ヘルスチェック。失敗時もエラーにせず `false` を返す
    async fn check_health(&self) -> bool;

    /// 画像とテキストを送信して生成結果を受け取る
    async fn generate(&self, file: &Self::File, description: &str) -> Result<GenerateResponse>;
}

/// リサイズ設定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG品質 (0.0〜1.0)
    pub quality: f32,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            quality: 0.8,
        }
    }
}

impl ResizeOptions {
    /// JPEGエンコーダ用の品質 (1〜100)
    pub fn jpeg_quality(&self) -> u8 {
        let q = (self.quality.clamp(0.0, 1.0) * 100.0).round() as u8;
        q.max(1)
    }
}

/// アスペクト比を保ったまま上限内に収まるサイズを計算
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }

    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let new_width = ((width as f64 * ratio).floor() as u32).max(1);
    let new_height = ((height as f64 * ratio).floor() as u32).max(1);
    (new_width, new_height)
}
