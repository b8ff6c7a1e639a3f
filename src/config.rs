use crate::error::{MemeGenError, Result};
use meme_gen_common::{DecodePolicy, Endpoint, DEFAULT_API_BASE_URL};
use meme_gen_common::health::HEALTH_POLL_INTERVAL_SECS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ベースURLを上書きする環境変数
pub const API_URL_ENV: &str = "MEME_GEN_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub poll_interval_secs: u64,
    pub output_dir: Option<PathBuf>,
    /// 生成リクエストのタイムアウト（未設定なら無制限）
    pub timeout_seconds: Option<u64>,
    /// 壊れた画像が1枚でもあれば失敗扱いにする
    pub strict_decode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            poll_interval_secs: HEALTH_POLL_INTERVAL_SECS,
            output_dir: None,
            timeout_seconds: None,
            strict_decode: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MemeGenError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("meme-gen").join("config.json"))
    }

    /// ベースURLを決定（引数 > 環境変数 > 設定ファイル > デフォルト）
    pub fn resolve_base_url(&self, cli_override: Option<&str>, env_value: Option<&str>) -> String {
        [cli_override, env_value, self.api_base_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string()
    }

    pub fn endpoint(&self, cli_override: Option<&str>) -> Result<Endpoint> {
        let env_value = std::env::var(API_URL_ENV).ok();
        let base_url = self.resolve_base_url(cli_override, env_value.as_deref());
        Endpoint::new(base_url).map_err(|e| MemeGenError::Config(e.to_string()))
    }

    pub fn decode_policy(&self, strict_flag: bool) -> DecodePolicy {
        if strict_flag || self.strict_decode {
            DecodePolicy::FailBatch
        } else {
            DecodePolicy::SkipCorrupt
        }
    }

    pub fn set_api_base_url(&mut self, url: String) -> Result<()> {
        Endpoint::new(url.as_str()).map_err(|e| MemeGenError::Config(e.to_string()))?;
        self.api_base_url = Some(url);
        self.save()
    }
}
