//! サーバー状態

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// ヘルスチェック間隔（秒）
pub const HEALTH_POLL_INTERVAL_SECS: u64 = 30;

/// ヘルスチェック間隔
pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(HEALTH_POLL_INTERVAL_SECS);

/// サーバーの稼働状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// まだ確認していない
    #[default]
    Unknown,
    Online,
    Offline,
}

impl ServerStatus {
    pub fn from_check(healthy: bool) -> Self {
        if healthy {
            ServerStatus::Online
        } else {
            ServerStatus::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ServerStatus::Online)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Unknown => "unknown",
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
        }
    }
}
