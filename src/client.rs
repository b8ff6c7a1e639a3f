//! reqwestによるバックエンドクライアント

use crate::upload::LocalImage;
use meme_gen_common::api::{
    generation_error, parse_generate_response, DESCRIPTION_FIELD, IMAGE_FIELD,
};
use meme_gen_common::{Endpoint, Error, GenerateResponse, GenerationBackend, Result};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// ヘルスチェック1回あたりの上限
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Endpoint,
    health_timeout: Duration,
}

impl HttpBackend {
    pub fn new(endpoint: Endpoint) -> crate::error::Result<Self> {
        Self::with_timeout(endpoint, None)
    }

    /// タイムアウト付きで作成（`None` ならトランスポート任せ）
    pub fn with_timeout(endpoint: Endpoint, timeout: Option<Duration>) -> crate::error::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
            health_timeout: HEALTH_TIMEOUT,
        })
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// `GET /api/health`。2xx以外・通信失敗・タイムアウトはすべてオフライン
    pub async fn ping_health(&self) -> bool {
        let request = self
            .client
            .get(self.endpoint.health_url())
            .timeout(self.health_timeout);
        match request.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::warn!("health check returned {}", response.status());
                false
            }
            Err(e) => {
                log::warn!("health check failed: {}", e);
                false
            }
        }
    }
}

impl GenerationBackend for HttpBackend {
    type File = LocalImage;

    async fn check_health(&self) -> bool {
        self.ping_health().await
    }

    async fn generate(&self, file: &LocalImage, description: &str) -> Result<GenerateResponse> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| Error::Generation(e.to_string()))?;

        let form = Form::new()
            .part(IMAGE_FIELD, part)
            .text(DESCRIPTION_FIELD, description.to_string());

        let response = self
            .client
            .post(self.endpoint.generate_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(generation_error(status.as_u16(), &body));
        }

        parse_generate_response(&body)
    }
}
