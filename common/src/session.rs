//! 生成ワークフロー（アプリ全体の状態）
//!
//! 状態遷移:
//! ```text
//! Idle ─begin_generate─▶ (検証) ─▶ Generating ─finish_generate─▶ Succeeded / Failed
//!   ▲                                                               │
//!   └──────────── 画像・説明文の変更で再び Idle ◀─────────────────────┘
//! ```
//!
//! 生成中のリクエストは `Phase::Generating { ticket }` の1枠だけ。
//! 2回目の `begin_generate` は拒否され、枠と一致しないチケットの完了は無視する。

use thiserror::Error;
use crate::api::{GenerateResponse, GenerationBackend, UploadSource};
use crate::codec::{self, DecodePolicy, HandleStore};
use crate::error::{Error, Result, ValidationError};
use crate::gallery::{generated_id, GeneratedImage};
use crate::health::ServerStatus;
use crate::input::truncate_description;
use crate::uploader::SelectedImage;
use crate::validator;

/// ワークフローの状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Generating { ticket: u64 },
    Succeeded,
    Failed,
}

/// 生成開始を拒否した理由
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("現在生成中です。完了するまでお待ちください。")]
    InFlight,

    #[error("画像をアップロードし、変更内容を入力してください。")]
    MissingInput,

    #[error("サーバーがオフラインです。しばらくしてから再度お試しください。")]
    ServerOffline,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// 実行中の生成リクエスト
#[derive(Debug, Clone)]
pub struct GenerationTicket<F> {
    pub id: u64,
    pub file: F,
    pub description: String,
}

/// `finish_generate` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// 現在の枠ではないチケット（無視した）
    Stale,
    Succeeded { installed: usize, skipped: usize },
    Failed,
}

/// アプリケーションの状態
#[derive(Debug)]
pub struct Session<F, H> {
    selected: Option<SelectedImage<F>>,
    description: String,
    results: Vec<GeneratedImage<H>>,
    phase: Phase,
    error: Option<String>,
    server: ServerStatus,
    decode_policy: DecodePolicy,
    next_ticket: u64,
}

impl<F, H> Default for Session<F, H> {
    fn default() -> Self {
        Self {
            selected: None,
            description: String::new(),
            results: Vec::new(),
            phase: Phase::Idle,
            error: None,
            server: ServerStatus::Unknown,
            decode_policy: DecodePolicy::default(),
            next_ticket: 0,
        }
    }
}

impl<F, H> Session<F, H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating { .. })
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn results(&self) -> &[GeneratedImage<H>] {
        &self.results
    }

    pub fn selected(&self) -> Option<&SelectedImage<F>> {
        self.selected.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn server_status(&self) -> ServerStatus {
        self.server
    }

    /// ヘルスチェック結果を反映。状態が変わったら `true`
    pub fn record_health(&mut self, healthy: bool) -> bool {
        let status = ServerStatus::from_check(healthy);
        let changed = status != self.server;
        self.server = status;
        changed
    }

    /// 画像の選択・解除
    pub fn select_image(&mut self, image: Option<SelectedImage<F>>) {
        self.selected = image;
        self.rearm();
    }

    /// 説明文の変更（200文字で切り詰め）
    pub fn set_description(&mut self, text: &str) {
        self.description = truncate_description(text);
        self.rearm();
    }

    /// 生成ボタンを有効にできるか
    pub fn can_generate(&self) -> bool {
        self.selected.is_some()
            && !self.description.trim().is_empty()
            && self.server.is_online()
            && !self.is_generating()
    }

    // 入力が変わったらエラーを消して待機状態に戻す
    fn rearm(&mut self) {
        self.error = None;
        if matches!(self.phase, Phase::Succeeded | Phase::Failed) {
            self.phase = Phase::Idle;
        }
    }

    fn reject(&mut self, rejection: Rejection) -> Rejection {
        self.error = Some(rejection.to_string());
        rejection
    }

    /// 結果をすべて解放してクリア（生成中は不可）
    pub fn clear_results<S>(&mut self, store: &mut S) -> std::result::Result<(), Rejection>
    where
        S: HandleStore<Handle = H>,
    {
        if self.is_generating() {
            return Err(Rejection::InFlight);
        }
        self.release_results(store);
        self.error = None;
        Ok(())
    }

    /// 終了処理：保持しているハンドルをすべて解放する
    ///
    /// 生成中のチケットも無効にするので、後から届いた結果は取り込まれない。
    pub fn teardown<S>(&mut self, store: &mut S)
    where
        S: HandleStore<Handle = H>,
    {
        self.release_results(store);
        self.phase = Phase::Idle;
    }

    fn release_results<S>(&mut self, store: &mut S)
    where
        S: HandleStore<Handle = H>,
    {
        let previous = std::mem::take(&mut self.results);
        codec::release_handles(store, previous.iter().map(|img| &img.handle));
    }

    fn fail(&mut self, error: Error) -> Finish {
        log::warn!("generation failed: {}", error);
        self.phase = Phase::Failed;
        self.error = Some(error.user_message());
        Finish::Failed
    }

    /// 生成結果を取り込む
    ///
    /// 成功時は新しい画像をすべてデコードしてから、前回の結果を解放して差し替える。
    /// 失敗時は前回の結果をそのまま残す。
    pub fn finish_generate<S>(
        &mut self,
        ticket: u64,
        outcome: Result<GenerateResponse>,
        store: &mut S,
        now_ms: u64,
    ) -> Finish
    where
        S: HandleStore<Handle = H>,
    {
        if self.phase != (Phase::Generating { ticket }) {
            log::debug!("ignoring result of stale ticket {}", ticket);
            return Finish::Stale;
        }

        let response = match outcome {
            Ok(response) => response,
            Err(e) => return self.fail(e),
        };

        let mut fresh = Vec::with_capacity(response.images.len());
        let mut skipped = 0;
        for (index, payload) in response.images.iter().enumerate() {
            match codec::try_encoded_image_to_handle(store, payload) {
                Ok(handle) => fresh.push(GeneratedImage {
                    handle,
                    id: generated_id(now_ms, index),
                }),
                Err(e) => match self.decode_policy {
                    DecodePolicy::SkipCorrupt => {
                        log::warn!("skipping generated image {}: {}", index + 1, e);
                        skipped += 1;
                    }
                    DecodePolicy::FailBatch => {
                        codec::release_handles(store, fresh.iter().map(|img| &img.handle));
                        return self.fail(Error::Decode(format!("image {}: {}", index + 1, e)));
                    }
                },
            }
        }

        self.release_results(store);
        let installed = fresh.len();
        self.results = fresh;
        self.phase = Phase::Succeeded;
        self.error = None;
        log::info!("installed {} generated images ({} skipped)", installed, skipped);

        Finish::Succeeded { installed, skipped }
    }
}

impl<F: UploadSource, H> Session<F, H> {
    /// 生成開始
    ///
    /// 前提条件（生成中でない・画像と説明文がある・サーバーがオンライン）を満たさなければ
    /// メッセージを設定して拒否する。その後ファイルを検証し、失敗なら Failed。
    pub fn begin_generate(&mut self) -> std::result::Result<GenerationTicket<F>, Rejection> {
        if self.is_generating() {
            return Err(self.reject(Rejection::InFlight));
        }

        let description = self.description.trim().to_string();
        let file = match self.selected.as_ref() {
            Some(image) if !description.is_empty() => Some(image.file.clone()),
            _ => None,
        };
        let Some(file) = file else {
            return Err(self.reject(Rejection::MissingInput));
        };

        if !self.server.is_online() {
            return Err(self.reject(Rejection::ServerOffline));
        }

        if let Err(e) = validator::validate(&file.meta()) {
            self.phase = Phase::Failed;
            return Err(self.reject(Rejection::Invalid(e)));
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.phase = Phase::Generating { ticket };
        self.error = None;

        Ok(GenerationTicket {
            id: ticket,
            file,
            description,
        })
    }

    /// 開始から結果の取り込みまでを一度に実行
    ///
    /// `&mut self` を保持したまま待機するため、この経路では同時生成が起こりえない。
    pub async fn generate<B, S>(
        &mut self,
        backend: &B,
        store: &mut S,
        now_ms: u64,
    ) -> std::result::Result<Finish, Rejection>
    where
        B: GenerationBackend<File = F>,
        S: HandleStore<Handle = H>,
    {
        let ticket = self.begin_generate()?;
        log::debug!("sending generation request {}", ticket.id);
        let outcome = backend.generate(&ticket.file, &ticket.description).await;
        Ok(self.finish_generate(ticket.id, outcome, store, now_ms))
    }
}
