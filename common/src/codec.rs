//! Base64画像 → 表示ハンドル変換
//!
//! サーバーが返すBase64文字列をデコードし、`HandleStore` に登録して
//! 画像ソースとしてそのまま使えるハンドルを得る。
//! ブラウザではObject URL、ネイティブではメモリ上の `blob:` IDになる。

use std::collections::HashMap;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// 表示ハンドルのプレフィックス（これ以外は解放対象外）
pub const HANDLE_SCHEME: &str = "blob:";

/// 表示ハンドルの生成・解放を行うストア
pub trait HandleStore {
    type Handle: Clone + PartialEq + std::fmt::Debug;

    /// バイト列を登録してハンドルを返す
    fn create(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<Self::Handle>;

    /// ハンドルを解放する。未知・解放済みのハンドルは何もしない
    fn release(&mut self, handle: &Self::Handle);
}

/// 壊れたペイロードの扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodePolicy {
    /// 壊れた画像だけを落とし、残りを表示する
    #[default]
    SkipCorrupt,
    /// 1枚でも壊れていたらバッチ全体を失敗にする
    FailBatch,
}

/// `data:image/xxx;base64,` プレフィックスを取り除く
pub fn strip_data_uri_prefix(payload: &str) -> &str {
    if let Some(rest) = payload.strip_prefix("data:image/") {
        if let Some((subtype, data)) = rest.split_once(";base64,") {
            if !subtype.is_empty() && subtype.bytes().all(|b| b.is_ascii_lowercase()) {
                return data;
            }
        }
    }
    payload
}

/// 末尾の `=` があってもなくても受け付ける標準アルファベットのエンジン
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Base64ペイロードをバイト列にデコード
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let data: String = strip_data_uri_prefix(payload.trim())
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if data.is_empty() {
        return Err(Error::Decode("empty payload".into()));
    }

    LENIENT_BASE64
        .decode(data.as_bytes())
        .map_err(|e| Error::Decode(e.to_string()))
}

/// マジックバイトからMIMEタイプを判定（不明な場合はPNG扱い）
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}

/// ペイロードをデコードしてハンドルを作成（失敗時はエラー）
pub fn try_encoded_image_to_handle<S: HandleStore>(store: &mut S, payload: &str) -> Result<S::Handle> {
    let bytes = decode_payload(payload)?;
    let mime_type = sniff_mime(&bytes);
    store.create(bytes, mime_type)
}

/// ペイロードをデコードしてハンドルを作成
///
/// 失敗時は警告ログを出して `None` を返す。
pub fn encoded_image_to_handle<S: HandleStore>(store: &mut S, payload: &str) -> Option<S::Handle> {
    match try_encoded_image_to_handle(store, payload) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("failed to convert generated image: {}", e);
            None
        }
    }
}

/// ハンドルをまとめて解放
pub fn release_handles<'a, S, I>(store: &mut S, handles: I)
where
    S: HandleStore,
    S::Handle: 'a,
    I: IntoIterator<Item = &'a S::Handle>,
{
    for handle in handles {
        store.release(handle);
    }
}

#[derive(Debug, Clone)]
struct StoredImage {
    bytes: Vec<u8>,
    mime_type: String,
}

/// メモリ上のハンドルストア（CLI・テスト用）
#[derive(Debug, Default)]
pub struct MemoryHandleStore {
    images: HashMap<String, StoredImage>,
    next_id: u64,
    created: u64,
    released: u64,
}

impl MemoryHandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在有効なハンドル数
    pub fn active_count(&self) -> usize {
        self.images.len()
    }

    /// これまでに作成したハンドル数
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// これまでに解放したハンドル数
    pub fn released_count(&self) -> u64 {
        self.released
    }

    pub fn is_live(&self, handle: &str) -> bool {
        self.images.contains_key(handle)
    }

    pub fn bytes(&self, handle: &str) -> Option<&[u8]> {
        self.images.get(handle).map(|img| img.bytes.as_slice())
    }

    pub fn mime_type(&self, handle: &str) -> Option<&str> {
        self.images.get(handle).map(|img| img.mime_type.as_str())
    }
}

impl HandleStore for MemoryHandleStore {
    type Handle = String;

    fn create(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<String> {
        self.next_id += 1;
        let handle = format!("{}meme-gen/{}", HANDLE_SCHEME, self.next_id);
        self.images.insert(
            handle.clone(),
            StoredImage {
                bytes,
                mime_type: mime_type.to_string(),
            },
        );
        self.created += 1;
        Ok(handle)
    }

    fn release(&mut self, handle: &String) {
        if !handle.starts_with(HANDLE_SCHEME) {
            return;
        }
        if self.images.remove(handle).is_some() {
            self.released += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 PNG
    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

    #[test]
    fn test_strip_data_uri_prefix() {
        assert_eq!(strip_data_uri_prefix("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri_prefix("data:image/webp;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri_prefix("QUJD"), "QUJD");
        // サブタイプが小文字英字以外なら対象外
        assert_eq!(
            strip_data_uri_prefix("data:image/svg+xml;base64,QUJD"),
            "data:image/svg+xml;base64,QUJD"
        );
    }

    #[test]
    fn test_decode_payload() {
        assert_eq!(decode_payload("QUJD").unwrap(), b"ABC");
        assert_eq!(decode_payload("data:image/png;base64,QUJD").unwrap(), b"ABC");
        assert_eq!(decode_payload("QU\nJD ").unwrap(), b"ABC");
    }

    #[test]
    fn test_decode_payload_without_padding() {
        assert_eq!(decode_payload("QUI").unwrap(), b"AB");
        assert_eq!(decode_payload("QUI=").unwrap(), b"AB");
        assert_eq!(decode_payload("QQ").unwrap(), b"A");

        let padded = decode_payload(PNG_B64).unwrap();
        let unpadded = decode_payload(PNG_B64.trim_end_matches('=')).unwrap();
        assert_eq!(padded, unpadded);

        // 長さが不正なものは引き続きエラー
        assert!(matches!(decode_payload("QUJDR"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_payload_errors() {
        assert!(matches!(decode_payload("!!!not base64"), Err(Error::Decode(_))));
        assert!(matches!(decode_payload(""), Err(Error::Decode(_))));
        assert!(matches!(decode_payload("data:image/png;base64,"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_sniff_mime() {
        let png = decode_payload(PNG_B64).unwrap();
        assert_eq!(sniff_mime(&png), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"??"), "image/png");
    }

    #[test]
    fn test_encoded_image_to_handle() {
        let mut store = MemoryHandleStore::new();
        let handle = encoded_image_to_handle(&mut store, PNG_B64).unwrap();

        assert!(handle.starts_with("blob:"));
        assert!(store.is_live(&handle));
        assert_eq!(store.mime_type(&handle), Some("image/png"));
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_encoded_image_to_handle_corrupt_returns_none() {
        let mut store = MemoryHandleStore::new();
        assert!(encoded_image_to_handle(&mut store, "%%%").is_none());
        assert_eq!(store.active_count(), 0);
        assert_eq!(store.created_count(), 0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut store = MemoryHandleStore::new();
        let handle = encoded_image_to_handle(&mut store, PNG_B64).unwrap();

        release_handles(&mut store, [&handle]);
        release_handles(&mut store, [&handle]);

        assert_eq!(store.active_count(), 0);
        assert_eq!(store.released_count(), 1);
    }

    #[test]
    fn test_release_ignores_foreign_handles() {
        let mut store = MemoryHandleStore::new();
        let handle = encoded_image_to_handle(&mut store, PNG_B64).unwrap();

        let foreign = vec!["https://example.com/a.png".to_string(), "blob:unknown/9".to_string()];
        release_handles(&mut store, &foreign);

        assert!(store.is_live(&handle));
        assert_eq!(store.released_count(), 0);
    }
}
