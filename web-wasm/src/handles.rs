//! Object URLによるハンドルストア

use std::collections::HashSet;
use meme_gen_common::codec::HANDLE_SCHEME;
use meme_gen_common::{Error, HandleStore, Result};
use web_sys::{Blob, BlobPropertyBag, Url};

/// `URL.createObjectURL` で作ったURLを追跡し、解放時に `revokeObjectURL` する
#[derive(Debug, Default)]
pub struct ObjectUrlStore {
    live: HashSet<String>,
}

impl ObjectUrlStore {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl HandleStore for ObjectUrlStore {
    type Handle = String;

    fn create(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<String> {
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes.as_slice()));

        let options = BlobPropertyBag::new();
        options.set_type(mime_type);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| Error::Decode(format!("{:?}", e)))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|e| Error::Decode(format!("{:?}", e)))?;

        self.live.insert(url.clone());
        Ok(url)
    }

    fn release(&mut self, handle: &String) {
        if !handle.starts_with(HANDLE_SCHEME) || !self.live.remove(handle) {
            return;
        }
        if let Err(e) = Url::revoke_object_url(handle) {
            log::warn!("failed to revoke {}: {:?}", handle, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_create_and_release() {
        let mut store = ObjectUrlStore::default();
        let url = store.create(vec![0x89, b'P', b'N', b'G'], "image/png").unwrap();
        assert!(url.starts_with("blob:"));
        assert_eq!(store.live_count(), 1);

        store.release(&url);
        assert_eq!(store.live_count(), 0);

        // 二重解放は無視
        store.release(&url);
        assert_eq!(store.live_count(), 0);
    }

    #[wasm_bindgen_test]
    fn test_release_ignores_foreign_urls() {
        let mut store = ObjectUrlStore::default();
        let url = store.create(vec![1, 2, 3], "image/png").unwrap();

        store.release(&"https://example.com/a.png".to_string());
        store.release(&"blob:unknown".to_string());
        assert_eq!(store.live_count(), 1);

        store.release(&url);
        assert_eq!(store.live_count(), 0);
    }
}
