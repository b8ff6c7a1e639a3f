//! fetchによるバックエンドクライアント
//!
//! `GET /api/health` と `POST /api/generate`（multipart: image, description）

use meme_gen_common::api::{
    generation_error, parse_generate_response, DESCRIPTION_FIELD, IMAGE_FIELD,
};
use meme_gen_common::{
    Endpoint, Error, FileMeta, GenerateResponse, GenerationBackend, Result, UploadSource,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

/// ビルド時に `MEME_GEN_API_URL` が指定されていればそれを使う
pub fn endpoint() -> Endpoint {
    match option_env!("MEME_GEN_API_URL") {
        Some(url) => Endpoint::new(url).unwrap_or_else(|e| {
            log::warn!("invalid MEME_GEN_API_URL, using default: {}", e);
            Endpoint::default()
        }),
        None => Endpoint::default(),
    }
}

/// ブラウザで選択されたファイル
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserFile(pub File);

impl UploadSource for BrowserFile {
    fn meta(&self) -> FileMeta {
        FileMeta::new(&self.0.name(), &self.0.type_(), self.0.size() as u64)
    }
}

#[derive(Debug, Clone)]
pub struct FetchBackend {
    endpoint: Endpoint,
}

impl FetchBackend {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn js_error(e: JsValue) -> Error {
    Error::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

async fn fetch(url: &str, opts: &RequestInit) -> Result<Response> {
    let window = web_sys::window().ok_or_else(|| Error::Network("no window".into()))?;
    let request = Request::new_with_str_and_init(url, opts).map_err(js_error)?;
    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    value.dyn_into::<Response>().map_err(js_error)
}

async fn response_text(response: &Response) -> Result<String> {
    let promise = response.text().map_err(js_error)?;
    let value = JsFuture::from(promise).await.map_err(js_error)?;
    Ok(value.as_string().unwrap_or_default())
}

impl GenerationBackend for FetchBackend {
    type File = BrowserFile;

    async fn check_health(&self) -> bool {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        match fetch(&self.endpoint.health_url(), &opts).await {
            Ok(response) if response.ok() => true,
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

    async fn generate(&self, file: &BrowserFile, description: &str) -> Result<GenerateResponse> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename(IMAGE_FIELD, &file.0, &file.0.name())
            .map_err(js_error)?;
        form.append_with_str(DESCRIPTION_FIELD, description)
            .map_err(js_error)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&form);

        let response = fetch(&self.endpoint.generate_url(), &opts).await?;
        let body = response_text(&response).await?;

        if !response.ok() {
            return Err(generation_error(response.status(), &body));
        }

        parse_generate_response(&body)
    }
}
