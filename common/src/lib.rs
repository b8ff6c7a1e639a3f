//! Meme Gen Common Library
//!
//! CLIとWeb(WASM)で共有される検証・変換・ワークフロー

pub mod api;
pub mod codec;
pub mod error;
pub mod gallery;
pub mod health;
pub mod input;
pub mod session;
pub mod uploader;
pub mod validator;

pub use api::{
    fit_within, Endpoint, GenerateResponse, GenerationBackend, ResizeOptions, UploadSource,
    DEFAULT_API_BASE_URL,
};
pub use codec::{
    decode_payload, encoded_image_to_handle, release_handles, DecodePolicy, HandleStore,
    MemoryHandleStore,
};
pub use error::{Error, Result, ValidationError};
pub use gallery::{GalleryState, GeneratedImage};
pub use health::{ServerStatus, HEALTH_POLL_INTERVAL};
pub use session::{Finish, GenerationTicket, Phase, Rejection, Session};
pub use uploader::{DropZone, SelectedImage};
pub use validator::{validate, FileMeta};
