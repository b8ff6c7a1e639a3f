//! バックエンドAPI（fetch）

mod backend;

pub use backend::{endpoint, BrowserFile, FetchBackend};
