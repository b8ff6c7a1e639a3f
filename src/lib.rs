//! meme-gen CLI
//!
//! ブラウザ版と同じワークフロー（`meme_gen_common::Session`）をreqwestで動かす

pub mod cli;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod generate;
pub mod monitor;
pub mod prompt;
pub mod resize;
pub mod upload;
