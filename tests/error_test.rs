//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use meme_gen::error::MemeGenError;
use meme_gen::upload::LocalImage;
use meme_gen_common::error::{GENERIC_GENERATION_ERROR, GENERIC_NETWORK_ERROR};
use meme_gen_common::{Error, Rejection, ValidationError};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない画像を開いた場合
#[test]
fn test_open_nonexistent_image() {
    let result = LocalImage::open(Path::new("/nonexistent/path/12345.png"));
    assert!(matches!(result, Err(MemeGenError::FileNotFound(_))));
}

/// ディレクトリを画像として開いた場合
#[test]
fn test_open_directory_as_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = LocalImage::open(dir.path());
    assert!(matches!(result, Err(MemeGenError::FileNotFound(_))));
}

/// MemeGenErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        MemeGenError::Config("テスト設定エラー".to_string()),
        MemeGenError::FileNotFound("test.jpg".to_string()),
        MemeGenError::ImageLoad("壊れた画像".to_string()),
        MemeGenError::Resize("縮小失敗".to_string()),
        MemeGenError::Prompt("入力中断".to_string()),
        MemeGenError::Rejected(Rejection::InFlight),
        MemeGenError::Generation("Model overloaded".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 生成失敗はバナーと同じ文言をそのまま表示する
#[test]
fn test_generation_error_displays_message() {
    let server = MemeGenError::Generation("Model overloaded".to_string());
    assert_eq!(server.to_string(), "Model overloaded");

    let network = MemeGenError::Generation(Error::Network("refused".to_string()).user_message());
    assert_eq!(network.to_string(), GENERIC_NETWORK_ERROR);

    let decode = MemeGenError::Generation(Error::Decode("bad base64".to_string()).user_message());
    assert_eq!(decode.to_string(), GENERIC_GENERATION_ERROR);
}

/// 検証エラーの文言
#[test]
fn test_rejection_messages() {
    let too_large = MemeGenError::from(Rejection::Invalid(ValidationError::TooLarge {
        size: 6 * 1024 * 1024,
        max: 5 * 1024 * 1024,
    }));
    assert!(too_large.to_string().contains("5MB"));

    let offline = MemeGenError::from(Rejection::ServerOffline);
    assert!(offline.to_string().contains("オフライン"));
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = MemeGenError::Config("テスト".to_string());
    let debug = format!("{:?}", err);
    assert!(debug.contains("Config"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: MemeGenError = io_err.into();
    assert!(matches!(err, MemeGenError::Io(_)));
}
