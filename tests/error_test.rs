//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use forge_detect::error::ForgeDetectError;
use forge_detect::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイルを取り込んだ場合
#[test]
fn test_load_nonexistent_file() {
    let result = scanner::load_image_file(Path::new("/nonexistent/path/12345.png"), 1024);
    assert!(matches!(result, Err(ForgeDetectError::FileNotFound(_))));
}

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(matches!(result, Err(ForgeDetectError::FolderNotFound(_))));
}

/// 画像のないフォルダから取り込んだ場合
#[test]
fn test_collect_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::collect_inputs(dir.path(), false, 1024);
    assert!(matches!(result, Err(ForgeDetectError::NoImagesFound(_))));
}

/// ForgeDetectErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ForgeDetectError::InvalidInput("テスト".to_string()),
        ForgeDetectError::AlreadyRunning,
        ForgeDetectError::Cancelled,
        ForgeDetectError::Config("テスト設定エラー".to_string()),
        ForgeDetectError::FileNotFound("test.jpg".to_string()),
        ForgeDetectError::FolderNotFound("/path/to/folder".to_string()),
        ForgeDetectError::FileTooLarge {
            path: "big.png".to_string(),
            size: 20,
            limit: 10,
        },
        ForgeDetectError::UnsupportedMediaType("notes.txt".to_string()),
        ForgeDetectError::NoImagesFound("フォルダ".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 入力エラーの分類
#[test]
fn test_input_error_classification() {
    assert!(ForgeDetectError::InvalidInput("x".into()).is_input_error());
    assert!(ForgeDetectError::UnsupportedMediaType("x".into()).is_input_error());
    assert!(!ForgeDetectError::AlreadyRunning.is_input_error());
    assert!(!ForgeDetectError::Cancelled.is_input_error());
}

/// 上限超過メッセージにサイズが含まれる
#[test]
fn test_file_too_large_message() {
    let err = ForgeDetectError::FileTooLarge {
        path: "big.png".to_string(),
        size: 20_000_000,
        limit: 10_485_760,
    };
    let display = format!("{}", err);

    assert!(display.contains("big.png"));
    assert!(display.contains("20000000"));
    assert!(display.contains("10485760"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ForgeDetectError = io_err.into();

    assert!(matches!(err, ForgeDetectError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ForgeDetectError = json_err.into();

    assert!(matches!(err, ForgeDetectError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = forge_detect::common::Error::InvalidMediaType("image".to_string());
    let err: ForgeDetectError = common_err.into();

    assert!(matches!(err, ForgeDetectError::Common(_)));
    let display = format!("{}", err);
    assert!(display.contains("Invalid media type"));
}
