//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use account_ui::error::AccountUiError;
use account_ui::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, AccountUiError::FolderNotFound(_)));
}

/// ファイルをフォルダとして渡した場合
#[test]
fn test_scan_file_instead_of_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("photo.jpg");
    std::fs::write(&file, b"dummy").unwrap();

    let result = scanner::scan_folder(&file);
    assert!(matches!(result, Err(AccountUiError::FolderNotFound(_))));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 画像のないフォルダからアップロード対象を作る場合
#[test]
fn test_pending_from_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();

    let result = scanner::pending_from_folder(dir.path(), 30);
    assert!(matches!(result, Err(AccountUiError::NoImagesFound(_))));
}

// ============================================
// 表示メッセージ
// ============================================

#[test]
fn test_rule_error_keeps_french_message() {
    let err: AccountUiError = account_ui_common::Error::TooManyFiles {
        current: 28,
        incoming: 5,
        max: 30,
    }
    .into();
    assert_eq!(err.to_string(), "Vous pouvez télécharger jusqu'à 30 photos.");
}

#[test]
fn test_query_too_short_message() {
    let err = AccountUiError::QueryTooShort {
        query: "ab".into(),
        min: 3,
    };
    let msg = err.to_string();
    assert!(msg.contains("3"));
    assert!(msg.contains("ab"));
}

#[test]
fn test_json_error_conversion() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{invalid");
    let err: AccountUiError = parse.unwrap_err().into();
    assert!(matches!(err, AccountUiError::JsonParse(_)));
}
