//! フォルダスキャンと保留リストの結合テスト

use account_ui::error::AccountUiError;
use account_ui::scanner;
use tempfile::tempdir;

fn touch(dir: &std::path::Path, name: &str) {
    std::fs::write(dir.join(name), b"dummy").unwrap();
}

#[test]
fn test_scan_is_not_recursive() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "top.jpg");
    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    touch(&sub, "nested.jpg");

    let images = scanner::scan_folder(dir.path()).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].file_name, "top.jpg");
}

#[test]
fn test_scan_sorted_and_filtered() {
    let dir = tempdir().unwrap();
    for name in ["c.png", "a.jpeg", "b.JPG", "notes.txt", "anim.gif"] {
        touch(dir.path(), name);
    }

    let names: Vec<String> = scanner::scan_folder(dir.path())
        .unwrap()
        .into_iter()
        .map(|i| i.file_name)
        .collect();
    assert_eq!(names, vec!["a.jpeg", "b.JPG", "c.png"]);
}

#[test]
fn test_pending_from_folder_within_limit() {
    let dir = tempdir().unwrap();
    for i in 0..3 {
        touch(dir.path(), &format!("photo{}.jpg", i));
    }

    let pending = scanner::pending_from_folder(dir.path(), 30).unwrap();
    assert_eq!(pending.len(), 3);
    assert_eq!(pending.total_label(), "3 images au total");
    assert!(!pending.has_selection());
}

#[test]
fn test_pending_from_folder_over_limit() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        touch(dir.path(), &format!("photo{}.jpg", i));
    }

    let result = scanner::pending_from_folder(dir.path(), 3);
    assert!(matches!(
        result,
        Err(AccountUiError::Rule(account_ui_common::Error::TooManyFiles {
            current: 0,
            incoming: 4,
            max: 3
        }))
    ));
}

#[test]
fn test_scan_mixed_case_extensions() {
    let dir = tempdir().unwrap();
    for name in ["one.Jpg", "two.Png", "three.JPEG", "four.Gif"] {
        touch(dir.path(), name);
    }

    let images = scanner::scan_folder(dir.path()).unwrap();
    let names: Vec<&str> = images.iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(names, vec!["one.Jpg", "three.JPEG", "two.Png"]);
    assert_eq!(images[2].mime_type(), "image/png");
}
