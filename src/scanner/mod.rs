use crate::error::{AccountUiError, Result};
use account_ui_common::PendingFiles;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl ImageInfo {
    /// multipart の Content-Type
    pub fn mime_type(&self) -> &'static str {
        match self
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            _ => "image/jpeg",
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 拡張子が対象画像か（大文字小文字は区別しない）
fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(AccountUiError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !has_image_extension(path) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        images.push(ImageInfo {
            path: path.to_path_buf(),
            file_name,
            size,
        });
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    tracing::debug!("{}: {}枚", folder.display(), images.len());

    Ok(images)
}

/// スキャン結果を保留リストに積む（上限超過はバッチごと拒否）
pub fn pending_from_folder(folder: &Path, max: usize) -> Result<PendingFiles<ImageInfo>> {
    let images = scan_folder(folder)?;
    if images.is_empty() {
        return Err(AccountUiError::NoImagesFound(folder.display().to_string()));
    }

    let mut pending = PendingFiles::with_capacity_limit(max);
    pending.add_batch(images)?;
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    #[test]
    fn test_has_image_extension_ignores_case() {
        for name in ["a.jpg", "a.JPG", "a.Jpg", "a.jpeg", "a.JpEg", "a.png", "a.Png"] {
            assert!(has_image_extension(Path::new(name)), "{}", name);
        }
        for name in ["a.txt", "a.gif", "a.jpg.bak", "jpg", "a."] {
            assert!(!has_image_extension(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(AccountUiError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_with_images() {
        let temp_dir = std::env::temp_dir().join("account-ui-test-images");
        fs::create_dir_all(&temp_dir).unwrap();

        File::create(temp_dir.join("test1.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.join("test2.JPG")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.join("test3.png")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.join("readme.txt")).unwrap().write_all(b"text").unwrap();

        let result = scan_folder(&temp_dir).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].file_name, "test1.jpg");
        assert_eq!(result[0].size, 5);
        assert_eq!(result[2].mime_type(), "image/png");

        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_mime_type_uppercase_jpeg() {
        let info = ImageInfo {
            path: PathBuf::from("IMG_0001.JPEG"),
            file_name: "IMG_0001.JPEG".into(),
            size: 0,
        };
        assert_eq!(info.mime_type(), "image/jpeg");
    }
}
