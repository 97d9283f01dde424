//! 写真アップロードの保留リスト
//!
//! ブラウザ側では `web_sys::File`、CLI側では `PathBuf` を保持するためジェネリック

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeSet;

/// 一度に保留できる最大枚数
pub const MAX_PENDING_FILES: usize = 30;

/// multipart のフィールド名（ファイルごとに繰り返す）
pub const UPLOAD_FIELD: &str = "photos";

/// 送信待ちファイルと選択状態
#[derive(Debug, Clone)]
pub struct PendingFiles<T> {
    files: Vec<T>,
    selected: BTreeSet<usize>,
    max: usize,
}

impl<T> Default for PendingFiles<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PendingFiles<T> {
    pub fn new() -> Self {
        Self::with_capacity_limit(MAX_PENDING_FILES)
    }

    pub fn with_capacity_limit(max: usize) -> Self {
        Self {
            files: Vec::new(),
            selected: BTreeSet::new(),
            max,
        }
    }

    /// バッチ追加
    ///
    /// 上限を超える場合はバッチ全体を拒否し、リストは変更しない
    pub fn add_batch(&mut self, incoming: Vec<T>) -> Result<usize> {
        self.check_capacity(incoming.len())?;
        let added = incoming.len();
        self.files.extend(incoming);
        Ok(added)
    }

    /// `incoming` 枚を追加できるか
    pub fn check_capacity(&self, incoming: usize) -> Result<()> {
        if self.files.len() + incoming > self.max {
            tracing::warn!(
                current = self.files.len(),
                incoming,
                max = self.max,
                "上限を超えるためバッチを拒否"
            );
            return Err(Error::TooManyFiles {
                current: self.files.len(),
                incoming,
                max: self.max,
            });
        }
        Ok(())
    }

    /// 選択の切り替え（戻り値は切り替え後の状態）
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        if index >= self.files.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.files.len(),
            });
        }
        if self.selected.remove(&index) {
            Ok(false)
        } else {
            self.selected.insert(index);
            Ok(true)
        }
    }

    /// 選択中のファイルを削除して返す
    pub fn delete_selected(&mut self) -> Vec<T> {
        let selected = std::mem::take(&mut self.selected);
        tracing::debug!("{}枚を削除（残り{}枚）", selected.len(), self.files.len() - selected.len());
        let mut removed = Vec::with_capacity(selected.len());
        let mut kept = Vec::with_capacity(self.files.len() - selected.len());
        for (index, file) in self.files.drain(..).enumerate() {
            if selected.contains(&index) {
                removed.push(file);
            } else {
                kept.push(file);
            }
        }
        self.files = kept;
        removed
    }

    /// 送信前チェック
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.files.is_empty() {
            Err(Error::NoFilesSelected)
        } else {
            Ok(())
        }
    }

    /// 送信成功後にリストを破棄
    pub fn clear(&mut self) -> Vec<T> {
        self.selected.clear();
        std::mem::take(&mut self.files)
    }

    pub fn files(&self) -> &[T] {
        &self.files
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn selected_label(&self) -> String {
        format!("{} images sélectionnées", self.selected.len())
    }

    pub fn total_label(&self) -> String {
        format!("{} images au total", self.files.len())
    }
}

/// アップロード進捗（送信済みバイト / 合計）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        Self { loaded, total }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.loaded as f64 / self.total as f64 * 100.0).min(100.0)
    }

    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent().round() as u32)
    }

    pub fn count_label(&self) -> String {
        format!("{} / {}", self.loaded, self.total)
    }
}

/// サーバーのJSONレスポンス
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// 送信結果
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success {
        message: String,
        redirect_url: Option<String>,
    },
    Failure {
        message: String,
    },
}

impl UploadOutcome {
    /// ステータスコードとレスポンス本文から判定（200のみ成功）
    pub fn from_status(status: u16, body: &str) -> Result<Self> {
        let response: UploadResponse = serde_json::from_str(body)?;
        if status == 200 {
            Ok(Self::Success {
                message: response.message,
                redirect_url: response.redirect_url.filter(|url| !url.is_empty()),
            })
        } else {
            Ok(Self::Failure {
                message: response.message,
            })
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("photo{}.jpg", i)).collect()
    }

    // =============================================
    // 追加・上限
    // =============================================

    #[test]
    fn test_add_batch_within_limit() {
        let mut pending = PendingFiles::new();
        assert_eq!(pending.add_batch(names(10)).unwrap(), 10);
        assert_eq!(pending.add_batch(names(20)).unwrap(), 20);
        assert_eq!(pending.len(), 30);
    }

    #[test]
    fn test_add_batch_over_limit_rejects_whole_batch() {
        let mut pending = PendingFiles::new();
        pending.add_batch(names(5)).unwrap();

        let result = pending.add_batch(names(26));
        assert!(matches!(
            result,
            Err(Error::TooManyFiles {
                current: 5,
                incoming: 26,
                max: 30
            })
        ));
        assert_eq!(pending.len(), 5);
        assert_eq!(pending.files()[4], "photo4.jpg");
    }

    #[test]
    fn test_check_capacity_with_custom_limit() {
        let mut pending = PendingFiles::with_capacity_limit(3);
        pending.add_batch(names(2)).unwrap();
        assert!(pending.check_capacity(1).is_ok());
        assert!(pending.check_capacity(2).is_err());
        assert_eq!(pending.max(), 3);
    }

    #[test]
    fn test_single_batch_over_limit() {
        let mut pending: PendingFiles<String> = PendingFiles::new();
        assert!(pending.add_batch(names(31)).is_err());
        assert!(pending.is_empty());
    }

    // =============================================
    // 選択・削除
    // =============================================

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut pending = PendingFiles::new();
        pending.add_batch(names(3)).unwrap();
        pending.toggle(0).unwrap();
        let before: Vec<usize> = pending.selected_indices().collect();

        assert!(pending.toggle(2).unwrap());
        assert!(!pending.toggle(2).unwrap());

        let after: Vec<usize> = pending.selected_indices().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut pending = PendingFiles::new();
        pending.add_batch(names(2)).unwrap();
        assert!(matches!(
            pending.toggle(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_delete_selected_removes_exactly_selected() {
        let mut pending = PendingFiles::new();
        pending.add_batch(names(5)).unwrap();
        pending.toggle(1).unwrap();
        pending.toggle(3).unwrap();

        let removed = pending.delete_selected();
        assert_eq!(removed, vec!["photo1.jpg", "photo3.jpg"]);
        assert_eq!(pending.files(), &["photo0.jpg", "photo2.jpg", "photo4.jpg"]);
        assert_eq!(pending.selected_count(), 0);
        assert!(!pending.has_selection());
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut pending = PendingFiles::new();
        pending.add_batch(names(2)).unwrap();
        assert!(pending.delete_selected().is_empty());
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_ensure_not_empty() {
        let mut pending = PendingFiles::new();
        assert!(matches!(
            pending.ensure_not_empty(),
            Err(Error::NoFilesSelected)
        ));
        pending.add_batch(names(1)).unwrap();
        assert!(pending.ensure_not_empty().is_ok());
    }

    #[test]
    fn test_labels() {
        let mut pending = PendingFiles::new();
        pending.add_batch(names(4)).unwrap();
        pending.toggle(0).unwrap();
        assert_eq!(pending.selected_label(), "1 images sélectionnées");
        assert_eq!(pending.total_label(), "4 images au total");
    }

    // =============================================
    // 進捗・レスポンス
    // =============================================

    #[test]
    fn test_progress_percent() {
        let progress = UploadProgress::new(512, 1024);
        assert_eq!(progress.percent(), 50.0);
        assert_eq!(progress.percent_label(), "50%");
        assert_eq!(progress.count_label(), "512 / 1024");
        assert_eq!(UploadProgress::new(0, 0).percent(), 0.0);
    }

    #[test]
    fn test_outcome_success_with_redirect() {
        let body = r#"{"status": "success", "message": "Vos photos ont été uploadées avec succès !", "redirect_url": "/album/"}"#;
        let outcome = UploadOutcome::from_status(200, body).unwrap();
        assert_eq!(
            outcome,
            UploadOutcome::Success {
                message: "Vos photos ont été uploadées avec succès !".to_string(),
                redirect_url: Some("/album/".to_string()),
            }
        );
    }

    #[test]
    fn test_outcome_failure() {
        let outcome = UploadOutcome::from_status(400, r#"{"message": "Album introuvable"}"#).unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), "Album introuvable");
    }

    #[test]
    fn test_outcome_invalid_body() {
        assert!(matches!(
            UploadOutcome::from_status(500, "<html>"),
            Err(Error::Json(_))
        ));
    }
}
