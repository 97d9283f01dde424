//! エラー型定義
//!
//! Display はそのまま画面の通知文として使うので、利用者向けの文言はフランス語

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Vous pouvez télécharger jusqu'à {max} photos.")]
    TooManyFiles {
        current: usize,
        incoming: usize,
        max: usize,
    },

    #[error("Veuillez sélectionner des photos avant d'envoyer.")]
    NoFilesSelected,

    #[error("Index hors limites: {index} (taille {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Veuillez saisir un numéro de téléphone.")]
    EmptyPhoneNumber,

    #[error("Ce numéro est déjà dans la liste: {0}")]
    DuplicateContact(String),

    #[error("Veuillez ajouter au moins un numéro de téléphone.")]
    NoContacts,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_too_many_files() {
        let error = Error::TooManyFiles {
            current: 28,
            incoming: 5,
            max: 30,
        };
        assert_eq!(
            format!("{}", error),
            "Vous pouvez télécharger jusqu'à 30 photos."
        );
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("adresse invalide".to_string());
        assert_eq!(format!("{}", error), "Config error: adresse invalide");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::DuplicateContact("0612345678".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("DuplicateContact"));
        assert!(debug.contains("0612345678"));
    }
}
