use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountUiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("サーバーが設定されていません。`account-ui config --set-server URL` か ACCOUNT_UI_SERVER で設定してください")]
    MissingServer,

    #[error("アップロード先が設定されていません。`--endpoint` か `account-ui config --set-upload-endpoint URL` で指定してください")]
    MissingUploadEndpoint,

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("{0}")]
    Rule(#[from] account_ui_common::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("検索語が短すぎます（{min}文字以上）: {query}")]
    QueryTooShort { query: String, min: usize },

    #[error("パスワードが条件を満たしていません: {0}")]
    WeakPassword(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("キャンセルされました")]
    Cancelled,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AccountUiError>;
