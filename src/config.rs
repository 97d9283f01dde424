use crate::error::{AccountUiError, Result};
use account_ui_common::EndpointConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// サーバーURLを上書きする環境変数
pub const SERVER_ENV: &str = "ACCOUNT_UI_SERVER";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// アプリケーションサーバー（例: https://example.com）
    pub server: Option<String>,
    #[serde(flatten)]
    pub endpoints: EndpointConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.endpoints.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        tracing::debug!("設定を保存: {}", config_path.display());
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AccountUiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("account-ui").join("config.json"))
    }

    /// サーバーURL（環境変数を優先）
    pub fn server(&self) -> Option<String> {
        self.server_with_override(std::env::var(SERVER_ENV).ok())
    }

    fn server_with_override(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.server.clone())
            .map(|s| s.trim_end_matches('/').to_string())
    }

    /// 相対パスならサーバーURLを前置する
    pub fn resolve(&self, path: &str) -> Result<String> {
        resolve_against(self.server().as_deref(), path)
    }

    /// 電話番号確認APIのベースURL
    pub fn phone_check_base(&self) -> Result<String> {
        self.resolve(&self.endpoints.phone_check_base)
    }

    /// アップロード先（引数 → 設定の順）
    pub fn upload_endpoint(&self, from_args: Option<String>) -> Result<String> {
        let endpoint = from_args
            .or_else(|| self.endpoints.upload_endpoint.clone())
            .ok_or(AccountUiError::MissingUploadEndpoint)?;
        self.resolve(&endpoint)
    }

    pub fn set_server(&mut self, server: String) -> Result<()> {
        self.server = Some(server);
        self.save()
    }

    pub fn set_upload_endpoint(&mut self, endpoint: String) -> Result<()> {
        self.endpoints.upload_endpoint = Some(endpoint);
        self.save()
    }
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// `path` が絶対URLでなければ `server` と結合する
pub fn resolve_against(server: Option<&str>, path: &str) -> Result<String> {
    if is_absolute_url(path) {
        return Ok(path.to_string());
    }
    let server = server.ok_or(AccountUiError::MissingServer)?;
    Ok(format!(
        "{}/{}",
        server.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_override_wins() {
        let config = Config {
            server: Some("https://config.example".into()),
            ..Default::default()
        };
        assert_eq!(
            config.server_with_override(Some("https://env.example/".into())),
            Some("https://env.example".to_string())
        );
        assert_eq!(
            config.server_with_override(Some("  ".into())),
            Some("https://config.example".to_string())
        );
        assert_eq!(
            config.server_with_override(None),
            Some("https://config.example".to_string())
        );
    }

    #[test]
    fn test_server_missing() {
        assert_eq!(Config::default().server_with_override(None), None);
    }
}
