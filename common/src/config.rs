//! 接続先設定
//!
//! ブラウザではページ内のJSONブロック、CLIでは設定ファイルから読み込む

use crate::address::{DEBOUNCE_MS, DEFAULT_ADDRESS_API};
use crate::contacts::DEFAULT_PHONE_CHECK_BASE;
use crate::error::{Error, Result};
use crate::geocode::DEFAULT_NOMINATIM_API;
use crate::uploader::MAX_PENDING_FILES;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// 電話番号確認API（ブラウザでは相対パス）
    pub phone_check_base: String,
    pub address_api_base: String,
    pub nominatim_base: String,
    /// 写真アップロード先（未設定ならフォームのaction）
    pub upload_endpoint: Option<String>,
    pub max_pending_files: usize,
    pub debounce_ms: u32,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            phone_check_base: DEFAULT_PHONE_CHECK_BASE.to_string(),
            address_api_base: DEFAULT_ADDRESS_API.to_string(),
            nominatim_base: DEFAULT_NOMINATIM_API.to_string(),
            upload_endpoint: None,
            max_pending_files: MAX_PENDING_FILES,
            debounce_ms: DEBOUNCE_MS,
        }
    }
}

impl EndpointConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pending_files == 0 {
            return Err(Error::Config("max_pending_files must be positive".into()));
        }
        if self.address_api_base.trim().is_empty() {
            return Err(Error::Config("address_api_base is empty".into()));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EndpointConfig::from_json(r#"{"upload_endpoint": "/album/3/add/"}"#).unwrap();
        assert_eq!(config.upload_endpoint.as_deref(), Some("/album/3/add/"));
        assert_eq!(config.max_pending_files, 30);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.address_api_base, "https://api-adresse.data.gouv.fr");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EndpointConfig::from_json("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_zero_cap_rejected() {
        assert!(matches!(
            EndpointConfig::from_json(r#"{"max_pending_files": 0}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let json = EndpointConfig::default().to_json_pretty().unwrap();
        assert_eq!(EndpointConfig::from_json(&json).unwrap(), EndpointConfig::default());
    }
}
