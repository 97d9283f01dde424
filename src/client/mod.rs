//! バックエンドAPIクライアント
//!
//! ブラウザ側と同じURL組み立て・レスポンス解釈（account-ui-common）を使う

mod upload;

pub use upload::{byte_progress_bar, CHUNK_SIZE};

use crate::error::{AccountUiError, Result};
use account_ui_common::address::{geocode_query, is_searchable, parse_candidates, MIN_QUERY_LEN};
use account_ui_common::contacts::{phone_check_path, MSG_LOOKUP_FAILED};
use account_ui_common::geocode::first_coordinates;
use account_ui_common::{AddressApi, AddressCandidate, NominatimApi, NominatimHit, PhoneCheckResponse};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new() -> Result<Self> {
        // Nominatim は User-Agent の無いリクエストを拒否する
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AccountUiError::ApiCall(format!("{} ({})", url, status)));
        }
        Ok(response.text().await?)
    }

    /// 電話番号が登録済みか
    ///
    /// 200以外は確認失敗として扱う
    pub async fn check_phone(&self, base: &str, number: &str) -> Result<bool> {
        let url = phone_check_path(base, number.trim());
        let body = self.get_text(&url).await.map_err(|e| {
            tracing::warn!("電話番号の確認に失敗: {}", e);
            AccountUiError::ApiCall(MSG_LOOKUP_FAILED.to_string())
        })?;
        let response: PhoneCheckResponse = serde_json::from_str(&body)?;
        Ok(response.exists)
    }

    /// 住所検索（短すぎる検索語はリクエストしない）
    pub async fn search_address(
        &self,
        api: &AddressApi,
        query: &str,
        limit: usize,
    ) -> Result<Vec<AddressCandidate>> {
        if !is_searchable(query) {
            return Err(AccountUiError::QueryTooShort {
                query: query.to_string(),
                min: MIN_QUERY_LEN,
            });
        }
        let body = self.get_text(&api.search_url(query, limit)).await?;
        Ok(parse_candidates(&body)?)
    }

    /// 逆ジオコーディング（先頭の候補）
    pub async fn reverse(
        &self,
        api: &AddressApi,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<AddressCandidate>> {
        let body = self.get_text(&api.reverse_url(latitude, longitude)).await?;
        Ok(parse_candidates(&body)?.into_iter().next())
    }

    /// 会社住所 → 座標（緯度, 経度）
    pub async fn geocode_company(
        &self,
        api: &NominatimApi,
        address: &str,
        postal_code: &str,
        city: &str,
    ) -> Result<Option<(String, String)>> {
        let Some(query) = geocode_query(address, postal_code, city) else {
            return Ok(None);
        };
        let body = self.get_text(&api.search_url(&query)).await?;
        let hits: Vec<NominatimHit> = serde_json::from_str(&body)?;
        Ok(first_coordinates(&hits))
    }
}
