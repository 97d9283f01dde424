//! 汎用ジオコーディング（Nominatim）
//!
//! 会社の座標が空のときに住所から補完する

use serde::Deserialize;

pub const DEFAULT_NOMINATIM_API: &str = "https://nominatim.openstreetmap.org";

/// 検索結果（座標は文字列で返る）
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NominatimHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimApi {
    base_url: String,
}

impl Default for NominatimApi {
    fn default() -> Self {
        Self::new(DEFAULT_NOMINATIM_API)
    }
}

impl NominatimApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?format=json&q={}&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }
}

/// 先頭ヒットの (緯度, 経度)
pub fn first_coordinates(hits: &[NominatimHit]) -> Option<(String, String)> {
    hits.first().map(|hit| (hit.lat.clone(), hit.lon.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let api = NominatimApi::default();
        assert_eq!(
            api.search_url("1 rue de la Paix, 75002 Paris, France"),
            "https://nominatim.openstreetmap.org/search?format=json&q=1%20rue%20de%20la%20Paix%2C%2075002%20Paris%2C%20France&limit=1"
        );
    }

    #[test]
    fn test_first_coordinates() {
        let hits: Vec<NominatimHit> = serde_json::from_str(
            r#"[{"lat": "48.8686", "lon": "2.3314", "display_name": "Rue de la Paix"}]"#,
        )
        .unwrap();
        assert_eq!(
            first_coordinates(&hits),
            Some(("48.8686".to_string(), "2.3314".to_string()))
        );
        assert_eq!(first_coordinates(&[]), None);
    }
}
