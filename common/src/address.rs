//! 住所オートコンプリート
//!
//! 住所検索API（GeoJSON FeatureCollection）のパース、検索結果リストのカーソル、
//! 地図の表示位置を扱う

use crate::error::Result;
use serde::Deserialize;

pub const DEFAULT_ADDRESS_API: &str = "https://api-adresse.data.gouv.fr";

/// 入力が止まってから検索するまでの待ち時間
pub const DEBOUNCE_MS: u32 = 300;

/// これより短いクエリは検索しない
pub const MIN_QUERY_LEN: usize = 3;

pub const SEARCH_LIMIT: usize = 5;

/// フォーカスが外れてから結果を隠すまでの待ち時間（結果のクリックを先に通す）
pub const BLUR_HIDE_DELAY_MS: u32 = 200;

/// 住所候補
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressCandidate {
    pub label: String,
    pub name: String,
    pub postcode: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AddressCandidate {
    /// 逆ジオコーディング後に検索欄へ入れる文字列
    pub fn search_text(&self) -> String {
        format!("{}, {} {}", self.name, self.postcode, self.city)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Properties,
    geometry: Geometry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Properties {
    label: String,
    name: String,
    postcode: String,
    city: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// [経度, 緯度]
    coordinates: [f64; 2],
}

impl From<Feature> for AddressCandidate {
    fn from(feature: Feature) -> Self {
        let [longitude, latitude] = feature.geometry.coordinates;
        Self {
            label: feature.properties.label,
            name: feature.properties.name,
            postcode: feature.properties.postcode,
            city: feature.properties.city,
            latitude,
            longitude,
        }
    }
}

/// APIレスポンス（JSON文字列）から候補を取り出す
pub fn parse_candidates(json: &str) -> Result<Vec<AddressCandidate>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    candidates_from_value(value)
}

/// パース済みJSONから候補を取り出す（fetch の結果をそのまま渡す用）
pub fn candidates_from_value(value: serde_json::Value) -> Result<Vec<AddressCandidate>> {
    let collection: FeatureCollection = serde_json::from_value(value)?;
    Ok(collection
        .features
        .into_iter()
        .map(AddressCandidate::from)
        .collect())
}

/// 住所検索APIのURL生成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressApi {
    base_url: String,
}

impl Default for AddressApi {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_API)
    }
}

impl AddressApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/search/?q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        )
    }

    pub fn reverse_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/reverse/?lon={}&lat={}",
            self.base_url, longitude, latitude
        )
    }
}

/// 検索すべきクエリかどうか
pub fn is_searchable(query: &str) -> bool {
    query.chars().count() >= MIN_QUERY_LEN
}

/// 住所・郵便番号・市町村から正引き用のクエリを組み立てる
///
/// いずれかが空ならNone
pub fn geocode_query(address: &str, postcode: &str, city: &str) -> Option<String> {
    if [address, postcode, city].iter().any(|s| s.trim().is_empty()) {
        return None;
    }
    Some(format!("{}, {} {}, France", address, postcode, city))
}

/// キー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

impl Key {
    /// `KeyboardEvent.key` の値から変換
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowUp" => Some(Self::ArrowUp),
            "Enter" => Some(Self::Enter),
            "Escape" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// キー操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAction {
    Highlight(Option<usize>),
    Select(usize),
    Hide,
    None,
}

/// 検索結果リストのアクティブ項目
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCursor {
    active: Option<usize>,
    len: usize,
}

impl ResultCursor {
    pub fn new(len: usize) -> Self {
        Self { active: None, len }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn hover(&mut self, index: usize) {
        if index < self.len {
            self.active = Some(index);
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.len = 0;
    }

    pub fn key(&mut self, key: Key) -> CursorAction {
        match key {
            Key::ArrowDown => {
                if self.len == 0 {
                    return CursorAction::None;
                }
                let next = self.active.map_or(0, |i| i + 1).min(self.len - 1);
                self.active = Some(next);
                CursorAction::Highlight(self.active)
            }
            Key::ArrowUp => {
                if self.len == 0 {
                    return CursorAction::None;
                }
                let prev = self.active.map_or(0, |i| i.saturating_sub(1));
                self.active = Some(prev);
                CursorAction::Highlight(self.active)
            }
            Key::Enter => match self.active {
                Some(i) if i < self.len => CursorAction::Select(i),
                _ => CursorAction::None,
            },
            Key::Escape => {
                self.reset();
                CursorAction::Hide
            }
        }
    }
}

/// 地図の表示位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl Default for MapView {
    /// フランス中心
    fn default() -> Self {
        Self {
            latitude: 46.603354,
            longitude: 1.888334,
            zoom: 5,
        }
    }
}

impl MapView {
    pub const FOCUSED_ZOOM: u8 = 13;

    pub fn focused(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            zoom: Self::FOCUSED_ZOOM,
        }
    }

    /// hidden フィールドの既存値から初期位置を決める
    ///
    /// 両方が数値として読めれば座標を中心にし、そうでなければデフォルト
    pub fn initial(latitude: &str, longitude: &str) -> (Self, bool) {
        match (
            latitude.trim().parse::<f64>(),
            longitude.trim().parse::<f64>(),
        ) {
            (Ok(lat), Ok(lon)) => (Self::focused(lat, lon), true),
            _ => (Self::default(), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [2.347, 48.859]},
                "properties": {
                    "label": "8 Boulevard du Palais 75001 Paris",
                    "name": "8 Boulevard du Palais",
                    "postcode": "75001",
                    "city": "Paris",
                    "score": 0.97
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [4.83, 45.76]},
                "properties": {"label": "Lyon", "city": "Lyon"}
            }
        ]
    }"#;

    #[test]
    fn test_parse_candidates() {
        let candidates = parse_candidates(SEARCH_RESPONSE).unwrap();
        assert_eq!(candidates.len(), 2);
        let first = &candidates[0];
        assert_eq!(first.name, "8 Boulevard du Palais");
        assert_eq!(first.postcode, "75001");
        assert_eq!(first.latitude, 48.859);
        assert_eq!(first.longitude, 2.347);
        assert_eq!(first.search_text(), "8 Boulevard du Palais, 75001 Paris");
        // 欠けているプロパティは空文字
        assert_eq!(candidates[1].postcode, "");
    }

    #[test]
    fn test_parse_empty_collection() {
        let candidates = parse_candidates(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(candidates.is_empty());
        assert!(parse_candidates("{}").unwrap().is_empty());
    }

    #[test]
    fn test_urls() {
        let api = AddressApi::default();
        assert_eq!(
            api.search_url("8 bd du Palais", SEARCH_LIMIT),
            "https://api-adresse.data.gouv.fr/search/?q=8%20bd%20du%20Palais&limit=5"
        );
        assert_eq!(
            api.reverse_url(48.5, 2.25),
            "https://api-adresse.data.gouv.fr/reverse/?lon=2.25&lat=48.5"
        );
        assert_eq!(
            AddressApi::new("http://localhost:7878/").search_url("abc", 1),
            "http://localhost:7878/search/?q=abc&limit=1"
        );
    }

    #[test]
    fn test_is_searchable() {
        assert!(!is_searchable("ab"));
        assert!(is_searchable("abc"));
        assert!(is_searchable("éèà"));
    }

    #[test]
    fn test_geocode_query() {
        assert_eq!(
            geocode_query("1 rue de la Paix", "75002", "Paris"),
            Some("1 rue de la Paix, 75002 Paris, France".to_string())
        );
        assert_eq!(geocode_query("1 rue de la Paix", " ", "Paris"), None);
    }

    // =============================================
    // カーソル操作
    // =============================================

    #[test]
    fn test_cursor_arrow_navigation_is_clamped() {
        let mut cursor = ResultCursor::new(3);
        assert_eq!(cursor.key(Key::ArrowDown), CursorAction::Highlight(Some(0)));
        cursor.key(Key::ArrowDown);
        cursor.key(Key::ArrowDown);
        assert_eq!(cursor.key(Key::ArrowDown), CursorAction::Highlight(Some(2)));
        cursor.key(Key::ArrowUp);
        cursor.key(Key::ArrowUp);
        assert_eq!(cursor.key(Key::ArrowUp), CursorAction::Highlight(Some(0)));
    }

    #[test]
    fn test_cursor_enter_and_escape() {
        let mut cursor = ResultCursor::new(2);
        assert_eq!(cursor.key(Key::Enter), CursorAction::None);
        cursor.hover(1);
        assert_eq!(cursor.key(Key::Enter), CursorAction::Select(1));
        assert_eq!(cursor.key(Key::Escape), CursorAction::Hide);
        assert_eq!(cursor.active(), None);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_cursor_empty_list() {
        let mut cursor = ResultCursor::new(0);
        assert_eq!(cursor.key(Key::ArrowDown), CursorAction::None);
        cursor.hover(0);
        assert_eq!(cursor.active(), None);
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_key_name("ArrowDown"), Some(Key::ArrowDown));
        assert_eq!(Key::from_key_name("a"), None);
    }

    #[test]
    fn test_map_view_initial() {
        let (view, has_marker) = MapView::initial("48.85", "2.35");
        assert!(has_marker);
        assert_eq!(view.zoom, 13);

        let (view, has_marker) = MapView::initial("", "2.35");
        assert!(!has_marker);
        assert_eq!(view, MapView::default());
    }
}
