//! JavaScript ライブラリのバインディング
//!
//! ページ側で読み込まれている UIkit（通知）と Leaflet（地図）を呼び出す

use account_ui_common::MapView;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = UIkit, js_name = notification, catch)]
    fn uikit_notification(options: &JsValue) -> Result<JsValue, JsValue>;

    pub type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    fn leaflet_map(container: &HtmlElement) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: u8) -> LeafletMap;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LeafletMap, layer: &LeafletLayer) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn on(this: &LeafletMap, event: &str, handler: &js_sys::Function) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMap) -> LeafletMap;

    pub type LeafletLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &LeafletLayer, map: &LeafletMap) -> LeafletLayer;
}

/// 通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyStatus {
    Success,
    Danger,
}

impl NotifyStatus {
    fn as_str(&self) -> &'static str {
        match self {
            NotifyStatus::Success => "success",
            NotifyStatus::Danger => "danger",
        }
    }
}

fn js_object(entries: &[(&str, JsValue)]) -> Result<js_sys::Object, JsValue> {
    let object = js_sys::Object::new();
    for (key, value) in entries {
        js_sys::Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object)
}

fn lat_lng(latitude: f64, longitude: f64) -> JsValue {
    js_sys::Array::of2(&JsValue::from_f64(latitude), &JsValue::from_f64(longitude)).into()
}

/// UIkit の通知を表示（UIkit が無ければ alert）
pub fn notify(message: &str, status: NotifyStatus) {
    let shown = js_object(&[
        ("message", JsValue::from_str(message)),
        ("status", JsValue::from_str(status.as_str())),
    ])
    .and_then(|options| uikit_notification(&options));

    if shown.is_err() {
        tracing::debug!("UIkit が見つからないため alert で通知");
        gloo::dialogs::alert(message);
    }
}

/// 地図と単一マーカー
pub struct MapHandle {
    map: LeafletMap,
    marker: Option<LeafletLayer>,
    _on_click: Option<Closure<dyn FnMut(JsValue)>>,
}

impl MapHandle {
    /// OSMタイル付きの地図を作成
    pub fn new(container: &HtmlElement, view: MapView, with_marker: bool) -> Result<Self, JsValue> {
        let map = leaflet_map(container)?;
        map.set_view(&lat_lng(view.latitude, view.longitude), view.zoom);

        let options = js_object(&[("attribution", JsValue::from_str(OSM_ATTRIBUTION))])?;
        tile_layer(OSM_TILE_URL, &options).add_to(&map);

        let mut handle = Self {
            map,
            marker: None,
            _on_click: None,
        };
        if with_marker {
            handle.place_marker(view.latitude, view.longitude);
        }
        Ok(handle)
    }

    /// クリック時に (緯度, 経度) を通知
    pub fn on_click<F>(&mut self, mut handler: F)
    where
        F: FnMut(f64, f64) + 'static,
    {
        let closure = Closure::wrap(Box::new(move |event: JsValue| {
            let coords = js_sys::Reflect::get(&event, &JsValue::from_str("latlng"))
                .ok()
                .and_then(|latlng| {
                    let lat = js_sys::Reflect::get(&latlng, &JsValue::from_str("lat")).ok()?.as_f64()?;
                    let lng = js_sys::Reflect::get(&latlng, &JsValue::from_str("lng")).ok()?.as_f64()?;
                    Some((lat, lng))
                });
            if let Some((lat, lng)) = coords {
                handler(lat, lng);
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.map.on("click", closure.as_ref().unchecked_ref());
        self._on_click = Some(closure);
    }

    fn place_marker(&mut self, latitude: f64, longitude: f64) {
        if let Some(old) = self.marker.take() {
            self.map.remove_layer(&old);
        }
        self.marker = Some(marker(&lat_lng(latitude, longitude)).add_to(&self.map));
    }

    /// マーカーを置き直して中心に寄せる
    pub fn focus(&mut self, latitude: f64, longitude: f64) {
        self.place_marker(latitude, longitude);
        let view = MapView::focused(latitude, longitude);
        self.map
            .set_view(&lat_lng(view.latitude, view.longitude), view.zoom);
    }
}

impl Drop for MapHandle {
    fn drop(&mut self) {
        self.map.remove();
    }
}
