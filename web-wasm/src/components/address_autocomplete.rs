//! 住所オートコンプリート + 地図
//!
//! - 検索欄: 300msデバウンス後に住所検索API
//! - 結果リスト: マウス/キーボードで選択
//! - 地図クリック: 逆ジオコーディング
//! - 住所欄のblur: 正引きして地図を移動
//!
//! 通信エラーはログのみ（利用者には表示しない）

use crate::api::http::get_json;
use crate::bindings::MapHandle;
use crate::dom;
use account_ui_common::address::{
    candidates_from_value, geocode_query, is_searchable, BLUR_HIDE_DELAY_MS, SEARCH_LIMIT,
};
use account_ui_common::{
    AddressApi, AddressCandidate, CursorAction, EndpointConfig, Key, MapView, ResultCursor,
};
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{EventTarget, KeyboardEvent};

pub const ADDRESS_FIELD_ID: &str = "address-field";
pub const POSTAL_CODE_FIELD_ID: &str = "postal-code-field";
pub const CITY_FIELD_ID: &str = "city-field";

/// 座標を書き込む hidden フィールド名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateFields {
    pub latitude: String,
    pub longitude: String,
}

impl Default for CoordinateFields {
    fn default() -> Self {
        Self {
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

async fn fetch_candidates(url: String) -> Option<Vec<AddressCandidate>> {
    match get_json::<serde_json::Value>(&url).await {
        Ok(value) => match candidates_from_value(value) {
            Ok(candidates) => Some(candidates),
            Err(e) => {
                tracing::error!("住所検索レスポンスの解析に失敗: {}", e);
                None
            }
        },
        Err(e) => {
            tracing::error!("Erreur lors de la recherche d'adresse: {:?}", e);
            None
        }
    }
}

fn fill_address_fields(candidate: &AddressCandidate) {
    dom::set_input_value_by_id(ADDRESS_FIELD_ID, &candidate.name);
    dom::set_input_value_by_id(POSTAL_CODE_FIELD_ID, &candidate.postcode);
    dom::set_input_value_by_id(CITY_FIELD_ID, &candidate.city);
}

#[component]
pub fn AddressAutocomplete(config: EndpointConfig, fields: CoordinateFields) -> impl IntoView {
    let api = AddressApi::new(config.address_api_base);
    let debounce_ms = config.debounce_ms;

    let (query, set_query) = signal(String::new());
    let results = RwSignal::new(Vec::<AddressCandidate>::new());
    let cursor = RwSignal::new(ResultCursor::default());

    let map = StoredValue::new_local(None::<MapHandle>);
    let debounce = StoredValue::new_local(None::<Timeout>);
    let listeners = StoredValue::new_local(Vec::<EventListener>::new());
    let map_ref = NodeRef::<leptos::html::Div>::new();

    let hide_results = move || {
        results.set(Vec::new());
        cursor.update(|c| c.reset());
    };

    let set_location = {
        let fields = fields.clone();
        move |latitude: f64, longitude: f64| {
            dom::set_input_value(&fields.latitude, &latitude.to_string());
            dom::set_input_value(&fields.longitude, &longitude.to_string());
            map.update_value(|m| {
                if let Some(m) = m.as_mut() {
                    m.focus(latitude, longitude);
                }
            });
        }
    };

    let select_candidate = {
        let set_location = set_location.clone();
        move |candidate: AddressCandidate| {
            fill_address_fields(&candidate);
            set_query.set(candidate.label.clone());
            set_location(candidate.latitude, candidate.longitude);
            hide_results();
        }
    };

    // 地図の初期化と住所欄のリスナー（マウント後に1回）
    Effect::new({
        let api = api.clone();
        let fields = fields.clone();
        let set_location = set_location.clone();
        move |_| {
            let Some(container) = map_ref.get() else {
                return;
            };
            if map.with_value(|m| m.is_some()) {
                return;
            }

            let (view, has_marker) = MapView::initial(
                &dom::input_value(&fields.latitude),
                &dom::input_value(&fields.longitude),
            );
            match MapHandle::new(&container, view, has_marker) {
                Ok(mut handle) => {
                    let api = api.clone();
                    let set_location = set_location.clone();
                    handle.on_click(move |lat, lng| {
                        set_location(lat, lng);
                        let url = api.reverse_url(lat, lng);
                        spawn_local(async move {
                            if let Some(first) = fetch_candidates(url).await.and_then(|c| c.into_iter().next()) {
                                fill_address_fields(&first);
                                set_query.set(first.search_text());
                            }
                        });
                    });
                    map.set_value(Some(handle));
                }
                Err(e) => tracing::error!("地図を初期化できません（Leaflet未読み込み?）: {:?}", e),
            }

            let mut attached = Vec::new();
            for id in [ADDRESS_FIELD_ID, POSTAL_CODE_FIELD_ID, CITY_FIELD_ID] {
                let Some(target) = dom::element_by_id::<EventTarget>(id) else {
                    continue;
                };
                let api = api.clone();
                let set_location = set_location.clone();
                attached.push(dom::listen(&target, "blur", move |_| {
                    let Some(full_address) = geocode_query(
                        &dom::input_value_by_id(ADDRESS_FIELD_ID),
                        &dom::input_value_by_id(POSTAL_CODE_FIELD_ID),
                        &dom::input_value_by_id(CITY_FIELD_ID),
                    ) else {
                        return;
                    };
                    let url = api.search_url(&full_address, 1);
                    let set_location = set_location.clone();
                    spawn_local(async move {
                        if let Some(first) = fetch_candidates(url).await.and_then(|c| c.into_iter().next()) {
                            set_location(first.latitude, first.longitude);
                        }
                    });
                }));
            }
            listeners.set_value(attached);
        }
    });

    let on_input = {
        let api = api.clone();
        move |ev: web_sys::Event| {
            let value = event_target_value(&ev);
            set_query.set(value.clone());

            let api = api.clone();
            // 前のタイマーはdropで取り消す（送信済みのリクエストは中断しない）
            let timeout = Timeout::new(debounce_ms, move || {
                if !is_searchable(&value) {
                    hide_results();
                    return;
                }
                let url = api.search_url(&value, SEARCH_LIMIT);
                spawn_local(async move {
                    if let Some(candidates) = fetch_candidates(url).await {
                        cursor.set(ResultCursor::new(candidates.len()));
                        results.set(candidates);
                    }
                });
            });
            debounce.set_value(Some(timeout));
        }
    };

    let on_keydown = {
        let select_candidate = select_candidate.clone();
        move |ev: KeyboardEvent| {
            let Some(key) = Key::from_key_name(&ev.key()) else {
                return;
            };
            ev.prevent_default();
            let mut action = CursorAction::None;
            cursor.update(|c| action = c.key(key));
            match action {
                CursorAction::Select(index) => {
                    if let Some(candidate) = results.with_untracked(|r| r.get(index).cloned()) {
                        select_candidate(candidate);
                    }
                }
                CursorAction::Hide => hide_results(),
                CursorAction::Highlight(_) | CursorAction::None => {}
            }
        }
    };

    let on_blur = move |_| {
        Timeout::new(BLUR_HIDE_DELAY_MS, hide_results).forget();
    };

    view! {
        <div class="address-autocomplete">
            <input
                id="address-search"
                type="text"
                autocomplete="off"
                placeholder="Rechercher une adresse"
                prop:value=move || query.get()
                on:input=on_input
                on:keydown=on_keydown
                on:blur=on_blur
            />
            <div
                id="autocomplete-results"
                class="autocomplete-results"
                style:display=move || if results.with(|r| r.is_empty()) { "none" } else { "block" }
            >
                <For
                    each=move || { results.get().into_iter().enumerate().collect::<Vec<_>>() }
                    key=|(index, candidate)| (*index, candidate.label.clone())
                    children={
                        let select_candidate = select_candidate.clone();
                        move |(index, candidate)| {
                            let select_candidate = select_candidate.clone();
                            let label = candidate.label.clone();
                            view! {
                                <div
                                    class="autocomplete-item"
                                    class:active=move || cursor.with(|c| c.active() == Some(index))
                                    on:mouseover=move |_| cursor.update(|c| c.hover(index))
                                    on:click=move |_| select_candidate(candidate.clone())
                                >
                                    {label}
                                </div>
                            }
                        }
                    }
                />
            </div>
            <div id="map-container" class="map-container" node_ref=map_ref></div>
        </div>
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;
    use web_sys::{
        Event, EventInit, HtmlElement, HtmlInputElement, KeyboardEventInit, Request, Response,
    };

    wasm_bindgen_test_configure!(run_in_browser);

    const STUB_API: &str = "https://address.stub";
    const SEARCH_RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [2.3316, 48.869]},
            "properties": {
                "label": "1 Rue de la Paix 75002 Paris",
                "name": "1 Rue de la Paix",
                "postcode": "75002",
                "city": "Paris"
            }
        }]
    }"#;

    /// window.fetch を差し替えてURLを記録し、固定の検索結果を返す
    struct FetchStub {
        urls: Rc<RefCell<Vec<String>>>,
        original: JsValue,
        _closure: Closure<dyn FnMut(JsValue) -> js_sys::Promise>,
    }

    impl FetchStub {
        fn install() -> Self {
            let window = web_sys::window().expect("window");
            let original = js_sys::Reflect::get(&window, &JsValue::from_str("fetch")).expect("fetch");
            let urls = Rc::new(RefCell::new(Vec::new()));
            let sink = urls.clone();
            let closure = Closure::wrap(Box::new(move |input: JsValue| {
                let url = input
                    .dyn_ref::<Request>()
                    .map(|request| request.url())
                    .or_else(|| input.as_string())
                    .unwrap_or_default();
                sink.borrow_mut().push(url);
                match Response::new_with_opt_str(Some(SEARCH_RESPONSE)) {
                    Ok(response) => js_sys::Promise::resolve(&response),
                    Err(e) => js_sys::Promise::reject(&e),
                }
            }) as Box<dyn FnMut(JsValue) -> js_sys::Promise>);
            js_sys::Reflect::set(&window, &JsValue::from_str("fetch"), closure.as_ref())
                .expect("stub fetch");
            Self {
                urls,
                original,
                _closure: closure,
            }
        }

        fn search_urls(&self) -> Vec<String> {
            self.urls
                .borrow()
                .iter()
                .filter(|url| url.contains("/search/"))
                .cloned()
                .collect()
        }
    }

    impl Drop for FetchStub {
        fn drop(&mut self) {
            if let Some(window) = web_sys::window() {
                let _ = js_sys::Reflect::set(&window, &JsValue::from_str("fetch"), &self.original);
            }
        }
    }

    async fn sleep(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            web_sys::window()
                .expect("window")
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .expect("timeout");
        });
        JsFuture::from(promise).await.expect("sleep");
    }

    /// ホスト側の住所欄・座標欄とマウント先
    fn host_page() -> HtmlElement {
        let doc = dom::document().expect("document");
        let host: HtmlElement = doc
            .create_element("div")
            .expect("div")
            .dyn_into()
            .expect("html element");
        host.set_inner_html(
            r#"<input id="address-field">
               <input id="postal-code-field">
               <input id="city-field">
               <input name="latitude">
               <input name="longitude">
               <div id="address-autocomplete-test"></div>"#,
        );
        doc.body().expect("body").append_child(&host).expect("append");
        host
    }

    fn stub_config() -> EndpointConfig {
        EndpointConfig {
            address_api_base: STUB_API.to_string(),
            ..Default::default()
        }
    }

    fn search_box() -> HtmlInputElement {
        dom::element_by_id("address-search").expect("search box")
    }

    fn type_query(value: &str) {
        let input = search_box();
        input.set_value(value);
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict("input", &init).expect("input event");
        input.dispatch_event(&event).expect("dispatch input");
    }

    fn press(key: &str) {
        let init = KeyboardEventInit::new();
        init.set_key(key);
        init.set_bubbles(true);
        let event =
            KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).expect("keydown");
        search_box().dispatch_event(&event).expect("dispatch keydown");
    }

    fn result_count() -> u32 {
        dom::document()
            .expect("document")
            .query_selector_all(".autocomplete-item")
            .expect("query")
            .length()
    }

    #[wasm_bindgen_test]
    async fn wasm_debounce_sends_only_last_query() {
        let stub = FetchStub::install();
        let host = host_page();
        let mount: HtmlElement = dom::element_by_id("address-autocomplete-test").expect("mount");
        let handle = leptos::mount::mount_to(mount, || {
            view! { <AddressAutocomplete config=stub_config() fields=CoordinateFields::default() /> }
        });

        // 300ms以内の連続入力は最後の1回だけ検索する
        type_query("rue de la");
        sleep(100).await;
        type_query("paix");
        sleep(600).await;

        let urls = stub.search_urls();
        assert_eq!(urls.len(), 1, "{:?}", urls);
        assert!(urls[0].starts_with(STUB_API));
        assert!(urls[0].contains("q=paix"));

        // 送信済みのリクエストは次の入力で取り消されない
        type_query("place vendome");
        sleep(600).await;
        assert_eq!(stub.search_urls().len(), 2);

        drop(handle);
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn wasm_short_query_sends_nothing() {
        let stub = FetchStub::install();
        let host = host_page();
        let mount: HtmlElement = dom::element_by_id("address-autocomplete-test").expect("mount");
        let handle = leptos::mount::mount_to(mount, || {
            view! { <AddressAutocomplete config=stub_config() fields=CoordinateFields::default() /> }
        });

        type_query("ru");
        sleep(500).await;
        assert!(stub.search_urls().is_empty());
        assert_eq!(result_count(), 0);

        drop(handle);
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn wasm_keyboard_selection_fills_host_fields() {
        let _stub = FetchStub::install();
        let host = host_page();
        let mount: HtmlElement = dom::element_by_id("address-autocomplete-test").expect("mount");
        let handle = leptos::mount::mount_to(mount, || {
            view! { <AddressAutocomplete config=stub_config() fields=CoordinateFields::default() /> }
        });

        type_query("rue de la paix");
        sleep(600).await;
        assert_eq!(result_count(), 1);

        press("ArrowDown");
        press("Enter");
        sleep(50).await;

        assert_eq!(dom::input_value_by_id(ADDRESS_FIELD_ID), "1 Rue de la Paix");
        assert_eq!(dom::input_value_by_id(POSTAL_CODE_FIELD_ID), "75002");
        assert_eq!(dom::input_value_by_id(CITY_FIELD_ID), "Paris");
        assert_eq!(dom::input_value("latitude"), "48.869");
        assert_eq!(dom::input_value("longitude"), "2.3316");
        assert_eq!(search_box().value(), "1 Rue de la Paix 75002 Paris");
        assert_eq!(result_count(), 0);

        drop(handle);
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn wasm_escape_hides_results() {
        let _stub = FetchStub::install();
        let host = host_page();
        let mount: HtmlElement = dom::element_by_id("address-autocomplete-test").expect("mount");
        let handle = leptos::mount::mount_to(mount, || {
            view! { <AddressAutocomplete config=stub_config() fields=CoordinateFields::default() /> }
        });

        type_query("rue de la paix");
        sleep(600).await;
        assert_eq!(result_count(), 1);

        press("Escape");
        sleep(50).await;
        assert_eq!(result_count(), 0);
        assert_eq!(dom::input_value_by_id(ADDRESS_FIELD_ID), "");

        drop(handle);
        host.remove();
    }
}
