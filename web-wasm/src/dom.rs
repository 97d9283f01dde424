//! サーバー描画済みフォームへのアクセス
//!
//! コンポーネントが自分で描画しない入力欄（Djangoテンプレート側）はここを経由して読み書きする

use account_ui_common::csrf::{cookie_value, CSRF_COOKIE};
use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlDocument, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement,
};

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

pub fn element_by_id<T: JsCast>(id: &str) -> Option<T> {
    document()?.get_element_by_id(id)?.dyn_into::<T>().ok()
}

pub fn query<T: JsCast>(selector: &str) -> Option<T> {
    document()?
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<T>()
        .ok()
}

pub fn input_by_name(name: &str) -> Option<HtmlInputElement> {
    query(&format!("input[name=\"{}\"]", name))
}

pub fn select_by_name(name: &str) -> Option<HtmlSelectElement> {
    query(&format!("select[name=\"{}\"]", name))
}

/// name指定の入力値（存在しなければ空文字）
pub fn input_value(name: &str) -> String {
    input_by_name(name).map(|el| el.value()).unwrap_or_default()
}

pub fn set_input_value(name: &str, value: &str) {
    if let Some(el) = input_by_name(name) {
        el.set_value(value);
    }
}

pub fn input_value_by_id(id: &str) -> String {
    element_by_id::<HtmlInputElement>(id)
        .map(|el| el.value())
        .unwrap_or_default()
}

pub fn set_input_value_by_id(id: &str, value: &str) {
    if let Some(el) = element_by_id::<HtmlInputElement>(id) {
        el.set_value(value);
    }
}

/// チェック済みのチェックボックス数
pub fn checked_count(name: &str) -> usize {
    document()
        .and_then(|doc| {
            doc.query_selector_all(&format!("input[name=\"{}\"]:checked", name))
                .ok()
        })
        .map(|list| list.length() as usize)
        .unwrap_or(0)
}

/// 先頭の選択肢がプレースホルダ（「Sélectionnez…」）のまま選ばれているか
pub fn placeholder_selected(select: &HtmlSelectElement) -> bool {
    select.selected_index() == 0
        && select
            .item(0)
            .and_then(|option| option.text_content())
            .map(|text| text.contains("Sélectionnez"))
            .unwrap_or(false)
}

pub fn form_action(form_id: &str) -> Option<String> {
    element_by_id::<HtmlFormElement>(form_id)
        .map(|form| form.action())
        .filter(|action| !action.is_empty())
}

pub fn submit_form(form_id: &str) -> Result<(), JsValue> {
    element_by_id::<HtmlFormElement>(form_id)
        .ok_or_else(|| JsValue::from_str(&format!("form #{} not found", form_id)))?
        .submit()
}

/// `document.cookie` からCSRFトークンを取得
pub fn csrf_token() -> Option<String> {
    let cookies = document()?.dyn_into::<HtmlDocument>().ok()?.cookie().ok()?;
    cookie_value(&cookies, CSRF_COOKIE)
}

pub fn redirect(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(url) {
            tracing::error!("redirect failed: {:?}", e);
        }
    }
}

pub fn set_disabled(element: &Element, disabled: bool) {
    let result = if disabled {
        element.set_attribute("disabled", "")
    } else {
        element.remove_attribute("disabled")
    };
    if let Err(e) = result {
        tracing::warn!("disabled属性の更新に失敗: {:?}", e);
    }
}

/// イベントリスナー登録（戻り値をdropすると解除）
pub fn listen<F>(target: &EventTarget, event: &'static str, handler: F) -> EventListener
where
    F: FnMut(&Event) + 'static,
{
    EventListener::new(target, event, handler)
}

/// 指定要素の下にエラー文を1回だけ追加
pub fn append_notice_once(parent_selector: &str, class_name: &str, text: &str) {
    let Some(doc) = document() else { return };
    if doc
        .query_selector(&format!(".{}", class_name))
        .ok()
        .flatten()
        .is_some()
    {
        return;
    }
    let Some(parent) = query::<Element>(parent_selector) else {
        return;
    };
    if let Ok(div) = doc.create_element("div") {
        div.set_class_name(class_name);
        div.set_text_content(Some(text));
        if let Err(e) = parent.append_child(&div) {
            tracing::warn!("通知の追加に失敗: {:?}", e);
        }
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_html(html: &str) -> Element {
        let doc = document().expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(html);
        doc.body().expect("body").append_child(&host).expect("append");
        host
    }

    #[wasm_bindgen_test]
    fn wasm_input_value_roundtrip_by_name() {
        let host = mount_html(r#"<input name="dom_test_lat" value="48.85">"#);
        assert_eq!(input_value("dom_test_lat"), "48.85");

        set_input_value("dom_test_lat", "45.76");
        assert_eq!(input_value("dom_test_lat"), "45.76");
        assert_eq!(input_value("dom_test_missing"), "");
        host.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_checked_count() {
        let host = mount_html(
            r#"<input type="checkbox" name="dom_test_contacts" checked>
               <input type="checkbox" name="dom_test_contacts">
               <input type="checkbox" name="dom_test_contacts" checked>"#,
        );
        assert_eq!(checked_count("dom_test_contacts"), 2);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_placeholder_selected() {
        let host = mount_html(
            r#"<select name="dom_test_category">
                 <option>Sélectionnez une catégorie</option>
                 <option value="bakery">Boulangerie</option>
               </select>"#,
        );
        let select = select_by_name("dom_test_category").expect("select");
        assert!(placeholder_selected(&select));

        select.set_selected_index(1);
        assert!(!placeholder_selected(&select));
        host.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_set_disabled_toggles_attribute() {
        let host = mount_html(r#"<button class="dom-test-submit">OK</button>"#);
        let button = query::<Element>(".dom-test-submit").expect("button");

        set_disabled(&button, true);
        assert!(button.has_attribute("disabled"));
        set_disabled(&button, false);
        assert!(!button.has_attribute("disabled"));
        host.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_append_notice_once() {
        let host = mount_html(r#"<div class="dom-test-captcha"></div>"#);
        append_notice_once(".dom-test-captcha", "dom-test-notice", "Erreur");
        append_notice_once(".dom-test-captcha", "dom-test-notice", "Erreur");

        let count = document()
            .expect("document")
            .query_selector_all(".dom-test-notice")
            .expect("query")
            .length();
        assert_eq!(count, 1);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_csrf_token_from_cookie() {
        let doc = document()
            .expect("document")
            .dyn_into::<HtmlDocument>()
            .expect("html document");
        doc.set_cookie("csrftoken=abc%2B123; path=/").expect("cookie");
        assert_eq!(csrf_token().as_deref(), Some("abc+123"));
    }
}
