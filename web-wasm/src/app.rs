//! コントローラのマウント
//!
//! ページ内に置き場所（プレースホルダ要素）があるコントローラだけを起動する

use crate::components::{
    address_autocomplete::{AddressAutocomplete, CoordinateFields},
    contact_sharer::ContactSharer,
    geolocation_capture::GeolocationCapture,
    photo_uploader::PhotoUploader,
    registration_validator::RegistrationValidator,
};
use crate::dom;
use account_ui_common::EndpointConfig;
use leptos::prelude::*;
use web_sys::{Element, HtmlElement};

/// ページ内の設定JSON（`<script type="application/json">`）
pub const CONFIG_ELEMENT_ID: &str = "account-ui-config";

pub const PHOTO_UPLOADER_ID: &str = "photo-uploader";
pub const CONTACT_SHARER_ID: &str = "contact-sharer";
pub const ADDRESS_AUTOCOMPLETE_ID: &str = "address-autocomplete";
pub const GEOLOCATION_CAPTURE_ID: &str = "geolocation-capture";
pub const REGISTRATION_VALIDATOR_ID: &str = "registration-validator";

/// 設定を読み込む（無い・壊れている場合はデフォルト）
pub fn load_config() -> EndpointConfig {
    let Some(json) = dom::element_by_id::<Element>(CONFIG_ELEMENT_ID).and_then(|el| el.text_content())
    else {
        return EndpointConfig::default();
    };
    EndpointConfig::from_json(&json).unwrap_or_else(|e| {
        tracing::warn!("設定を読み込めません（デフォルトを使用）: {}", e);
        EndpointConfig::default()
    })
}

/// 置き場所の data 属性から座標フィールド名を読む
fn coordinate_fields(host: &HtmlElement) -> CoordinateFields {
    let defaults = CoordinateFields::default();
    CoordinateFields {
        latitude: host
            .get_attribute("data-latitude-field")
            .unwrap_or(defaults.latitude),
        longitude: host
            .get_attribute("data-longitude-field")
            .unwrap_or(defaults.longitude),
    }
}

/// 置き場所があるコントローラをマウント
pub fn mount_controllers(config: EndpointConfig) {
    let mut mounted = Vec::new();

    if let Some(host) = dom::element_by_id::<HtmlElement>(PHOTO_UPLOADER_ID) {
        let config = config.clone();
        let endpoint = host.get_attribute("data-action");
        leptos::mount::mount_to(host, move || {
            view! { <PhotoUploader config=config endpoint=endpoint /> }
        })
        .forget();
        mounted.push(PHOTO_UPLOADER_ID);
    }

    if let Some(host) = dom::element_by_id::<HtmlElement>(CONTACT_SHARER_ID) {
        let config = config.clone();
        leptos::mount::mount_to(host, move || view! { <ContactSharer config=config /> }).forget();
        mounted.push(CONTACT_SHARER_ID);
    }

    if let Some(host) = dom::element_by_id::<HtmlElement>(ADDRESS_AUTOCOMPLETE_ID) {
        let config = config.clone();
        let fields = coordinate_fields(&host);
        leptos::mount::mount_to(host, move || {
            view! { <AddressAutocomplete config=config fields=fields /> }
        })
        .forget();
        mounted.push(ADDRESS_AUTOCOMPLETE_ID);
    }

    if let Some(host) = dom::element_by_id::<HtmlElement>(GEOLOCATION_CAPTURE_ID) {
        let fields = coordinate_fields(&host);
        leptos::mount::mount_to(host, move || view! { <GeolocationCapture fields=fields /> })
            .forget();
        mounted.push(GEOLOCATION_CAPTURE_ID);
    }

    if let Some(host) = dom::element_by_id::<HtmlElement>(REGISTRATION_VALIDATOR_ID) {
        leptos::mount::mount_to(host, move || {
            view! { <RegistrationValidator config=config /> }
        })
        .forget();
        mounted.push(REGISTRATION_VALIDATOR_ID);
    }

    tracing::info!("mounted controllers: {:?}", mounted);
}
