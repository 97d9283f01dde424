//! 位置情報取得ボタン

use crate::api::geolocation::{current_position, is_supported};
use crate::components::address_autocomplete::CoordinateFields;
use crate::dom;
use account_ui_common::CaptureStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::MouseEvent;

#[component]
pub fn GeolocationCapture(fields: CoordinateFields) -> impl IntoView {
    let initial = if is_supported() {
        CaptureStatus::Idle
    } else {
        tracing::warn!("navigator.geolocation がありません");
        CaptureStatus::Unsupported
    };
    let (status, set_status) = signal(initial);

    let on_click = move |ev: MouseEvent| {
        // フォームを送信させない
        ev.prevent_default();
        if status.get_untracked().button_disabled() {
            return;
        }
        set_status.set(CaptureStatus::Loading);

        let fields = fields.clone();
        spawn_local(async move {
            match current_position().await {
                Ok((latitude, longitude)) => {
                    dom::set_input_value(&fields.latitude, &latitude.to_string());
                    dom::set_input_value(&fields.longitude, &longitude.to_string());
                    tracing::debug!("現在地: {}, {}", latitude, longitude);
                    set_status.set(CaptureStatus::Success {
                        latitude,
                        longitude,
                    });
                }
                Err(kind) => {
                    tracing::warn!("位置情報の取得に失敗: {:?}", kind);
                    set_status.set(CaptureStatus::Failed(kind));
                }
            }
        });
    };

    view! {
        <div class="geolocation-capture">
            <button
                id="geolocate-button"
                type="button"
                class="uk-button uk-button-default"
                class:success=move || status.get().is_success()
                disabled=move || status.get().button_disabled()
                on:click=on_click
            >
                {move || status.get().button_label()}
            </button>
            <p id="geolocation-status" class=move || status.get().css_class()>
                {move || status.get().message()}
            </p>
        </div>
    }
}
