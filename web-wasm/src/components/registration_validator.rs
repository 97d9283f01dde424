//! 登録フォームの検証
//!
//! サーバー描画の入力欄を監視し、パスワード条件の表示・状態メッセージ・
//! 送信ボタンの有効/無効を更新する。会社欄の座標が空なら住所から補完する。

use crate::api::http::get_json;
use crate::captcha::{self, CaptchaGuard};
use crate::dom;
use account_ui_common::geocode::first_coordinates;
use account_ui_common::registration::CAPTCHA_FIELD_ERROR;
use account_ui_common::{
    CaptchaState, CompanyFields, EndpointConfig, NominatimApi, NominatimHit, PasswordRule,
    PersonalFields, RegistrationForm,
};
use gloo::events::EventListener;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{Element, EventTarget};

const SUBMIT_SELECTOR: &str = ".submit";
const PASSWORD: &str = "password";
const PASSWORD_CONFIRM: &str = "password1";
const PERSONAL_INPUTS: [&str; 6] = [
    "first_name",
    "last_name",
    "email",
    "phone_number",
    PASSWORD,
    PASSWORD_CONFIRM,
];
const COMPANY_CATEGORY: &str = "company_category";
const COMPANY_LATITUDE: &str = "company_latitude";
const COMPANY_LONGITUDE: &str = "company_longitude";
const COMPANY_INPUTS: [&str; 7] = [
    "company_name",
    "company_siret",
    "company_address",
    "company_postal_code",
    "company_city",
    COMPANY_LATITUDE,
    COMPANY_LONGITUDE,
];

/// 会社欄がすべて揃っているページのみ会社情報を読む
fn read_company() -> Option<CompanyFields> {
    let category = dom::select_by_name(COMPANY_CATEGORY)?;
    if COMPANY_INPUTS.iter().any(|name| dom::input_by_name(name).is_none()) {
        return None;
    }
    Some(CompanyFields {
        name: dom::input_value("company_name"),
        siret: dom::input_value("company_siret"),
        category: category.value(),
        category_placeholder_selected: dom::placeholder_selected(&category),
        address: dom::input_value("company_address"),
        postal_code: dom::input_value("company_postal_code"),
        city: dom::input_value("company_city"),
        latitude: dom::input_value(COMPANY_LATITUDE),
        longitude: dom::input_value(COMPANY_LONGITUDE),
    })
}

/// 現在の入力値からフォーム状態を作る
pub fn read_form() -> RegistrationForm {
    RegistrationForm {
        personal: PersonalFields {
            first_name: dom::input_value("first_name"),
            last_name: dom::input_value("last_name"),
            email: dom::input_value("email"),
            phone_number: dom::input_value("phone_number"),
            password: dom::input_value(PASSWORD),
            password_confirm: dom::input_value(PASSWORD_CONFIRM),
        },
        company: read_company(),
    }
}

fn field_target(name: &str) -> Option<EventTarget> {
    dom::query::<EventTarget>(&format!("[name=\"{}\"]", name))
}

#[component]
pub fn RegistrationValidator(config: EndpointConfig) -> impl IntoView {
    let form = RwSignal::new(read_form());
    let captcha_state = RwSignal::new(CaptchaState::Pending);
    // 直前の reCAPTCHA イベント（次の入力まで状態欄に表示）
    let captcha_event = RwSignal::new(None::<CaptchaState>);
    let show_conditions = RwSignal::new(false);

    let state = Memo::new(move |_| form.with(|f| f.evaluate(captcha_state.get())));
    let check = Memo::new(move |_| form.with(|f| f.password_check()));

    let listeners = StoredValue::new_local(Vec::<EventListener>::new());
    let captcha_guard = StoredValue::new_local(None::<CaptchaGuard>);
    let last_geocode = StoredValue::new(None::<String>);
    let nominatim = NominatimApi::new(config.nominatim_base);

    // 入力欄の監視
    let mut attached = Vec::new();
    let watched = PERSONAL_INPUTS
        .iter()
        .chain(std::iter::once(&COMPANY_CATEGORY))
        .chain(COMPANY_INPUTS.iter());
    for name in watched {
        let Some(target) = field_target(name) else {
            continue;
        };
        for event in ["input", "change"] {
            attached.push(dom::listen(&target, event, move |_| {
                captcha_event.set(None);
                form.set(read_form());
            }));
        }
    }
    if let Some(password) = field_target(PASSWORD) {
        attached.push(dom::listen(&password, "focus", move |_| {
            show_conditions.set(true);
        }));
        attached.push(dom::listen(&password, "blur", move |_| {
            if dom::input_value(PASSWORD).is_empty() {
                show_conditions.set(false);
            }
        }));
    }
    listeners.set_value(attached);

    // reCAPTCHA コールバック
    match captcha::install(move |event| {
        captcha_state.set(event);
        form.set(read_form());
        captcha_event.set(Some(event));
        if event == CaptchaState::Errored {
            dom::append_notice_once(".captcha-field", "captcha-error", CAPTCHA_FIELD_ERROR);
        }
    }) {
        Ok(guard) => captcha_guard.set_value(Some(guard)),
        Err(e) => tracing::error!("reCAPTCHA コールバックを登録できません: {:?}", e),
    }

    // 送信ボタン
    Effect::new(move |_| {
        let state = state.get();
        let disabled = !state.submit_enabled();
        if let Some(button) = dom::query::<Element>(SUBMIT_SELECTOR) {
            dom::set_disabled(&button, disabled);
        }
        tracing::debug!(
            password_valid = state.password_valid,
            captcha_completed = state.captcha_completed,
            fields_filled = state.fields_filled,
            passwords_match = state.passwords_match,
            button_disabled = disabled,
            "registration form state"
        );
    });

    // 会社座標の補完（同じ住所では1回だけ）
    Effect::new(move |_| {
        let Some(query) = form.with(|f| f.pending_geocode()) else {
            return;
        };
        if last_geocode.with_value(|last| last.as_deref() == Some(query.as_str())) {
            return;
        }
        last_geocode.set_value(Some(query.clone()));

        let url = nominatim.search_url(&query);
        spawn_local(async move {
            match get_json::<Vec<NominatimHit>>(&url).await {
                Ok(hits) => {
                    if let Some((lat, lon)) = first_coordinates(&hits) {
                        tracing::info!("会社住所を座標に変換: {} -> {}, {}", query, lat, lon);
                        dom::set_input_value(COMPANY_LATITUDE, &lat);
                        dom::set_input_value(COMPANY_LONGITUDE, &lon);
                        form.set(read_form());
                    }
                }
                Err(e) => tracing::error!("Erreur lors du géocodage: {:?}", e),
            }
        });
    });

    let status_text = move || match captcha_event.get() {
        Some(event) => event.event_message().unwrap_or_default(),
        None => state.get().status().message(),
    };
    let status_color = move || match captcha_event.get() {
        Some(CaptchaState::Completed) => "#37b24d",
        Some(_) => "#ff6b6b",
        None => state.get().status().color(),
    };

    view! {
        <div class="registration-validator">
            <ul
                id="password-conditions"
                style:display=move || if show_conditions.get() { "block" } else { "none" }
            >
                {PasswordRule::ALL
                    .into_iter()
                    .map(|rule| {
                        view! {
                            <li
                                id=rule.element_id()
                                class:valid=move || check.get().passes(rule)
                                class:invalid=move || !check.get().passes(rule)
                            >
                                {rule.description()}
                            </li>
                        }
                    })
                    .collect::<Vec<_>>()}
            </ul>
            <p id="form-status" style:color=status_color>
                {status_text}
            </p>
        </div>
    }
}
