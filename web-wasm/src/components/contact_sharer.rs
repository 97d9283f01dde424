//! 連絡先共有コントローラ

use crate::api::http::get_json;
use crate::dom;
use account_ui_common::contacts::{phone_check_path, MSG_LOOKUP_FAILED, MSG_UNKNOWN_NUMBER};
use account_ui_common::{Contact, ContactList, EndpointConfig, PhoneCheckResponse};
use gloo::dialogs::alert;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::MouseEvent;

/// 既存連絡先のチェックボックス名
pub const EXISTING_CONTACTS_NAME: &str = "my_contacts";
/// 新規番号を書き込む hidden フィールド
pub const PHONE_NUMBERS_INPUT_ID: &str = "phoneNumbersInput";
pub const SHARE_FORM_ID: &str = "uploadForm";

#[component]
pub fn ContactSharer(config: EndpointConfig) -> impl IntoView {
    let contacts = RwSignal::new(ContactList::new());
    let (phone_number, set_phone_number) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let phone_check_base = config.phone_check_base;

    let on_add = move |_: MouseEvent| {
        let number = phone_number.get_untracked().trim().to_string();
        if number.is_empty() {
            return;
        }
        if contacts.with_untracked(|list| list.contains(&number)) {
            alert(&account_ui_common::Error::DuplicateContact(number).to_string());
            return;
        }

        let url = phone_check_path(&phone_check_base, &number);
        set_is_loading.set(true);
        spawn_local(async move {
            let result = get_json::<PhoneCheckResponse>(&url).await;
            set_is_loading.set(false);
            match result {
                Ok(PhoneCheckResponse { exists: true }) => {
                    let mut added = Ok(());
                    contacts.update(|list| added = list.add(Contact::from_number(number)));
                    match added {
                        Ok(()) => set_phone_number.set(String::new()),
                        Err(e) => alert(&e.to_string()),
                    }
                }
                Ok(PhoneCheckResponse { exists: false }) => alert(MSG_UNKNOWN_NUMBER),
                Err(e) => {
                    tracing::error!("電話番号の確認に失敗: {:?}", e);
                    alert(MSG_LOOKUP_FAILED);
                }
            }
        });
    };

    let on_submit = move |ev: MouseEvent| {
        ev.prevent_default();
        let checked = dom::checked_count(EXISTING_CONTACTS_NAME);
        match contacts.with_untracked(|list| list.validate_submission(checked)) {
            Ok(serialized) => {
                tracing::debug!("共有する番号: {}", serialized);
                dom::set_input_value_by_id(PHONE_NUMBERS_INPUT_ID, &serialized);
                if let Err(e) = dom::submit_form(SHARE_FORM_ID) {
                    tracing::error!("フォーム送信に失敗: {:?}", e);
                }
            }
            Err(e) => alert(&e.to_string()),
        }
    };

    view! {
        <div class="contact-sharer">
            <div class="contact-input">
                <input
                    id="phoneNumberInput"
                    type="tel"
                    placeholder="Numéro de téléphone"
                    prop:value=move || phone_number.get()
                    on:input=move |ev| set_phone_number.set(event_target_value(&ev))
                />
                <button id="addPhoneNumberBtn" type="button" class="uk-button uk-button-default" on:click=on_add>
                    "Ajouter"
                </button>
                <div
                    id="loadingIndicator"
                    style:display=move || if is_loading.get() { "block" } else { "none" }
                >
                    "Vérification..."
                </div>
            </div>

            <div id="contactList" class="contact-list">
                <For
                    each=move || {
                        contacts.with(|list| {
                            list.contacts().iter().cloned().enumerate().collect::<Vec<_>>()
                        })
                    }
                    key=|(index, contact)| (*index, contact.number.clone())
                    children=move |(index, contact)| {
                        view! {
                            <span class="contact-item">
                                {contact.label()}
                                <button
                                    type="button"
                                    on:click=move |_| {
                                        contacts.update(|list| {
                                            if let Err(e) = list.remove(index) {
                                                tracing::warn!("連絡先の削除に失敗: {}", e);
                                            }
                                        });
                                    }
                                >
                                    "Supprimer"
                                </button>
                            </span>
                        }
                    }
                />
            </div>

            <button id="submitBtn" type="submit" class="uk-button uk-button-primary" on:click=on_submit>
                "Partager"
            </button>
        </div>
    }
}
