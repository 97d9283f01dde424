//! 写真アップロードコントローラ
//!
//! 保留リスト・選択・送信の状態はマウント時に作るシグナルが持つ

use crate::api::upload::upload_photos;
use crate::bindings::{notify, NotifyStatus};
use crate::components::{
    photo_gallery::PhotoGallery, progress_bar::ProgressBar, upload_area::UploadArea,
};
use crate::dom;
use account_ui_common::{EndpointConfig, PendingFiles, UploadOutcome, UploadProgress};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{File, MouseEvent, Url};

/// 送信先を持つフォームのid
pub const UPLOAD_FORM_ID: &str = "uploadForm";

const MSG_UPLOAD_FAILED: &str = "Une erreur s'est produite lors de l'envoi des photos.";

/// 保留中のファイルとプレビュー用のオブジェクトURL
#[derive(Clone)]
pub struct Thumbnail {
    pub id: u64,
    pub file: File,
    pub url: String,
}

fn revoke(thumbnails: Vec<Thumbnail>) {
    for thumb in thumbnails {
        if let Err(e) = Url::revoke_object_url(&thumb.url) {
            tracing::warn!("オブジェクトURLの解放に失敗: {:?}", e);
        }
    }
}

#[component]
pub fn PhotoUploader(config: EndpointConfig, endpoint: Option<String>) -> impl IntoView {
    let files = RwSignal::new_local(PendingFiles::<Thumbnail>::with_capacity_limit(
        config.max_pending_files,
    ));
    let next_id = StoredValue::new(0u64);
    let (progress, set_progress) = signal(UploadProgress::default());
    let (is_uploading, set_is_uploading) = signal(false);

    let endpoint = endpoint
        .or(config.upload_endpoint)
        .or_else(|| dom::form_action(UPLOAD_FORM_ID));

    // ファイル追加ハンドラ
    let on_files = move |incoming: Vec<File>| {
        if incoming.is_empty() {
            return;
        }
        if let Err(e) = files.with_untracked(|pending| pending.check_capacity(incoming.len())) {
            notify(&e.to_string(), NotifyStatus::Danger);
            return;
        }

        let mut thumbnails = Vec::with_capacity(incoming.len());
        for file in incoming {
            match Url::create_object_url_with_blob(&file) {
                Ok(url) => {
                    let id = next_id.get_value();
                    next_id.set_value(id + 1);
                    thumbnails.push(Thumbnail { id, file, url });
                }
                Err(e) => tracing::error!("プレビューを作成できません: {:?}", e),
            }
        }

        files.update(|pending| match pending.add_batch(thumbnails) {
            Ok(added) => tracing::debug!("{}枚追加（合計{}枚）", added, pending.len()),
            Err(e) => tracing::error!("{}", e),
        });
    };

    // 選択削除ハンドラ
    let on_delete = move |_: MouseEvent| {
        let mut removed = Vec::new();
        files.update(|pending| removed = pending.delete_selected());
        revoke(removed);
    };

    // 送信ハンドラ
    let on_submit = move |ev: MouseEvent| {
        ev.prevent_default();

        if let Err(e) = files.with_untracked(|pending| pending.ensure_not_empty()) {
            notify(&e.to_string(), NotifyStatus::Danger);
            return;
        }
        let Some(endpoint) = endpoint.clone() else {
            tracing::error!("送信先が見つかりません（#{} の action）", UPLOAD_FORM_ID);
            notify(MSG_UPLOAD_FAILED, NotifyStatus::Danger);
            return;
        };

        let to_send: Vec<File> =
            files.with_untracked(|pending| pending.files().iter().map(|t| t.file.clone()).collect());
        set_progress.set(UploadProgress::default());
        set_is_uploading.set(true);

        spawn_local(async move {
            let result = upload_photos(&endpoint, &to_send, dom::csrf_token(), move |p| {
                set_progress.set(p);
            })
            .await;
            set_is_uploading.set(false);

            let outcome = match result {
                Ok((status, body)) => UploadOutcome::from_status(status, &body),
                Err(e) => {
                    tracing::error!("アップロード失敗: {:?}", e);
                    notify(MSG_UPLOAD_FAILED, NotifyStatus::Danger);
                    return;
                }
            };

            match outcome {
                Ok(UploadOutcome::Success {
                    message,
                    redirect_url,
                }) => {
                    notify(&message, NotifyStatus::Success);
                    let mut sent = Vec::new();
                    files.update(|pending| sent = pending.clear());
                    revoke(sent);
                    if let Some(url) = redirect_url {
                        dom::redirect(&url);
                    }
                }
                Ok(UploadOutcome::Failure { message }) => {
                    notify(&message, NotifyStatus::Danger);
                }
                Err(e) => {
                    tracing::error!("レスポンスを解析できません: {}", e);
                    notify(MSG_UPLOAD_FAILED, NotifyStatus::Danger);
                }
            }
        });
    };

    view! {
        <div class="photo-uploader">
            <UploadArea on_files=on_files />

            <div class="photo-counts">
                <span id="selectedCount">{move || files.with(|p| p.selected_label())}</span>
                <span id="totalCount">{move || files.with(|p| p.total_label())}</span>
            </div>

            <PhotoGallery files=files />

            <button
                id="deleteBtn"
                type="button"
                class="uk-button uk-button-danger"
                style:display=move || if files.with(|p| p.has_selection()) { "block" } else { "none" }
                on:click=on_delete
            >
                "Supprimer la sélection"
            </button>

            <Show when=move || is_uploading.get()>
                <ProgressBar progress=progress />
            </Show>

            <button
                id="submitBtn"
                type="submit"
                class="uk-button uk-button-primary"
                disabled=move || is_uploading.get()
                on:click=on_submit
            >
                "Envoyer"
            </button>
        </div>
    }
}
