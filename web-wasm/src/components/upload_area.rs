//! アップロードエリアコンポーネント
//!
//! ドラッグ&ドロップとファイル選択ダイアログの両方からファイルを受け取る

use leptos::prelude::*;
use web_sys::{DragEvent, File, FileList, HtmlInputElement};

pub fn file_list_to_vec(list: &FileList) -> Vec<File> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

#[component]
pub fn UploadArea<F>(on_files: F) -> impl IntoView
where
    F: Fn(Vec<File>) + 'static + Clone + Send + Sync,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let file_input = NodeRef::<leptos::html::Input>::new();

    let on_drop = {
        let on_files = on_files.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
                on_files(file_list_to_vec(&files));
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            on_files(file_list_to_vec(&files));
        }
        // 同じファイルを選び直しても change が発火するように
        input.set_value("");
    };

    let open_dialog = move |_| {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    view! {
        <div
            id="dropZone"
            class="upload-area"
            class:dragover=move || is_dragover.get()
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
        >
            <div class="upload-icon">"📷"</div>
            <p>"Glissez-déposez vos photos ici"</p>
            <input
                id="fileInput"
                type="file"
                accept="image/*"
                multiple=true
                style="display: none"
                node_ref=file_input
                on:change=on_change
            />
            <button id="addMoreBtn" type="button" class="uk-button uk-button-default" on:click=open_dialog>
                "Ajouter des photos"
            </button>
        </div>
    }
}
