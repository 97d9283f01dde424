//! サムネイルグリッドコンポーネント

use crate::components::photo_uploader::Thumbnail;
use account_ui_common::PendingFiles;
use leptos::prelude::*;

#[component]
pub fn PhotoGallery(files: RwSignal<PendingFiles<Thumbnail>, LocalStorage>) -> impl IntoView {
    view! {
        <div id="previewGrid" class="photo-gallery">
            <For
                each=move || {
                    files.with(|pending| {
                        pending
                            .files()
                            .iter()
                            .enumerate()
                            .map(|(index, thumb)| (index, thumb.id, thumb.url.clone()))
                            .collect::<Vec<_>>()
                    })
                }
                key=|(index, id, _)| (*index, *id)
                children=move |(index, _, url)| {
                    view! {
                        <img
                            src=url
                            class="grid-item"
                            class:selected=move || files.with(|pending| pending.is_selected(index))
                            on:click=move |_| {
                                files.update(|pending| {
                                    if let Err(e) = pending.toggle(index) {
                                        tracing::warn!("選択の切り替えに失敗: {}", e);
                                    }
                                });
                            }
                        />
                    }
                }
            />
        </div>
    }
}
