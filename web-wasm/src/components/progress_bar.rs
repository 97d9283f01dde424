//! プログレスバーコンポーネント

use account_ui_common::UploadProgress;
use leptos::prelude::*;

#[component]
pub fn ProgressBar(progress: ReadSignal<UploadProgress>) -> impl IntoView {
    view! {
        <div class="progress">
            <div
                class="bar"
                style=move || format!("width: {}%", progress.get().percent())
            />
            <span id="progress-percentage">{move || progress.get().percent_label()}</span>
            <span id="progress-count">{move || progress.get().count_label()}</span>
        </div>
    }
}
