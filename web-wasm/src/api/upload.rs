//! XHRによる写真アップロード
//!
//! fetch では送信側の進捗が取れないため XMLHttpRequest を使う

use account_ui_common::csrf::CSRF_HEADER;
use account_ui_common::uploader::{UploadProgress, UPLOAD_FIELD};
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

/// 全ファイルを multipart で送信し、(ステータス, 本文) を返す
///
/// # Arguments
/// * `endpoint` - 送信先（フォームのaction）
/// * `files` - `photos` フィールドとして繰り返し追加する
/// * `csrf_token` - `X-CSRFToken` ヘッダに載せる
/// * `on_progress` - 送信バイト数の通知
pub async fn upload_photos<F>(
    endpoint: &str,
    files: &[File],
    csrf_token: Option<String>,
    on_progress: F,
) -> Result<(u16, String), JsValue>
where
    F: Fn(UploadProgress) + 'static,
{
    let form = FormData::new()?;
    for file in files {
        form.append_with_blob(UPLOAD_FIELD, file)?;
    }

    let xhr = XmlHttpRequest::new()?;
    xhr.open_with_async("POST", endpoint, true)?;
    match csrf_token {
        Some(token) => xhr.set_request_header(CSRF_HEADER, &token)?,
        None => tracing::warn!("csrftoken クッキーがありません"),
    }

    let progress = Closure::wrap(Box::new(move |ev: ProgressEvent| {
        if ev.length_computable() {
            on_progress(UploadProgress::new(ev.loaded() as u64, ev.total() as u64));
        }
    }) as Box<dyn FnMut(_)>);
    xhr.upload()?
        .set_onprogress(Some(progress.as_ref().unchecked_ref()));

    let completion = Completion::watch(&xhr);
    xhr.send_with_opt_form_data(Some(&form))?;

    let finished = completion.wait().await;
    // 完了まで進捗クロージャを生かしておく
    drop(progress);
    finished?;

    let status = xhr.status()?;
    let body = xhr.response_text()?.unwrap_or_default();
    Ok((status, body))
}

type Sender = Rc<RefCell<Option<oneshot::Sender<Result<(), JsValue>>>>>;

/// XHRの終了イベント待ち
///
/// load 以外（error / abort / timeout）はすべて失敗として返す
struct Completion {
    rx: oneshot::Receiver<Result<(), JsValue>>,
    _handlers: Vec<Closure<dyn FnMut()>>,
}

fn settle(tx: &Sender, result: Result<(), JsValue>) -> Closure<dyn FnMut()> {
    let tx = tx.clone();
    let mut result = Some(result);
    Closure::wrap(Box::new(move || {
        if let (Some(tx), Some(result)) = (tx.borrow_mut().take(), result.take()) {
            let _ = tx.send(result);
        }
    }) as Box<dyn FnMut()>)
}

impl Completion {
    fn watch(xhr: &XmlHttpRequest) -> Self {
        let (tx, rx) = oneshot::channel();
        let tx: Sender = Rc::new(RefCell::new(Some(tx)));

        let onload = settle(&tx, Ok(()));
        let onerror = settle(&tx, Err(JsValue::from_str("network error")));
        let onabort = settle(&tx, Err(JsValue::from_str("upload aborted")));
        let ontimeout = settle(&tx, Err(JsValue::from_str("upload timed out")));

        xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        xhr.set_onabort(Some(onabort.as_ref().unchecked_ref()));
        xhr.set_ontimeout(Some(ontimeout.as_ref().unchecked_ref()));

        Self {
            rx,
            _handlers: vec![onload, onerror, onabort, ontimeout],
        }
    }

    async fn wait(self) -> Result<(), JsValue> {
        let Self { rx, _handlers } = self;
        rx.await
            .map_err(|_| JsValue::from_str("upload cancelled"))?
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn wasm_aborted_upload_settles_with_error() {
        let xhr = XmlHttpRequest::new().expect("xhr");
        xhr.open_with_async("POST", "/upload-never-answers/", true)
            .expect("open");
        let completion = Completion::watch(&xhr);
        xhr.send().expect("send");
        xhr.abort().expect("abort");

        let result = completion.wait().await;
        assert_eq!(
            result.unwrap_err().as_string().as_deref(),
            Some("upload aborted")
        );
    }

    #[wasm_bindgen_test]
    async fn wasm_first_event_wins() {
        let xhr = XmlHttpRequest::new().expect("xhr");
        xhr.open_with_async("POST", "/upload-never-answers/", true)
            .expect("open");
        let completion = Completion::watch(&xhr);
        xhr.send().expect("send");
        xhr.abort().expect("abort");
        // abort 後に届いた error は無視される
        xhr.dispatch_event(&web_sys::Event::new("error").expect("event"))
            .expect("dispatch");

        let result = completion.wait().await;
        assert_eq!(
            result.unwrap_err().as_string().as_deref(),
            Some("upload aborted")
        );
    }
}
