//! Geolocation API

use account_ui_common::geolocation::{GeolocationErrorKind, POSITION_OPTIONS};
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::PositionOptions;

/// ブラウザが `navigator.geolocation` を持っているか
pub fn is_supported() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w.navigator(), &JsValue::from_str("geolocation")).unwrap_or(false))
        .unwrap_or(false)
}

fn number_at(value: &JsValue, path: &[&str]) -> Option<f64> {
    let mut current = value.clone();
    for key in path {
        current = js_sys::Reflect::get(&current, &JsValue::from_str(key)).ok()?;
    }
    current.as_f64()
}

/// 現在地を1回取得して (緯度, 経度) を返す
pub async fn current_position() -> Result<(f64, f64), GeolocationErrorKind> {
    let geolocation = web_sys::window()
        .ok_or(GeolocationErrorKind::Unknown)?
        .navigator()
        .geolocation()
        .map_err(|_| GeolocationErrorKind::Unknown)?;

    let options = PositionOptions::new();
    options.set_enable_high_accuracy(POSITION_OPTIONS.enable_high_accuracy);
    options.set_timeout(POSITION_OPTIONS.timeout_ms);
    options.set_maximum_age(POSITION_OPTIONS.maximum_age_ms);

    let (tx, rx) = oneshot::channel::<Result<(f64, f64), GeolocationErrorKind>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move |position: JsValue| {
            let coords = number_at(&position, &["coords", "latitude"])
                .zip(number_at(&position, &["coords", "longitude"]))
                .ok_or(GeolocationErrorKind::PositionUnavailable);
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(coords);
            }
        }) as Box<dyn FnMut(JsValue)>)
    };
    let on_error = Closure::wrap(Box::new(move |error: JsValue| {
        let code = number_at(&error, &["code"]).unwrap_or(0.0) as u16;
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(Err(GeolocationErrorKind::from_code(code)));
        }
    }) as Box<dyn FnMut(JsValue)>);

    geolocation
        .get_current_position_with_error_callback_and_options(
            on_success.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
            &options,
        )
        .map_err(|_| GeolocationErrorKind::Unknown)?;

    let result = rx.await.unwrap_or(Err(GeolocationErrorKind::Unknown));
    drop((on_success, on_error));
    result
}
