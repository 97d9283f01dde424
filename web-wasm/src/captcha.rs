//! reCAPTCHA コールバックの橋渡し
//!
//! 固定名のコールバック（onRecaptchaSuccess / Expired / Error）を window に登録する。
//! ウィジェット側が動的な名前（onSubmit_xxx）のコールバックを使う場合は、
//! `registerCaptchaCallback(name)` を1回呼んでもらう。window の走査やポーリングはしない。

use account_ui_common::CaptchaState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

const SUCCESS_CALLBACK: &str = "onRecaptchaSuccess";
const EXPIRED_CALLBACK: &str = "onRecaptchaExpired";
const ERROR_CALLBACK: &str = "onRecaptchaError";

type Handler = Rc<dyn Fn(CaptchaState)>;

/// window に置いたコールバックと、置く前の値
struct Installed {
    name: String,
    _closure: Closure<dyn FnMut(JsValue)>,
    previous: JsValue,
}

struct Bridge {
    handler: Handler,
    globals: Vec<Installed>,
}

thread_local! {
    static BRIDGE: RefCell<Option<Bridge>> = const { RefCell::new(None) };
    /// install 前に登録された名前
    static PENDING: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("window is unavailable"))
}

/// コールバックを置き、元の値を覚えておく
fn install_global(
    name: &str,
    closure: Closure<dyn FnMut(JsValue)>,
    previous: JsValue,
) -> Result<Installed, JsValue> {
    js_sys::Reflect::set(&window()?, &JsValue::from_str(name), closure.as_ref())?;
    Ok(Installed {
        name: name.to_string(),
        _closure: closure,
        previous,
    })
}

fn current_global(name: &str) -> Result<JsValue, JsValue> {
    js_sys::Reflect::get(&window()?, &JsValue::from_str(name))
}

/// 元の値に戻す（元が無ければ削除）
fn restore_global(window: &web_sys::Window, installed: &Installed) {
    let key = JsValue::from_str(&installed.name);
    let result = if installed.previous.is_undefined() {
        js_sys::Reflect::delete_property(window, &key)
    } else {
        js_sys::Reflect::set(window, &key, &installed.previous)
    };
    if let Err(e) = result {
        tracing::warn!("{} を戻せません: {:?}", installed.name, e);
    }
}

fn fixed_callback(handler: Handler, state: CaptchaState) -> Closure<dyn FnMut(JsValue)> {
    Closure::wrap(Box::new(move |_token: JsValue| {
        tracing::info!("reCAPTCHA: {:?}", state);
        handler(state);
    }) as Box<dyn FnMut(JsValue)>)
}

/// 既存の関数を呼んでから成功を通知するラッパー
fn wrapping_callback(name: &str, handler: Handler, previous: &JsValue) -> Closure<dyn FnMut(JsValue)> {
    let original = previous.clone().dyn_into::<js_sys::Function>().ok();
    let name = name.to_string();

    Ok(Closure::wrap(Box::new(move |token: JsValue| {
        tracing::info!("reCAPTCHA validated for '{}'", name);
        if let Some(original) = &original {
            if let Err(e) = original.call1(&JsValue::NULL, &token) {
                tracing::error!("元のコールバックが失敗: {:?}", e);
            }
        }
        handler(CaptchaState::Completed);
    }) as Box<dyn FnMut(JsValue)>)
}

fn wrap_into(bridge: &mut Bridge, name: &str) -> Result<(), JsValue> {
    if bridge.globals.iter().any(|installed| installed.name == name) {
        return Ok(());
    }
    let previous = current_global(name)?;
    let closure = wrapping_callback(name, bridge.handler.clone(), &previous);
    bridge.globals.push(install_global(name, closure, previous)?);
    Ok(())
}

/// 登録を解除するガード（dropで登録前の値に戻す）
pub struct CaptchaGuard {
    _private: (),
}

impl Drop for CaptchaGuard {
    fn drop(&mut self) {
        let bridge = BRIDGE.with(|b| b.borrow_mut().take());
        if let (Some(bridge), Some(window)) = (bridge, web_sys::window()) {
            // 後から置いたものから戻す
            for installed in bridge.globals.iter().rev() {
                restore_global(&window, installed);
            }
        }
    }
}

/// 固定名のコールバックを登録し、保留中の動的コールバックも包む
pub fn install<F>(handler: F) -> Result<CaptchaGuard, JsValue>
where
    F: Fn(CaptchaState) + 'static,
{
    let handler: Handler = Rc::new(handler);
    let mut bridge = Bridge {
        handler: handler.clone(),
        globals: Vec::new(),
    };

    for (name, state) in [
        (SUCCESS_CALLBACK, CaptchaState::Completed),
        (EXPIRED_CALLBACK, CaptchaState::Expired),
        (ERROR_CALLBACK, CaptchaState::Errored),
    ] {
        let previous = current_global(name)?;
        let closure = fixed_callback(handler.clone(), state);
        bridge.globals.push(install_global(name, closure, previous)?);
    }

    for name in PENDING.with(|p| std::mem::take(&mut *p.borrow_mut())) {
        wrap_into(&mut bridge, &name)?;
    }

    BRIDGE.with(|b| *b.borrow_mut() = Some(bridge));
    Ok(CaptchaGuard { _private: () })
}

/// ウィジェット側から動的な名前のコールバックを登録する
#[wasm_bindgen(js_name = registerCaptchaCallback)]
pub fn register_captcha_callback(name: &str) -> Result<(), JsValue> {
    BRIDGE.with(|b| match b.borrow_mut().as_mut() {
        Some(bridge) => wrap_into(bridge, name),
        None => {
            tracing::debug!("登録フォーム初期化前のため保留: {}", name);
            PENDING.with(|p| p.borrow_mut().push(name.to_string()));
            Ok(())
        }
    })
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn call_global(name: &str) {
        let window = web_sys::window().expect("window");
        let callback = js_sys::Reflect::get(&window, &JsValue::from_str(name))
            .expect("get")
            .dyn_into::<js_sys::Function>()
            .expect("function");
        callback
            .call1(&JsValue::NULL, &JsValue::from_str("token"))
            .expect("call");
    }

    fn has_global(name: &str) -> bool {
        let window = web_sys::window().expect("window");
        js_sys::Reflect::has(&window, &JsValue::from_str(name)).unwrap_or(false)
    }

    #[wasm_bindgen_test]
    fn wasm_fixed_callbacks_report_state() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let guard = install(move |state| sink.borrow_mut().push(state)).expect("install");

        call_global(SUCCESS_CALLBACK);
        call_global(EXPIRED_CALLBACK);
        call_global(ERROR_CALLBACK);
        assert_eq!(
            *events.borrow(),
            vec![
                CaptchaState::Completed,
                CaptchaState::Expired,
                CaptchaState::Errored
            ]
        );

        drop(guard);
        assert!(!has_global(SUCCESS_CALLBACK));
    }

    #[wasm_bindgen_test]
    fn wasm_registered_callback_wraps_original() {
        let original_calls = Rc::new(RefCell::new(0));
        let counter = original_calls.clone();
        let original = Closure::wrap(Box::new(move |_token: JsValue| {
            *counter.borrow_mut() += 1;
        }) as Box<dyn FnMut(JsValue)>);
        let window = web_sys::window().expect("window");
        js_sys::Reflect::set(&window, &JsValue::from_str("onSubmit_test"), original.as_ref())
            .expect("set original");

        // install 前の登録は保留される
        register_captcha_callback("onSubmit_test").expect("register");

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let guard = install(move |state| sink.borrow_mut().push(state)).expect("install");

        call_global("onSubmit_test");
        assert_eq!(*original_calls.borrow(), 1);
        assert_eq!(*events.borrow(), vec![CaptchaState::Completed]);

        // 解除後はウィジェット自身のコールバックが残る
        drop(guard);
        assert!(has_global("onSubmit_test"));
        call_global("onSubmit_test");
        assert_eq!(*original_calls.borrow(), 2);
        assert_eq!(events.borrow().len(), 1);

        js_sys::Reflect::delete_property(&window, &JsValue::from_str("onSubmit_test"))
            .expect("cleanup");
    }
}
