//! Account UI page controllers (Leptos + WASM)

mod api;
mod app;
mod bindings;
pub mod captcha;
mod components;
pub mod dom;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let config = app::load_config();
    app::mount_controllers(config);
}
