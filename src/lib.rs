//! # folio
//!
//! Browser effects for a portfolio page, compiled to WebAssembly: pointer
//! tilt on project cards and the featured window (via the `tilt` crate), a
//! decode effect on the page title, a drifting particle field and fake
//! terminal logs behind the hero, a UTC clock, project card routing and
//! filtering, and a settings panel whose reduce-motion switch every effect
//! honours.
//!
//! Browser code sits behind the `csr` feature; without it the crate builds
//! natively so the pure parts can be tested.

pub mod app;
pub mod clock;
pub mod components;
pub mod particles;
pub mod projects;
pub mod scramble;
pub mod settings;
pub mod state;
pub mod terminal;
pub mod util;

/// WASM entry point.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    app::boot();
}
