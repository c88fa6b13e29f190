//! Page boot: wires every effect to the elements present in the document.
//!
//! Each effect is optional. A page without a project grid, featured window,
//! title, hero canvas or clock boots the rest unchanged.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use tilt::config::EngineConfig;

/// Container watched for project cards, including ones added later.
pub const CARD_CONTAINER: &str = ".grid";
pub const CARD_SELECTOR: &str = ".card";
pub const FEATURED_SELECTOR: &str = ".header__featured";
pub const TITLE_SELECTOR: &str = ".header__title";
pub const PARTICLES_ID: &str = "hero-particles";
pub const TIMESTAMP_ID: &str = "timestamp";
/// Element the settings panel is mounted into.
pub const SETTINGS_MOUNT: &str = ".site-nav";

/// Preset for project cards.
pub fn card_preset() -> EngineConfig {
    EngineConfig::card()
}

/// Preset for the featured browser window.
pub fn featured_preset() -> EngineConfig {
    EngineConfig::window()
}

#[cfg(feature = "csr")]
pub use browser::boot;

#[cfg(feature = "csr")]
mod browser {
    use std::cell::RefCell;

    use leptos::prelude::*;
    use tilt::dom::DomTilt;
    use tilt::registry::{TiltRegistry, attach_element};
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement};

    use super::*;
    use crate::components::settings_panel::SettingsPanel;
    use crate::state::settings::SettingsState;
    use crate::{clock, particles, projects, scramble, settings, terminal};

    thread_local! {
        static REGISTRIES: RefCell<Vec<TiltRegistry>> = const { RefCell::new(Vec::new()) };
        static STANDALONE: RefCell<Vec<DomTilt>> = const { RefCell::new(Vec::new()) };
    }

    fn query_html(document: &Document, selector: &str) -> Option<HtmlElement> {
        match document.query_selector(selector) {
            Ok(found) => found.and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            Err(err) => {
                log::warn!("boot: bad selector {selector:?}: {err:?}");
                None
            }
        }
    }

    fn mount_settings(document: &Document, reduce_motion: bool) {
        let Some(host) = query_html(document, SETTINGS_MOUNT) else {
            log::debug!("boot: no {SETTINGS_MOUNT}; settings panel skipped");
            return;
        };
        let handle = leptos::mount::mount_to(host, move || {
            provide_context(RwSignal::new(SettingsState::with_reduce_motion(reduce_motion)));
            view! { <SettingsPanel/> }
        });
        handle.forget();
    }

    fn watch_cards(document: &Document) {
        let Some(grid) = document.query_selector(CARD_CONTAINER).ok().flatten() else {
            return;
        };
        projects::attach(document, &grid);
        let registry = TiltRegistry::watch(grid, CARD_SELECTOR, card_preset());
        log::info!("boot: {} project cards", registry.len());
        REGISTRIES.with(|registries| registries.borrow_mut().push(registry));
    }

    fn attach_featured(document: &Document) {
        let Some(featured) = query_html(document, FEATURED_SELECTOR) else {
            return;
        };
        if let Some(tilt) = attach_element(&featured, &featured_preset()) {
            STANDALONE.with(|tilts| tilts.borrow_mut().push(tilt));
        }
    }

    /// Attach every effect to the current document.
    pub fn boot() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let reduce_motion = settings::read_preference();
        settings::apply(reduce_motion);
        mount_settings(&document, reduce_motion);

        watch_cards(&document);
        attach_featured(&document);

        if let Some(title) = document.query_selector(TITLE_SELECTOR).ok().flatten() {
            scramble::attach(&title);
        }
        if let Some(canvas) = document
            .get_element_by_id(PARTICLES_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            particles::attach(canvas);
        }
        terminal::attach(&document);
        if let Some(timestamp) = document.get_element_by_id(TIMESTAMP_ID) {
            clock::attach(timestamp);
        }
        log::info!("boot: ready (reduce motion {})", if reduce_motion { "on" } else { "off" });
    }
}
