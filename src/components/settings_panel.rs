//! Settings button and drop-down panel with the reduce-motion toggle.
//!
//! The panel closes on Escape and on clicks outside it. Changing the toggle
//! applies the attribute on `<html>` and persists the choice; engines pick
//! it up on their next frame.

use leptos::prelude::*;

use crate::settings;
use crate::state::settings::SettingsState;

#[component]
pub fn SettingsPanel() -> impl IntoView {
    let state = expect_context::<RwSignal<SettingsState>>();
    let root_ref = NodeRef::<leptos::html::Div>::new();

    let on_toggle = move |_| state.update(SettingsState::toggle_panel);
    let on_change = move |ev: leptos::ev::Event| {
        let checked = event_target_checked(&ev);
        state.update(|s| {
            s.set_reduce_motion(checked);
        });
    };

    // Skip the initial value: it was read from storage or the system.
    Effect::watch(
        move || state.with(|s| s.reduce_motion),
        |enabled, _, _| {
            settings::set(*enabled);
            log::debug!("settings: reduce motion {}", if *enabled { "on" } else { "off" });
        },
        false,
    );

    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let on_keydown = window_event_listener(leptos::ev::keydown, move |ev| {
            if ev.key() == "Escape" {
                state.update(SettingsState::close_panel);
            }
        });
        let on_click = window_event_listener(leptos::ev::click, move |ev| {
            if !state.with_untracked(|s| s.panel_open) {
                return;
            }
            let Some(root) = root_ref.get_untracked() else {
                return;
            };
            let inside = ev
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
                .is_some_and(|node| root.contains(Some(&node)));
            if !inside {
                state.update(SettingsState::close_panel);
            }
        });
        on_cleanup(move || {
            on_keydown.remove();
            on_click.remove();
        });
    }

    view! {
        <div class="site-nav__settings" node_ref=root_ref>
            <button
                class="site-nav__settings-btn"
                type="button"
                title="Settings"
                aria-controls="site-settings-panel"
                aria-expanded=move || state.with(SettingsState::aria_expanded)
                on:click=on_toggle
            >
                "⚙"
            </button>
            <div
                id="site-settings-panel"
                class="site-nav__panel"
                aria-hidden=move || state.with(SettingsState::aria_hidden)
            >
                <label class="site-nav__option">
                    <input
                        id="reduce-motion-toggle"
                        type="checkbox"
                        prop:checked=move || state.with(|s| s.reduce_motion)
                        on:change=on_change
                    />
                    <span>"Reduce motion"</span>
                </label>
            </div>
        </div>
    }
}
