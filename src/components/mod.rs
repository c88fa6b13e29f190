//! Leptos components mounted into the static page.

pub mod settings_panel;
