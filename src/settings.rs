//! Reduce-motion preference: read, apply, persist.
//!
//! The preference lives in `localStorage` and is mirrored onto `<html>` as
//! the attribute every motion effect checks before animating. With nothing
//! stored, the system `prefers-reduced-motion` media query decides.
//! Non-browser builds read `false` and treat writes as no-ops.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

pub use tilt::consts::REDUCE_MOTION_ATTR;
pub use tilt::dom::DocumentMotionGate;

#[cfg(feature = "csr")]
const STORAGE_KEY: &str = "folio_reduce_motion";

/// Decode a stored preference value. Anything but `"true"` means off.
pub fn parse_stored(raw: &str) -> bool {
    raw.trim() == "true"
}

/// Encode a preference for storage.
pub fn encode(enabled: bool) -> &'static str {
    if enabled { "true" } else { "false" }
}

/// Read the reduce-motion preference.
///
/// A stored value wins; otherwise the system media query is consulted.
pub fn read_preference() -> bool {
    #[cfg(feature = "csr")]
    {
        let Some(window) = web_sys::window() else {
            return false;
        };

        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(value)) = storage.get_item(STORAGE_KEY) {
                return parse_stored(&value);
            }
        }

        match window.match_media("(prefers-reduced-motion: reduce)") {
            Ok(Some(query)) => query.matches(),
            _ => false,
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        false
    }
}

/// Set or remove the reduce-motion attribute on `<html>`.
pub fn apply(enabled: bool) {
    #[cfg(feature = "csr")]
    {
        let Some(html) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        let result = if enabled {
            html.set_attribute(REDUCE_MOTION_ATTR, "true")
        } else {
            html.remove_attribute(REDUCE_MOTION_ATTR)
        };
        if let Err(err) = result {
            log::warn!("settings: failed to update {REDUCE_MOTION_ATTR}: {err:?}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = enabled;
    }
}

/// Persist the preference to `localStorage`.
pub fn save(enabled: bool) {
    #[cfg(feature = "csr")]
    {
        let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.local_storage()) else {
            return;
        };
        if let Err(err) = storage.set_item(STORAGE_KEY, encode(enabled)) {
            log::warn!("settings: failed to persist preference: {err:?}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = enabled;
    }
}

/// Apply and persist in one step.
pub fn set(enabled: bool) {
    apply(enabled);
    save(enabled);
}
