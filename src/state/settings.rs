//! Settings panel state: whether the panel is open and whether motion is
//! reduced.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettingsState {
    pub panel_open: bool,
    pub reduce_motion: bool,
}

impl SettingsState {
    /// Initial state with the panel closed.
    pub fn with_reduce_motion(reduce_motion: bool) -> Self {
        Self { panel_open: false, reduce_motion }
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Returns `true` when the value changed.
    pub fn set_reduce_motion(&mut self, enabled: bool) -> bool {
        let changed = self.reduce_motion != enabled;
        self.reduce_motion = enabled;
        changed
    }

    /// `aria-expanded` value for the toggle button.
    pub fn aria_expanded(&self) -> &'static str {
        if self.panel_open { "true" } else { "false" }
    }

    /// `aria-hidden` value for the panel.
    pub fn aria_hidden(&self) -> &'static str {
        if self.panel_open { "false" } else { "true" }
    }
}
