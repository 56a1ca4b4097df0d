/// Flags returned to the UI widget that holds the engine.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetFlags {
    /// Needs surface redrawing.
    pub redraw: bool,
    /// Refresh the UI with the engine state (active tool, active profile).
    pub refresh_ui: bool,
    /// Whether the shared selection set was modified.
    pub selection_modified: bool,
    /// Whether the transient overlay layer was modified.
    pub overlay_modified: bool,
    /// Is Some when the live circle-radius readout visibility should be changed.
    /// Is None if it should not be changed.
    pub hide_radius_readout: Option<bool>,
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self {
            redraw: false,
            refresh_ui: false,
            selection_modified: false,
            overlay_modified: false,
            hide_radius_readout: None,
        }
    }
}

impl WidgetFlags {
    /// Merge with another WidgetFlags struct, prioritizing other for conflicting values.
    pub fn merge(&mut self, other: Self) {
        self.redraw |= other.redraw;
        self.refresh_ui |= other.refresh_ui;
        self.selection_modified |= other.selection_modified;
        self.overlay_modified |= other.overlay_modified;
        if other.hide_radius_readout.is_some() {
            self.hide_radius_readout = other.hide_radius_readout;
        }
    }
}

impl std::ops::BitOr for WidgetFlags {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self::Output {
        self.merge(rhs);
        self
    }
}

impl std::ops::BitOrAssign for WidgetFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.merge(rhs);
    }
}
