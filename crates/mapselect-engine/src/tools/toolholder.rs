// Imports
use crate::engine::{EngineView, EngineViewMut};
use crate::tools::toolbehaviour::{ToolAction, ToolBehaviour};
use crate::tools::{new_tool, BufferSelect, GestureSurface, Tool, ToolStyle};
use crate::widgetflags::WidgetFlags;
use mapselect_geom::gesture::GestureEvent;
use tracing::debug;

#[derive(Debug)]
enum ToolState {
    Disabled,
    Enabled { style: ToolStyle, tool: Tool },
}

/// Holds the current tool and manages the transitions between tools and between the
/// enabled and disabled state.
#[derive(Debug)]
pub struct ToolHolder {
    state: ToolState,
}

impl Default for ToolHolder {
    fn default() -> Self {
        Self {
            state: ToolState::Disabled,
        }
    }
}

impl ToolHolder {
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, ToolState::Enabled { .. })
    }

    pub fn current_style(&self) -> Option<ToolStyle> {
        match &self.state {
            ToolState::Disabled => None,
            ToolState::Enabled { style, .. } => Some(*style),
        }
    }

    /// Enable or disable selection. Enabling activates the given tool, disabling
    /// deinits and ends the current one.
    #[must_use]
    pub fn set_enabled(
        &mut self,
        enabled: bool,
        style: ToolStyle,
        view: &EngineView,
        surface: &dyn GestureSurface,
    ) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();

        match (&mut self.state, enabled) {
            (ToolState::Disabled, true) => {
                let mut tool = new_tool(style);
                widget_flags |= tool.init(view);
                surface.begin_mode(style);
                self.state = ToolState::Enabled { style, tool };
                widget_flags.refresh_ui = true;
            }
            (ToolState::Enabled { style, tool }, false) => {
                widget_flags |= tool.deinit();
                surface.end_mode(*style);
                self.state = ToolState::Disabled;
                widget_flags.refresh_ui = true;
            }
            _ => {}
        }

        widget_flags
    }

    /// Switch to another tool style while enabled. Styles not offered by the
    /// configuration are rejected.
    #[must_use]
    pub fn change_style(
        &mut self,
        new_style: ToolStyle,
        view: &EngineView,
        surface: &dyn GestureSurface,
    ) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();

        let ToolState::Enabled { style, tool } = &mut self.state else {
            return widget_flags;
        };
        if *style == new_style {
            return widget_flags;
        }
        if !view.config.tools.contains(&new_style) {
            debug!("Tool style `{new_style}` is not offered by the configuration, ignoring the switch.");
            return widget_flags;
        }

        widget_flags |= tool.deinit();
        surface.end_mode(*style);

        let mut tool = new_tool(new_style);
        widget_flags |= tool.init(view);
        surface.begin_mode(new_style);
        self.state = ToolState::Enabled {
            style: new_style,
            tool,
        };
        widget_flags.refresh_ui = true;
        widget_flags
    }

    /// Forward a gesture event to the current tool.
    #[must_use]
    pub fn handle_event(
        &mut self,
        event: GestureEvent,
        view: &mut EngineViewMut,
    ) -> (ToolAction, WidgetFlags) {
        match &mut self.state {
            ToolState::Disabled => (ToolAction::None, WidgetFlags::default()),
            ToolState::Enabled { tool, .. } => tool.handle_event(event, view),
        }
    }

    /// The buffer tool instance, when it is the current tool.
    pub fn buffer_select_mut(&mut self) -> Option<&mut BufferSelect> {
        match &mut self.state {
            ToolState::Enabled {
                tool: Tool::Buffer(buffer),
                ..
            } => Some(buffer),
            _ => None,
        }
    }
}
