// Imports
use crate::engine::{EngineView, EngineViewMut};
use crate::tools::toolbehaviour::{ToolAction, ToolBehaviour};
use crate::tools::ToolStyle;
use crate::widgetflags::WidgetFlags;
use mapselect_geom::gesture::GestureEvent;

/// Where the buffer flow currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BufferStage {
    /// Waiting for a click on the reference feature.
    #[default]
    AwaitPick,
    /// A disambiguation prompt is open.
    AwaitChoice,
    /// The radius prompt is open.
    AwaitRadius,
}

/// Buffer selection.
///
/// The tool only picks the reference feature, the engine runs the prompts and the
/// final zone query. While a prompt is open further clicks are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferSelect {
    stage: BufferStage,
}

impl BufferSelect {
    pub fn stage(&self) -> BufferStage {
        self.stage
    }

    pub fn set_stage(&mut self, stage: BufferStage) {
        self.stage = stage;
    }
}

impl ToolBehaviour for BufferSelect {
    fn style(&self) -> ToolStyle {
        ToolStyle::Buffer
    }

    fn init(&mut self, _view: &EngineView) -> WidgetFlags {
        self.stage = BufferStage::AwaitPick;
        WidgetFlags::default()
    }

    fn deinit(&mut self) -> WidgetFlags {
        self.stage = BufferStage::AwaitPick;
        WidgetFlags::default()
    }

    fn handle_event(
        &mut self,
        event: GestureEvent,
        _view: &mut EngineViewMut,
    ) -> (ToolAction, WidgetFlags) {
        match event {
            GestureEvent::Click { coordinate, .. } if self.stage == BufferStage::AwaitPick => {
                (ToolAction::PickReference { coordinate }, WidgetFlags::default())
            }
            _ => (ToolAction::None, WidgetFlags::default()),
        }
    }
}
