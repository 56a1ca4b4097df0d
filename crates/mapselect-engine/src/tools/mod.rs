// Modules
pub mod bufferselect;
pub mod clickselect;
pub mod sketchselect;
pub mod toolbehaviour;
pub mod toolholder;

// Re-exports
pub use bufferselect::BufferSelect;
pub use clickselect::ClickSelect;
pub use sketchselect::SketchSelect;
pub use toolbehaviour::{ToolAction, ToolBehaviour};
pub use toolholder::ToolHolder;

// Imports
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The selection tool styles.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename = "tool_style")]
pub enum ToolStyle {
    #[default]
    #[serde(rename = "click")]
    Click,
    #[serde(rename = "box")]
    Box,
    #[serde(rename = "circle")]
    Circle,
    #[serde(rename = "polygon")]
    Polygon,
    #[serde(rename = "buffer")]
    Buffer,
    #[serde(rename = "line")]
    Line,
}

impl std::fmt::Display for ToolStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Click => "click",
                Self::Box => "box",
                Self::Circle => "circle",
                Self::Polygon => "polygon",
                Self::Buffer => "buffer",
                Self::Line => "line",
            }
        )
    }
}

impl FromStr for ToolStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "box" => Ok(Self::Box),
            "circle" => Ok(Self::Circle),
            "polygon" => Ok(Self::Polygon),
            "buffer" => Ok(Self::Buffer),
            "line" => Ok(Self::Line),
            s => Err(anyhow::anyhow!(
                "Could not parse `{s}` as a valid tool style."
            )),
        }
    }
}

/// The gesture surface collaborator, told which sketch mode to run the pointer in.
///
/// The engine pairs every `begin_mode` with an `end_mode` for the same style, at most
/// one mode is live at a time.
pub trait GestureSurface {
    fn begin_mode(&self, style: ToolStyle);
    fn end_mode(&self, style: ToolStyle);
}

/// A tool instance. The sketch based styles share one implementation.
#[derive(Debug)]
pub enum Tool {
    Click(ClickSelect),
    Sketch(SketchSelect),
    Buffer(BufferSelect),
}

pub(crate) fn new_tool(style: ToolStyle) -> Tool {
    match style {
        ToolStyle::Click => Tool::Click(ClickSelect::default()),
        ToolStyle::Buffer => Tool::Buffer(BufferSelect::default()),
        ToolStyle::Box | ToolStyle::Circle | ToolStyle::Polygon | ToolStyle::Line => {
            Tool::Sketch(SketchSelect::new(style))
        }
    }
}

impl ToolBehaviour for Tool {
    fn style(&self) -> ToolStyle {
        match self {
            Self::Click(click) => click.style(),
            Self::Sketch(sketch) => sketch.style(),
            Self::Buffer(buffer) => buffer.style(),
        }
    }

    fn init(&mut self, view: &crate::engine::EngineView) -> crate::WidgetFlags {
        match self {
            Self::Click(click) => click.init(view),
            Self::Sketch(sketch) => sketch.init(view),
            Self::Buffer(buffer) => buffer.init(view),
        }
    }

    fn deinit(&mut self) -> crate::WidgetFlags {
        match self {
            Self::Click(click) => click.deinit(),
            Self::Sketch(sketch) => sketch.deinit(),
            Self::Buffer(buffer) => buffer.deinit(),
        }
    }

    fn handle_event(
        &mut self,
        event: mapselect_geom::gesture::GestureEvent,
        view: &mut crate::engine::EngineViewMut,
    ) -> (ToolAction, crate::WidgetFlags) {
        match self {
            Self::Click(click) => click.handle_event(event, view),
            Self::Sketch(sketch) => sketch.handle_event(event, view),
            Self::Buffer(buffer) => buffer.handle_event(event, view),
        }
    }
}
