// Imports
use crate::engine::{EngineView, EngineViewMut};
use crate::tools::ToolStyle;
use crate::widgetflags::WidgetFlags;
use geo::Coord;
use mapselect_geom::gesture::GestureEvent;
use mapselect_geom::query::QueryGeometry;

/// An effect a tool requests from the engine after handling a gesture.
///
/// Tools are synchronous, everything that needs remote round trips or prompts is
/// deferred to the engine through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Nothing to do.
    None,
    /// Run a spatial query with the given geometry and apply the result to the
    /// selection, subtractively when `remove` is set.
    Query {
        geometry: QueryGeometry,
        remove: bool,
    },
    /// Run a feature lookup at the coordinate and apply the result to the selection.
    FeatureLookup { coordinate: Coord<f64>, remove: bool },
    /// Pick the reference feature of a buffer flow at the coordinate.
    PickReference { coordinate: Coord<f64> },
}

/// Types of tools.
pub trait ToolBehaviour {
    /// The style the tool was created for.
    fn style(&self) -> ToolStyle;

    /// Init the tool when it gets activated.
    #[must_use]
    fn init(&mut self, view: &EngineView) -> WidgetFlags;

    /// Deinit the tool when it gets deactivated.
    #[must_use]
    fn deinit(&mut self) -> WidgetFlags;

    /// Handle a gesture event.
    #[must_use]
    fn handle_event(
        &mut self,
        event: GestureEvent,
        view: &mut EngineViewMut,
    ) -> (ToolAction, WidgetFlags);
}
