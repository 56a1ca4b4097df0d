// Imports
use crate::engine::{EngineView, EngineViewMut};
use crate::tools::toolbehaviour::{ToolAction, ToolBehaviour};
use crate::tools::ToolStyle;
use crate::widgetflags::WidgetFlags;
use geo::{Geometry, Point};
use mapselect_geom::buffer;
use mapselect_geom::gesture::{GestureEvent, ModifierKey};
use mapselect_geom::query::QueryGeometry;
use tracing::error;

/// Click selection.
///
/// With an explicit-layer profile active, a click turns into a small buffered area
/// query against those layers. Otherwise it turns into a feature lookup, which also
/// hits the remote feature info endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickSelect;

impl ToolBehaviour for ClickSelect {
    fn style(&self) -> ToolStyle {
        ToolStyle::Click
    }

    fn init(&mut self, _view: &EngineView) -> WidgetFlags {
        WidgetFlags::default()
    }

    fn deinit(&mut self) -> WidgetFlags {
        WidgetFlags::default()
    }

    fn handle_event(
        &mut self,
        event: GestureEvent,
        view: &mut EngineViewMut,
    ) -> (ToolAction, WidgetFlags) {
        let GestureEvent::Click {
            coordinate,
            modifier_keys,
        } = event
        else {
            return (ToolAction::None, WidgetFlags::default());
        };
        let remove = modifier_keys.contains(&ModifierKey::Ctrl);

        if !view.config.active_profile().is_explicit() {
            return (
                ToolAction::FeatureLookup { coordinate, remove },
                WidgetFlags::default(),
            );
        }

        let radius_m = view.mapview.resolution() * view.config.point_buffer_factor();
        let point = Geometry::Point(Point::from(coordinate));
        let area = match buffer::buffer(&point, radius_m, view.mapview.crs()) {
            Ok(area) => area,
            Err(e) => {
                error!("Buffering the clicked point failed, Err: {e:?}");
                return (ToolAction::None, WidgetFlags::default());
            }
        };

        (
            ToolAction::Query {
                geometry: QueryGeometry::Area(area),
                remove,
            },
            WidgetFlags::default(),
        )
    }
}
