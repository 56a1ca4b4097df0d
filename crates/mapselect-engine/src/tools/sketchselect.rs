// Imports
use crate::engine::{EngineView, EngineViewMut};
use crate::tools::toolbehaviour::{ToolAction, ToolBehaviour};
use crate::tools::ToolStyle;
use crate::widgetflags::WidgetFlags;
use geo::{Coord, Geometry};
use mapselect_geom::buffer;
use mapselect_geom::gesture::GestureEvent;
use mapselect_geom::query::QueryGeometry;
use tracing::error;

/// A live radius readout for an in-progress circle sketch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusReadout {
    /// The current radius in map units.
    pub radius: f64,
    /// Where to draw the readout, the midpoint between center and pointer.
    pub position: Coord<f64>,
}

/// Sketch selection, shared by the box, circle, polygon and line styles.
///
/// The surface runs the pointer in the matching sketch mode and reports progress and
/// completion. A completed box, circle or polygon queries directly, a completed line
/// is buffered by the view resolution first.
#[derive(Debug)]
pub struct SketchSelect {
    style: ToolStyle,
    radius_readout: Option<RadiusReadout>,
}

impl SketchSelect {
    pub fn new(style: ToolStyle) -> Self {
        Self {
            style,
            radius_readout: None,
        }
    }

    /// The live radius readout of an in-progress circle sketch.
    pub fn radius_readout(&self) -> Option<RadiusReadout> {
        self.radius_readout
    }

    fn clear_readout(&mut self) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();
        if self.radius_readout.take().is_some() {
            widget_flags.hide_radius_readout = Some(true);
            widget_flags.redraw = true;
        }
        widget_flags
    }
}

impl ToolBehaviour for SketchSelect {
    fn style(&self) -> ToolStyle {
        self.style
    }

    fn init(&mut self, _view: &EngineView) -> WidgetFlags {
        WidgetFlags::default()
    }

    fn deinit(&mut self) -> WidgetFlags {
        self.clear_readout()
    }

    fn handle_event(
        &mut self,
        event: GestureEvent,
        view: &mut EngineViewMut,
    ) -> (ToolAction, WidgetFlags) {
        match event {
            GestureEvent::SketchProgress { geometry } => {
                let mut widget_flags = WidgetFlags::default();
                if let QueryGeometry::Circle { center, radius } = geometry {
                    let position = self
                        .radius_readout
                        .map(|readout| readout.position)
                        .unwrap_or(Coord::from(center));
                    self.radius_readout = Some(RadiusReadout { radius, position });
                    widget_flags.hide_radius_readout = Some(false);
                    widget_flags.redraw = true;
                }
                (ToolAction::None, widget_flags)
            }
            GestureEvent::PointerMove { coordinate } => {
                let mut widget_flags = WidgetFlags::default();
                if let Some(readout) = self.radius_readout.as_mut() {
                    readout.position = coordinate;
                    widget_flags.redraw = true;
                }
                (ToolAction::None, widget_flags)
            }
            GestureEvent::SketchCompleted { geometry } => {
                let widget_flags = self.clear_readout();
                let action = match (self.style, geometry) {
                    (ToolStyle::Line, QueryGeometry::Line(line)) => {
                        let radius_m =
                            view.mapview.resolution() * view.config.line_buffer_factor();
                        match buffer::buffer(
                            &Geometry::LineString(line),
                            radius_m,
                            view.mapview.crs(),
                        ) {
                            Ok(area) => ToolAction::Query {
                                geometry: QueryGeometry::Area(area),
                                remove: false,
                            },
                            Err(e) => {
                                error!("Buffering the sketched line failed, Err: {e:?}");
                                ToolAction::None
                            }
                        }
                    }
                    (_, geometry) => ToolAction::Query {
                        geometry,
                        remove: false,
                    },
                };
                (action, widget_flags)
            }
            GestureEvent::Cancel => (ToolAction::None, self.clear_readout()),
            GestureEvent::Click { .. } => (ToolAction::None, WidgetFlags::default()),
        }
    }
}
