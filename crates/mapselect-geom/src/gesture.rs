// Imports
use crate::QueryGeometry;
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A gesture event coming from the drawing surface.
///
/// The events are stateless: a [GestureEvent::SketchProgress] is only valid while a
/// sketch gesture is ongoing, and the tool state machines which receive the events are
/// expected to handle out-of-order events gracefully.
#[derive(Debug, Clone)]
pub enum GestureEvent {
    /// A single click on the map.
    Click {
        /// The click position in map coordinates.
        coordinate: Coord<f64>,
        /// Modifier keys held during the click.
        modifier_keys: HashSet<ModifierKey>,
    },
    /// An ongoing sketch gesture changed, carrying the geometry drawn so far.
    SketchProgress {
        /// The partially drawn geometry.
        geometry: QueryGeometry,
    },
    /// A sketch gesture finished, carrying the completed geometry.
    SketchCompleted {
        /// The completed geometry.
        geometry: QueryGeometry,
    },
    /// The pointer moved without drawing.
    PointerMove {
        /// The pointer position in map coordinates.
        coordinate: Coord<f64>,
    },
    /// The gesture vanished unexpectedly.
    ///
    /// Should discard all in-progress sketch state.
    Cancel,
}

/// A modifier key held during a gesture.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ModifierKey {
    /// Ctrl key. Turns a click selection into a removal.
    #[serde(rename = "ctrl")]
    Ctrl,
    /// Shift key.
    #[serde(rename = "shift")]
    Shift,
    /// Alt key.
    #[serde(rename = "alt")]
    Alt,
}
