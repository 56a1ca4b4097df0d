// Imports
use crate::WidgetFlags;
use geo::{coord, Rect};
use mapselect_geom::Crs;
use serde::{Deserialize, Serialize};

/// The state of the map viewport the selection engine works against.
///
/// The resolution is given in map units per screen pixel, so the visible extent is
/// `size * resolution` around the center.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename = "mapview")]
pub struct MapView {
    /// The view center in map coordinates.
    #[serde(rename = "center")]
    center: na::Vector2<f64>,
    /// The viewport dimensions in pixels.
    #[serde(rename = "size")]
    size: na::Vector2<f64>,
    /// Map units per pixel.
    #[serde(rename = "resolution")]
    resolution: f64,
    /// The working CRS of the map.
    #[serde(rename = "crs")]
    crs: Crs,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: na::vector![0.0, 0.0],
            size: na::vector![800.0, 600.0],
            resolution: Self::RESOLUTION_DEFAULT,
            crs: Crs::default(),
        }
    }
}

impl MapView {
    pub const RESOLUTION_MIN: f64 = 0.001;
    pub const RESOLUTION_MAX: f64 = 100_000.0;
    pub const RESOLUTION_DEFAULT: f64 = 1.0;

    pub fn with_center(mut self, center: na::Vector2<f64>) -> Self {
        self.center = center;
        self
    }

    pub fn with_size(mut self, size: na::Vector2<f64>) -> Self {
        self.size = size;
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution.clamp(Self::RESOLUTION_MIN, Self::RESOLUTION_MAX);
        self
    }

    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    /// The view center in map coordinates.
    pub fn center(&self) -> na::Vector2<f64> {
        self.center
    }

    pub fn set_center(&mut self, center: na::Vector2<f64>) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();
        self.center = center;
        widget_flags.redraw = true;
        widget_flags
    }

    /// The viewport dimensions in pixels.
    pub fn size(&self) -> na::Vector2<f64> {
        self.size
    }

    pub fn set_size(&mut self, size: na::Vector2<f64>) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();
        self.size = size;
        widget_flags.redraw = true;
        widget_flags
    }

    /// The current view resolution in map units per pixel.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: f64) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();
        self.resolution = resolution.clamp(Self::RESOLUTION_MIN, Self::RESOLUTION_MAX);
        widget_flags.redraw = true;
        widget_flags
    }

    /// The working CRS of the map.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// The currently visible extent in map coordinates.
    pub fn view_extent(&self) -> Rect<f64> {
        let half = self.size * self.resolution * 0.5;

        Rect::new(
            coord! { x: self.center[0] - half[0], y: self.center[1] - half[1] },
            coord! { x: self.center[0] + half[0], y: self.center[1] + half[1] },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn view_extent() {
        let mapview = MapView::default()
            .with_center(na::vector![100.0, 200.0])
            .with_size(na::vector![20.0, 30.0])
            .with_resolution(2.0);

        let extent = mapview.view_extent();

        assert_relative_eq!(extent.min().x, 80.0);
        assert_relative_eq!(extent.min().y, 170.0);
        assert_relative_eq!(extent.max().x, 120.0);
        assert_relative_eq!(extent.max().y, 230.0);
    }

    #[test]
    fn resolution_is_clamped() {
        let mapview = MapView::default().with_resolution(0.0);

        assert_relative_eq!(mapview.resolution(), MapView::RESOLUTION_MIN);
    }
}
