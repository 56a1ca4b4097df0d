// Imports
use crate::Crs;
use geo::{
    coord, BoundingRect, Coord, Geometry, LineString, MultiPolygon, Point, Polygon, Rect,
};

/// The number of sides used when a circle is converted into its inscribing polygon.
const CIRCLE_SIDES: usize = 32;

/// A completed query geometry, as produced by a drawing gesture or a buffer operation.
///
/// Circles are kept in their center/radius form until they are normalized, because the
/// relational predicates operate only on polygon / line / point primitives. All variants
/// are in the map's working CRS.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryGeometry {
    /// A single clicked point.
    Point(Point<f64>),
    /// An axis-aligned drawn box.
    Rect(Rect<f64>),
    /// A drawn circle, radius in map units.
    Circle {
        /// The circle center.
        center: Point<f64>,
        /// The circle radius in map units.
        radius: f64,
    },
    /// A drawn polygon.
    Polygon(Polygon<f64>),
    /// A drawn line.
    Line(LineString<f64>),
    /// An area that resulted from buffering another geometry.
    Area(MultiPolygon<f64>),
}

impl QueryGeometry {
    /// The axis-aligned bounds of the geometry in the source CRS.
    pub fn extent(&self) -> Rect<f64> {
        match self {
            Self::Point(p) => Rect::new(p.0, p.0),
            Self::Rect(r) => *r,
            Self::Circle { center, radius } => Rect::new(
                coord! { x: center.x() - radius, y: center.y() - radius },
                coord! { x: center.x() + radius, y: center.y() + radius },
            ),
            Self::Polygon(p) => bounding_rect_or_empty(p.bounding_rect()),
            Self::Line(l) => bounding_rect_or_empty(l.bounding_rect()),
            Self::Area(a) => bounding_rect_or_empty(a.bounding_rect()),
        }
    }

    /// The geometry as a relational primitive in the source CRS.
    ///
    /// A circle becomes its inscribing polygon here, everything else converts structurally.
    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            Self::Point(p) => Geometry::Point(*p),
            Self::Rect(r) => Geometry::Polygon(r.to_polygon()),
            Self::Circle { center, radius } => {
                Geometry::Polygon(circle_to_polygon(*center, *radius, CIRCLE_SIDES))
            }
            Self::Polygon(p) => Geometry::Polygon(p.clone()),
            Self::Line(l) => Geometry::LineString(l.clone()),
            Self::Area(a) => Geometry::MultiPolygon(a.clone()),
        }
    }

    /// Normalize for relational testing: circle conversion, then reprojection to WGS84.
    pub fn normalize(&self, crs: Crs) -> Geometry<f64> {
        crs.geometry_to_wgs84(&self.to_geometry())
    }
}

/// Convert a circle given as center and radius into a regular polygon in the same
/// (planar) coordinates.
pub fn circle_to_polygon(center: Point<f64>, radius: f64, sides: usize) -> Polygon<f64> {
    let coords = (0..sides)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64) / (sides as f64);
            Coord {
                x: center.x() + radius * angle.cos(),
                y: center.y() + radius * angle.sin(),
            }
        })
        .collect::<Vec<Coord<f64>>>();

    Polygon::new(LineString::from(coords), vec![])
}

fn bounding_rect_or_empty(rect: Option<Rect<f64>>) -> Rect<f64> {
    // Only reachable through geometries with no coordinates, which gestures never produce.
    rect.unwrap_or_else(|| Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 0.0 }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relate;
    use approx::assert_relative_eq;

    #[test]
    fn circle_extent_spans_radius() {
        let circle = QueryGeometry::Circle {
            center: Point::new(10.0, 20.0),
            radius: 5.0,
        };

        let extent = circle.extent();

        assert_relative_eq!(extent.min().x, 5.0);
        assert_relative_eq!(extent.min().y, 15.0);
        assert_relative_eq!(extent.max().x, 15.0);
        assert_relative_eq!(extent.max().y, 25.0);
    }

    #[test]
    fn circle_normalizes_to_inscribing_polygon() {
        let center = Point::new(100.0, 100.0);
        let radius = 50.0;
        let circle = QueryGeometry::Circle { center, radius };

        let normalized = circle.to_geometry();
        let polygon = circle_to_polygon(center, radius, 32);

        // A point well inside the circle relates identically against both forms.
        let inside = Geometry::Point(Point::new(110.0, 100.0));
        assert!(!relate::disjoint(&normalized, &inside));
        assert!(!relate::disjoint(&Geometry::Polygon(polygon.clone()), &inside));

        // A point outside the circumscribing box relates identically as well.
        let outside = Geometry::Point(Point::new(200.0, 200.0));
        assert!(relate::disjoint(&normalized, &outside));
        assert!(relate::disjoint(&Geometry::Polygon(polygon), &outside));
    }

    #[test]
    fn circle_polygon_vertices_lie_on_the_circle() {
        let polygon = circle_to_polygon(Point::new(0.0, 0.0), 10.0, 32);

        for coord in polygon.exterior().coords() {
            assert_relative_eq!((coord.x.powi(2) + coord.y.powi(2)).sqrt(), 10.0, epsilon = 1e-9);
        }
    }
}
