// Imports
use crate::Crs;
use geo::{
    BooleanOps, Coord, Geometry, HaversineBearing, HaversineDestination, HaversineDistance,
    LineString, MapCoords, MultiPolygon, Point, Polygon,
};

/// The number of steps used for the great-circle rings around vertices.
const RING_STEPS: usize = 64;
const KILOMETER_M: f64 = 1000.0;

/// The errors buffering can reject an input with.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BufferError {
    /// Shrinking has no defined meaning for 0- and 1-dimensional geometries.
    #[error("a non-positive buffer distance is not defined for point and line geometries")]
    NonPositiveDistance,
    /// Geometry collections cannot be buffered.
    #[error("buffering is not supported for this geometry type")]
    UnsupportedGeometry,
}

/// Buffer a geometry by a distance in meters.
///
/// The geometry is reprojected to WGS84 first, buffered with great-circle semantics in
/// kilometers (`distance_m / 1000.0`) and reprojected back into the source CRS, so the
/// result is distance-true regardless of the map projection. The input is never mutated.
///
/// A distance of zero or less is rejected for point and line geometries. For areas it is
/// accepted and shrinks the shape inward.
pub fn buffer(
    geometry: &Geometry<f64>,
    distance_m: f64,
    crs: Crs,
) -> Result<MultiPolygon<f64>, BufferError> {
    if distance_m <= 0.0 && !is_areal(geometry) {
        return Err(BufferError::NonPositiveDistance);
    }

    let wgs84 = crs.geometry_to_wgs84(geometry);
    let buffered = buffer_wgs84(&wgs84, distance_m / KILOMETER_M)?;

    Ok(buffered.map_coords(|c| crs.coord_from_wgs84(c)))
}

/// Whether a geometry encloses an area, making an inward buffer well-defined.
pub fn is_areal(geometry: &Geometry<f64>) -> bool {
    matches!(
        geometry,
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_)
    )
}

fn buffer_wgs84(
    geometry: &Geometry<f64>,
    radius_km: f64,
) -> Result<MultiPolygon<f64>, BufferError> {
    match geometry {
        Geometry::Point(p) => Ok(union_all(vec![vertex_ring(*p, radius_km)])),
        Geometry::MultiPoint(mp) => Ok(union_all(
            mp.iter().map(|p| vertex_ring(*p, radius_km)).collect(),
        )),
        Geometry::Line(l) => {
            Ok(union_all(line_pieces(&LineString::from(*l), radius_km)))
        }
        Geometry::LineString(l) => Ok(union_all(line_pieces(l, radius_km))),
        Geometry::MultiLineString(ml) => Ok(union_all(
            ml.iter().flat_map(|l| line_pieces(l, radius_km)).collect(),
        )),
        Geometry::Polygon(p) => Ok(buffer_polygon(p, radius_km)),
        Geometry::MultiPolygon(mp) => {
            let mut acc = MultiPolygon::new(vec![]);
            for p in mp.iter() {
                acc = acc.union(&buffer_polygon(p, radius_km));
            }
            Ok(acc)
        }
        Geometry::Rect(r) => Ok(buffer_polygon(&r.to_polygon(), radius_km)),
        Geometry::Triangle(t) => Ok(buffer_polygon(&t.to_polygon(), radius_km)),
        Geometry::GeometryCollection(_) => Err(BufferError::UnsupportedGeometry),
    }
}

fn buffer_polygon(polygon: &Polygon<f64>, radius_km: f64) -> MultiPolygon<f64> {
    if radius_km == 0.0 {
        return MultiPolygon::new(vec![polygon.clone()]);
    }

    let boundary_pieces = polygon
        .interiors()
        .iter()
        .chain(std::iter::once(polygon.exterior()))
        .flat_map(|ring| line_pieces(ring, radius_km.abs()))
        .collect::<Vec<Polygon<f64>>>();
    let boundary = union_all(boundary_pieces);
    let input = MultiPolygon::new(vec![polygon.clone()]);

    if radius_km > 0.0 {
        input.union(&boundary)
    } else {
        input.difference(&boundary)
    }
}

/// The convex pieces covering a line's buffer: a ring around every vertex and a quad
/// along every segment.
fn line_pieces(line: &LineString<f64>, radius_km: f64) -> Vec<Polygon<f64>> {
    let mut pieces = line
        .points()
        .map(|p| vertex_ring(p, radius_km))
        .collect::<Vec<Polygon<f64>>>();

    for segment in line.lines() {
        let start = Point::from(segment.start);
        let end = Point::from(segment.end);
        if start.haversine_distance(&end) <= f64::EPSILON {
            continue;
        }
        pieces.push(segment_quad(start, end, radius_km));
    }

    pieces
}

fn vertex_ring(center: Point<f64>, radius_km: f64) -> Polygon<f64> {
    let coords = (0..RING_STEPS)
        .map(|i| {
            let bearing = 360.0 * (i as f64) / (RING_STEPS as f64);
            destination(center, bearing, radius_km).0
        })
        .collect::<Vec<Coord<f64>>>();

    Polygon::new(LineString::from(coords), vec![])
}

fn segment_quad(start: Point<f64>, end: Point<f64>, radius_km: f64) -> Polygon<f64> {
    let bearing = start.haversine_bearing(end);

    Polygon::new(
        LineString::from(vec![
            destination(start, bearing - 90.0, radius_km).0,
            destination(end, bearing - 90.0, radius_km).0,
            destination(end, bearing + 90.0, radius_km).0,
            destination(start, bearing + 90.0, radius_km).0,
        ]),
        vec![],
    )
}

fn destination(point: Point<f64>, bearing: f64, radius_km: f64) -> Point<f64> {
    point.haversine_destination(bearing, radius_km * KILOMETER_M)
}

fn union_all(pieces: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut acc = MultiPolygon::new(vec![]);
    for piece in pieces {
        acc = acc.union(&MultiPolygon::new(vec![piece]));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relate;
    use geo::{line_string, polygon, Area, Intersects};

    #[test]
    fn non_positive_distance_rejected_for_thin_geometries() {
        let point = Geometry::Point(Point::new(18.0, 59.0));
        let line = Geometry::LineString(line_string![(x: 18.0, y: 59.0), (x: 18.1, y: 59.0)]);
        let multipoint =
            Geometry::MultiPoint(geo::MultiPoint::new(vec![Point::new(18.0, 59.0)]));

        for geometry in [point, line, multipoint] {
            assert!(matches!(
                buffer(&geometry, 0.0, Crs::Wgs84),
                Err(BufferError::NonPositiveDistance)
            ));
            assert!(matches!(
                buffer(&geometry, -5.0, Crs::Wgs84),
                Err(BufferError::NonPositiveDistance)
            ));
        }
    }

    #[test]
    fn negative_distance_shrinks_a_polygon() {
        // Roughly 111km x 111km at the equator.
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ];
        let original_area = square.unsigned_area();

        let shrunk = buffer(&Geometry::Polygon(square), -10_000.0, Crs::Wgs84)
            .expect("negative buffer on an area must be accepted");

        assert!(!shrunk.0.is_empty());
        assert!(shrunk.unsigned_area() < original_area);
    }

    #[test]
    fn zero_distance_keeps_a_polygon() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ];

        let result = buffer(&Geometry::Polygon(square.clone()), 0.0, Crs::Wgs84)
            .expect("zero buffer on an area must be accepted");

        assert_eq!(result.0, vec![square]);
    }

    #[test]
    fn point_buffer_covers_the_requested_radius() {
        let center = Point::new(18.0, 59.0);

        let buffered = buffer(&Geometry::Point(center), 1000.0, Crs::Wgs84)
            .expect("positive point buffer");
        let buffered = Geometry::MultiPolygon(buffered);

        let inside = Geometry::Point(center.haversine_destination(90.0, 900.0));
        let outside = Geometry::Point(center.haversine_destination(90.0, 1200.0));

        assert!(!relate::disjoint(&buffered, &inside));
        assert!(relate::disjoint(&buffered, &outside));
    }

    #[test]
    fn line_buffer_reaches_points_off_the_line() {
        let line = line_string![(x: 18.0, y: 59.0), (x: 18.01, y: 59.0)];

        let buffered =
            buffer(&Geometry::LineString(line), 200.0, Crs::Wgs84).expect("positive line buffer");

        // 100m north of the line's midpoint.
        let off_line = Point::new(18.005, 59.0).haversine_destination(0.0, 100.0);
        assert!(buffered.intersects(&off_line));
    }

    #[test]
    fn buffering_in_mercator_returns_mercator_coordinates() {
        let center = Point::new(2_000_000.0, 8_000_000.0);

        let buffered = buffer(&Geometry::Point(center), 500.0, Crs::WebMercator)
            .expect("positive point buffer");

        // The result must stay in the source CRS and enclose the input point.
        assert!(buffered.intersects(&center));
    }
}
