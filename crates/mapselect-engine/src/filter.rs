// Imports
use crate::feature::SelectedItem;
use mapselect_geom::crs::Crs;
use mapselect_geom::query::QueryGeometry;
use mapselect_geom::relate;

/// Keep the items whose geometry is not disjoint from the query geometry.
///
/// Both sides are compared in WGS84. The query is normalized once, each candidate is
/// reprojected to an independent copy so the items themselves stay untouched. Order is
/// preserved.
pub fn items_intersecting_geometry(
    items: Vec<SelectedItem>,
    query: &QueryGeometry,
    crs: Crs,
) -> Vec<SelectedItem> {
    let query_wgs84 = query.normalize(crs);

    items
        .into_iter()
        .filter(|item| {
            let candidate = crs.geometry_to_wgs84(&item.feature.geometry);
            !relate::disjoint(&candidate, &query_wgs84)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Feature;
    use geo::{Coord, Geometry, Point, Rect};

    fn item(id: &str, x: f64, y: f64) -> SelectedItem {
        SelectedItem::new(
            Feature::new(id, Geometry::Point(Point::new(x, y))),
            "layer",
            "Layer",
            None,
        )
    }

    fn ids(items: &[SelectedItem]) -> Vec<&str> {
        items.iter().map(|item| item.feature.id.as_str()).collect()
    }

    #[test]
    fn keeps_intersecting_items_in_order() {
        let query = QueryGeometry::Rect(Rect::new(
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 100.0, y: 100.0 },
        ));
        let items = vec![
            item("inside-a", 10.0, 10.0),
            item("outside", 500.0, 500.0),
            item("boundary", 100.0, 50.0),
            item("inside-b", 99.0, 1.0),
        ];

        let kept = items_intersecting_geometry(items, &query, Crs::WebMercator);

        assert_eq!(ids(&kept), vec!["inside-a", "boundary", "inside-b"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let query = QueryGeometry::Circle {
            center: Point::new(0.0, 0.0),
            radius: 50.0,
        };
        let items = vec![item("near", 10.0, 0.0), item("far", 400.0, 0.0)];

        let once = items_intersecting_geometry(items, &query, Crs::WebMercator);
        let twice = items_intersecting_geometry(once.clone(), &query, Crs::WebMercator);

        assert_eq!(ids(&once), vec!["near"]);
        assert_eq!(ids(&once), ids(&twice));
    }
}
