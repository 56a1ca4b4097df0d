// Imports
use super::featuretree::FeatureTree;
use super::FeatureKey;
use crate::Feature;
use geo::{coord, BoundingRect, Geometry, Rect};
use mapselect_geom::relate;
use slotmap::HopSlotMap;
use std::collections::HashSet;

/// A store of locally held vector features with a spatial index over their extents.
#[derive(Debug, Default)]
pub struct VectorStore {
    features: HopSlotMap<FeatureKey, Feature>,
    tree: FeatureTree,
}

impl VectorStore {
    pub fn from_features(features: Vec<Feature>) -> Self {
        let mut map = HopSlotMap::with_key();
        let mut extents = Vec::with_capacity(features.len());
        for feature in features {
            let extent = feature_extent(&feature);
            extents.push((map.insert(feature), extent));
        }

        let mut tree = FeatureTree::default();
        tree.rebuild_from_vec(extents);

        Self { features: map, tree }
    }

    pub fn insert_feature(&mut self, feature: Feature) -> FeatureKey {
        let extent = feature_extent(&feature);
        let key = self.features.insert(feature);
        self.tree.insert_with_key(key, extent);
        key
    }

    pub fn remove_feature(&mut self, key: FeatureKey) -> Option<Feature> {
        self.tree.remove_with_key(key);
        self.features.remove(key)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.features.is_empty(), self.tree.is_empty());
        self.features.is_empty()
    }

    /// Merge features fetched from a remote service into the store.
    ///
    /// Features whose id is already present are dropped, so repeated on-demand fetches
    /// over overlapping extents do not duplicate features. Returns the number of
    /// features inserted.
    pub fn merge_features(&mut self, features: Vec<Feature>) -> usize {
        let present: HashSet<String> = self
            .features
            .values()
            .map(|feature| feature.id.clone())
            .collect();

        let mut inserted = 0;
        for feature in features {
            if present.contains(&feature.id) {
                continue;
            }
            self.insert_feature(feature);
            inserted += 1;
        }
        inserted
    }

    /// All features whose extent intersects the given extent.
    ///
    /// This is an extent test only, the relational filter narrows the result down later.
    pub fn features_intersecting_extent(&self, extent: Rect<f64>) -> Vec<&Feature> {
        self.tree
            .keys_intersecting_extent(extent)
            .into_iter()
            .filter_map(|key| self.features.get(key))
            .collect()
    }

    /// All features whose geometry intersects a small box around the given coordinate.
    ///
    /// Used for feature-info style lookups at a click position. The tolerance is half
    /// the box side length in map units.
    pub fn features_at_coordinate(&self, coordinate: geo::Coord<f64>, tolerance: f64) -> Vec<&Feature> {
        let hit_box = Rect::new(
            coord! { x: coordinate.x - tolerance, y: coordinate.y - tolerance },
            coord! { x: coordinate.x + tolerance, y: coordinate.y + tolerance },
        );
        let hit_geometry = Geometry::Polygon(hit_box.to_polygon());

        self.tree
            .keys_intersecting_extent(hit_box)
            .into_iter()
            .filter_map(|key| self.features.get(key))
            .filter(|feature| !relate::disjoint(&feature.geometry, &hit_geometry))
            .collect()
    }
}

fn feature_extent(feature: &Feature) -> Rect<f64> {
    feature
        .geometry
        .bounding_rect()
        .unwrap_or_else(|| Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 0.0 }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, Point};

    fn point_feature(id: &str, x: f64, y: f64) -> Feature {
        Feature::new(id, Geometry::Point(Point::new(x, y)))
    }

    #[test]
    fn extent_query_hits_only_overlapping_features() {
        let mut store = VectorStore::default();
        store.insert_feature(point_feature("a", 1.0, 1.0));
        store.insert_feature(point_feature("b", 5.0, 5.0));
        store.insert_feature(point_feature("c", 20.0, 20.0));

        let mut hits: Vec<&str> = store
            .features_intersecting_extent(Rect::new(
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 10.0, y: 10.0 },
            ))
            .into_iter()
            .map(|feature| feature.id.as_str())
            .collect();
        hits.sort_unstable();

        assert_eq!(hits, vec!["a", "b"]);
    }

    #[test]
    fn merge_features_dedups_by_id() {
        let mut store = VectorStore::from_features(vec![point_feature("a", 1.0, 1.0)]);

        let inserted = store.merge_features(vec![
            point_feature("a", 1.0, 1.0),
            point_feature("b", 2.0, 2.0),
        ]);

        assert_eq!(inserted, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn at_coordinate_respects_tolerance() {
        let mut store = VectorStore::default();
        store.insert_feature(point_feature("near", 1.0, 1.0));
        store.insert_feature(Feature::new(
            "line",
            Geometry::LineString(line_string![(x: 0.0, y: 5.0), (x: 10.0, y: 5.0)]),
        ));

        let hits = store.features_at_coordinate(coord! { x: 1.2, y: 1.0 }, 0.5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "near");

        let line_hits = store.features_at_coordinate(coord! { x: 5.0, y: 5.1 }, 0.2);
        assert_eq!(line_hits.len(), 1);
        assert_eq!(line_hits[0].id, "line");

        assert!(store
            .features_at_coordinate(coord! { x: 8.0, y: 1.0 }, 0.5)
            .is_empty());
    }
}
