// Imports
use super::FeatureKey;
use geo::{coord, Rect};
use rstar::primitives::GeomWithData;

/// The rtree object that holds a feature extent and its [FeatureKey].
type FeatureTreeObject = GeomWithData<rstar::primitives::Rectangle<[f64; 2]>, FeatureKey>;

#[derive(Debug, Default)]
/// A Rtree with [FeatureKey]'s as associated data.
///
/// Used for faster spatial queries over locally held features.
pub(super) struct FeatureTree(rstar::RTree<FeatureTreeObject, rstar::DefaultParams>);

impl FeatureTree {
    /// Insert a new tree object with the given [FeatureKey] and extent.
    pub(super) fn insert_with_key(&mut self, key: FeatureKey, extent: Rect<f64>) {
        self.0.insert(new_tree_object(key, extent));
    }

    /// Removes the tree object for the given key.
    pub(super) fn remove_with_key(&mut self, key: FeatureKey) -> Option<(FeatureKey, Rect<f64>)> {
        let object_to_remove = self.0.iter().find(|&object| object.data == key)?.to_owned();

        self.0.remove(&object_to_remove).map(tree_object_to_store)
    }

    /// Return the keys whose extent intersects the given extent.
    pub(super) fn keys_intersecting_extent(&self, extent: Rect<f64>) -> Vec<FeatureKey> {
        self.0
            .locate_in_envelope_intersecting(&rstar::AABB::from_corners(
                [extent.min().x, extent.min().y],
                [extent.max().x, extent.max().y],
            ))
            .map(|object| object.data)
            .collect()
    }

    /// Rebuild the entire rtree from the given Vec of (key, extent).
    pub(super) fn rebuild_from_vec(&mut self, features: Vec<(FeatureKey, Rect<f64>)>) {
        let objects = features
            .into_iter()
            .map(|(key, extent)| new_tree_object(key, extent))
            .collect();

        self.0 = rstar::RTree::bulk_load(objects);
    }

    /// Clear the entire tree.
    #[allow(unused)]
    pub(super) fn clear(&mut self) {
        *self = Self::default()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.0.size() == 0
    }
}

fn new_tree_object(key: FeatureKey, extent: Rect<f64>) -> FeatureTreeObject {
    FeatureTreeObject::new(
        rstar::primitives::Rectangle::from_corners(
            [extent.min().x, extent.min().y],
            [extent.max().x, extent.max().y],
        ),
        key,
    )
}

fn tree_object_to_store(object: FeatureTreeObject) -> (FeatureKey, Rect<f64>) {
    (
        object.data,
        Rect::new(
            coord! { x: object.geom().lower()[0], y: object.geom().lower()[1] },
            coord! { x: object.geom().upper()[0], y: object.geom().upper()[1] },
        ),
    )
}
