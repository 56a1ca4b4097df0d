// Imports
use crate::config::SelectionProfile;
use crate::feature::{SelectedItem, SelectionGroup};
use crate::layers::{selection_group_of, FetchStrategy, LayerSourceKind, LayerTree};
use crate::remote::RemoteFeatureSource;
use futures::channel::oneshot;
use futures::future;
use geo::{Coord, Rect};
use itertools::Itertools;
use tracing::error;

/// How an eligible leaf layer contributes to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionKind {
    /// Local store pass only.
    Local,
    /// Remote extent fetch merged into the local store, then a local pass. Used for
    /// on-demand layers under an explicit-layer profile, where features outside the
    /// viewport may be missing locally.
    FetchThenLocal,
    /// Remote extent fetch only.
    Remote,
}

/// An eligible leaf, captured by name so collecting can alternate between shared and
/// exclusive access to the tree.
#[derive(Debug)]
struct LeafTarget {
    layer_name: String,
    group: Option<SelectionGroup>,
    kind: ExtractionKind,
}

fn leaf_targets(
    layers: &LayerTree,
    profile: &SelectionProfile,
    resolution: f64,
) -> Vec<LeafTarget> {
    layers
        .eligible_leaves(profile, resolution)
        .into_iter()
        .map(|(layer, group)| {
            let kind = match &layer.source {
                LayerSourceKind::LocalVector { fetch, .. } => {
                    if profile.is_explicit() && *fetch == FetchStrategy::OnDemand {
                        ExtractionKind::FetchThenLocal
                    } else {
                        ExtractionKind::Local
                    }
                }
                LayerSourceKind::RemoteOnly => ExtractionKind::Remote,
            };
            LeafTarget {
                layer_name: layer.name.clone(),
                group: selection_group_of(group),
                kind,
            }
        })
        .collect()
}

/// Collect the candidate items of all eligible layers intersecting the extent.
///
/// Every remote request is started before any is awaited, so the per-layer fetches run
/// concurrently. Local passes run afterwards in traversal order, which also keeps the
/// result ordered by layer. A failed fetch is logged and contributes nothing.
pub async fn collect(
    layers: &mut LayerTree,
    profile: &SelectionProfile,
    resolution: f64,
    extent: Rect<f64>,
    remote: &dyn RemoteFeatureSource,
) -> Vec<SelectedItem> {
    let targets = leaf_targets(layers, profile, resolution);

    // Fan out the remote requests.
    let receivers: Vec<Option<oneshot::Receiver<anyhow::Result<Vec<crate::Feature>>>>> = targets
        .iter()
        .map(|target| match target.kind {
            ExtractionKind::Local => None,
            ExtractionKind::FetchThenLocal | ExtractionKind::Remote => layers
                .layer_info(&target.layer_name)
                .map(|layer| remote.fetch_by_extent(layer, extent)),
        })
        .collect();
    let responses = future::join_all(receivers.into_iter().map(|rx| async move {
        match rx {
            Some(rx) => Some(rx.await),
            None => None,
        }
    }))
    .await;

    let mut items = Vec::new();
    for (target, response) in targets.iter().zip_eq(responses) {
        let fetched = match response {
            Some(Ok(Ok(features))) => Some(features),
            Some(Ok(Err(e))) => {
                error!(
                    "Fetching features for layer `{}` failed, Err: {e:?}",
                    target.layer_name
                );
                None
            }
            Some(Err(_)) => {
                error!(
                    "Fetching features for layer `{}` failed, the request was abandoned.",
                    target.layer_name
                );
                None
            }
            None => None,
        };

        let Some(layer) = layers.layer_info_mut(&target.layer_name) else {
            continue;
        };

        match target.kind {
            ExtractionKind::Remote => {
                let Some(features) = fetched else { continue };
                items.extend(features.into_iter().map(|feature| {
                    SelectedItem::new(feature, &layer.name, &layer.title, target.group.clone())
                }));
            }
            ExtractionKind::Local | ExtractionKind::FetchThenLocal => {
                if let Some(features) = fetched {
                    if let Some(store) = layer.local_store_mut() {
                        store.merge_features(features);
                    }
                }
                let Some(store) = layer.local_store() else {
                    continue;
                };
                items.extend(store.features_intersecting_extent(extent).into_iter().map(
                    |feature| {
                        SelectedItem::new(
                            feature.clone(),
                            &layer.name,
                            &layer.title,
                            target.group.clone(),
                        )
                    },
                ));
            }
        }
    }
    items
}

/// Collect the local features under a map coordinate, honoring layer visibility.
///
/// This is the local half of a feature lookup. Remote feature info results are fetched
/// separately and take precedence in the combined list.
pub fn features_at_coordinate(
    layers: &LayerTree,
    profile: &SelectionProfile,
    resolution: f64,
    coordinate: Coord<f64>,
    tolerance: f64,
) -> Vec<SelectedItem> {
    layers
        .eligible_leaves(profile, resolution)
        .into_iter()
        .flat_map(|(layer, group)| {
            let group = selection_group_of(group);
            let hits = match layer.local_store() {
                Some(store) => store.features_at_coordinate(coordinate, tolerance),
                None => Vec::new(),
            };
            hits.into_iter()
                .map(|feature| {
                    SelectedItem::new(feature.clone(), &layer.name, &layer.title, group.clone())
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{GroupLayer, LayerInfo, LayerNode, VectorStore};
    use crate::Feature;
    use futures::executor::block_on;
    use geo::{Geometry, Point};
    use std::cell::RefCell;

    fn point_feature(id: &str, x: f64, y: f64) -> Feature {
        Feature::new(id, Geometry::Point(Point::new(x, y)))
    }

    fn local_layer(name: &str, fetch: FetchStrategy, features: Vec<Feature>) -> LayerNode {
        LayerNode::Layer(LayerInfo::new(
            name,
            name.to_uppercase(),
            LayerSourceKind::LocalVector {
                store: VectorStore::from_features(features),
                fetch,
            },
        ))
    }

    /// Answers every extent fetch with a fixed feature list and records which layers
    /// were asked.
    struct FixedRemote {
        features: Vec<Feature>,
        asked: RefCell<Vec<String>>,
    }

    impl FixedRemote {
        fn new(features: Vec<Feature>) -> Self {
            Self {
                features,
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl RemoteFeatureSource for FixedRemote {
        fn fetch_by_extent(
            &self,
            layer: &LayerInfo,
            _extent: Rect<f64>,
        ) -> oneshot::Receiver<anyhow::Result<Vec<Feature>>> {
            self.asked.borrow_mut().push(layer.name.clone());
            let (tx, rx) = oneshot::channel();
            tx.send(Ok(self.features.clone())).ok();
            rx
        }

        fn fetch_at_coordinate(
            &self,
            _coordinate: Coord<f64>,
        ) -> oneshot::Receiver<anyhow::Result<Vec<SelectedItem>>> {
            let (tx, rx) = oneshot::channel();
            tx.send(Ok(Vec::new())).ok();
            rx
        }
    }

    fn extent() -> Rect<f64> {
        Rect::new(Coord { x: -100.0, y: -100.0 }, Coord { x: 100.0, y: 100.0 })
    }

    fn ids(items: &[SelectedItem]) -> Vec<&str> {
        items.iter().map(|item| item.feature.id.as_str()).collect()
    }

    #[test]
    fn collects_local_layers_in_traversal_order() {
        let mut layers = LayerTree::new(vec![
            local_layer(
                "roads",
                FetchStrategy::All,
                vec![point_feature("r1", 0.0, 0.0), point_feature("far", 900.0, 0.0)],
            ),
            LayerNode::Group(GroupLayer {
                name: "nature".to_string(),
                title: "Nature".to_string(),
                children: vec![local_layer(
                    "lakes",
                    FetchStrategy::All,
                    vec![point_feature("l1", 5.0, 5.0)],
                )],
            }),
        ]);
        let remote = FixedRemote::new(Vec::new());
        let profile = SelectionProfile::default();

        let items = block_on(collect(&mut layers, &profile, 1.0, extent(), &remote));

        assert_eq!(ids(&items), vec!["r1", "l1"]);
        assert!(remote.asked.borrow().is_empty());
        // Group context is attached to items from grouped layers.
        assert_eq!(items[1].selection_group(), ("nature", "Nature"));
        assert_eq!(items[0].selection_group(), ("roads", "ROADS"));
    }

    #[test]
    fn remote_only_layers_are_fetched() {
        let mut layers = LayerTree::new(vec![LayerNode::Layer(LayerInfo::new(
            "cadastre",
            "Cadastre",
            LayerSourceKind::RemoteOnly,
        ))]);
        let remote = FixedRemote::new(vec![point_feature("c1", 1.0, 1.0)]);
        let profile = SelectionProfile::default();

        let items = block_on(collect(&mut layers, &profile, 1.0, extent(), &remote));

        assert_eq!(ids(&items), vec!["c1"]);
        assert_eq!(*remote.asked.borrow(), vec!["cadastre"]);
    }

    #[test]
    fn explicit_profile_merges_on_demand_layers_before_the_local_pass() {
        let mut layers = LayerTree::new(vec![local_layer(
            "wells",
            FetchStrategy::OnDemand,
            vec![point_feature("w1", 0.0, 0.0)],
        )]);
        let remote = FixedRemote::new(vec![
            point_feature("w2", 2.0, 2.0),
            // Duplicate id, must not show up twice after the merge.
            point_feature("w1", 0.0, 0.0),
        ]);

        // The default profile runs a plain local pass.
        let profile = SelectionProfile::default();
        let items = block_on(collect(&mut layers, &profile, 1.0, extent(), &remote));
        assert_eq!(ids(&items), vec!["w1"]);
        assert!(remote.asked.borrow().is_empty());

        // An explicit profile fetches, merges and then passes over the store.
        let mut explicit = SelectionProfile::default();
        explicit.layers = Some(vec!["wells".to_string()]);
        let items = block_on(collect(&mut layers, &explicit, 1.0, extent(), &remote));
        assert_eq!(*remote.asked.borrow(), vec!["wells"]);
        let mut got = ids(&items);
        got.sort();
        assert_eq!(got, vec!["w1", "w2"]);
    }

    #[test]
    fn failed_fetches_contribute_nothing() {
        struct FailingRemote;
        impl RemoteFeatureSource for FailingRemote {
            fn fetch_by_extent(
                &self,
                _layer: &LayerInfo,
                _extent: Rect<f64>,
            ) -> oneshot::Receiver<anyhow::Result<Vec<Feature>>> {
                // Dropping the sender abandons the request.
                let (_tx, rx) = oneshot::channel();
                rx
            }
            fn fetch_at_coordinate(
                &self,
                _coordinate: Coord<f64>,
            ) -> oneshot::Receiver<anyhow::Result<Vec<SelectedItem>>> {
                let (_tx, rx) = oneshot::channel();
                rx
            }
        }

        let mut layers = LayerTree::new(vec![
            LayerNode::Layer(LayerInfo::new("remote", "Remote", LayerSourceKind::RemoteOnly)),
            local_layer("roads", FetchStrategy::All, vec![point_feature("r1", 0.0, 0.0)]),
        ]);
        let profile = SelectionProfile::default();

        let items = block_on(collect(&mut layers, &profile, 1.0, extent(), &FailingRemote));

        assert_eq!(ids(&items), vec!["r1"]);
    }

    #[test]
    fn lookup_honours_visibility() {
        let mut roads = LayerInfo::new(
            "roads",
            "Roads",
            LayerSourceKind::LocalVector {
                store: VectorStore::from_features(vec![point_feature("r1", 0.0, 0.0)]),
                fetch: FetchStrategy::All,
            },
        );
        roads.max_resolution = 0.5;
        let layers = LayerTree::new(vec![
            LayerNode::Layer(roads),
            local_layer("lakes", FetchStrategy::All, vec![point_feature("l1", 0.0, 0.0)]),
        ]);
        let profile = SelectionProfile::default();

        let items =
            features_at_coordinate(&layers, &profile, 1.0, Coord { x: 0.0, y: 0.0 }, 2.0);

        // The roads layer is outside its resolution window at 1.0.
        assert_eq!(ids(&items), vec!["l1"]);
    }
}
