// Modules
mod featuretree;
pub mod vectorstore;

// Re-exports
pub use vectorstore::VectorStore;

// Imports
use crate::config::SelectionProfile;
use crate::feature::SelectionGroup;
use serde::{Deserialize, Serialize};
use tracing::debug;

slotmap::new_key_type! {
    /// A key into a layer's local feature store.
    pub struct FeatureKey;
}

/// How a layer with a local store sources its features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStrategy {
    /// All features are loaded up front.
    #[default]
    #[serde(rename = "all")]
    All,
    /// Features are fetched on demand for the visible extent, so features outside of it
    /// may be missing from the local store.
    #[serde(rename = "bbox")]
    OnDemand,
}

/// Where a layer's features come from during extraction.
#[derive(Debug)]
pub enum LayerSourceKind {
    /// Vector data held locally, indexed by extent.
    LocalVector {
        store: VectorStore,
        fetch: FetchStrategy,
    },
    /// No local store at all, every query goes to the remote service.
    RemoteOnly,
}

/// A leaf layer.
#[derive(Debug)]
pub struct LayerInfo {
    pub name: String,
    pub title: String,
    /// Whether the layer participates in feature lookups at all.
    pub queryable: bool,
    /// The resolution window the layer is visible in.
    pub min_resolution: f64,
    pub max_resolution: f64,
    /// The attribute used as display title for the layer's features.
    pub title_attribute: Option<String>,
    pub source: LayerSourceKind,
}

impl LayerInfo {
    pub fn new(name: impl Into<String>, title: impl Into<String>, source: LayerSourceKind) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            queryable: true,
            min_resolution: 0.0,
            max_resolution: f64::INFINITY,
            title_attribute: None,
            source,
        }
    }

    pub fn with_queryable(mut self, queryable: bool) -> Self {
        self.queryable = queryable;
        self
    }

    pub fn with_resolution_window(mut self, min: f64, max: f64) -> Self {
        self.min_resolution = min;
        self.max_resolution = max;
        self
    }

    pub fn with_title_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.title_attribute = Some(attribute.into());
        self
    }

    /// Whether the current view resolution falls inside the layer's visibility window.
    pub fn visible_at(&self, resolution: f64) -> bool {
        resolution <= self.max_resolution && resolution >= self.min_resolution
    }

    pub fn local_store(&self) -> Option<&VectorStore> {
        match &self.source {
            LayerSourceKind::LocalVector { store, .. } => Some(store),
            LayerSourceKind::RemoteOnly => None,
        }
    }

    pub fn local_store_mut(&mut self) -> Option<&mut VectorStore> {
        match &mut self.source {
            LayerSourceKind::LocalVector { store, .. } => Some(store),
            LayerSourceKind::RemoteOnly => None,
        }
    }
}

/// A group layer with an ordered sequence of children.
#[derive(Debug)]
pub struct GroupLayer {
    pub name: String,
    pub title: String,
    pub children: Vec<LayerNode>,
}

/// A node in the layer tree: either a group or a leaf layer.
#[derive(Debug)]
pub enum LayerNode {
    Group(GroupLayer),
    Layer(LayerInfo),
}

impl LayerNode {
    pub fn name(&self) -> &str {
        match self {
            LayerNode::Group(group) => group.name.as_str(),
            LayerNode::Layer(layer) => layer.name.as_str(),
        }
    }

    /// The effective selectability of a node: a leaf's own queryable flag, a group's
    /// the union of its descendants'.
    pub fn queryable(&self) -> bool {
        match self {
            LayerNode::Group(group) => group.children.iter().any(|child| child.queryable()),
            LayerNode::Layer(layer) => layer.queryable,
        }
    }
}

/// The ordered layer tree of the map.
#[derive(Debug, Default)]
pub struct LayerTree {
    roots: Vec<LayerNode>,
}

impl LayerTree {
    pub fn new(roots: Vec<LayerNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[LayerNode] {
        &self.roots
    }

    /// All top level nodes that are (effectively) queryable.
    pub fn queryable_roots(&self) -> Vec<&LayerNode> {
        self.roots.iter().filter(|node| node.queryable()).collect()
    }

    /// Find a node anywhere in the tree by name. Group names resolve too, so a profile
    /// can name a whole group.
    pub fn node_by_name(&self, name: &str) -> Option<&LayerNode> {
        fn find<'a>(nodes: &'a [LayerNode], name: &str) -> Option<&'a LayerNode> {
            for node in nodes {
                if node.name() == name {
                    return Some(node);
                }
                if let LayerNode::Group(group) = node {
                    if let Some(found) = find(&group.children, name) {
                        return Some(found);
                    }
                }
            }
            None
        }
        find(&self.roots, name)
    }

    /// Find a leaf layer anywhere in the tree by name.
    pub fn layer_info(&self, name: &str) -> Option<&LayerInfo> {
        fn find<'a>(nodes: &'a [LayerNode], name: &str) -> Option<&'a LayerInfo> {
            for node in nodes {
                match node {
                    LayerNode::Layer(layer) if layer.name == name => return Some(layer),
                    LayerNode::Group(group) => {
                        if let Some(found) = find(&group.children, name) {
                            return Some(found);
                        }
                    }
                    LayerNode::Layer(_) => {}
                }
            }
            None
        }
        find(&self.roots, name)
    }

    pub fn layer_info_mut(&mut self, name: &str) -> Option<&mut LayerInfo> {
        fn find<'a>(nodes: &'a mut [LayerNode], name: &str) -> Option<&'a mut LayerInfo> {
            for node in nodes {
                match node {
                    LayerNode::Layer(layer) if layer.name == name => return Some(layer),
                    LayerNode::Group(group) => {
                        if let Some(found) = find(&mut group.children, name) {
                            return Some(found);
                        }
                    }
                    LayerNode::Layer(_) => {}
                }
            }
            None
        }
        find(&mut self.roots, name)
    }

    /// Resolve the eligible leaf layers for a query in traversal order, together with
    /// their owning group (if any).
    ///
    /// With an explicit-layer profile the named nodes are traversed and every
    /// non-excluded leaf under them is eligible regardless of visibility, because the
    /// profile intent overrides the visibility checks. Otherwise all queryable layers
    /// are traversed and a leaf must be queryable and inside its resolution window.
    pub fn eligible_leaves(
        &self,
        profile: &SelectionProfile,
        resolution: f64,
    ) -> Vec<(&LayerInfo, Option<&GroupLayer>)> {
        let explicit = profile.is_explicit();
        let roots: Vec<&LayerNode> = match profile.layers.as_deref() {
            Some(names) => names
                .iter()
                .filter_map(|name| {
                    let node = self.node_by_name(name);
                    if node.is_none() {
                        debug!("Profile names unknown layer `{name}`, skipping it.");
                    }
                    node
                })
                .collect(),
            None => self.queryable_roots(),
        };

        let mut leaves = Vec::new();
        traverse(&mut leaves, &roots, None, profile, explicit, resolution);
        leaves
    }
}

fn traverse<'a>(
    leaves: &mut Vec<(&'a LayerInfo, Option<&'a GroupLayer>)>,
    nodes: &[&'a LayerNode],
    group: Option<&'a GroupLayer>,
    profile: &SelectionProfile,
    explicit: bool,
    resolution: f64,
) {
    for node in nodes {
        if profile.excludes(node.name()) {
            continue;
        }
        match node {
            LayerNode::Group(subgroup) => {
                let children: Vec<&LayerNode> = subgroup.children.iter().collect();
                traverse(leaves, &children, Some(subgroup), profile, explicit, resolution);
            }
            LayerNode::Layer(layer) => {
                if !explicit && (!layer.queryable || !layer.visible_at(resolution)) {
                    continue;
                }
                leaves.push((layer, group));
            }
        }
    }
}

/// Build the [SelectionGroup] for a leaf found under a group, falling back to no group.
pub(crate) fn selection_group_of(group: Option<&GroupLayer>) -> Option<SelectionGroup> {
    group.map(|group| SelectionGroup {
        name: group.name.clone(),
        title: group.title.clone(),
    })
}
