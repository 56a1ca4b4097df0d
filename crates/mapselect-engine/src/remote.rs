// Imports
use crate::feature::{Feature, SelectedItem};
use crate::layers::LayerInfo;
use futures::channel::oneshot;
use geo::{Coord, Rect};

/// The remote feature service collaborator of the engine.
///
/// Implementations start the request immediately and fulfill the returned receiver
/// when the response arrives. A dropped sender counts as a failed request.
pub trait RemoteFeatureSource {
    /// Fetch all features of the given layer intersecting the extent.
    fn fetch_by_extent(
        &self,
        layer: &LayerInfo,
        extent: Rect<f64>,
    ) -> oneshot::Receiver<anyhow::Result<Vec<Feature>>>;

    /// Query the remote feature info endpoint at a map coordinate, across all layers
    /// the service considers queryable.
    fn fetch_at_coordinate(
        &self,
        coordinate: Coord<f64>,
    ) -> oneshot::Receiver<anyhow::Result<Vec<SelectedItem>>>;
}
