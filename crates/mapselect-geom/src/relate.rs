// Imports
use geo::{Geometry, Intersects};

/// Whether two geometries share no point at all.
///
/// The negation of this is the sole selection predicate: an item is selected iff its
/// geometry is *not* disjoint from the query geometry, which is equivalent to a boundary
/// or interior intersection.
pub fn disjoint(a: &Geometry<f64>, b: &Geometry<f64>) -> bool {
    !a.intersects(b)
}
