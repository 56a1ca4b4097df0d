#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![allow(clippy::single_match)]

//! the mapselect-geom crate provides mapselect with building blocks for coordinate reference
//! systems, query geometries, great-circle buffering and spatial relations.

// Modules
/// module for great-circle buffering
pub mod buffer;
/// module for coordinate reference systems
pub mod crs;
/// module for gesture events
pub mod gesture;
/// module for query geometries
pub mod query;
/// module for spatial relations
pub mod relate;

// Re-exports
pub use buffer::BufferError;
pub use crs::Crs;
pub use gesture::GestureEvent;
pub use query::QueryGeometry;
