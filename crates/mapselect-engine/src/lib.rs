#![warn(missing_debug_implementations)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::single_match)]

//! The mapselect-engine crate is the core of mapselect. It holds the layer tree with the
//! local feature stores, the selection tools, the concurrent extraction pipeline and the
//! spatial intersection filter.
//!
//! The main entry point is the [SelectEngine] struct.

// Modules
pub mod config;
pub mod engine;
pub mod extract;
pub mod feature;
pub mod filter;
pub mod layers;
pub mod mapview;
pub mod overlay;
pub mod prompts;
pub mod remote;
pub mod selection;
pub mod tools;
pub mod widgetflags;

// Re-exports
pub use config::SelectConfig;
pub use engine::SelectEngine;
pub use feature::Feature;
pub use feature::SelectedItem;
pub use layers::LayerTree;
pub use mapview::MapView;
pub use overlay::OverlayLayer;
pub use selection::SelectionManager;
pub use tools::ToolHolder;
pub use widgetflags::WidgetFlags;

// Renames
extern crate nalgebra as na;
