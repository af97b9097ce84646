//! FILENAME: chart-engine/src/lib.rs
//! Chart transformation subsystem.
//!
//! This crate converts a pre-aggregated pivot result (`pivot-model`) into
//! the shapes chart renderers consume: flat per-category records, a nested
//! category forest, per-depth ring aggregates for sunburst charts, and a
//! sized node tree for treemaps. A heuristic classifier recommends the best
//! chart shape for a given result.
//!
//! All transforms are synchronous pure functions over immutable inputs and
//! never raise on malformed data; failure modes degrade to safe defaults.
//!
//! Layers:
//! - `color`: Deterministic color-sequence generation
//! - `tree`: Category forest construction from keyed rows
//! - `rings`: Per-depth ring flattening (consumes the forest)
//! - `series`: Flat, sorted, Top-N-limited chart records
//! - `treemap`: Sized nested-node tree with first-level Top-N grouping
//! - `classifier`: Chart shape recommendation

pub mod classifier;
pub mod color;
pub mod rings;
pub mod series;
pub mod tree;
pub mod treemap;

pub use classifier::{classify, ChartMetadata, ChartType};
pub use color::{lighten, ColorAssigner, ColorMode, DEFAULT_PALETTE};
pub use rings::{flatten_rings, RingItem};
pub use series::{transform_series, ChartRecord, SeriesOptions};
pub use tree::{build_category_tree, CategoryNode};
pub use treemap::{build_treemap, drill_down, TreemapNode, TreemapOptions};
