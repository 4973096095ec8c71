//! Lottie layer-merge optimization.
//!
//! Layers that are never visible at the same time can often be replaced by one
//! layer whose animations reproduce each original inside its own time window.
//! This crate finds such layers, merges them structurally and rewrites the
//! composition with fewer layers:
//!
//! - [`optimize`] merges any compatible top-level layers.
//! - [`get_optimized`] only merges precomp layers, folding duplicated precomps
//!   into one generated asset.
//! - [`LayerMergeOptimizer`] runs either pass with a custom schedule and returns
//!   an [`OptimizationReport`].
//!
//! Data problems (incompatible layers, overlapping ranges) are ordinary merge
//! failures; [`OptimizeError`] only signals broken invariants such as an invalid
//! input composition.

pub mod animator;
pub mod config;
pub mod drawables;
pub mod error;
pub mod graph;
pub mod index_mapper;
pub mod layer_group;
pub mod merge;
pub mod merge_result;
pub mod normalize;
pub mod optimizer;
pub mod parenting;
pub mod range;
pub mod shift;
pub mod validate;

pub use config::OptimizerConfig;
pub use error::OptimizeError;
pub use layer_group::LayerGroup;
pub use merge::MergeHelper;
pub use merge_result::MergeResult;
pub use normalize::{normalize_composition, EnsureOneEasingPerChannel};
pub use optimizer::{get_optimized, optimize, LayerMergeOptimizer, OptimizationReport, PassKind};
pub use range::TimeRange;
pub use validate::validate_composition;
