use thiserror::Error;

/// Invariant violations. Ordinary merge incompatibilities are reported through
/// [`crate::MergeResult`] and never reach this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizeError {
    #[error("No index mapping recorded for layer {0}")]
    UnmappedIndex(u32),
    #[error("Duplicate layer index {index} in {collection}")]
    DuplicateLayerIndex { index: u32, collection: String },
    #[error("Layer {index} in {collection} references missing parent {parent}")]
    DanglingParent {
        index: u32,
        parent: u32,
        collection: String,
    },
    #[error("Layer {index} in {collection} ends at {out_point} before it starts at {in_point}")]
    InvertedLayerRange {
        index: u32,
        in_point: f64,
        out_point: f64,
        collection: String,
    },
    #[error("Composition timeline [{in_point}, {out_point}) is empty")]
    EmptyTimeline { in_point: f64, out_point: f64 },
    #[error("Duplicate asset id: {0}")]
    DuplicateAssetId(String),
    #[error("Invalid optimizer configuration: {0}")]
    InvalidConfig(String),
}
