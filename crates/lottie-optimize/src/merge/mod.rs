//! Structural merging of two temporally disjoint values into one.
//!
//! Every merge takes the two operands together with the time range in which each
//! one is visible. The merged value behaves like `a` inside `a`'s range and like
//! `b` inside `b`'s range. Incompatibilities produce
//! [`crate::MergeResult::failed`]; only broken invariants surface as
//! [`crate::OptimizeError`].

pub mod animatable;
pub mod layers;
pub mod shapes;

use lottie_data::{Asset, Composition};

pub use animatable::{merge_animatable, merge_opacity_strict, merge_vector2, merge_vector3};
pub use shapes::{merge_shape_content, merge_shape_contents, merge_transform};

/// One merge session over a composition.
///
/// Owns the assets synthesized by precomp merges and the counter that keeps their
/// ids unique.
#[derive(Debug)]
pub struct MergeHelper<'a> {
    composition: &'a Composition,
    generated_assets: Vec<Asset>,
    generated_count: usize,
}

/// Position in the generated asset list that a failed attempt rolls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl<'a> MergeHelper<'a> {
    pub fn new(composition: &'a Composition) -> Self {
        Self {
            composition,
            generated_assets: Vec::new(),
            generated_count: 0,
        }
    }

    pub fn generated_assets(&self) -> &[Asset] {
        &self.generated_assets
    }

    pub fn into_generated_assets(self) -> Vec<Asset> {
        self.generated_assets
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.generated_assets.len())
    }

    /// Drops assets generated since `checkpoint`. Ids are never reused.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.generated_assets.truncate(checkpoint.0);
    }

    /// Looks an asset up in the composition first, then among the generated ones.
    pub fn asset_by_id(&self, id: &str) -> Option<&Asset> {
        self.composition
            .asset_by_id(id)
            .or_else(|| self.generated_assets.iter().find(|asset| asset.id() == id))
    }

    fn next_asset_id(&mut self, a_id: &str, b_id: &str) -> String {
        let id = format!("{a_id} {b_id} {}", self.generated_count);
        self.generated_count += 1;
        id
    }
}
