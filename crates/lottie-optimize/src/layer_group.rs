use lottie_data::Layer;

use crate::range::TimeRange;

/// A main layer together with the matte drawn directly above it.
///
/// Groups are the unit of merging so a matte never gets separated from the
/// layer it mattes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    pub main_layer: Layer,
    pub matte_layer: Option<Layer>,
    pub can_be_merged: bool,
}

impl LayerGroup {
    pub fn new(main_layer: Layer, matte_layer: Option<Layer>, can_be_merged: bool) -> Self {
        Self {
            main_layer,
            matte_layer,
            can_be_merged,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::of_layer(&self.main_layer)
    }

    /// Matte first, then the main layer.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.matte_layer.iter().chain(std::iter::once(&self.main_layer))
    }

    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.layers().map(|layer| layer.index)
    }

    /// Groups a top-to-bottom layer list. A layer whose successor is matted becomes
    /// that successor's matte.
    ///
    /// A matted layer without a matte of its own (first in the list, or whose matte
    /// was itself consumed as a main layer) is kept frozen.
    pub fn from_layers<F>(layers: &[Layer], can_be_merged: F) -> Vec<LayerGroup>
    where
        F: Fn(&Layer, Option<&Layer>) -> bool,
    {
        let mut groups = Vec::with_capacity(layers.len());
        let mut i = 0;
        while i < layers.len() {
            match layers.get(i + 1) {
                Some(next) if next.is_matted() && !layers[i].is_matted() => {
                    let matte = &layers[i];
                    let mergeable = can_be_merged(next, Some(matte));
                    groups.push(LayerGroup::new(next.clone(), Some(matte.clone()), mergeable));
                    i += 2;
                }
                _ => {
                    let layer = &layers[i];
                    let mergeable = !layer.is_matted() && can_be_merged(layer, None);
                    groups.push(LayerGroup::new(layer.clone(), None, mergeable));
                    i += 1;
                }
            }
        }
        groups
    }

    /// Flattens densely reindexed groups back to a top-to-bottom list, matte
    /// before main.
    pub fn flatten(groups: &[LayerGroup]) -> Vec<Layer> {
        let layers: Vec<Layer> = groups.iter().flat_map(|group| group.layers()).cloned().collect();
        debug_assert!(
            layers.windows(2).all(|pair| pair[0].index < pair[1].index),
            "flattened layers must have ascending indices"
        );
        layers
    }
}
