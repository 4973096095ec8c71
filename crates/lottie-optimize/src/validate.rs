use std::collections::HashSet;

use lottie_data::{Asset, Composition, LayerCollection};

use crate::error::OptimizeError;

const ROOT_COLLECTION: &str = "composition";

/// Checks the structural invariants the optimizer relies on.
pub fn validate_composition(composition: &Composition) -> Result<(), OptimizeError> {
    let (in_point, out_point) = (composition.in_point, composition.out_point);
    if !(in_point.is_finite() && out_point.is_finite() && in_point < out_point) {
        return Err(OptimizeError::EmptyTimeline { in_point, out_point });
    }

    let mut asset_ids = HashSet::new();
    for asset in &composition.assets {
        if !asset_ids.insert(asset.id()) {
            return Err(OptimizeError::DuplicateAssetId(asset.id().to_string()));
        }
    }

    validate_layer_collection(&composition.layers, ROOT_COLLECTION)?;
    for asset in &composition.assets {
        if let Asset::LayerCollection(asset) = asset {
            validate_layer_collection(&asset.layers, &asset.id)?;
        }
    }
    Ok(())
}

fn validate_layer_collection(layers: &LayerCollection, name: &str) -> Result<(), OptimizeError> {
    let mut indices = HashSet::new();
    for layer in layers.layers_bottom_to_top() {
        if !indices.insert(layer.index) {
            return Err(OptimizeError::DuplicateLayerIndex {
                index: layer.index,
                collection: name.to_string(),
            });
        }
        if !(layer.in_point <= layer.out_point) {
            return Err(OptimizeError::InvertedLayerRange {
                index: layer.index,
                in_point: layer.in_point,
                out_point: layer.out_point,
                collection: name.to_string(),
            });
        }
    }

    for layer in layers.layers_bottom_to_top() {
        if let Some(parent) = layer.parent {
            if !indices.contains(&parent) {
                return Err(OptimizeError::DanglingParent {
                    index: layer.index,
                    parent,
                    collection: name.to_string(),
                });
            }
        }
    }
    Ok(())
}
