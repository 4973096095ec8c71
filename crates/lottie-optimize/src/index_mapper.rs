use std::collections::HashMap;

use lottie_data::Layer;

use crate::error::OptimizeError;
use crate::layer_group::LayerGroup;

/// Maps old layer indices to new ones and rewrites parent references.
#[derive(Debug, Default, Clone)]
pub struct LayersIndexMapper {
    mapping: HashMap<u32, u32>,
}

impl LayersIndexMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mapping(&mut self, old_index: u32, new_index: u32) {
        self.mapping.insert(old_index, new_index);
    }

    pub fn get_mapping(&self, old_index: u32) -> Result<u32, OptimizeError> {
        self.mapping
            .get(&old_index)
            .copied()
            .ok_or(OptimizeError::UnmappedIndex(old_index))
    }

    pub fn contains(&self, old_index: u32) -> bool {
        self.mapping.contains_key(&old_index)
    }

    pub fn remap_layer(&self, layer: &Layer) -> Result<Layer, OptimizeError> {
        let mut remapped = layer.clone();
        remapped.index = self.get_mapping(layer.index)?;
        remapped.parent = layer
            .parent
            .map(|parent| self.get_mapping(parent))
            .transpose()?;
        Ok(remapped)
    }

    pub fn remap_layers(&self, layers: &[Layer]) -> Result<Vec<Layer>, OptimizeError> {
        layers.iter().map(|layer| self.remap_layer(layer)).collect()
    }

    pub fn remap_layer_group(&self, group: &LayerGroup) -> Result<LayerGroup, OptimizeError> {
        Ok(LayerGroup {
            main_layer: self.remap_layer(&group.main_layer)?,
            matte_layer: group
                .matte_layer
                .as_ref()
                .map(|matte| self.remap_layer(matte))
                .transpose()?,
            can_be_merged: group.can_be_merged,
        })
    }

    pub fn remap_layer_groups(
        &self,
        groups: &[LayerGroup],
    ) -> Result<Vec<LayerGroup>, OptimizeError> {
        groups
            .iter()
            .map(|group| self.remap_layer_group(group))
            .collect()
    }
}

/// Issues dense indices 0, 1, 2, ...
#[derive(Debug, Default, Clone)]
pub struct IndexGenerator {
    next: u32,
}

impl IndexGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_index(&mut self) -> u32 {
        let index = self.next;
        self.next += 1;
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::LayerKind;

    #[test]
    fn test_generator_is_dense() {
        let mut generator = IndexGenerator::new();
        let issued: Vec<u32> = (0..4).map(|_| generator.generate_index()).collect();
        assert_eq!(issued, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remap_rewrites_parent() {
        let mut mapper = LayersIndexMapper::new();
        mapper.set_mapping(10, 0);
        mapper.set_mapping(20, 1);

        let mut child = Layer::new(20, LayerKind::Null, 0.0, 5.0);
        child.parent = Some(10);
        let remapped = mapper.remap_layer(&child).unwrap();
        assert_eq!(remapped.index, 1);
        assert_eq!(remapped.parent, Some(0));

        let orphan = Layer::new(10, LayerKind::Null, 0.0, 5.0);
        assert_eq!(mapper.remap_layer(&orphan).unwrap().parent, None);
    }

    #[test]
    fn test_missing_mapping_is_an_error() {
        let mapper = LayersIndexMapper::new();
        let layer = Layer::new(4, LayerKind::Null, 0.0, 5.0);
        assert_eq!(
            mapper.remap_layer(&layer),
            Err(OptimizeError::UnmappedIndex(4))
        );
    }
}
