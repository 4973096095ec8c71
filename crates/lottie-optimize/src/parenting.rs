use std::collections::{HashMap, HashSet};

use lottie_data::Layer;

/// Indices of layers whose transform is inherited by a descendant visible outside
/// the layer's own range.
///
/// Merging such a layer rewrites its transform outside that range, which would
/// move the descendant.
pub fn pinned_parents(layers: &[Layer]) -> HashSet<u32> {
    let mut children: HashMap<u32, Vec<&Layer>> = HashMap::new();
    for layer in layers {
        if let Some(parent) = layer.parent {
            children.entry(parent).or_default().push(layer);
        }
    }

    let mut pinned = HashSet::new();
    for layer in layers {
        let mut visited = HashSet::from([layer.index]);
        let mut stack: Vec<&Layer> = children.get(&layer.index).cloned().unwrap_or_default();
        while let Some(descendant) = stack.pop() {
            if !visited.insert(descendant.index) {
                continue;
            }
            if descendant.in_point < layer.in_point || descendant.out_point > layer.out_point {
                pinned.insert(layer.index);
                break;
            }
            if let Some(grandchildren) = children.get(&descendant.index) {
                stack.extend(grandchildren.iter().copied());
            }
        }
    }
    pinned
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::LayerKind;

    fn layer(index: u32, parent: Option<u32>, in_point: f64, out_point: f64) -> Layer {
        let mut layer = Layer::new(index, LayerKind::Null, in_point, out_point);
        layer.parent = parent;
        layer
    }

    #[test]
    fn test_contained_children_do_not_pin() {
        let layers = vec![layer(1, None, 0.0, 10.0), layer(2, Some(1), 2.0, 8.0)];
        assert!(pinned_parents(&layers).is_empty());
    }

    #[test]
    fn test_grandchild_outside_range_pins_ancestors() {
        let layers = vec![
            layer(1, None, 0.0, 10.0),
            layer(2, Some(1), 0.0, 30.0),
            layer(3, Some(2), 20.0, 40.0),
        ];
        let pinned = pinned_parents(&layers);
        assert!(pinned.contains(&1));
        assert!(pinned.contains(&2));
        assert!(!pinned.contains(&3));
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let layers = vec![layer(1, Some(2), 0.0, 10.0), layer(2, Some(1), 0.0, 10.0)];
        assert!(pinned_parents(&layers).is_empty());
    }
}
