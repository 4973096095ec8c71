use lottie_data::{Asset, Layer, LayerCollection, LayerCollectionAsset, LayerKind, ShapeLayerContent, Transform};
use tracing::{debug, instrument, trace};

use super::shapes::{join_names, merge_shape_contents, merge_transform};
use super::MergeHelper;
use crate::error::OptimizeError;
use crate::graph::LayersGraph;
use crate::index_mapper::{IndexGenerator, LayersIndexMapper};
use crate::layer_group::LayerGroup;
use crate::merge_result::MergeResult;
use crate::parenting::pinned_parents;
use crate::range::TimeRange;
use crate::shift::shift_layer_collection;

const CLAMP_EPSILON: f64 = 1e-6;

/// Discrete layer properties that must agree, plus the ordering preconditions.
/// `a` must start no later than `b`.
fn layers_compatible(a: &Layer, b: &Layer, ignore_parent: bool) -> bool {
    a.layer_type() == b.layer_type()
        && a.auto_orient == b.auto_orient
        && a.blend_mode == b.blend_mode
        && a.is_3d == b.is_3d
        && a.is_hidden == b.is_hidden
        && a.matte_type == b.matte_type
        && (ignore_parent || a.parent == b.parent)
        && a.effects.is_empty()
        && b.effects.is_empty()
        && a.masks.is_empty()
        && b.masks.is_empty()
        && a.time_stretch == 1.0
        && b.time_stretch == 1.0
        && a.out_point <= b.in_point
        && a.start_time <= a.in_point
        && b.start_time <= b.in_point
}

/// `a`'s fields with `b`'s out point.
fn merged_layer(a: &Layer, b: &Layer, transform: Transform, kind: LayerKind) -> Layer {
    Layer {
        name: join_names(&a.name, &b.name),
        out_point: b.out_point,
        transform,
        kind,
        ..a.clone()
    }
}

/// Restricts a layer's visibility to the window its collection is shown in.
///
/// The range stays at least `CLAMP_EPSILON` wide. A layer entirely outside the
/// window becomes a sliver at the nearest window edge instead of disappearing.
pub(crate) fn clamp_layer(layer: &Layer, range: TimeRange) -> Layer {
    let mut clamped = layer.clone();
    clamped.in_point = layer.in_point.max(range.start).min(range.end - CLAMP_EPSILON);
    clamped.out_point = layer.out_point.max(range.start + CLAMP_EPSILON).min(range.end);
    clamped
}

impl<'a> MergeHelper<'a> {
    /// Merges two groups, their mattes included. The merged group is frozen for
    /// the rest of the graph pass that produced it.
    pub fn merge_layer_groups(
        &mut self,
        a: &LayerGroup,
        b: &LayerGroup,
    ) -> Result<MergeResult<LayerGroup>, OptimizeError> {
        if !a.can_be_merged || !b.can_be_merged {
            return Ok(MergeResult::failed());
        }
        if a.matte_layer.is_some() != b.matte_layer.is_some() {
            return Ok(MergeResult::failed());
        }

        let checkpoint = self.checkpoint();
        let Some((main, main_score)) = self
            .merge_layers(&a.main_layer, &b.main_layer, false)?
            .into_parts()
        else {
            return Ok(MergeResult::failed());
        };

        let (Some(a_matte), Some(b_matte)) = (&a.matte_layer, &b.matte_layer) else {
            return Ok(MergeResult::new(LayerGroup::new(main, None, false), main_score));
        };

        // mattes parented to their own main layer follow the merged main layer
        let can_ignore_parent = a_matte.parent == Some(a.main_layer.index)
            && b_matte.parent == Some(b.main_layer.index);
        match self
            .merge_layers(a_matte, b_matte, can_ignore_parent)?
            .into_parts()
        {
            Some((matte, matte_score)) => Ok(MergeResult::new(
                LayerGroup::new(main, Some(matte), false),
                main_score.min(matte_score),
            )),
            None => {
                self.rollback(checkpoint);
                Ok(MergeResult::failed())
            }
        }
    }

    /// Merges two layers whose visible ranges do not overlap. The operands are
    /// ordered by in point first.
    pub fn merge_layers(
        &mut self,
        a: &Layer,
        b: &Layer,
        ignore_parent: bool,
    ) -> Result<MergeResult<Layer>, OptimizeError> {
        let (a, b) = if a.in_point > b.in_point { (b, a) } else { (a, b) };

        if !layers_compatible(a, b, ignore_parent) {
            trace!(a = a.index, b = b.index, "Layers are not compatible");
            return Ok(MergeResult::failed());
        }

        let result = match (&a.kind, &b.kind) {
            (LayerKind::PreComp { .. }, LayerKind::PreComp { .. }) => {
                return self.merge_precomp_layers(a, b);
            }
            (LayerKind::Shape { contents: a_contents }, LayerKind::Shape { contents: b_contents }) => {
                merge_shape_layers(a, a_contents, b, b_contents)
            }
            (LayerKind::Null, LayerKind::Null) => merge_plain_layers(a, b),
            (
                LayerKind::Solid {
                    width: aw,
                    height: ah,
                    color: a_color,
                },
                LayerKind::Solid {
                    width: bw,
                    height: bh,
                    color: b_color,
                },
            ) if aw == bw && ah == bh && a_color == b_color => merge_plain_layers(a, b),
            (LayerKind::Image { ref_id: a_ref }, LayerKind::Image { ref_id: b_ref }) if a_ref == b_ref => {
                merge_plain_layers(a, b)
            }
            _ => MergeResult::failed(),
        };
        Ok(result)
    }

    fn merge_precomp_layers(&mut self, a: &Layer, b: &Layer) -> Result<MergeResult<Layer>, OptimizeError> {
        let (
            LayerKind::PreComp {
                ref_id: a_ref,
                width,
                height,
            },
            LayerKind::PreComp {
                ref_id: b_ref,
                width: b_width,
                height: b_height,
            },
        ) = (&a.kind, &b.kind)
        else {
            return Ok(MergeResult::failed());
        };
        if width != b_width || height != b_height {
            return Ok(MergeResult::failed());
        }

        let a_range = TimeRange::of_layer(a);
        let b_range = TimeRange::of_layer(b);
        let Some(transform) = merge_transform(&a.transform, a_range, &b.transform, b_range, true).into_value() else {
            return Ok(MergeResult::failed());
        };

        let (Some(Asset::LayerCollection(a_asset)), Some(Asset::LayerCollection(b_asset))) =
            (self.asset_by_id(a_ref).cloned(), self.asset_by_id(b_ref).cloned())
        else {
            return Ok(MergeResult::failed());
        };

        // b's content is re-timed onto a's local timeline
        let offset = b.start_time - a.start_time;
        let Some(b_layers) = shift_layer_collection(&b_asset.layers, offset) else {
            return Ok(MergeResult::failed());
        };

        let checkpoint = self.checkpoint();
        let merged = self.merge_layer_collections(
            &a_asset.layers,
            a_range.shift_left(a.start_time),
            &b_layers,
            b_range.shift_left(a.start_time),
        )?;
        let Some((layers, score)) = merged.into_parts() else {
            self.rollback(checkpoint);
            return Ok(MergeResult::failed());
        };

        let id = self.next_asset_id(a_ref, b_ref);
        debug!(asset = %id, score, "Generated merged precomp asset");
        self.generated_assets.push(Asset::LayerCollection(LayerCollectionAsset {
            id: id.clone(),
            layers,
        }));

        let kind = LayerKind::PreComp {
            ref_id: id,
            width: *width,
            height: *height,
        };
        Ok(MergeResult::new(merged_layer(a, b, transform, kind), score))
    }

    /// Merges two layer collections shown during `a_range` and `b_range`.
    ///
    /// Layers are clamped to their window and densely reindexed, then layer
    /// groups are merged through the dependency graph until no pass shrinks the
    /// group count. The score is the share of the smaller collection that was
    /// folded away.
    #[instrument(level = "debug", skip_all, fields(a_layers = a.len(), b_layers = b.len()))]
    pub fn merge_layer_collections(
        &mut self,
        a: &LayerCollection,
        a_range: TimeRange,
        b: &LayerCollection,
        b_range: TimeRange,
    ) -> Result<MergeResult<LayerCollection>, OptimizeError> {
        if a.is_empty() || b.is_empty() {
            return Ok(MergeResult::failed());
        }

        let a_layers: Vec<Layer> = a.layers_top_to_bottom().map(|l| clamp_layer(l, a_range)).collect();
        let b_layers: Vec<Layer> = b.layers_top_to_bottom().map(|l| clamp_layer(l, b_range)).collect();

        let mut generator = IndexGenerator::new();
        let mut a_mapper = LayersIndexMapper::new();
        let mut b_mapper = LayersIndexMapper::new();
        for layer in &a_layers {
            a_mapper.set_mapping(layer.index, generator.generate_index());
        }
        for layer in &b_layers {
            b_mapper.set_mapping(layer.index, generator.generate_index());
        }
        let a_layers = a_mapper.remap_layers(&a_layers)?;
        let b_layers = b_mapper.remap_layers(&b_layers)?;

        // only layers running into the seam between the two windows are candidates
        let a_pinned = pinned_parents(&a_layers);
        let a_groups = LayerGroup::from_layers(&a_layers, |main, matte| {
            main.out_point >= a_range.end
                && !a_pinned.contains(&main.index)
                && matte.map_or(true, |m| !a_pinned.contains(&m.index))
        });
        let b_pinned = pinned_parents(&b_layers);
        let b_groups = LayerGroup::from_layers(&b_layers, |main, matte| {
            main.in_point <= b_range.start
                && !b_pinned.contains(&main.index)
                && matte.map_or(true, |m| !b_pinned.contains(&m.index))
        });

        let mut groups: Vec<LayerGroup> = a_groups.into_iter().chain(b_groups).collect();
        loop {
            let before = groups.len();
            let mut graph = LayersGraph::new(groups);
            let merges = graph.merge_all_possible_layer_groups(self)?;
            groups = graph.into_layer_groups()?;
            trace!(merges, groups = groups.len(), "Graph pass finished");
            if groups.len() >= before {
                break;
            }
        }

        let layers = LayerGroup::flatten(&groups);
        let total = a_layers.len() + b_layers.len();
        let score = (total - layers.len()) as f64 / a_layers.len().min(b_layers.len()) as f64;
        Ok(MergeResult::new(LayerCollection::from_top_to_bottom(layers), score))
    }
}

fn merge_plain_layers(a: &Layer, b: &Layer) -> MergeResult<Layer> {
    let a_range = TimeRange::of_layer(a);
    let b_range = TimeRange::of_layer(b);
    merge_transform(&a.transform, a_range, &b.transform, b_range, true)
        .map(|transform| merged_layer(a, b, transform, a.kind.clone()))
}

fn merge_shape_layers(
    a: &Layer,
    a_contents: &[ShapeLayerContent],
    b: &Layer,
    b_contents: &[ShapeLayerContent],
) -> MergeResult<Layer> {
    let a_range = TimeRange::of_layer(a);
    let b_range = TimeRange::of_layer(b);
    let Some((transform, transform_score)) =
        merge_transform(&a.transform, a_range, &b.transform, b_range, true).into_parts()
    else {
        return MergeResult::failed();
    };
    let Some((contents, contents_score)) =
        merge_shape_contents(a_contents, a_range, b_contents, b_range).into_parts()
    else {
        return MergeResult::failed();
    };
    MergeResult::new(
        merged_layer(a, b, transform, LayerKind::Shape { contents }),
        transform_score.min(contents_score),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{value_at, vector3_at};
    use crate::optimizer::optimize;
    use lottie_data::{
        Animatable, AnimatableVector3, BlendMode, Color, Composition, Effect, EffectType, KeyFrame,
        MatteType, Opacity, Vector3,
    };
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn composition() -> Composition {
        Composition {
            name: "test".into(),
            version: String::new(),
            width: 100.0,
            height: 100.0,
            in_point: 0.0,
            out_point: 100.0,
            frames_per_second: 30.0,
            is_3d: false,
            assets: Vec::new(),
            layers: LayerCollection::default(),
            markers: Vec::new(),
        }
    }

    fn solid(index: u32, in_point: f64, out_point: f64) -> Layer {
        Layer::new(
            index,
            LayerKind::Solid {
                width: 10.0,
                height: 10.0,
                color: Color::rgb(1.0, 0.0, 0.0),
            },
            in_point,
            out_point,
        )
    }

    #[test]
    fn test_disjoint_solids_merge() {
        let comp = composition();
        let mut helper = MergeHelper::new(&comp);
        let merged = helper
            .merge_layers(&solid(1, 0.0, 10.0), &solid(2, 20.0, 30.0), false)
            .unwrap();
        assert_eq!(merged.score(), 1.0);
        let layer = merged.into_value().unwrap();
        assert_eq!(layer.index, 1);
        assert_eq!((layer.in_point, layer.out_point), (0.0, 30.0));
        assert_eq!(value_at(&layer.transform.opacity, 15.0), Opacity::TRANSPARENT);
        assert_eq!(value_at(&layer.transform.opacity, 25.0), Opacity::OPAQUE);
    }

    #[test]
    fn test_operands_are_ordered_by_in_point() {
        let comp = composition();
        let mut helper = MergeHelper::new(&comp);
        let merged = helper
            .merge_layers(&solid(2, 20.0, 30.0), &solid(1, 0.0, 10.0), false)
            .unwrap()
            .into_value()
            .unwrap();
        assert_eq!(merged.index, 1);
        assert_eq!(merged.out_point, 30.0);
    }

    #[test]
    fn test_overlapping_layers_are_rejected() {
        let comp = composition();
        let mut helper = MergeHelper::new(&comp);
        let result = helper
            .merge_layers(&solid(1, 0.0, 15.0), &solid(2, 10.0, 30.0), false)
            .unwrap();
        assert!(!result.success());
    }

    #[test]
    fn test_gate_rejects_discrete_differences() {
        let comp = composition();
        let mut helper = MergeHelper::new(&comp);
        let a = solid(1, 0.0, 10.0);

        let mut blended = solid(2, 20.0, 30.0);
        blended.blend_mode = BlendMode::Screen;
        assert!(!helper.merge_layers(&a, &blended, false).unwrap().success());

        let mut with_effect = solid(2, 20.0, 30.0);
        with_effect.effects.push(Effect {
            name: "blur".into(),
            effect_type: EffectType::GaussianBlur,
            is_enabled: true,
        });
        assert!(!helper.merge_layers(&a, &with_effect, false).unwrap().success());

        let mut stretched = solid(2, 20.0, 30.0);
        stretched.time_stretch = 2.0;
        assert!(!helper.merge_layers(&a, &stretched, false).unwrap().success());

        let mut parented = solid(2, 20.0, 30.0);
        parented.parent = Some(7);
        assert!(!helper.merge_layers(&a, &parented, false).unwrap().success());
        assert!(helper.merge_layers(&a, &parented, true).unwrap().success());

        let mut other_color = solid(2, 20.0, 30.0);
        other_color.kind = LayerKind::Solid {
            width: 10.0,
            height: 10.0,
            color: Color::rgb(0.0, 1.0, 0.0),
        };
        assert!(!helper.merge_layers(&a, &other_color, false).unwrap().success());
    }

    #[test]
    fn test_text_layers_never_merge() {
        let comp = composition();
        let mut helper = MergeHelper::new(&comp);
        let text = |index, in_point, out_point| {
            Layer::new(index, LayerKind::Text { ref_id: "t".into() }, in_point, out_point)
        };
        assert!(!helper
            .merge_layers(&text(1, 0.0, 10.0), &text(2, 20.0, 30.0), false)
            .unwrap()
            .success());
    }

    #[test]
    fn test_position_merge_keeps_both_halves() {
        let comp = composition();
        let mut helper = MergeHelper::new(&comp);
        let mut a = solid(1, 0.0, 10.0);
        a.transform.position = AnimatableVector3::Vector {
            value: Animatable::from_key_frames(vec![
                KeyFrame::linear(0.0, Vector3::ZERO),
                KeyFrame::linear(10.0, Vector3::new(10.0, 0.0, 0.0)),
            ])
            .unwrap(),
        };
        let mut b = solid(2, 20.0, 30.0);
        b.transform.position = AnimatableVector3::constant(Vector3::new(50.0, 50.0, 0.0));

        let merged = helper.merge_layers(&a, &b, false).unwrap().into_value().unwrap();
        assert_eq!(vector3_at(&merged.transform.position, 5.0), Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(vector3_at(&merged.transform.position, 25.0), Vector3::new(50.0, 50.0, 0.0));
    }

    #[test]
    fn test_group_merge_requires_matching_mattes() {
        let comp = composition();
        let mut helper = MergeHelper::new(&comp);
        let mut matted_a = solid(2, 0.0, 10.0);
        matted_a.matte_type = MatteType::Add;
        let mut matte_a = solid(1, 0.0, 10.0);
        matte_a.parent = Some(2);
        let mut matted_b = solid(4, 20.0, 30.0);
        matted_b.matte_type = MatteType::Add;
        let mut matte_b = solid(3, 20.0, 30.0);
        matte_b.parent = Some(4);

        let with_matte_a = LayerGroup::new(matted_a.clone(), Some(matte_a), true);
        let with_matte_b = LayerGroup::new(matted_b.clone(), Some(matte_b), true);
        let merged = helper
            .merge_layer_groups(&with_matte_a, &with_matte_b)
            .unwrap()
            .into_value()
            .unwrap();
        assert!(!merged.can_be_merged);
        assert_eq!(merged.matte_layer.as_ref().map(|m| m.parent), Some(Some(2)));

        let bare = LayerGroup::new(matted_b, None, true);
        assert!(!helper.merge_layer_groups(&with_matte_a, &bare).unwrap().success());

        let frozen = LayerGroup::new(solid(5, 40.0, 50.0), None, false);
        let single = LayerGroup::new(solid(6, 60.0, 70.0), None, true);
        assert!(!helper.merge_layer_groups(&frozen, &single).unwrap().success());
    }

    #[test]
    fn test_clamp_layer_never_inverts() {
        let clamped = clamp_layer(&solid(1, 0.0, 100.0), TimeRange::new(10.0, 20.0));
        assert_eq!(clamped.out_point, 20.0);
        assert!((clamped.in_point - 10.0).abs() < 1e-9);

        let outside = clamp_layer(&solid(1, 50.0, 60.0), TimeRange::new(10.0, 20.0));
        assert!(outside.in_point < outside.out_point);

        let degenerate = clamp_layer(&solid(1, 0.0, 5.0), TimeRange::new(3.0, 3.0));
        assert!(degenerate.in_point.is_finite());
    }

    #[test]
    fn test_clamp_outside_window_leaves_sliver_at_edge() {
        let window = TimeRange::new(10.0, 20.0);

        let after = clamp_layer(&solid(1, 50.0, 60.0), window);
        assert_eq!(after.out_point, 20.0);
        assert!((after.in_point - (20.0 - CLAMP_EPSILON)).abs() < 1e-12);

        let before = clamp_layer(&solid(1, 0.0, 5.0), window);
        assert_eq!(before.in_point, 10.0);
        assert!((before.out_point - (10.0 + CLAMP_EPSILON)).abs() < 1e-12);
    }

    fn random_kind(rng: &mut StdRng) -> LayerKind {
        match rng.gen_range(0..4) {
            0 => LayerKind::Solid {
                width: 10.0,
                height: 10.0,
                color: Color::rgb(1.0, 0.0, 0.0),
            },
            1 => LayerKind::Null,
            2 => LayerKind::Shape { contents: Vec::new() },
            _ => LayerKind::Image { ref_id: "image".into() },
        }
    }

    /// Two ranges sharing at least one frame span.
    fn overlapping_ranges(rng: &mut StdRng) -> (TimeRange, TimeRange) {
        let a_start = rng.gen_range(0.0..50.0);
        let a = TimeRange::new(a_start, a_start + rng.gen_range(1.0..20.0));
        let b_start = rng.gen_range(a.start - 10.0..a.end - 0.5);
        let b_end = rng.gen_range(b_start.max(a.start) + 0.25..a.end + 20.0);
        (a, TimeRange::new(b_start, b_end))
    }

    #[test]
    fn test_random_overlapping_layers_never_merge() {
        let comp = composition();
        let mut helper = MergeHelper::new(&comp);
        let mut rng = StdRng::seed_from_u64(0x0e1a9);

        for _ in 0..500 {
            let (a_range, b_range) = overlapping_ranges(&mut rng);
            assert!(a_range.intersects(&b_range));
            let kind = random_kind(&mut rng);
            let a = Layer::new(2, kind.clone(), a_range.start, a_range.end);
            let b = Layer::new(4, kind, b_range.start, b_range.end);

            assert!(!helper.merge_layers(&a, &b, false).unwrap().success());
            assert!(!helper.merge_layers(&b, &a, true).unwrap().success());

            let (a_group, b_group) = if rng.gen_bool(0.5) {
                let mut a_main = a.clone();
                a_main.matte_type = MatteType::Add;
                let mut b_main = b.clone();
                b_main.matte_type = MatteType::Add;
                let a_matte = Layer::new(1, LayerKind::Null, a_range.start, a_range.end);
                let b_matte = Layer::new(3, LayerKind::Null, b_range.start, b_range.end);
                (
                    LayerGroup::new(a_main, Some(a_matte), true),
                    LayerGroup::new(b_main, Some(b_matte), true),
                )
            } else {
                (LayerGroup::new(a, None, true), LayerGroup::new(b, None, true))
            };
            assert!(!helper.merge_layer_groups(&a_group, &b_group).unwrap().success());
        }
        assert!(helper.generated_assets().is_empty());
    }

    #[test]
    fn test_optimize_keeps_mutually_overlapping_layers() {
        let mut rng = StdRng::seed_from_u64(17);
        // every layer is visible at frame 50
        let layers: Vec<Layer> = (0..20u32)
            .map(|index| {
                let in_point = rng.gen_range(0.0..50.0);
                let out_point = rng.gen_range(50.5..100.0);
                Layer::new(index + 1, random_kind(&mut rng), in_point, out_point)
            })
            .collect();
        let comp = Composition {
            layers: LayerCollection::from_top_to_bottom(layers),
            ..composition()
        };

        let optimized = optimize(&comp).unwrap();
        assert_eq!(optimized.layers.len(), comp.layers.len());
        assert_eq!(optimized, comp);
    }
}
