#![allow(dead_code)]

use lottie_data::{
    Animatable, AnimatableVector3, Asset, Color, Composition, KeyFrame, Layer, LayerCollection,
    LayerCollectionAsset, LayerKind, Vector3,
};

pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

/// Composition over `[in_point, out_point)` with layers given top to bottom.
pub fn composition(in_point: f64, out_point: f64, layers: Vec<Layer>) -> Composition {
    Composition {
        name: "fixture".into(),
        version: "5.7.0".into(),
        width: 512.0,
        height: 512.0,
        in_point,
        out_point,
        frames_per_second: 30.0,
        is_3d: false,
        assets: Vec::new(),
        layers: LayerCollection::from_top_to_bottom(layers),
        markers: Vec::new(),
    }
}

pub fn solid(index: u32, in_point: f64, out_point: f64) -> Layer {
    colored_solid(index, in_point, out_point, RED)
}

pub fn colored_solid(index: u32, in_point: f64, out_point: f64, color: Color) -> Layer {
    Layer::new(
        index,
        LayerKind::Solid {
            width: 100.0,
            height: 100.0,
            color,
        },
        in_point,
        out_point,
    )
}

pub fn null(index: u32, in_point: f64, out_point: f64) -> Layer {
    Layer::new(index, LayerKind::Null, in_point, out_point)
}

pub fn precomp(index: u32, ref_id: &str, in_point: f64, out_point: f64) -> Layer {
    Layer::new(
        index,
        LayerKind::PreComp {
            ref_id: ref_id.into(),
            width: 512.0,
            height: 512.0,
        },
        in_point,
        out_point,
    )
}

/// Layer collection asset with layers given top to bottom.
pub fn asset(id: &str, layers: Vec<Layer>) -> Asset {
    Asset::LayerCollection(LayerCollectionAsset {
        id: id.into(),
        layers: LayerCollection::from_top_to_bottom(layers),
    })
}

/// Linear position animation through `points`, one keyframe every `step` frames
/// starting at `start`.
pub fn moving(start: f64, step: f64, points: &[Vector3]) -> AnimatableVector3 {
    let key_frames = points
        .iter()
        .enumerate()
        .map(|(i, point)| KeyFrame::linear(start + step * i as f64, *point))
        .collect();
    AnimatableVector3::Vector {
        value: Animatable::from_key_frames(key_frames).expect("at least one point"),
    }
}

pub fn top_to_bottom(composition: &Composition) -> Vec<&Layer> {
    composition.layers.layers_top_to_bottom().collect()
}

pub fn layer_collection<'a>(composition: &'a Composition, id: &str) -> Option<&'a LayerCollection> {
    match composition.asset_by_id(id)? {
        Asset::LayerCollection(asset) => Some(&asset.layers),
        Asset::Image(_) => None,
    }
}
