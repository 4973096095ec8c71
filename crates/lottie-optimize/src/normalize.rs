//! Representation changes that make vector animations mergeable with per-axis ones.

use lottie_data::{
    Animatable, AnimatableVector2, AnimatableVector3, Asset, Composition, CubicBezier, Easing,
    KeyFrame, Layer, LayerCollection, LayerKind, ShapeLayerContent, Transform, Vector2, Vector3,
};

/// Splits a whole-vector animation whose easings carry one bezier per channel
/// into per-axis animations with one bezier each.
///
/// Animations with spatial tangents, or whose easings are already shared by all
/// channels, are returned unchanged.
pub trait EnsureOneEasingPerChannel: Sized {
    fn ensure_one_easing_per_channel(&self) -> Self;
}

fn needs_split<T>(animatable: &Animatable<T>) -> bool {
    animatable.key_frames.iter().any(|k| k.easing.channel_count() > 1)
        && animatable.key_frames.iter().all(|k| k.spatial_bezier.is_none())
}

fn channel_easing(easing: &Easing, channel: usize) -> Easing {
    match easing {
        Easing::CubicBezier { beziers } => {
            let bezier: Option<&CubicBezier> = beziers.get(channel).or_else(|| beziers.first());
            match bezier {
                Some(bezier) => Easing::CubicBezier {
                    beziers: vec![*bezier],
                },
                None => Easing::Linear,
            }
        }
        other => other.clone(),
    }
}

fn split_channel<T>(animatable: &Animatable<T>, channel: usize, component: impl Fn(&T) -> f64) -> Animatable<f64> {
    Animatable {
        initial_value: component(&animatable.initial_value),
        key_frames: animatable
            .key_frames
            .iter()
            .map(|k| KeyFrame::new(k.frame, component(&k.value), channel_easing(&k.easing, channel)))
            .collect(),
        property_index: animatable.property_index,
    }
}

impl EnsureOneEasingPerChannel for AnimatableVector2 {
    fn ensure_one_easing_per_channel(&self) -> Self {
        match self {
            AnimatableVector2::Vector { value } if needs_split(value) => AnimatableVector2::Xy {
                x: split_channel(value, 0, |v: &Vector2| v.x),
                y: split_channel(value, 1, |v: &Vector2| v.y),
            },
            _ => self.clone(),
        }
    }
}

impl EnsureOneEasingPerChannel for AnimatableVector3 {
    fn ensure_one_easing_per_channel(&self) -> Self {
        match self {
            AnimatableVector3::Vector { value } if needs_split(value) => AnimatableVector3::Xyz {
                x: split_channel(value, 0, |v: &Vector3| v.x),
                y: split_channel(value, 1, |v: &Vector3| v.y),
                z: split_channel(value, 2, |v: &Vector3| v.z),
            },
            _ => self.clone(),
        }
    }
}

impl EnsureOneEasingPerChannel for Transform {
    fn ensure_one_easing_per_channel(&self) -> Self {
        Transform {
            anchor: self.anchor.ensure_one_easing_per_channel(),
            position: self.position.ensure_one_easing_per_channel(),
            scale_percent: self.scale_percent.ensure_one_easing_per_channel(),
            ..self.clone()
        }
    }
}

fn normalize_contents(contents: &[ShapeLayerContent]) -> Vec<ShapeLayerContent> {
    contents
        .iter()
        .map(|content| match content {
            ShapeLayerContent::Group(group) => {
                let mut group = group.clone();
                group.contents = normalize_contents(&group.contents);
                group.into()
            }
            ShapeLayerContent::Transform(transform) => transform.ensure_one_easing_per_channel().into(),
            ShapeLayerContent::Repeater(repeater) => {
                let mut repeater = repeater.clone();
                repeater.transform = repeater.transform.ensure_one_easing_per_channel();
                repeater.into()
            }
            other => other.clone(),
        })
        .collect()
}

fn normalize_layer(layer: &Layer) -> Layer {
    let kind = match &layer.kind {
        LayerKind::Shape { contents } => LayerKind::Shape {
            contents: normalize_contents(contents),
        },
        other => other.clone(),
    };
    Layer {
        transform: layer.transform.ensure_one_easing_per_channel(),
        kind,
        ..layer.clone()
    }
}

fn normalize_layers(layers: &LayerCollection) -> LayerCollection {
    LayerCollection::new(layers.layers_bottom_to_top().iter().map(normalize_layer).collect())
}

/// Applies [`EnsureOneEasingPerChannel`] to every layer and shape transform,
/// including those inside precomp assets.
pub fn normalize_composition(composition: &Composition) -> Composition {
    let assets = composition
        .assets
        .iter()
        .map(|asset| match asset {
            Asset::LayerCollection(collection) => {
                let mut collection = collection.clone();
                collection.layers = normalize_layers(&collection.layers);
                Asset::LayerCollection(collection)
            }
            Asset::Image(_) => asset.clone(),
        })
        .collect();

    Composition {
        assets,
        layers: normalize_layers(&composition.layers),
        ..composition.clone()
    }
}
