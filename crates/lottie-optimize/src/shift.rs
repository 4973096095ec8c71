//! Re-timing of animated content by a constant frame offset.

use lottie_data::{
    Animatable, AnimatableVector2, AnimatableVector3, Asset, Ellipse, Layer, LayerCollection,
    LayerCollectionAsset, LayerKind, LinearGradientFill, LinearGradientStroke, Mask, MergePaths,
    Path, Polystar, RadialGradientFill, RadialGradientStroke, Rectangle, Repeater, RoundCorners,
    ShapeGroup, ShapeLayerContent, SolidColorFill, SolidColorStroke, Transform, TrimPath,
};

/// Moves every keyframe (and for layers, the visible range and start time)
/// `offset` frames later. `None` marks content that cannot be re-timed.
pub trait TimeShift: Sized {
    fn shifted(&self, offset: f64) -> Option<Self>;
}

impl<T: Clone> TimeShift for Animatable<T> {
    fn shifted(&self, offset: f64) -> Option<Self> {
        let mut shifted = self.clone();
        for key_frame in &mut shifted.key_frames {
            key_frame.frame += offset;
        }
        Some(shifted)
    }
}

impl TimeShift for AnimatableVector2 {
    fn shifted(&self, offset: f64) -> Option<Self> {
        Some(match self {
            AnimatableVector2::Vector { value } => AnimatableVector2::Vector {
                value: value.shifted(offset)?,
            },
            AnimatableVector2::Xy { x, y } => AnimatableVector2::Xy {
                x: x.shifted(offset)?,
                y: y.shifted(offset)?,
            },
        })
    }
}

impl TimeShift for AnimatableVector3 {
    fn shifted(&self, offset: f64) -> Option<Self> {
        Some(match self {
            AnimatableVector3::Vector { value } => AnimatableVector3::Vector {
                value: value.shifted(offset)?,
            },
            AnimatableVector3::Xyz { x, y, z } => AnimatableVector3::Xyz {
                x: x.shifted(offset)?,
                y: y.shifted(offset)?,
                z: z.shifted(offset)?,
            },
        })
    }
}

impl<T: TimeShift> TimeShift for Option<T> {
    fn shifted(&self, offset: f64) -> Option<Self> {
        match self {
            Some(value) => Some(Some(value.shifted(offset)?)),
            None => Some(None),
        }
    }
}

impl<T: TimeShift> TimeShift for Vec<T> {
    fn shifted(&self, offset: f64) -> Option<Self> {
        self.iter().map(|item| item.shifted(offset)).collect()
    }
}

/// Shifts the listed fields and clones the rest.
macro_rules! impl_time_shift {
    ($($ty:ty { $($field:ident),* $(,)? })*) => {
        $(
            impl TimeShift for $ty {
                fn shifted(&self, offset: f64) -> Option<Self> {
                    Some(Self {
                        $($field: self.$field.shifted(offset)?,)*
                        ..self.clone()
                    })
                }
            }
        )*
    };
}

impl_time_shift! {
    Transform { anchor, position, scale_percent, rotation, opacity }
    Mask { points, opacity }
    ShapeGroup { contents }
    Path { data }
    Ellipse { position, diameter }
    Rectangle { position, size, roundness }
    Polystar { points, position, rotation, inner_radius, outer_radius, inner_roundness, outer_roundness }
    TrimPath { start, end, offset }
    RoundCorners { radius }
    Repeater { count, offset, transform, start_opacity, end_opacity }
    SolidColorFill { opacity, color }
    LinearGradientFill { opacity, start_point, end_point, gradient_stops }
    RadialGradientFill { opacity, start_point, end_point, gradient_stops, highlight_length, highlight_degrees }
    SolidColorStroke { dash_offset, color, opacity, width }
    LinearGradientStroke { opacity, width, start_point, end_point, gradient_stops }
    RadialGradientStroke { opacity, width, start_point, end_point, gradient_stops, highlight_length, highlight_degrees }
}

impl TimeShift for MergePaths {
    fn shifted(&self, _offset: f64) -> Option<Self> {
        Some(self.clone())
    }
}

impl TimeShift for ShapeLayerContent {
    fn shifted(&self, offset: f64) -> Option<Self> {
        Some(match self {
            ShapeLayerContent::Group(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::Path(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::Ellipse(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::Rectangle(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::Polystar(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::Transform(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::TrimPath(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::MergePaths(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::RoundCorners(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::Repeater(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::SolidColorFill(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::LinearGradientFill(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::RadialGradientFill(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::SolidColorStroke(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::LinearGradientStroke(c) => c.shifted(offset)?.into(),
            ShapeLayerContent::RadialGradientStroke(c) => c.shifted(offset)?.into(),
        })
    }
}

impl TimeShift for LayerKind {
    fn shifted(&self, offset: f64) -> Option<Self> {
        match self {
            LayerKind::Shape { contents } => Some(LayerKind::Shape {
                contents: contents.shifted(offset)?,
            }),
            LayerKind::Text { .. } => None,
            LayerKind::PreComp { .. } | LayerKind::Solid { .. } | LayerKind::Image { .. } | LayerKind::Null => {
                Some(self.clone())
            }
        }
    }
}

impl TimeShift for Layer {
    /// Precomp content is not touched: it follows the layer's start time.
    fn shifted(&self, offset: f64) -> Option<Self> {
        Some(Layer {
            in_point: self.in_point + offset,
            out_point: self.out_point + offset,
            start_time: self.start_time + offset,
            transform: self.transform.shifted(offset)?,
            masks: self.masks.shifted(offset)?,
            kind: self.kind.shifted(offset)?,
            ..self.clone()
        })
    }
}

impl TimeShift for LayerCollection {
    fn shifted(&self, offset: f64) -> Option<Self> {
        Some(LayerCollection::new(
            self.layers_bottom_to_top().to_vec().shifted(offset)?,
        ))
    }
}

impl TimeShift for LayerCollectionAsset {
    fn shifted(&self, offset: f64) -> Option<Self> {
        Some(LayerCollectionAsset {
            id: self.id.clone(),
            layers: self.layers.shifted(offset)?,
        })
    }
}

impl TimeShift for Asset {
    fn shifted(&self, offset: f64) -> Option<Self> {
        match self {
            Asset::LayerCollection(asset) => Some(Asset::LayerCollection(asset.shifted(offset)?)),
            Asset::Image(_) => Some(self.clone()),
        }
    }
}

pub fn shift_layer(layer: &Layer, offset: f64) -> Option<Layer> {
    layer.shifted(offset)
}

pub fn shift_layer_collection(layers: &LayerCollection, offset: f64) -> Option<LayerCollection> {
    layers.shifted(offset)
}
