use serde::{Deserialize, Serialize};
use std::fmt;

use crate::animatable::{Animatable, AnimatableVector3, Color, Opacity, PathGeometry, Vector3};
use crate::shapes::{ContentInfo, ShapeLayerContent};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Add,
    HardMix,
}

/// How a layer is matted by the layer drawn directly above it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatteType {
    #[default]
    None,
    Add,
    Invert,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transform {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub anchor: AnimatableVector3,
    #[serde(default)]
    pub position: AnimatableVector3,
    #[serde(default = "default_scale")]
    pub scale_percent: AnimatableVector3,
    #[serde(default = "default_rotation")]
    pub rotation: Animatable<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: Animatable<Opacity>,
}

fn default_scale() -> AnimatableVector3 {
    AnimatableVector3::constant(Vector3::splat(100.0))
}

fn default_rotation() -> Animatable<f64> {
    Animatable::new(0.0)
}

fn default_opacity() -> Animatable<Opacity> {
    Animatable::new(Opacity::OPAQUE)
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            info: ContentInfo::default(),
            anchor: AnimatableVector3::default(),
            position: AnimatableVector3::default(),
            scale_percent: default_scale(),
            rotation: default_rotation(),
            opacity: default_opacity(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMode {
    None,
    #[default]
    Add,
    Subtract,
    Intersect,
    Lighten,
    Darken,
    Difference,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Mask {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inverted: bool,
    #[serde(default)]
    pub mode: MaskMode,
    pub points: Animatable<PathGeometry>,
    #[serde(default = "default_opacity")]
    pub opacity: Animatable<Opacity>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum EffectType {
    DropShadow,
    GaussianBlur,
    Other,
}

/// Layer effects are carried through untouched; any effect blocks merging.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Effect {
    #[serde(default)]
    pub name: String,
    pub effect_type: EffectType,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum LayerKind {
    PreComp {
        ref_id: String,
        width: f64,
        height: f64,
    },
    Solid {
        width: f64,
        height: f64,
        color: Color,
    },
    Image {
        ref_id: String,
    },
    Null,
    Shape {
        #[serde(default)]
        contents: Vec<ShapeLayerContent>,
    },
    Text {
        ref_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    PreComp,
    Solid,
    Image,
    Null,
    Shape,
    Text,
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerType::PreComp => "precomp",
            LayerType::Solid => "solid",
            LayerType::Image => "image",
            LayerType::Null => "null",
            LayerType::Shape => "shape",
            LayerType::Text => "text",
        };
        f.write_str(name)
    }
}

impl LayerKind {
    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerKind::PreComp { .. } => LayerType::PreComp,
            LayerKind::Solid { .. } => LayerType::Solid,
            LayerKind::Image { .. } => LayerType::Image,
            LayerKind::Null => LayerType::Null,
            LayerKind::Shape { .. } => LayerType::Shape,
            LayerKind::Text { .. } => LayerType::Text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Layer {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    #[serde(default)]
    pub name: String,
    pub in_point: f64,
    pub out_point: f64,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default = "default_one")]
    pub time_stretch: f64,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masks: Vec<Mask>,
    #[serde(default)]
    pub matte_type: MatteType,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_3d: bool,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub auto_orient: bool,
    pub kind: LayerKind,
}

impl Layer {
    /// A visible layer over `[in_point, out_point)` with an identity transform.
    pub fn new(index: u32, kind: LayerKind, in_point: f64, out_point: f64) -> Self {
        Self {
            index,
            parent: None,
            name: String::new(),
            in_point,
            out_point,
            start_time: in_point,
            time_stretch: 1.0,
            transform: Transform::default(),
            effects: Vec::new(),
            masks: Vec::new(),
            matte_type: MatteType::None,
            is_hidden: false,
            is_3d: false,
            blend_mode: BlendMode::Normal,
            auto_orient: false,
            kind,
        }
    }

    pub fn layer_type(&self) -> LayerType {
        self.kind.layer_type()
    }

    pub fn is_matted(&self) -> bool {
        self.matte_type != MatteType::None
    }

    pub fn ref_id(&self) -> Option<&str> {
        match &self.kind {
            LayerKind::PreComp { ref_id, .. }
            | LayerKind::Image { ref_id }
            | LayerKind::Text { ref_id } => Some(ref_id),
            _ => None,
        }
    }
}

/// Layers ordered bottom-to-top.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct LayerCollection {
    layers: Vec<Layer>,
}

impl LayerCollection {
    pub fn new(layers_bottom_to_top: Vec<Layer>) -> Self {
        Self {
            layers: layers_bottom_to_top,
        }
    }

    pub fn from_top_to_bottom(mut layers: Vec<Layer>) -> Self {
        layers.reverse();
        Self::new(layers)
    }

    pub fn layers_bottom_to_top(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_top_to_bottom(&self) -> impl DoubleEndedIterator<Item = &Layer> + '_ {
        self.layers.iter().rev()
    }

    pub fn layer_by_index(&self, index: u32) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.index == index)
    }

    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ImageSource {
    Embedded { format: String, bytes: Vec<u8> },
    External { path: String, file_name: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LayerCollectionAsset {
    pub id: String,
    pub layers: LayerCollection,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageAsset {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub source: ImageSource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Asset {
    LayerCollection(LayerCollectionAsset),
    Image(ImageAsset),
}

impl Asset {
    pub fn id(&self) -> &str {
        match self {
            Asset::LayerCollection(asset) => &asset.id,
            Asset::Image(asset) => &asset.id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub frame: f64,
    #[serde(default)]
    pub duration_in_frames: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Composition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub width: f64,
    pub height: f64,
    pub in_point: f64,
    pub out_point: f64,
    pub frames_per_second: f64,
    #[serde(default)]
    pub is_3d: bool,
    #[serde(default)]
    pub assets: Vec<Asset>,
    pub layers: LayerCollection,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl Composition {
    pub fn asset_by_id(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id() == id)
    }

    pub fn duration(&self) -> f64 {
        self.out_point - self.in_point
    }
}
