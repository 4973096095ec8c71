use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

pub type Vector2 = DVec2;
pub type Vector3 = DVec3;

/// Straight RGBA color, every channel in `0.0..=1.0`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Color {
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

/// Opacity expressed as a percentage in `0.0..=100.0`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct Opacity(pub f64);

impl Opacity {
    pub const TRANSPARENT: Opacity = Opacity(0.0);
    pub const OPAQUE: Opacity = Opacity(100.0);

    pub fn from_percent(percent: f64) -> Self {
        Self(percent)
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    pub fn is_transparent(self) -> bool {
        self.0 <= 0.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}

/// Easing curve control points. The implicit end points are `(0,0)` and `(1,1)`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub cp1: Vector2,
    pub cp2: Vector2,
}

/// Spatial tangents of a positional keyframe, relative to the keyframe values.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SpatialBezier {
    pub cp1: Vector3,
    pub cp2: Vector3,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(tag = "type")]
pub enum Easing {
    #[default]
    Linear,
    Hold,
    /// One bezier per channel (1 to 3).
    CubicBezier { beziers: Vec<CubicBezier> },
}

impl Easing {
    pub fn is_hold(&self) -> bool {
        matches!(self, Easing::Hold)
    }

    pub fn channel_count(&self) -> usize {
        match self {
            Easing::CubicBezier { beziers } => beziers.len(),
            _ => 1,
        }
    }
}

/// A value at a frame. The easing governs interpolation from the previous keyframe
/// into this one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeyFrame<T> {
    pub frame: f64,
    pub value: T,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_bezier: Option<SpatialBezier>,
}

impl<T> KeyFrame<T> {
    pub fn new(frame: f64, value: T, easing: Easing) -> Self {
        Self {
            frame,
            value,
            easing,
            spatial_bezier: None,
        }
    }

    pub fn hold(frame: f64, value: T) -> Self {
        Self::new(frame, value, Easing::Hold)
    }

    pub fn linear(frame: f64, value: T) -> Self {
        Self::new(frame, value, Easing::Linear)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Animatable<T> {
    pub initial_value: T,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub key_frames: Vec<KeyFrame<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_index: Option<u32>,
}

impl<T: Clone> Animatable<T> {
    pub fn new(value: T) -> Self {
        Self {
            initial_value: value,
            key_frames: Vec::new(),
            property_index: None,
        }
    }

    /// Builds an animated value whose initial value is the first keyframe's.
    /// Returns `None` for an empty keyframe list.
    pub fn from_key_frames(key_frames: Vec<KeyFrame<T>>) -> Option<Self> {
        let initial_value = key_frames.first()?.value.clone();
        Some(Self {
            initial_value,
            key_frames,
            property_index: None,
        })
    }

    pub fn is_animated(&self) -> bool {
        !self.key_frames.is_empty()
    }

    pub fn with_property_index(mut self, property_index: Option<u32>) -> Self {
        self.property_index = property_index;
        self
    }
}

/// A 2D vector animated either as one value or per axis.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum AnimatableVector2 {
    Vector { value: Animatable<Vector2> },
    Xy { x: Animatable<f64>, y: Animatable<f64> },
}

impl AnimatableVector2 {
    pub fn constant(value: Vector2) -> Self {
        AnimatableVector2::Vector {
            value: Animatable::new(value),
        }
    }

    pub fn is_animated(&self) -> bool {
        match self {
            AnimatableVector2::Vector { value } => value.is_animated(),
            AnimatableVector2::Xy { x, y } => x.is_animated() || y.is_animated(),
        }
    }
}

impl Default for AnimatableVector2 {
    fn default() -> Self {
        Self::constant(Vector2::ZERO)
    }
}

/// A 3D vector animated either as one value or per axis.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum AnimatableVector3 {
    Vector {
        value: Animatable<Vector3>,
    },
    Xyz {
        x: Animatable<f64>,
        y: Animatable<f64>,
        z: Animatable<f64>,
    },
}

impl AnimatableVector3 {
    pub fn constant(value: Vector3) -> Self {
        AnimatableVector3::Vector {
            value: Animatable::new(value),
        }
    }

    pub fn is_animated(&self) -> bool {
        match self {
            AnimatableVector3::Vector { value } => value.is_animated(),
            AnimatableVector3::Xyz { x, y, z } => {
                x.is_animated() || y.is_animated() || z.is_animated()
            }
        }
    }
}

impl Default for AnimatableVector3 {
    fn default() -> Self {
        Self::constant(Vector3::ZERO)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BezierSegment {
    pub cp0: Vector2,
    pub cp1: Vector2,
    pub cp2: Vector2,
    pub cp3: Vector2,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PathGeometry {
    pub beziers: Vec<BezierSegment>,
    #[serde(default)]
    pub is_closed: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "type")]
pub enum GradientStop {
    Color { offset: f64, color: Color },
    Opacity { offset: f64, opacity: Opacity },
}

impl GradientStop {
    pub fn offset(&self) -> f64 {
        match self {
            GradientStop::Color { offset, .. } | GradientStop::Opacity { offset, .. } => *offset,
        }
    }
}
