use serde::{Deserialize, Serialize};

use crate::animatable::{
    Animatable, AnimatableVector2, AnimatableVector3, Color, GradientStop, Opacity, PathGeometry,
};
use crate::model::{BlendMode, Transform};

/// Fields shared by every shape content item.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ContentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub match_name: String,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

impl ContentInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingDirection {
    #[default]
    Forward,
    Reverse,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillType {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Projected,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimType {
    #[default]
    Simultaneously,
    Individually,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    #[default]
    Merge,
    Add,
    Subtract,
    Intersect,
    ExcludeIntersections,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolyStarType {
    #[default]
    Star,
    Polygon,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeaterComposite {
    #[default]
    Above,
    Below,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ShapeGroup {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub contents: Vec<ShapeLayerContent>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Path {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub direction: DrawingDirection,
    pub data: Animatable<PathGeometry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ellipse {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub direction: DrawingDirection,
    pub position: AnimatableVector3,
    pub diameter: AnimatableVector3,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Rectangle {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub direction: DrawingDirection,
    pub position: AnimatableVector3,
    pub size: AnimatableVector3,
    pub roundness: Animatable<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Polystar {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub direction: DrawingDirection,
    pub star_type: PolyStarType,
    pub points: Animatable<f64>,
    pub position: AnimatableVector3,
    pub rotation: Animatable<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<Animatable<f64>>,
    pub outer_radius: Animatable<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_roundness: Option<Animatable<f64>>,
    pub outer_roundness: Animatable<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrimPath {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub trim_type: TrimType,
    pub start: Animatable<f64>,
    pub end: Animatable<f64>,
    pub offset: Animatable<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MergePaths {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub mode: MergeMode,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoundCorners {
    #[serde(flatten)]
    pub info: ContentInfo,
    pub radius: Animatable<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Repeater {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub composite: RepeaterComposite,
    pub count: Animatable<f64>,
    pub offset: Animatable<f64>,
    pub transform: Transform,
    pub start_opacity: Animatable<Opacity>,
    pub end_opacity: Animatable<Opacity>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SolidColorFill {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub fill_type: FillType,
    pub opacity: Animatable<Opacity>,
    pub color: Animatable<Color>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LinearGradientFill {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub fill_type: FillType,
    pub opacity: Animatable<Opacity>,
    pub start_point: AnimatableVector2,
    pub end_point: AnimatableVector2,
    pub gradient_stops: Animatable<Vec<GradientStop>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RadialGradientFill {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub fill_type: FillType,
    pub opacity: Animatable<Opacity>,
    pub start_point: AnimatableVector2,
    pub end_point: AnimatableVector2,
    pub gradient_stops: Animatable<Vec<GradientStop>>,
    pub highlight_length: Animatable<f64>,
    pub highlight_degrees: Animatable<f64>,
}

/// Stroke attributes that cannot be animated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StrokeStyle {
    #[serde(default)]
    pub cap: LineCap,
    #[serde(default)]
    pub join: LineJoin,
    #[serde(default = "default_miter_limit")]
    pub miter_limit: f64,
}

fn default_miter_limit() -> f64 {
    4.0
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            cap: LineCap::default(),
            join: LineJoin::default(),
            miter_limit: default_miter_limit(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SolidColorStroke {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub style: StrokeStyle,
    #[serde(default)]
    pub dash_pattern: Vec<f64>,
    pub dash_offset: Animatable<f64>,
    pub color: Animatable<Color>,
    pub opacity: Animatable<Opacity>,
    pub width: Animatable<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LinearGradientStroke {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub style: StrokeStyle,
    pub opacity: Animatable<Opacity>,
    pub width: Animatable<f64>,
    pub start_point: AnimatableVector2,
    pub end_point: AnimatableVector2,
    pub gradient_stops: Animatable<Vec<GradientStop>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RadialGradientStroke {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default)]
    pub style: StrokeStyle,
    pub opacity: Animatable<Opacity>,
    pub width: Animatable<f64>,
    pub start_point: AnimatableVector2,
    pub end_point: AnimatableVector2,
    pub gradient_stops: Animatable<Vec<GradientStop>>,
    pub highlight_length: Animatable<f64>,
    pub highlight_degrees: Animatable<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "ty")]
pub enum ShapeLayerContent {
    #[serde(rename = "gr")]
    Group(ShapeGroup),
    #[serde(rename = "sh")]
    Path(Path),
    #[serde(rename = "el")]
    Ellipse(Ellipse),
    #[serde(rename = "rc")]
    Rectangle(Rectangle),
    #[serde(rename = "sr")]
    Polystar(Polystar),
    #[serde(rename = "tr")]
    Transform(Transform),
    #[serde(rename = "tm")]
    TrimPath(TrimPath),
    #[serde(rename = "mm")]
    MergePaths(MergePaths),
    #[serde(rename = "rd")]
    RoundCorners(RoundCorners),
    #[serde(rename = "rp")]
    Repeater(Repeater),
    #[serde(rename = "fl")]
    SolidColorFill(SolidColorFill),
    #[serde(rename = "gf")]
    LinearGradientFill(LinearGradientFill),
    #[serde(rename = "gf_radial")]
    RadialGradientFill(RadialGradientFill),
    #[serde(rename = "st")]
    SolidColorStroke(SolidColorStroke),
    #[serde(rename = "gs")]
    LinearGradientStroke(LinearGradientStroke),
    #[serde(rename = "gs_radial")]
    RadialGradientStroke(RadialGradientStroke),
}

impl ShapeLayerContent {
    pub fn info(&self) -> &ContentInfo {
        match self {
            ShapeLayerContent::Group(c) => &c.info,
            ShapeLayerContent::Path(c) => &c.info,
            ShapeLayerContent::Ellipse(c) => &c.info,
            ShapeLayerContent::Rectangle(c) => &c.info,
            ShapeLayerContent::Polystar(c) => &c.info,
            ShapeLayerContent::Transform(c) => &c.info,
            ShapeLayerContent::TrimPath(c) => &c.info,
            ShapeLayerContent::MergePaths(c) => &c.info,
            ShapeLayerContent::RoundCorners(c) => &c.info,
            ShapeLayerContent::Repeater(c) => &c.info,
            ShapeLayerContent::SolidColorFill(c) => &c.info,
            ShapeLayerContent::LinearGradientFill(c) => &c.info,
            ShapeLayerContent::RadialGradientFill(c) => &c.info,
            ShapeLayerContent::SolidColorStroke(c) => &c.info,
            ShapeLayerContent::LinearGradientStroke(c) => &c.info,
            ShapeLayerContent::RadialGradientStroke(c) => &c.info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            ShapeLayerContent::Path(_)
                | ShapeLayerContent::Ellipse(_)
                | ShapeLayerContent::Rectangle(_)
                | ShapeLayerContent::Polystar(_)
        )
    }
}

macro_rules! impl_from_content {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for ShapeLayerContent {
                fn from(content: $ty) -> Self {
                    ShapeLayerContent::$variant(content)
                }
            }
        )*
    };
}

impl_from_content!(
    Group(ShapeGroup),
    Path(Path),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    Polystar(Polystar),
    Transform(Transform),
    TrimPath(TrimPath),
    MergePaths(MergePaths),
    RoundCorners(RoundCorners),
    Repeater(Repeater),
    SolidColorFill(SolidColorFill),
    LinearGradientFill(LinearGradientFill),
    RadialGradientFill(RadialGradientFill),
    SolidColorStroke(SolidColorStroke),
    LinearGradientStroke(LinearGradientStroke),
    RadialGradientStroke(RadialGradientStroke),
);
