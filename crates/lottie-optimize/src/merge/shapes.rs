use lottie_data::{
    Animatable, ContentInfo, Ellipse, LinearGradientFill, LinearGradientStroke, MergePaths, Path,
    Polystar, RadialGradientFill, RadialGradientStroke, Rectangle, Repeater, RoundCorners,
    ShapeGroup, ShapeLayerContent, SolidColorFill, SolidColorStroke, Transform, TrimPath,
};

use super::animatable::{merge_animatable, merge_opacity_strict, merge_vector2, merge_vector3};
use crate::merge_result::MergeResult;
use crate::range::TimeRange;

/// Unwraps a successful merge or returns a failed result from the caller.
macro_rules! merged {
    ($result:expr) => {
        match $result.into_value() {
            Some(value) => value,
            None => return MergeResult::failed(),
        }
    };
}

pub(crate) fn join_names(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}

fn merge_info(a: &ContentInfo, b: &ContentInfo) -> Option<ContentInfo> {
    (a.blend_mode == b.blend_mode).then(|| ContentInfo {
        name: join_names(&a.name, &b.name),
        match_name: join_names(&a.match_name, &b.match_name),
        blend_mode: a.blend_mode,
    })
}

fn merge_optional(
    a: &Option<Animatable<f64>>,
    a_range: TimeRange,
    b: &Option<Animatable<f64>>,
    b_range: TimeRange,
) -> MergeResult<Option<Animatable<f64>>> {
    match (a, b) {
        (None, None) => MergeResult::lossless(None),
        (Some(a), Some(b)) => merge_animatable(a, a_range, b, b_range).map(Some),
        _ => MergeResult::failed(),
    }
}

/// Merges every transform channel. With `strict` the opacity is transparent
/// between the two ranges.
pub fn merge_transform(
    a: &Transform,
    a_range: TimeRange,
    b: &Transform,
    b_range: TimeRange,
    strict: bool,
) -> MergeResult<Transform> {
    let Some(info) = merge_info(&a.info, &b.info) else {
        return MergeResult::failed();
    };
    let opacity = if strict {
        merge_opacity_strict(&a.opacity, a_range, &b.opacity, b_range)
    } else {
        merge_animatable(&a.opacity, a_range, &b.opacity, b_range)
    };

    MergeResult::lossless(Transform {
        info,
        anchor: merged!(merge_vector3(&a.anchor, a_range, &b.anchor, b_range)),
        position: merged!(merge_vector3(&a.position, a_range, &b.position, b_range)),
        scale_percent: merged!(merge_vector3(&a.scale_percent, a_range, &b.scale_percent, b_range)),
        rotation: merged!(merge_animatable(&a.rotation, a_range, &b.rotation, b_range)),
        opacity: merged!(opacity),
    })
}

fn merge_group(a: &ShapeGroup, a_range: TimeRange, b: &ShapeGroup, b_range: TimeRange) -> MergeResult<ShapeGroup> {
    let Some(info) = merge_info(&a.info, &b.info) else {
        return MergeResult::failed();
    };
    let Some((contents, score)) = merge_shape_contents(&a.contents, a_range, &b.contents, b_range).into_parts() else {
        return MergeResult::failed();
    };
    MergeResult::new(ShapeGroup { info, contents }, score)
}

fn merge_path(a: &Path, a_range: TimeRange, b: &Path, b_range: TimeRange) -> MergeResult<Path> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.direction == b.direction) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(Path {
        info,
        direction: a.direction,
        data: merged!(merge_animatable(&a.data, a_range, &b.data, b_range)),
    })
}

fn merge_ellipse(a: &Ellipse, a_range: TimeRange, b: &Ellipse, b_range: TimeRange) -> MergeResult<Ellipse> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.direction == b.direction) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(Ellipse {
        info,
        direction: a.direction,
        position: merged!(merge_vector3(&a.position, a_range, &b.position, b_range)),
        diameter: merged!(merge_vector3(&a.diameter, a_range, &b.diameter, b_range)),
    })
}

fn merge_rectangle(a: &Rectangle, a_range: TimeRange, b: &Rectangle, b_range: TimeRange) -> MergeResult<Rectangle> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.direction == b.direction) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(Rectangle {
        info,
        direction: a.direction,
        position: merged!(merge_vector3(&a.position, a_range, &b.position, b_range)),
        size: merged!(merge_vector3(&a.size, a_range, &b.size, b_range)),
        roundness: merged!(merge_animatable(&a.roundness, a_range, &b.roundness, b_range)),
    })
}

fn merge_polystar(a: &Polystar, a_range: TimeRange, b: &Polystar, b_range: TimeRange) -> MergeResult<Polystar> {
    let compatible = a.direction == b.direction && a.star_type == b.star_type;
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| compatible) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(Polystar {
        info,
        direction: a.direction,
        star_type: a.star_type,
        points: merged!(merge_animatable(&a.points, a_range, &b.points, b_range)),
        position: merged!(merge_vector3(&a.position, a_range, &b.position, b_range)),
        rotation: merged!(merge_animatable(&a.rotation, a_range, &b.rotation, b_range)),
        inner_radius: merged!(merge_optional(&a.inner_radius, a_range, &b.inner_radius, b_range)),
        outer_radius: merged!(merge_animatable(&a.outer_radius, a_range, &b.outer_radius, b_range)),
        inner_roundness: merged!(merge_optional(&a.inner_roundness, a_range, &b.inner_roundness, b_range)),
        outer_roundness: merged!(merge_animatable(&a.outer_roundness, a_range, &b.outer_roundness, b_range)),
    })
}

fn merge_trim_path(a: &TrimPath, a_range: TimeRange, b: &TrimPath, b_range: TimeRange) -> MergeResult<TrimPath> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.trim_type == b.trim_type) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(TrimPath {
        info,
        trim_type: a.trim_type,
        start: merged!(merge_animatable(&a.start, a_range, &b.start, b_range)),
        end: merged!(merge_animatable(&a.end, a_range, &b.end, b_range)),
        offset: merged!(merge_animatable(&a.offset, a_range, &b.offset, b_range)),
    })
}

fn merge_merge_paths(a: &MergePaths, b: &MergePaths) -> MergeResult<MergePaths> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.mode == b.mode) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(MergePaths { info, mode: a.mode })
}

fn merge_round_corners(
    a: &RoundCorners,
    a_range: TimeRange,
    b: &RoundCorners,
    b_range: TimeRange,
) -> MergeResult<RoundCorners> {
    let Some(info) = merge_info(&a.info, &b.info) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(RoundCorners {
        info,
        radius: merged!(merge_animatable(&a.radius, a_range, &b.radius, b_range)),
    })
}

fn merge_repeater(a: &Repeater, a_range: TimeRange, b: &Repeater, b_range: TimeRange) -> MergeResult<Repeater> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.composite == b.composite) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(Repeater {
        info,
        composite: a.composite,
        count: merged!(merge_animatable(&a.count, a_range, &b.count, b_range)),
        offset: merged!(merge_animatable(&a.offset, a_range, &b.offset, b_range)),
        transform: merged!(merge_transform(&a.transform, a_range, &b.transform, b_range, false)),
        start_opacity: merged!(merge_animatable(&a.start_opacity, a_range, &b.start_opacity, b_range)),
        end_opacity: merged!(merge_animatable(&a.end_opacity, a_range, &b.end_opacity, b_range)),
    })
}

fn merge_solid_fill(
    a: &SolidColorFill,
    a_range: TimeRange,
    b: &SolidColorFill,
    b_range: TimeRange,
) -> MergeResult<SolidColorFill> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.fill_type == b.fill_type) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(SolidColorFill {
        info,
        fill_type: a.fill_type,
        opacity: merged!(merge_animatable(&a.opacity, a_range, &b.opacity, b_range)),
        color: merged!(merge_animatable(&a.color, a_range, &b.color, b_range)),
    })
}

fn merge_linear_gradient_fill(
    a: &LinearGradientFill,
    a_range: TimeRange,
    b: &LinearGradientFill,
    b_range: TimeRange,
) -> MergeResult<LinearGradientFill> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.fill_type == b.fill_type) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(LinearGradientFill {
        info,
        fill_type: a.fill_type,
        opacity: merged!(merge_animatable(&a.opacity, a_range, &b.opacity, b_range)),
        start_point: merged!(merge_vector2(&a.start_point, a_range, &b.start_point, b_range)),
        end_point: merged!(merge_vector2(&a.end_point, a_range, &b.end_point, b_range)),
        gradient_stops: merged!(merge_animatable(&a.gradient_stops, a_range, &b.gradient_stops, b_range)),
    })
}

fn merge_radial_gradient_fill(
    a: &RadialGradientFill,
    a_range: TimeRange,
    b: &RadialGradientFill,
    b_range: TimeRange,
) -> MergeResult<RadialGradientFill> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.fill_type == b.fill_type) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(RadialGradientFill {
        info,
        fill_type: a.fill_type,
        opacity: merged!(merge_animatable(&a.opacity, a_range, &b.opacity, b_range)),
        start_point: merged!(merge_vector2(&a.start_point, a_range, &b.start_point, b_range)),
        end_point: merged!(merge_vector2(&a.end_point, a_range, &b.end_point, b_range)),
        gradient_stops: merged!(merge_animatable(&a.gradient_stops, a_range, &b.gradient_stops, b_range)),
        highlight_length: merged!(merge_animatable(&a.highlight_length, a_range, &b.highlight_length, b_range)),
        highlight_degrees: merged!(merge_animatable(&a.highlight_degrees, a_range, &b.highlight_degrees, b_range)),
    })
}

fn merge_solid_stroke(
    a: &SolidColorStroke,
    a_range: TimeRange,
    b: &SolidColorStroke,
    b_range: TimeRange,
) -> MergeResult<SolidColorStroke> {
    let compatible = a.style == b.style && a.dash_pattern == b.dash_pattern;
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| compatible) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(SolidColorStroke {
        info,
        style: a.style.clone(),
        dash_pattern: a.dash_pattern.clone(),
        dash_offset: merged!(merge_animatable(&a.dash_offset, a_range, &b.dash_offset, b_range)),
        color: merged!(merge_animatable(&a.color, a_range, &b.color, b_range)),
        opacity: merged!(merge_animatable(&a.opacity, a_range, &b.opacity, b_range)),
        width: merged!(merge_animatable(&a.width, a_range, &b.width, b_range)),
    })
}

fn merge_linear_gradient_stroke(
    a: &LinearGradientStroke,
    a_range: TimeRange,
    b: &LinearGradientStroke,
    b_range: TimeRange,
) -> MergeResult<LinearGradientStroke> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.style == b.style) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(LinearGradientStroke {
        info,
        style: a.style.clone(),
        opacity: merged!(merge_animatable(&a.opacity, a_range, &b.opacity, b_range)),
        width: merged!(merge_animatable(&a.width, a_range, &b.width, b_range)),
        start_point: merged!(merge_vector2(&a.start_point, a_range, &b.start_point, b_range)),
        end_point: merged!(merge_vector2(&a.end_point, a_range, &b.end_point, b_range)),
        gradient_stops: merged!(merge_animatable(&a.gradient_stops, a_range, &b.gradient_stops, b_range)),
    })
}

fn merge_radial_gradient_stroke(
    a: &RadialGradientStroke,
    a_range: TimeRange,
    b: &RadialGradientStroke,
    b_range: TimeRange,
) -> MergeResult<RadialGradientStroke> {
    let Some(info) = merge_info(&a.info, &b.info).filter(|_| a.style == b.style) else {
        return MergeResult::failed();
    };
    MergeResult::lossless(RadialGradientStroke {
        info,
        style: a.style.clone(),
        opacity: merged!(merge_animatable(&a.opacity, a_range, &b.opacity, b_range)),
        width: merged!(merge_animatable(&a.width, a_range, &b.width, b_range)),
        start_point: merged!(merge_vector2(&a.start_point, a_range, &b.start_point, b_range)),
        end_point: merged!(merge_vector2(&a.end_point, a_range, &b.end_point, b_range)),
        gradient_stops: merged!(merge_animatable(&a.gradient_stops, a_range, &b.gradient_stops, b_range)),
        highlight_length: merged!(merge_animatable(&a.highlight_length, a_range, &b.highlight_length, b_range)),
        highlight_degrees: merged!(merge_animatable(&a.highlight_degrees, a_range, &b.highlight_degrees, b_range)),
    })
}

pub fn merge_shape_content(
    a: &ShapeLayerContent,
    a_range: TimeRange,
    b: &ShapeLayerContent,
    b_range: TimeRange,
) -> MergeResult<ShapeLayerContent> {
    use ShapeLayerContent as C;

    match (a, b) {
        (C::Group(a), C::Group(b)) => MergeResult::lift(merge_group(a, a_range, b, b_range)),
        (C::Path(a), C::Path(b)) => MergeResult::lift(merge_path(a, a_range, b, b_range)),
        (C::Ellipse(a), C::Ellipse(b)) => MergeResult::lift(merge_ellipse(a, a_range, b, b_range)),
        (C::Rectangle(a), C::Rectangle(b)) => MergeResult::lift(merge_rectangle(a, a_range, b, b_range)),
        (C::Polystar(a), C::Polystar(b)) => MergeResult::lift(merge_polystar(a, a_range, b, b_range)),
        (C::Transform(a), C::Transform(b)) => {
            MergeResult::lift(merge_transform(a, a_range, b, b_range, false))
        }
        (C::TrimPath(a), C::TrimPath(b)) => MergeResult::lift(merge_trim_path(a, a_range, b, b_range)),
        (C::MergePaths(a), C::MergePaths(b)) => MergeResult::lift(merge_merge_paths(a, b)),
        (C::RoundCorners(a), C::RoundCorners(b)) => {
            MergeResult::lift(merge_round_corners(a, a_range, b, b_range))
        }
        (C::Repeater(a), C::Repeater(b)) => MergeResult::lift(merge_repeater(a, a_range, b, b_range)),
        (C::SolidColorFill(a), C::SolidColorFill(b)) => {
            MergeResult::lift(merge_solid_fill(a, a_range, b, b_range))
        }
        (C::LinearGradientFill(a), C::LinearGradientFill(b)) => {
            MergeResult::lift(merge_linear_gradient_fill(a, a_range, b, b_range))
        }
        (C::RadialGradientFill(a), C::RadialGradientFill(b)) => {
            MergeResult::lift(merge_radial_gradient_fill(a, a_range, b, b_range))
        }
        (C::SolidColorStroke(a), C::SolidColorStroke(b)) => {
            MergeResult::lift(merge_solid_stroke(a, a_range, b, b_range))
        }
        (C::LinearGradientStroke(a), C::LinearGradientStroke(b)) => {
            MergeResult::lift(merge_linear_gradient_stroke(a, a_range, b, b_range))
        }
        (C::RadialGradientStroke(a), C::RadialGradientStroke(b)) => {
            MergeResult::lift(merge_radial_gradient_stroke(a, a_range, b, b_range))
        }
        _ => MergeResult::failed(),
    }
}

/// Element-wise merge of two content lists of equal length. The score is the
/// lowest element score.
pub fn merge_shape_contents(
    a: &[ShapeLayerContent],
    a_range: TimeRange,
    b: &[ShapeLayerContent],
    b_range: TimeRange,
) -> MergeResult<Vec<ShapeLayerContent>> {
    if a.len() != b.len() {
        return MergeResult::failed();
    }
    let mut contents = Vec::with_capacity(a.len());
    let mut score: f64 = 1.0;
    for (a, b) in a.iter().zip(b) {
        let Some((content, content_score)) = merge_shape_content(a, a_range, b, b_range).into_parts() else {
            return MergeResult::failed();
        };
        score = score.min(content_score);
        contents.push(content);
    }
    MergeResult::new(contents, score)
}
