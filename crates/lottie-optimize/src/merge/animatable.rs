use lottie_data::{Animatable, AnimatableVector2, AnimatableVector3, KeyFrame, Opacity};

use crate::merge_result::MergeResult;
use crate::range::TimeRange;

fn frames_non_decreasing<T>(key_frames: &[KeyFrame<T>]) -> bool {
    key_frames.windows(2).all(|pair| pair[0].frame <= pair[1].frame)
}

fn finish<T: Clone>(key_frames: Vec<KeyFrame<T>>, property_index: Option<u32>) -> MergeResult<Animatable<T>> {
    if !frames_non_decreasing(&key_frames) {
        return MergeResult::failed();
    }
    let merged =
        Animatable::from_key_frames(key_frames).map(|value| value.with_property_index(property_index));
    MergeResult::from_option(merged, 1.0)
}

/// Merges two channels so the result follows `a` inside `a_range` and `b` inside
/// `b_range`.
///
/// Differing constants are never reconciled by synthesizing animation. A hold at
/// `b_range.start` always separates the two halves so `b` cannot bleed into the gap.
pub fn merge_animatable<T>(
    a: &Animatable<T>,
    a_range: TimeRange,
    b: &Animatable<T>,
    b_range: TimeRange,
) -> MergeResult<Animatable<T>>
where
    T: Clone + PartialEq,
{
    if !a.is_animated() && !b.is_animated() {
        return if a.initial_value == b.initial_value {
            MergeResult::lossless(a.clone())
        } else {
            MergeResult::failed()
        };
    }

    let mut key_frames = Vec::with_capacity(a.key_frames.len() + b.key_frames.len() + 1);
    if a.is_animated() {
        key_frames.extend(a.key_frames.iter().cloned());
    } else {
        key_frames.push(KeyFrame::hold(a_range.start, a.initial_value.clone()));
    }
    key_frames.push(KeyFrame::hold(b_range.start, b.initial_value.clone()));
    key_frames.extend(b.key_frames.iter().cloned());

    finish(key_frames, a.property_index)
}

/// Opacity merge that is fully transparent strictly between `a_range.end` and
/// `b_range.start`.
pub fn merge_opacity_strict(
    a: &Animatable<Opacity>,
    a_range: TimeRange,
    b: &Animatable<Opacity>,
    b_range: TimeRange,
) -> MergeResult<Animatable<Opacity>> {
    let has_gap = a_range.end < b_range.start;

    if !a.is_animated() && !b.is_animated() {
        if !has_gap {
            if a.initial_value == b.initial_value {
                return MergeResult::lossless(a.clone());
            }
            return finish(
                vec![
                    KeyFrame::hold(a_range.start, a.initial_value),
                    KeyFrame::hold(b_range.start, b.initial_value),
                ],
                a.property_index,
            );
        }
        return finish(
            vec![
                KeyFrame::hold(a_range.start, a.initial_value),
                KeyFrame::hold(a_range.end, Opacity::TRANSPARENT),
                KeyFrame::hold(b_range.start, b.initial_value),
            ],
            a.property_index,
        );
    }

    let mut key_frames = Vec::with_capacity(a.key_frames.len() + b.key_frames.len() + 3);
    if a.is_animated() {
        key_frames.extend(a.key_frames.iter().cloned());
    } else {
        key_frames.push(KeyFrame::hold(a_range.start, a.initial_value));
    }

    if has_gap {
        key_frames.push(KeyFrame::hold(a_range.end, Opacity::TRANSPARENT));
    }

    match b.key_frames.first() {
        Some(first) => {
            if first.frame != b_range.start {
                key_frames.push(KeyFrame::hold(b_range.start, b.initial_value));
            }
            key_frames.extend(b.key_frames.iter().cloned());
        }
        None => key_frames.push(KeyFrame::hold(b_range.start, b.initial_value)),
    }

    finish(key_frames, a.property_index)
}

pub fn merge_vector2(
    a: &AnimatableVector2,
    a_range: TimeRange,
    b: &AnimatableVector2,
    b_range: TimeRange,
) -> MergeResult<AnimatableVector2> {
    match (a, b) {
        (AnimatableVector2::Vector { value: a }, AnimatableVector2::Vector { value: b }) => {
            merge_animatable(a, a_range, b, b_range).map(|value| AnimatableVector2::Vector { value })
        }
        (AnimatableVector2::Xy { x: ax, y: ay }, AnimatableVector2::Xy { x: bx, y: by }) => {
            let Some(x) = merge_animatable(ax, a_range, bx, b_range).into_value() else {
                return MergeResult::failed();
            };
            let Some(y) = merge_animatable(ay, a_range, by, b_range).into_value() else {
                return MergeResult::failed();
            };
            MergeResult::lossless(AnimatableVector2::Xy { x, y })
        }
        _ => MergeResult::failed(),
    }
}

pub fn merge_vector3(
    a: &AnimatableVector3,
    a_range: TimeRange,
    b: &AnimatableVector3,
    b_range: TimeRange,
) -> MergeResult<AnimatableVector3> {
    match (a, b) {
        (AnimatableVector3::Vector { value: a }, AnimatableVector3::Vector { value: b }) => {
            merge_animatable(a, a_range, b, b_range).map(|value| AnimatableVector3::Vector { value })
        }
        (
            AnimatableVector3::Xyz {
                x: ax,
                y: ay,
                z: az,
            },
            AnimatableVector3::Xyz {
                x: bx,
                y: by,
                z: bz,
            },
        ) => {
            let Some(x) = merge_animatable(ax, a_range, bx, b_range).into_value() else {
                return MergeResult::failed();
            };
            let Some(y) = merge_animatable(ay, a_range, by, b_range).into_value() else {
                return MergeResult::failed();
            };
            let Some(z) = merge_animatable(az, a_range, bz, b_range).into_value() else {
                return MergeResult::failed();
            };
            MergeResult::lossless(AnimatableVector3::Xyz { x, y, z })
        }
        _ => MergeResult::failed(),
    }
}
