use lottie_data::{
    Animatable, AnimatableVector2, AnimatableVector3, BezierSegment, Color, CubicBezier, Easing,
    GradientStop, KeyFrame, Opacity, PathGeometry, SpatialBezier, Vector2, Vector3,
};

pub trait Interpolatable: Sized + Clone {
    fn lerp(&self, other: &Self, t: f64) -> Self;

    /// Interpolates with one progress value per channel. Types without channels
    /// use the first one.
    fn lerp_channels(&self, other: &Self, t: &[f64]) -> Self {
        self.lerp(other, t.first().copied().unwrap_or(0.0))
    }

    fn lerp_spatial(&self, other: &Self, t: f64, _tangents: &SpatialBezier) -> Self {
        self.lerp(other, t)
    }
}

fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        lerp_f64(*self, *other, t)
    }
}

impl Interpolatable for Opacity {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Opacity(lerp_f64(self.0, other.0, t))
    }
}

impl Interpolatable for Color {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Color::rgba(
            lerp_f64(self.r, other.r, t),
            lerp_f64(self.g, other.g, t),
            lerp_f64(self.b, other.b, t),
            lerp_f64(self.a, other.a, t),
        )
    }
}

fn channel(t: &[f64], i: usize) -> f64 {
    t.get(i).or_else(|| t.first()).copied().unwrap_or(0.0)
}

impl Interpolatable for Vector2 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Vector2::lerp(*self, *other, t)
    }

    fn lerp_channels(&self, other: &Self, t: &[f64]) -> Self {
        Vector2::new(
            lerp_f64(self.x, other.x, channel(t, 0)),
            lerp_f64(self.y, other.y, channel(t, 1)),
        )
    }

    fn lerp_spatial(&self, other: &Self, t: f64, tangents: &SpatialBezier) -> Self {
        cubic(
            self.extend(0.0),
            (*self + tangents.cp1.truncate()).extend(0.0),
            (*other + tangents.cp2.truncate()).extend(0.0),
            other.extend(0.0),
            t,
        )
        .truncate()
    }
}

impl Interpolatable for Vector3 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Vector3::lerp(*self, *other, t)
    }

    fn lerp_channels(&self, other: &Self, t: &[f64]) -> Self {
        Vector3::new(
            lerp_f64(self.x, other.x, channel(t, 0)),
            lerp_f64(self.y, other.y, channel(t, 1)),
            lerp_f64(self.z, other.z, channel(t, 2)),
        )
    }

    fn lerp_spatial(&self, other: &Self, t: f64, tangents: &SpatialBezier) -> Self {
        cubic(
            *self,
            *self + tangents.cp1,
            *other + tangents.cp2,
            *other,
            t,
        )
    }
}

fn cubic(p0: Vector3, p1: Vector3, p2: Vector3, p3: Vector3, t: f64) -> Vector3 {
    let one_minus_t = 1.0 - t;
    p0 * one_minus_t * one_minus_t * one_minus_t
        + p1 * 3.0 * one_minus_t * one_minus_t * t
        + p2 * 3.0 * one_minus_t * t * t
        + p3 * t * t * t
}

impl Interpolatable for PathGeometry {
    /// Paths with matching structure interpolate point-wise, others step.
    fn lerp(&self, other: &Self, t: f64) -> Self {
        if self.beziers.len() != other.beziers.len() || self.is_closed != other.is_closed {
            return if t < 1.0 { self.clone() } else { other.clone() };
        }
        let beziers = self
            .beziers
            .iter()
            .zip(&other.beziers)
            .map(|(a, b)| BezierSegment {
                cp0: a.cp0.lerp(b.cp0, t),
                cp1: a.cp1.lerp(b.cp1, t),
                cp2: a.cp2.lerp(b.cp2, t),
                cp3: a.cp3.lerp(b.cp3, t),
            })
            .collect();
        PathGeometry {
            beziers,
            is_closed: self.is_closed,
        }
    }
}

impl Interpolatable for Vec<GradientStop> {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        if t < 1.0 {
            self.clone()
        } else {
            other.clone()
        }
    }
}

/// Solves the easing curve for progress `x`, returning the eased progress.
pub fn solve_cubic_bezier(bezier: &CubicBezier, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let (p1, p2) = (bezier.cp1, bezier.cp2);
    let x_at = |t: f64| {
        let one_minus_t = 1.0 - t;
        3.0 * one_minus_t * one_minus_t * t * p1.x + 3.0 * one_minus_t * t * t * p2.x + t * t * t
    };

    // Newton-Raphson, falling back to bisection when the slope flattens out
    let mut t = x;
    let mut solved = false;
    for _ in 0..8 {
        let err = x_at(t) - x;
        if err.abs() < 1e-7 {
            solved = true;
            break;
        }
        let one_minus_t = 1.0 - t;
        let dx_dt = 3.0 * one_minus_t * one_minus_t * p1.x
            + 6.0 * one_minus_t * t * (p2.x - p1.x)
            + 3.0 * t * t * (1.0 - p2.x);
        if dx_dt.abs() < 1e-9 {
            break;
        }
        t = (t - err / dx_dt).clamp(0.0, 1.0);
    }
    if !solved {
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..60 {
            let err = x_at(t) - x;
            if err.abs() < 1e-7 {
                break;
            }
            if err > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            t = (lo + hi) * 0.5;
        }
    }

    let one_minus_t = 1.0 - t;
    3.0 * one_minus_t * one_minus_t * t * p1.y + 3.0 * one_minus_t * t * t * p2.y + t * t * t
}

fn interpolate<T: Interpolatable>(prev: &KeyFrame<T>, next: &KeyFrame<T>, frame: f64) -> T {
    let span = next.frame - prev.frame;
    let progress = if span > 0.0 {
        ((frame - prev.frame) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };

    match &next.easing {
        Easing::Hold => prev.value.clone(),
        Easing::Linear => match &prev.spatial_bezier {
            Some(tangents) => prev.value.lerp_spatial(&next.value, progress, tangents),
            None => prev.value.lerp(&next.value, progress),
        },
        Easing::CubicBezier { beziers } => {
            let eased: Vec<f64> = beziers
                .iter()
                .map(|bezier| solve_cubic_bezier(bezier, progress))
                .collect();
            match (&prev.spatial_bezier, eased.first()) {
                (Some(tangents), Some(&t)) => prev.value.lerp_spatial(&next.value, t, tangents),
                _ if eased.is_empty() => prev.value.lerp(&next.value, progress),
                _ => prev.value.lerp_channels(&next.value, &eased),
            }
        }
    }
}

/// Value of `animatable` at `frame`. Frames before the first keyframe take its
/// value, frames after the last take the last value.
pub fn value_at<T: Interpolatable>(animatable: &Animatable<T>, frame: f64) -> T {
    let key_frames = &animatable.key_frames;
    let (Some(first), Some(last)) = (key_frames.first(), key_frames.last()) else {
        return animatable.initial_value.clone();
    };

    let next = key_frames.partition_point(|key_frame| key_frame.frame <= frame);
    if next == 0 {
        return first.value.clone();
    }
    if next == key_frames.len() {
        return last.value.clone();
    }
    interpolate(&key_frames[next - 1], &key_frames[next], frame)
}

pub fn vector2_at(vector: &AnimatableVector2, frame: f64) -> Vector2 {
    match vector {
        AnimatableVector2::Vector { value } => value_at(value, frame),
        AnimatableVector2::Xy { x, y } => Vector2::new(value_at(x, frame), value_at(y, frame)),
    }
}

pub fn vector3_at(vector: &AnimatableVector3, frame: f64) -> Vector3 {
    match vector {
        AnimatableVector3::Vector { value } => value_at(value, frame),
        AnimatableVector3::Xyz { x, y, z } => {
            Vector3::new(value_at(x, frame), value_at(y, frame), value_at(z, frame))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_value() {
        assert_eq!(value_at(&Animatable::new(4.0), 100.0), 4.0);
    }

    #[test]
    fn test_linear_and_clamping() {
        let animatable = Animatable::from_key_frames(vec![
            KeyFrame::linear(10.0, 0.0),
            KeyFrame::linear(20.0, 10.0),
        ])
        .unwrap();
        assert_eq!(value_at(&animatable, 0.0), 0.0);
        assert_eq!(value_at(&animatable, 15.0), 5.0);
        assert_eq!(value_at(&animatable, 99.0), 10.0);
    }

    #[test]
    fn test_hold_keeps_previous_value() {
        let animatable = Animatable::from_key_frames(vec![
            KeyFrame::linear(0.0, 1.0),
            KeyFrame::hold(10.0, 2.0),
        ])
        .unwrap();
        assert_eq!(value_at(&animatable, 9.99), 1.0);
        assert_eq!(value_at(&animatable, 10.0), 2.0);
    }

    #[test]
    fn test_linear_bezier_matches_linear() {
        let bezier = CubicBezier {
            cp1: Vector2::new(1.0 / 3.0, 1.0 / 3.0),
            cp2: Vector2::new(2.0 / 3.0, 2.0 / 3.0),
        };
        for x in [0.1, 0.25, 0.5, 0.9] {
            assert!((solve_cubic_bezier(&bezier, x) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ease_in_is_slower_at_start() {
        let bezier = CubicBezier {
            cp1: Vector2::new(0.42, 0.0),
            cp2: Vector2::new(1.0, 1.0),
        };
        assert!(solve_cubic_bezier(&bezier, 0.25) < 0.25);
    }

    #[test]
    fn test_per_axis_vector() {
        let vector = AnimatableVector3::Xyz {
            x: Animatable::from_key_frames(vec![
                KeyFrame::linear(0.0, 0.0),
                KeyFrame::linear(10.0, 10.0),
            ])
            .unwrap(),
            y: Animatable::new(3.0),
            z: Animatable::new(0.0),
        };
        assert_eq!(vector3_at(&vector, 5.0), Vector3::new(5.0, 3.0, 0.0));
    }
}
