use lottie_data::Layer;

/// Half-open time interval `[start, end)` in frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Visible range of a layer.
    pub fn of_layer(layer: &Layer) -> Self {
        Self::new(layer.in_point, layer.out_point)
    }

    /// Touching ranges do not intersect.
    pub fn intersects(&self, other: &TimeRange) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    pub fn shift_left(&self, value: f64) -> Self {
        Self::new(self.start - value, self.end - value)
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_ranges_do_not_intersect() {
        let a = TimeRange::new(0.0, 10.0);
        let b = TimeRange::new(10.0, 20.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_overlap_and_containment() {
        let a = TimeRange::new(0.0, 10.0);
        assert!(a.intersects(&TimeRange::new(9.5, 20.0)));
        assert!(a.intersects(&TimeRange::new(2.0, 3.0)));
        assert!(!a.intersects(&TimeRange::new(-5.0, 0.0)));
    }

    #[test]
    fn test_shift_left() {
        let shifted = TimeRange::new(20.0, 30.0).shift_left(20.0);
        assert_eq!(shifted, TimeRange::new(0.0, 10.0));
        assert_eq!(shifted.duration(), 10.0);
    }
}
