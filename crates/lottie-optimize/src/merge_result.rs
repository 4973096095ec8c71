/// Outcome of a merge attempt. A result without a value is a failed merge.
///
/// The score is in `[0, 1]` and only meaningful on success: `1.0` is a lossless
/// merge, lower values come from approximate layer-collection merges.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult<T> {
    value: Option<T>,
    score: f64,
}

impl<T> MergeResult<T> {
    pub fn new(value: T, score: f64) -> Self {
        Self {
            value: Some(value),
            score,
        }
    }

    pub fn lossless(value: T) -> Self {
        Self::new(value, 1.0)
    }

    pub fn failed() -> Self {
        Self {
            value: None,
            score: 0.0,
        }
    }

    /// Wraps an optional value, failing on `None`.
    pub fn from_option(value: Option<T>, score: f64) -> Self {
        match value {
            Some(value) => Self::new(value, score),
            None => Self::failed(),
        }
    }

    /// Widens a result of a narrower type, keeping the score.
    pub fn lift<U>(other: MergeResult<U>) -> Self
    where
        U: Into<T>,
    {
        other.map(Into::into)
    }

    pub fn success(&self) -> bool {
        self.value.is_some()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn into_parts(self) -> Option<(T, f64)> {
        let score = self.score;
        self.value.map(|value| (value, score))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MergeResult<U> {
        MergeResult {
            value: self.value.map(f),
            score: self.score,
        }
    }
}
