//! Inclusive numeric ranges used for time and value extents.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// A range covering exactly one value.
    pub fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    ///
    /// Only valid ranges can drive an affine mapping; a zero-width range
    /// would produce an infinite scale.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Check whether a value lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Union two ranges if both are finite.
    pub fn union(a: Self, b: Self) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        Some(Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        })
    }

    /// Fold optional extents into their component-wise union.
    ///
    /// Absent extents ("no data") are skipped; the result is `None` only when
    /// every input is absent.
    pub fn union_all<I>(ranges: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<Self>>,
    {
        ranges
            .into_iter()
            .flatten()
            .fold(None, |acc, range| match acc {
                None => Some(range),
                Some(existing) => Self::union(existing, range).or(Some(existing)),
            })
    }

    /// Build the tightest range over finite values, or `None` if there are none.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut range: Option<Self> = None;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            match range.as_mut() {
                None => range = Some(Self::point(value)),
                Some(existing) => existing.expand_to_include(value),
            }
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_swaps_inverted_bounds() {
        let range = Range::new(5.0, 1.0);
        assert_eq!(range, Range { min: 1.0, max: 5.0 });
    }

    #[test]
    fn point_range_is_not_valid() {
        assert!(!Range::point(3.0).is_valid());
        assert!(Range::new(0.0, 1.0).is_valid());
        assert!(!Range::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn union_all_skips_missing_extents() {
        let merged = Range::union_all([
            None,
            Some(Range::new(0.0, 10.0)),
            None,
            Some(Range::new(5.0, 20.0)),
        ]);
        assert_eq!(merged, Some(Range::new(0.0, 20.0)));
        assert_eq!(Range::union_all([None, None]), None);
    }

    #[test]
    fn from_values_ignores_non_finite() {
        let range = Range::from_values([f64::NAN, 2.0, -1.0, f64::INFINITY]);
        assert_eq!(range, Some(Range::new(-1.0, 2.0)));
        assert_eq!(Range::from_values([f64::NAN]), None);
    }
}
