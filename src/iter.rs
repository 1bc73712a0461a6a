//! Windowed cursor over a series' samples.

use crate::series::{Sample, Series};

/// Cursor over the samples of one series inside an optional `[start, end)`
/// time window.
///
/// The cursor is not rewindable: build a new one to scan again. It also
/// implements [`Iterator`], yielding the current [`Sample`] and advancing.
#[derive(Debug, Clone)]
pub struct PointIterator<'a> {
    timestamps: &'a [f64],
    values: &'a [Option<f64>],
    pos: usize,
    end: Option<f64>,
}

impl<'a> PointIterator<'a> {
    /// Position a cursor at the first sample with `time >= start` (or the
    /// first sample when `start` is `None`).
    ///
    /// Timestamps are sorted, so the start is found by binary search.
    pub fn new(series: &'a Series, start: Option<f64>, end: Option<f64>) -> Self {
        let timestamps = series.timestamps();
        let pos = start.map_or(0, |start| lower_bound(timestamps, start));
        Self {
            timestamps,
            values: series.values(),
            pos,
            end,
        }
    }

    /// Index of the current sample within the series.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check whether the cursor has run off the array or reached `end`.
    pub fn exhausted(&self) -> bool {
        match self.timestamps.get(self.pos) {
            None => true,
            Some(&time) => self.end.is_some_and(|end| time >= end),
        }
    }

    /// Timestamp of the current sample.
    pub fn time(&self) -> Option<f64> {
        if self.exhausted() {
            return None;
        }
        Some(self.timestamps[self.pos])
    }

    /// Value of the current sample, `None` for a gap or when exhausted.
    pub fn value(&self) -> Option<f64> {
        if self.exhausted() {
            return None;
        }
        self.values[self.pos]
    }

    /// Check whether the current sample carries a value.
    pub fn valid(&self) -> bool {
        self.value().is_some()
    }

    /// Current sample, or `None` when exhausted.
    pub fn current(&self) -> Option<Sample> {
        Some(Sample {
            time: self.time()?,
            value: self.values[self.pos],
        })
    }

    /// Step to the next sample.
    pub fn advance(&mut self) {
        if self.pos < self.timestamps.len() {
            self.pos += 1;
        }
    }
}

impl Iterator for PointIterator<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.current()?;
        self.advance();
        Some(sample)
    }
}

fn lower_bound(timestamps: &[f64], target: f64) -> usize {
    let mut left = 0;
    let mut right = timestamps.len();
    while left < right {
        let mid = (left + right) / 2;
        if timestamps[mid] < target {
            left = mid + 1;
        } else {
            right = mid;
        }
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gapped() -> Series {
        Series::new(
            "a",
            vec![0.0, 1.0, 2.0, 3.0],
            vec![Some(1.0), None, Some(3.0), Some(4.0)],
        )
        .unwrap()
    }

    #[test]
    fn full_scan_reports_gaps() {
        let series = gapped();
        let mut iter = series.points();
        let mut seen = Vec::new();
        while !iter.exhausted() {
            seen.push((iter.time().unwrap(), iter.value(), iter.valid()));
            iter.advance();
        }
        assert_eq!(
            seen,
            vec![
                (0.0, Some(1.0), true),
                (1.0, None, false),
                (2.0, Some(3.0), true),
                (3.0, Some(4.0), true),
            ]
        );
        assert_eq!(iter.time(), None);
    }

    #[test]
    fn window_is_half_open() {
        let series = gapped();
        let times: Vec<f64> = series
            .points_in(Some(1.0), Some(3.0))
            .map(|sample| sample.time)
            .collect();
        assert_eq!(times, vec![1.0, 2.0]);
    }

    #[test]
    fn start_between_samples_skips_forward() {
        let series = gapped();
        let iter = series.points_in(Some(1.5), None);
        assert_eq!(iter.position(), 2);
        assert_eq!(iter.time(), Some(2.0));
    }

    #[test]
    fn window_outside_data_is_exhausted() {
        let series = gapped();
        assert!(series.points_in(Some(3.5), None).exhausted());
        assert!(series.points_in(Some(-2.0), Some(-1.0)).exhausted());
        assert!(series.points_in(Some(1.2), Some(1.8)).exhausted());
    }

    #[test]
    fn advance_past_end_is_stable() {
        let series = gapped();
        let mut iter = series.points_in(Some(3.0), None);
        iter.advance();
        iter.advance();
        assert!(iter.exhausted());
        assert_eq!(iter.position(), 4);
    }

    #[test]
    fn lower_bound_picks_first_equal() {
        assert_eq!(lower_bound(&[0.0, 1.0, 1.0, 2.0], 1.0), 1);
        assert_eq!(lower_bound(&[0.0, 1.0], 5.0), 2);
        assert_eq!(lower_bound(&[], 5.0), 0);
    }
}
