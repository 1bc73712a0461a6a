//! Time series storage, extents, and stroke rendering.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SeriesError;
use crate::group::GroupId;
use crate::iter::PointIterator;
use crate::range::Range;
use crate::render::{Color, LineStyle, Surface};
use crate::style::SeriesStyle;
use crate::transform::Transform;

static SERIES_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesId(u64);

impl SeriesId {
    fn next() -> Self {
        Self(SERIES_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// One `(time, value)` pair. A `None` value is a gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Timestamp.
    pub time: f64,
    /// Value, or `None` for a gap.
    pub value: Option<f64>,
}

/// Callback invoked with the sample under the pointer.
pub type TimeHighlightHandler = Arc<dyn Fn(f64, Option<f64>) + Send + Sync>;

/// A named, styled, time-ordered sequence of samples.
///
/// Samples are immutable after construction; only the style and the
/// time-highlight handler can change.
#[derive(Clone)]
pub struct Series {
    id: SeriesId,
    name: String,
    timestamps: Vec<f64>,
    values: Vec<Option<f64>>,
    style: SeriesStyle,
    on_time_highlight: Option<TimeHighlightHandler>,
    group: Option<GroupId>,
    time_range: Option<Range>,
    value_range: Option<Range>,
}

/// Counts gathered while stroking a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StrokeSummary {
    pub(crate) points: usize,
    pub(crate) runs: usize,
}

impl Series {
    /// Build a series from parallel timestamp and value arrays.
    ///
    /// Rejects mismatched lengths, non-finite timestamps, and timestamps that
    /// decrease. Non-finite values are stored as gaps.
    pub fn new(
        name: impl Into<String>,
        timestamps: Vec<f64>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, SeriesError> {
        if timestamps.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }
        for (index, &time) in timestamps.iter().enumerate() {
            if !time.is_finite() {
                return Err(SeriesError::NonFiniteTimestamp { index });
            }
            if index > 0 && time < timestamps[index - 1] {
                return Err(SeriesError::NonMonotonic {
                    index,
                    previous: timestamps[index - 1],
                    current: time,
                });
            }
        }
        let values: Vec<Option<f64>> = values
            .into_iter()
            .map(|value| value.filter(|v| v.is_finite()))
            .collect();

        let time_range = Range::from_values(timestamps.iter().copied());
        let value_range = Range::from_values(values.iter().flatten().copied());
        Ok(Self {
            id: SeriesId::next(),
            name: name.into(),
            timestamps,
            values,
            style: SeriesStyle::default(),
            on_time_highlight: None,
            group: None,
            time_range,
            value_range,
        })
    }

    /// Build a series from raw arrays where NaN marks a gap.
    pub fn from_raw(
        name: impl Into<String>,
        timestamps: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let values = values
            .into_iter()
            .map(|value| (!value.is_nan()).then_some(value))
            .collect();
        Self::new(name, timestamps, values)
    }

    /// Build a series from samples.
    pub fn from_samples<I>(name: impl Into<String>, samples: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = Sample>,
    {
        let (timestamps, values) = samples
            .into_iter()
            .map(|sample| (sample.time, sample.value))
            .unzip();
        Self::new(name, timestamps, values)
    }

    /// Replace the style.
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    /// Access the series identifier.
    pub fn id(&self) -> SeriesId {
        self.id
    }

    /// Access the series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of samples, gaps included.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Access the timestamps.
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Access the values.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Access a single sample by index.
    pub fn sample(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            time: *self.timestamps.get(index)?,
            value: self.values[index],
        })
    }

    /// Extent of all timestamps, or `None` for an empty series.
    pub fn time_range(&self) -> Option<Range> {
        self.time_range
    }

    /// Extent of the non-gap values, or `None` when every sample is a gap.
    pub fn value_range(&self) -> Option<Range> {
        self.value_range
    }

    /// Access the style.
    pub fn style(&self) -> SeriesStyle {
        self.style
    }

    /// Replace the style.
    pub fn set_style(&mut self, style: SeriesStyle) {
        self.style = style;
    }

    /// Set the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.style.stroke_color = color;
    }

    /// Set the stroke width.
    pub fn set_width(&mut self, width: f32) {
        self.style.line_width = width;
    }

    /// Group that owns this series, once it has been added to one.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub(crate) fn attach(&mut self, group: GroupId) {
        self.group = Some(group);
    }

    /// Cursor over every sample.
    pub fn points(&self) -> PointIterator<'_> {
        PointIterator::new(self, None, None)
    }

    /// Cursor over the samples in `[start, end)`.
    pub fn points_in(&self, start: Option<f64>, end: Option<f64>) -> PointIterator<'_> {
        PointIterator::new(self, start, end)
    }

    /// Install the callback fired when the pointer lands on this series.
    pub fn set_time_highlight_handler(&mut self, handler: TimeHighlightHandler) {
        self.on_time_highlight = Some(handler);
    }

    /// Remove the time-highlight callback.
    pub fn clear_time_highlight_handler(&mut self) {
        self.on_time_highlight = None;
    }

    pub(crate) fn notify_time_highlight(&self, time: f64, value: Option<f64>) {
        if let Some(handler) = &self.on_time_highlight {
            handler(time, value);
        }
    }

    /// Stroke the series onto `surface`.
    ///
    /// `time_range` is the view-wide time extent and `value_range` the owning
    /// group's value extent. Returns `false` without touching the surface
    /// when either extent is degenerate.
    pub fn render<S>(&self, surface: &mut S, time_range: Range, value_range: Range) -> bool
    where
        S: Surface + ?Sized,
    {
        let Some(transform) =
            Transform::new(time_range, value_range, surface.width(), surface.height())
        else {
            tracing::debug!(series = %self.name, "degenerate extent, nothing drawable");
            return false;
        };
        let summary = self.stroke(surface, &transform, self.style.line());
        tracing::trace!(
            series = %self.name,
            points = summary.points,
            runs = summary.runs,
            "stroked series"
        );
        true
    }

    /// Stroke through an existing transform with an explicit line style.
    ///
    /// A gap lifts the pen: the next valid sample starts a new subpath with
    /// `move_to`, so samples on either side of a gap are never joined.
    pub(crate) fn stroke<S>(
        &self,
        surface: &mut S,
        transform: &Transform,
        style: LineStyle,
    ) -> StrokeSummary
    where
        S: Surface + ?Sized,
    {
        let mut summary = StrokeSummary::default();
        let mut pen_down = false;
        surface.begin_path();
        for sample in self.points() {
            let Some(value) = sample.value else {
                pen_down = false;
                continue;
            };
            let point = transform.data_to_screen(sample.time, value);
            if pen_down {
                surface.line_to(point.x, point.y);
            } else {
                surface.move_to(point.x, point.y);
                summary.runs += 1;
            }
            summary.points += 1;
            pen_down = true;
        }
        surface.stroke(style);
        summary
    }
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("len", &self.timestamps.len())
            .field("style", &self.style)
            .field("group", &self.group)
            .field("time_range", &self.time_range)
            .field("value_range", &self.value_range)
            .field("on_time_highlight", &self.on_time_highlight.is_some())
            .finish()
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Series(name={})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCall, RecordingSurface};
    use proptest::prelude::*;

    #[test]
    fn rejects_length_mismatch() {
        let err = Series::new("s", vec![0.0, 1.0], vec![Some(1.0)]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::LengthMismatch {
                timestamps: 2,
                values: 1
            }
        );
    }

    #[test]
    fn rejects_decreasing_timestamps() {
        let err = Series::from_raw("s", vec![0.0, 2.0, 1.0], vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NonMonotonic {
                index: 2,
                previous: 2.0,
                current: 1.0
            }
        );
    }

    #[test]
    fn accepts_repeated_timestamps() {
        assert!(Series::from_raw("s", vec![0.0, 1.0, 1.0], vec![1.0, 2.0, 3.0]).is_ok());
    }

    #[test]
    fn rejects_nan_timestamp() {
        let err = Series::from_raw("s", vec![0.0, f64::NAN], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, SeriesError::NonFiniteTimestamp { index: 1 });
    }

    #[test]
    fn value_range_excludes_gaps() {
        let series = Series::new("s", vec![0.0, 1.0, 2.0], vec![None, Some(4.5), None]).unwrap();
        assert_eq!(series.value_range(), Some(Range::point(4.5)));
        assert_eq!(series.time_range(), Some(Range::new(0.0, 2.0)));
    }

    #[test]
    fn all_gap_series_has_no_value_range() {
        let series = Series::from_raw("s", vec![0.0, 1.0], vec![f64::NAN, f64::NAN]).unwrap();
        assert_eq!(series.value_range(), None);
        let empty = Series::new("e", Vec::new(), Vec::new()).unwrap();
        assert_eq!(empty.time_range(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn display_names_series() {
        let series = Series::new("cpu", vec![0.0], vec![Some(1.0)]).unwrap();
        assert_eq!(series.to_string(), "Series(name=cpu)");
    }

    #[test]
    fn gap_forces_move_to() {
        let series = Series::new(
            "a",
            vec![0.0, 1.0, 2.0, 3.0],
            vec![Some(1.0), None, Some(3.0), Some(4.0)],
        )
        .unwrap();
        let mut surface = RecordingSurface::new(30, 30);
        assert!(series.render(&mut surface, Range::new(0.0, 3.0), Range::new(1.0, 4.0)));

        let calls: Vec<&DrawCall> = surface.path_calls().collect();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], DrawCall::MoveTo(p) if p.x == 0.0 && p.y == 30.0));
        assert!(matches!(calls[1], DrawCall::MoveTo(p) if p.x == 20.0 && p.y == 10.0));
        assert!(matches!(calls[2], DrawCall::LineTo(p) if p.x == 30.0 && p.y == 0.0));
        assert_eq!(surface.calls().first(), Some(&DrawCall::BeginPath));
        assert_eq!(
            surface.calls().last(),
            Some(&DrawCall::Stroke(series.style().line()))
        );
    }

    #[test]
    fn degenerate_range_draws_nothing() {
        let series = Series::new("flat", vec![0.0, 1.0], vec![Some(2.0), Some(2.0)]).unwrap();
        let mut surface = RecordingSurface::new(10, 10);
        let value_range = series.value_range().unwrap();
        assert!(!series.render(&mut surface, Range::new(0.0, 1.0), value_range));
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn handler_receives_sample() {
        use std::sync::Mutex;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut series = Series::new("s", vec![0.0], vec![Some(1.0)]).unwrap();
        series.set_time_highlight_handler(Arc::new(move |time: f64, value: Option<f64>| {
            sink.lock().unwrap().push((time, value));
        }));
        series.notify_time_highlight(0.0, None);
        assert_eq!(*seen.lock().unwrap(), vec![(0.0, None)]);
    }

    proptest! {
        #[test]
        fn gaps_are_never_bridged(mask in prop::collection::vec(any::<bool>(), 2..64)) {
            let timestamps: Vec<f64> = (0..mask.len()).map(|i| i as f64).collect();
            let values: Vec<Option<f64>> = mask
                .iter()
                .enumerate()
                .map(|(i, &present)| present.then_some((i % 7) as f64))
                .collect();
            let series = Series::new("p", timestamps, values.clone()).unwrap();
            let mut surface = RecordingSurface::new(100, 100);
            series.render(&mut surface, Range::new(0.0, 64.0), Range::new(-1.0, 7.0));

            let calls: Vec<&DrawCall> = surface.path_calls().collect();
            let valid: Vec<usize> = (0..values.len()).filter(|&i| values[i].is_some()).collect();
            prop_assert_eq!(calls.len(), valid.len());
            for (k, &index) in valid.iter().enumerate() {
                let follows_valid = index > 0 && values[index - 1].is_some();
                if follows_valid {
                    prop_assert!(matches!(calls[k], DrawCall::LineTo(_)));
                } else {
                    prop_assert!(matches!(calls[k], DrawCall::MoveTo(_)));
                }
            }
        }

        #[test]
        fn value_range_ignores_gaps(
            values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 1..64)
        ) {
            let timestamps: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
            let series = Series::new("p", timestamps, values.clone()).unwrap();
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            match series.value_range() {
                None => prop_assert!(present.is_empty()),
                Some(range) => {
                    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    prop_assert_eq!(range, Range::new(min, max));
                }
            }
        }
    }
}
