//! Series groups: one panel's worth of series sharing a value scale.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::range::Range;
use crate::render::Surface;
use crate::series::{Series, SeriesId};
use crate::view::ViewId;

static GROUP_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a series group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(u64);

impl GroupId {
    fn next() -> Self {
        Self(GROUP_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::next()
    }
}

/// Ordered collection of series drawn against one value axis.
///
/// Insertion order is draw order: later series are painted on top.
#[derive(Debug, Clone)]
pub struct SeriesGroup {
    id: GroupId,
    unit: Option<String>,
    series: Vec<Series>,
    view: Option<ViewId>,
    time_range: Option<Range>,
    value_range: Option<Range>,
}

impl SeriesGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            id: GroupId::next(),
            unit: None,
            series: Vec::new(),
            view: None,
            time_range: None,
            value_range: None,
        }
    }

    /// Build a group from series, in draw order.
    pub fn from_series<I>(series: I) -> Self
    where
        I: IntoIterator<Item = Series>,
    {
        let mut group = Self::new();
        for ts in series {
            group.add_timeseries(ts);
        }
        group
    }

    /// Set the unit label shared by the group's values.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Access the group identifier.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Access the unit label.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// View that owns this group, once it has been added to one.
    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub(crate) fn attach(&mut self, view: ViewId) {
        self.view = Some(view);
    }

    /// Append a series and recompute the aggregate extents.
    pub fn add_timeseries(&mut self, mut series: Series) -> SeriesId {
        series.attach(self.id);
        let id = series.id();
        self.series.push(series);
        self.compute_ranges();
        id
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if the group has no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Access all series in draw order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Look up a series by identifier.
    pub fn get(&self, id: SeriesId) -> Option<&Series> {
        self.series.iter().find(|series| series.id() == id)
    }

    /// Look up a series mutably. Samples stay immutable; style and handler
    /// can change.
    pub fn get_mut(&mut self, id: SeriesId) -> Option<&mut Series> {
        self.series.iter_mut().find(|series| series.id() == id)
    }

    /// Union of member time extents.
    pub fn time_range(&self) -> Option<Range> {
        self.time_range
    }

    /// Union of member value extents, gaps excluded.
    pub fn value_range(&self) -> Option<Range> {
        self.value_range
    }

    /// Stroke every member series in insertion order.
    ///
    /// Returns the number of series actually drawn.
    pub fn render<S>(&self, surface: &mut S, time_range: Range) -> usize
    where
        S: Surface + ?Sized,
    {
        let Some(value_range) = self.value_range else {
            tracing::debug!(group = ?self.id, "group has no values, skipping");
            return 0;
        };
        let mut drawn = 0;
        for series in &self.series {
            if series.render(&mut *surface, time_range, value_range) {
                drawn += 1;
            }
        }
        drawn
    }

    fn compute_ranges(&mut self) {
        self.time_range = Range::union_all(self.series.iter().map(Series::time_range));
        self.value_range = Range::union_all(self.series.iter().map(Series::value_range));
    }
}

impl Default for SeriesGroup {
    fn default() -> Self {
        Self::new()
    }
}
