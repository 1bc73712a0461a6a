//! Overlay bookkeeping and pointer hit lookup.
//!
//! Overlays are transient drawings composited over the saved base image. The
//! view keeps them in an ordered list and replays the whole list after every
//! pixel restore, so a pointer guide and an emphasized series can coexist.

use crate::geom::ScreenPoint;
use crate::group::GroupId;
use crate::series::{Series, SeriesId};
use crate::transform::Transform;

/// One entry in the overlay list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    /// A series redrawn at increased width.
    Emphasis {
        /// Emphasized series.
        series: SeriesId,
    },
    /// Vertical pointer guide plus per-series markers.
    PointerGuide {
        /// Pointer pixel column.
        column: f32,
    },
}

impl Overlay {
    /// Check whether this entry is the pointer guide.
    pub fn is_pointer_guide(&self) -> bool {
        matches!(self, Self::PointerGuide { .. })
    }
}

/// Whether anything is composited over the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only the base render is on the surface.
    Base,
    /// At least one overlay is drawn over the base render.
    OverlayActive,
}

/// Sample found under the pointer for one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    /// Series the sample belongs to.
    pub series: SeriesId,
    /// Group that owns the series.
    pub group: GroupId,
    /// Sample timestamp.
    pub time: f64,
    /// Sample value, `None` when the sample is a gap.
    pub value: Option<f64>,
    /// Marker position, `None` for a gap.
    pub screen: Option<ScreenPoint>,
}

/// Find the sample of `series` nearest the pointer within
/// `[column - half_px, column + half_px)`.
///
/// Returns `None` when the window holds no samples; the pointer is never
/// clamped onto an edge sample.
pub(crate) fn find_hit(
    series: &Series,
    group: GroupId,
    transform: &Transform,
    column: f32,
    half_px: f32,
) -> Option<PointerHit> {
    let column = f64::from(column);
    let pointer_time = transform.x_to_time(column);
    let (start, end) = transform.time_window(column, f64::from(half_px));
    let mut best: Option<(f64, f64, Option<f64>)> = None;
    for sample in series.points_in(Some(start), Some(end)) {
        let distance = (sample.time - pointer_time).abs();
        if best.is_none_or(|(best_distance, _, _)| distance < best_distance) {
            best = Some((distance, sample.time, sample.value));
        }
    }
    best.map(|(_, time, value)| PointerHit {
        series: series.id(),
        group,
        time,
        value,
        screen: value.map(|value| transform.data_to_screen(time, value)),
    })
}
