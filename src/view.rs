//! The top-level view: surface ownership, draw cycle, and pointer overlays.
//!
//! A view renders its groups once into a base image, snapshots the pixels,
//! and from then on handles pointer motion by restoring only the strip the
//! previous guide covered before compositing the overlay list again.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::geom::PixelRect;
use crate::group::{GroupId, SeriesGroup};
use crate::overlay::{Mode, Overlay, PointerHit, find_hit};
use crate::range::Range;
use crate::render::{Color, LineStyle, PixelBlock, Surface};
use crate::series::{Series, SeriesId, TimeHighlightHandler};
use crate::style::SeriesStyle;
use crate::transform::Transform;

static VIEW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    fn next() -> Self {
        Self(VIEW_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Renders series groups on a surface and handles pointer highlighting.
///
/// All groups share one time axis (the union of their time extents); each
/// group keeps its own value axis.
#[derive(Debug)]
pub struct View<S> {
    id: ViewId,
    surface: S,
    config: ViewConfig,
    groups: Vec<SeriesGroup>,
    time_range: Option<Range>,
    base_image: Option<PixelBlock>,
    pointer: Option<f32>,
    overlays: Vec<Overlay>,
}

impl<S: Surface> View<S> {
    /// Create a view with the default configuration.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, ViewConfig::default())
    }

    /// Create a view with a custom configuration.
    pub fn with_config(surface: S, config: ViewConfig) -> Self {
        Self {
            id: ViewId::next(),
            surface,
            config,
            groups: Vec::new(),
            time_range: None,
            base_image: None,
            pointer: None,
            overlays: Vec::new(),
        }
    }

    /// Access the view identifier.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Access the configuration.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Access the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give the surface back, dropping the view.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Access all groups in draw order.
    pub fn groups(&self) -> &[SeriesGroup] {
        &self.groups
    }

    /// Union of all group time extents.
    pub fn time_range(&self) -> Option<Range> {
        self.time_range
    }

    /// Check whether [`start`](Self::start) has captured a base image.
    pub fn is_started(&self) -> bool {
        self.base_image.is_some()
    }

    /// Current composition mode.
    pub fn mode(&self) -> Mode {
        if self.overlays.is_empty() {
            Mode::Base
        } else {
            Mode::OverlayActive
        }
    }

    /// Last pointer column, if the pointer is over the surface.
    pub fn pointer_column(&self) -> Option<f32> {
        self.pointer
    }

    /// Active overlays in composition order.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Look up a series by identifier.
    pub fn series(&self, id: SeriesId) -> Option<&Series> {
        self.groups.iter().find_map(|group| group.get(id))
    }

    /// Find the first series with `name`, in draw order.
    pub fn find_series(&self, name: &str) -> Option<SeriesId> {
        self.groups
            .iter()
            .flat_map(SeriesGroup::series)
            .find(|series| series.name() == name)
            .map(Series::id)
    }

    /// Transform for one group, or `None` when its extents are degenerate.
    pub fn transform_for(&self, group: &SeriesGroup) -> Option<Transform> {
        group_transform(group, self.time_range, &self.surface)
    }

    /// Add a group and recompute the shared time extent.
    ///
    /// A started view re-renders immediately.
    pub fn add_series_group(&mut self, mut group: SeriesGroup) -> GroupId {
        group.attach(self.id);
        let id = group.id();
        self.groups.push(group);
        self.compute_time_range();
        tracing::debug!(
            view = ?self.id,
            group = ?id,
            time_range = ?self.time_range,
            "added series group"
        );
        if self.is_started() {
            self.refresh();
        }
        id
    }

    /// Clear the surface and draw every group.
    pub fn render(&mut self) {
        let (width, height) = (self.surface.width(), self.surface.height());
        self.surface
            .clear_rect(PixelRect::full(width, height), self.config.background);
        let Some(time_range) = self.time_range else {
            tracing::debug!(view = ?self.id, "no time extent, nothing to draw");
            return;
        };
        let mut drawn = 0;
        for group in &self.groups {
            drawn += group.render(&mut self.surface, time_range);
        }
        tracing::debug!(view = ?self.id, drawn, "rendered base image");
    }

    /// Render the base image, snapshot it, and begin accepting pointer events.
    ///
    /// Overlays installed earlier are composited over the fresh base image.
    pub fn start(&mut self) {
        self.render();
        self.snapshot();
        self.replay_overlays(None);
    }

    /// Re-render after a data or style change, then re-apply overlays.
    ///
    /// Before [`start`](Self::start) this is a plain render.
    pub fn refresh(&mut self) {
        tracing::debug!(view = ?self.id, overlays = self.overlays.len(), "refresh");
        self.render();
        if self.is_started() {
            self.snapshot();
            self.replay_overlays(None);
        }
    }

    /// Handle pointer motion at pixel column `x`.
    ///
    /// Erases the previous guide, draws a new one with markers for every
    /// series that has a sample under the pointer, and fires their
    /// time-highlight handlers. Returns the hits.
    pub fn pointer_move(&mut self, x: f32) -> Vec<PointerHit> {
        if !self.is_started() {
            tracing::warn!(view = ?self.id, x, "pointer event before start, ignored");
            return Vec::new();
        }
        if !x.is_finite() {
            tracing::debug!(view = ?self.id, x, "non-finite pointer column, ignored");
            return Vec::new();
        }
        if let Some(previous) = self.pointer {
            self.restore_strip(previous);
        }
        self.pointer = Some(x);
        match self
            .overlays
            .iter_mut()
            .find(|overlay| overlay.is_pointer_guide())
        {
            Some(overlay) => *overlay = Overlay::PointerGuide { column: x },
            None => self.overlays.push(Overlay::PointerGuide { column: x }),
        }

        let hits = self.lookup(x);
        for hit in &hits {
            if let Some(series) = self.series(hit.series) {
                series.notify_time_highlight(hit.time, hit.value);
            }
        }
        tracing::trace!(view = ?self.id, x, hits = hits.len(), "pointer moved");
        self.replay_overlays(Some(hits.as_slice()));
        hits
    }

    /// Handle the pointer leaving the surface.
    pub fn pointer_leave(&mut self) {
        let Some(previous) = self.pointer.take() else {
            return;
        };
        self.restore_strip(previous);
        self.overlays.retain(|overlay| !overlay.is_pointer_guide());
        self.replay_overlays(None);
        tracing::trace!(view = ?self.id, "pointer left");
    }

    /// Samples under pixel column `x`, one per series at most.
    ///
    /// Series whose window is empty are omitted. This is a pure query.
    pub fn lookup(&self, x: f32) -> Vec<PointerHit> {
        let mut hits = Vec::new();
        if !x.is_finite() {
            return hits;
        }
        for group in &self.groups {
            let Some(transform) = self.transform_for(group) else {
                continue;
            };
            for series in group.series() {
                if let Some(hit) =
                    find_hit(series, group.id(), &transform, x, self.config.pointer_window_px)
                {
                    hits.push(hit);
                }
            }
        }
        hits
    }

    /// Redraw a series at increased width over the current image.
    ///
    /// Highlighting an already highlighted series does nothing.
    pub fn highlight_series(&mut self, id: SeriesId) -> Result<(), ViewError> {
        self.require_series(id)?;
        let overlay = Overlay::Emphasis { series: id };
        if self.overlays.contains(&overlay) {
            return Ok(());
        }
        self.overlays.push(overlay);
        tracing::debug!(view = ?self.id, series = ?id, "highlight series");
        if self.is_started() {
            self.draw_overlay(overlay, None);
        }
        Ok(())
    }

    /// Remove a series emphasis, keeping any other overlays.
    pub fn unhighlight_series(&mut self, id: SeriesId) -> Result<(), ViewError> {
        self.require_series(id)?;
        let overlay = Overlay::Emphasis { series: id };
        let before = self.overlays.len();
        self.overlays.retain(|existing| *existing != overlay);
        if self.overlays.len() == before {
            return Ok(());
        }
        tracing::debug!(view = ?self.id, series = ?id, "unhighlight series");
        if let Some(base) = &self.base_image {
            self.surface.put_pixels(base, 0, 0);
            self.replay_overlays(None);
        }
        Ok(())
    }

    /// Set a series' stroke color.
    pub fn set_series_color(&mut self, id: SeriesId, color: Color) -> Result<(), ViewError> {
        self.update_series(id, |series| series.set_color(color))
    }

    /// Set a series' stroke width.
    pub fn set_series_width(&mut self, id: SeriesId, width: f32) -> Result<(), ViewError> {
        self.update_series(id, |series| series.set_width(width))
    }

    /// Replace a series' style.
    pub fn set_series_style(&mut self, id: SeriesId, style: SeriesStyle) -> Result<(), ViewError> {
        self.update_series(id, |series| series.set_style(style))
    }

    /// Install the callback fired when the pointer lands on a series.
    pub fn set_time_highlight_handler(
        &mut self,
        id: SeriesId,
        handler: TimeHighlightHandler,
    ) -> Result<(), ViewError> {
        self.series_mut(id)?.set_time_highlight_handler(handler);
        Ok(())
    }

    /// Remove a series' time-highlight callback.
    pub fn clear_time_highlight_handler(&mut self, id: SeriesId) -> Result<(), ViewError> {
        self.series_mut(id)?.clear_time_highlight_handler();
        Ok(())
    }

    fn update_series(
        &mut self,
        id: SeriesId,
        update: impl FnOnce(&mut Series),
    ) -> Result<(), ViewError> {
        update(self.series_mut(id)?);
        if self.is_started() {
            self.refresh();
        }
        Ok(())
    }

    fn series_mut(&mut self, id: SeriesId) -> Result<&mut Series, ViewError> {
        self.groups
            .iter_mut()
            .find_map(|group| group.get_mut(id))
            .ok_or(ViewError::UnknownSeries(id))
    }

    fn require_series(&self, id: SeriesId) -> Result<(), ViewError> {
        self.series(id)
            .map(|_| ())
            .ok_or(ViewError::UnknownSeries(id))
    }

    fn compute_time_range(&mut self) {
        self.time_range = Range::union_all(self.groups.iter().map(SeriesGroup::time_range));
    }

    fn snapshot(&mut self) {
        let rect = PixelRect::full(self.surface.width(), self.surface.height());
        self.base_image = Some(self.surface.get_pixels(rect));
        tracing::debug!(view = ?self.id, "captured base image");
    }

    fn restore_strip(&mut self, column: f32) {
        let Some(base) = &self.base_image else {
            return;
        };
        let rect = PixelRect::column_strip(
            column,
            self.config.overlay_half_width(),
            base.width(),
            base.height(),
        );
        if rect.is_empty() {
            return;
        }
        let strip = base.crop(rect);
        self.surface.put_pixels(&strip, rect.x, rect.y);
        tracing::trace!(view = ?self.id, x = rect.x, width = rect.width, "restored strip");
    }

    fn replay_overlays(&mut self, hits: Option<&[PointerHit]>) {
        for index in 0..self.overlays.len() {
            let overlay = self.overlays[index];
            self.draw_overlay(overlay, hits);
        }
    }

    fn draw_overlay(&mut self, overlay: Overlay, hits: Option<&[PointerHit]>) {
        match overlay {
            Overlay::Emphasis { series } => self.draw_emphasis(series),
            Overlay::PointerGuide { column } => match hits {
                Some(hits) => self.draw_guide(column, hits),
                None => {
                    let hits = self.lookup(column);
                    self.draw_guide(column, &hits);
                }
            },
        }
    }

    fn draw_emphasis(&mut self, id: SeriesId) {
        let factor = self.config.emphasis_width_factor;
        for group in &self.groups {
            let Some(series) = group.get(id) else {
                continue;
            };
            if let Some(transform) = group_transform(group, self.time_range, &self.surface) {
                series.stroke(&mut self.surface, &transform, series.style().emphasized(factor));
            }
            return;
        }
    }

    fn draw_guide(&mut self, column: f32, hits: &[PointerHit]) {
        let height = self.surface.height() as f32;
        self.surface.begin_path();
        self.surface.move_to(column, 0.0);
        self.surface.line_to(column, height);
        self.surface.stroke(self.config.guide_style());

        for hit in hits {
            let Some(screen) = hit.screen else {
                continue;
            };
            let Some(color) = self
                .series(hit.series)
                .map(|series| series.style().stroke_color)
            else {
                continue;
            };
            self.surface.begin_path();
            self.surface
                .arc(screen.x, screen.y, self.config.marker_radius);
            self.surface.stroke(LineStyle {
                color,
                width: self.config.marker_width,
            });
        }
    }
}

fn group_transform<S: Surface + ?Sized>(
    group: &SeriesGroup,
    time_range: Option<Range>,
    surface: &S,
) -> Option<Transform> {
    Transform::new(
        time_range?,
        group.value_range()?,
        surface.width(),
        surface.height(),
    )
}
