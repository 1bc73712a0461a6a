//! seriesview draws groups of gappy time series onto an immediate-mode canvas
//! and keeps a pointer guide and series emphasis responsive by restoring
//! saved pixels instead of re-rendering.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod geom;
pub mod group;
pub mod iter;
pub mod overlay;
pub mod range;
pub mod render;
pub mod series;
pub mod style;
pub mod transform;
pub mod view;
pub mod wire;

pub use config::ViewConfig;
pub use error::{ConfigError, SeriesError, ViewError, WireError};
pub use geom::{PixelRect, ScreenPoint, ScreenRect};
pub use group::{GroupId, SeriesGroup};
pub use iter::PointIterator;
pub use overlay::{Mode, Overlay, PointerHit};
pub use range::Range;
pub use render::{
    Color, DrawCall, LineStyle, PixelBlock, RasterSurface, RecordingSurface, Surface,
};
pub use series::{Sample, Series, SeriesId, TimeHighlightHandler};
pub use style::SeriesStyle;
pub use transform::Transform;
pub use view::{View, ViewId};
