use std::path::PathBuf;
use std::sync::Arc;

use seriesview::{
    Color, RasterSurface, Sample, Series, SeriesGroup, SeriesStyle, View, ViewConfig,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG: &str = r#"
guide_width = 1.0
marker_radius = 3.0
emphasis_width_factor = 3.0

[guide_color]
r = 0.3
g = 0.3
b = 0.3
"#;

fn temperature() -> Result<Series, seriesview::SeriesError> {
    let samples = (0..240).map(|i| {
        let t = f64::from(i) * 60.0;
        // Sensor dropped out for half an hour.
        let value = (!(90..120).contains(&i)).then(|| 20.0 + 4.0 * (t / 3_600.0).sin());
        Sample { time: t, value }
    });
    Series::from_samples("temperature", samples)
}

fn humidity() -> Result<Series, seriesview::SeriesError> {
    let samples = (0..120).map(|i| {
        let t = f64::from(i) * 120.0;
        Sample {
            time: t,
            value: Some(55.0 + 10.0 * (t / 5_000.0).cos()),
        }
    });
    Series::from_samples("humidity", samples)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,seriesview=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("two_panels.ppm"));

    let config = ViewConfig::from_toml_str(CONFIG)?;
    let mut view = View::with_config(RasterSurface::new(640, 240), config);

    let celsius = SeriesGroup::from_series([temperature()?
        .with_style(SeriesStyle::with_color(Color::rgb8(214, 39, 40)))])
    .with_unit("°C");
    let percent = SeriesGroup::from_series([humidity()?
        .with_style(SeriesStyle::with_color(Color::rgb8(31, 119, 180)))])
    .with_unit("%");
    view.add_series_group(celsius);
    view.add_series_group(percent);
    view.start();

    for group in view.groups() {
        tracing::info!(
            unit = group.unit().unwrap_or("-"),
            value_range = ?group.value_range(),
            "panel"
        );
    }

    if let Some(id) = view.find_series("temperature") {
        view.set_time_highlight_handler(
            id,
            Arc::new(|time: f64, value: Option<f64>| match value {
                Some(value) => tracing::info!(time, value, "temperature under pointer"),
                None => tracing::info!(time, "temperature gap under pointer"),
            }),
        )?;
    }

    for x in [40.0, 260.0, 300.0, 520.0] {
        view.pointer_move(x);
    }
    view.pointer_leave();

    if let Some(id) = view.find_series("humidity") {
        view.highlight_series(id)?;
        view.set_series_width(id, 2.0)?;
    }
    view.pointer_move(320.0);

    std::fs::write(&output, view.surface().to_ppm())?;
    tracing::info!(path = %output.display(), "wrote image");
    Ok(())
}
