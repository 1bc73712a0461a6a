use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use seriesview::{Color, RasterSurface, SeriesGroup, SeriesStyle, View, wire};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 300;

const PALETTE: [Color; 4] = [
    Color::new(0.12, 0.47, 0.71, 1.0),
    Color::new(1.0, 0.5, 0.05, 1.0),
    Color::new(0.17, 0.63, 0.17, 1.0),
    Color::new(0.84, 0.15, 0.16, 1.0),
];

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
        .unwrap_or_else(|| std::env::temp_dir().join("render_wave.ppm"));

    let now_ms = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as f64;
    let batch = wire::synthesize(4, 600, 10.0, now_ms, 0);
    tracing::info!(bytes = batch.len(), "synthesized batch");

    let series = wire::decode(batch, "wave-")?;
    let group = SeriesGroup::from_series(
        series
            .into_iter()
            .zip(PALETTE.iter().cycle())
            .map(|(series, &color)| series.with_style(SeriesStyle::with_color(color))),
    );

    let mut view = View::new(RasterSurface::new(WIDTH, HEIGHT));
    view.add_series_group(group);
    view.start();

    if let Some(id) = view.find_series("wave-2") {
        view.highlight_series(id)?;
    }

    let mut hits = 0;
    for x in (0..WIDTH).step_by(7) {
        hits += view.pointer_move(x as f32).len();
    }
    view.pointer_move(WIDTH as f32 * 0.6);
    tracing::info!(hits, "pointer sweep finished");

    std::fs::write(&output, view.surface().to_ppm())?;
    tracing::info!(path = %output.display(), "wrote image");
    Ok(())
}
