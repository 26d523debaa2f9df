//! Static PNG charts drawn with plotters.

use crate::config::Stat;
use crate::run_file::Engine;
use crate::series::Comparison;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

const CUBVEC_COLOUR: RGBColor = hexcolour!(0x1F77B4);
const PGVECTOR_COLOUR: RGBColor = hexcolour!(0xFF7F0E);

/// 6.4 x 4.0 inches at 150 dpi.
pub const PNG_SIZE: (u32, u32) = (960, 600);

const MARKER_SIZE: i32 = 4;

/// How series are named in the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendNames {
    /// `cubvec-bench`, `pgvector-bench`
    Folder,
    /// `cubvec`, `pgvector`
    Tag,
}

impl LegendNames {
    fn name(self, engine: Engine) -> &'static str {
        match self {
            LegendNames::Folder => engine.label(),
            LegendNames::Tag => engine.tag(),
        }
    }
}

fn colour(engine: Engine) -> RGBColor {
    match engine {
        Engine::Cubvec => CUBVEC_COLOUR,
        Engine::Pgvector => PGVECTOR_COLOUR,
    }
}

/// Render one comparison to a PNG at `path`.
pub fn render_png(
    path: &Path,
    comparison: &Comparison,
    metric: &str,
    stat: Stat,
    legend: LegendNames,
) -> Result<(), RenderError> {
    draw(path, comparison, metric, stat, legend).map_err(|e| RenderError::Draw {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), dim = comparison.dim, "rendered png");
    Ok(())
}

fn draw(
    path: &Path,
    comparison: &Comparison,
    metric: &str,
    stat: Stat,
    legend: LegendNames,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, PNG_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_range, y_range) = comparison.bounds();
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{metric} vs LIMIT  (dimension {})", comparison.dim),
            ("sans-serif", 24),
        )
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("LIMIT (# rows)")
        .y_desc(format!("{metric} – {stat}"))
        .x_label_formatter(&|x| format!("{x:.0}"))
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(WHITE)
        .label_style(("sans-serif", 16))
        .draw()?;

    let limits = &comparison.limits;
    for series in &comparison.series {
        let engine = series.engine;
        let colour = colour(engine);

        // a missing value breaks the line
        for segment in series.segments(limits) {
            chart.draw_series(LineSeries::new(segment, colour.stroke_width(2)))?;
        }

        let points = series.points(limits);
        let anno = match engine {
            Engine::Cubvec => chart.draw_series(
                points.map(|p| Circle::new(p, MARKER_SIZE, colour.filled())),
            )?,
            Engine::Pgvector => chart.draw_series(points.map(|p| {
                EmptyElement::at(p)
                    + Rectangle::new(
                        [(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)],
                        colour.filled(),
                    )
            }))?,
        };
        anno.label(legend.name(engine)).legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
        });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .draw()?;

    root.present()?;
    Ok(())
}

#[derive(Debug)]
pub enum RenderError {
    Draw { path: PathBuf, message: String },
    Write { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Draw { path, message } => {
                write!(f, "failed to draw {}: {message}", path.display())
            }
            RenderError::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Draw { .. } => None,
            RenderError::Write { source, .. } => Some(source),
        }
    }
}
