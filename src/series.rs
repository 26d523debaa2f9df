//! Per-dimension comparison data shared by both renderers.

use crate::extract::ResultMap;
use crate::run_file::Engine;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One engine's y values aligned to a [`Comparison`]'s limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub engine: Engine,
    /// `None` where the engine has no value at that limit.
    pub values: Vec<Option<f64>>,
}

impl Series {
    fn aligned(engine: Engine, data: &ResultMap, dim: u32, limits: &[u64]) -> Self {
        let values = limits
            .iter()
            .map(|&limit| data.get(&(dim, limit)).copied())
            .collect();
        Self { engine, values }
    }

    /// Runs of consecutive present points, so a missing value breaks the line.
    pub fn segments(&self, limits: &[u64]) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (&limit, value) in limits.iter().zip(&self.values) {
            match value {
                Some(v) => current.push((limit as f64, *v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Present points only.
    pub fn points<'a>(&'a self, limits: &'a [u64]) -> impl Iterator<Item = (f64, f64)> + 'a {
        limits
            .iter()
            .zip(&self.values)
            .filter_map(|(&limit, value)| value.map(|v| (limit as f64, v)))
    }
}

/// Both engines' results for a single vector dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub dim: u32,
    /// Sorted union of limits either engine reported for `dim`.
    pub limits: Vec<u64>,
    pub series: Vec<Series>,
}

impl Comparison {
    pub fn for_dimension(dim: u32, cubvec: &ResultMap, pgvector: &ResultMap) -> Self {
        let limits: Vec<u64> = cubvec
            .keys()
            .chain(pgvector.keys())
            .filter(|(d, _)| *d == dim)
            .map(|&(_, limit)| limit)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let series = vec![
            Series::aligned(Engine::Cubvec, cubvec, dim, &limits),
            Series::aligned(Engine::Pgvector, pgvector, dim, &limits),
        ];

        Self {
            dim,
            limits,
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Axis bounds `(x_range, y_range)` covering every present point, with
    /// some headroom. Falls back to a unit range when there is nothing to plot.
    pub fn bounds(&self) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
        let xs = self.limits.iter().map(|&l| l as f64);
        let ys = self.series.iter().flat_map(|s| s.values.iter().flatten().copied());
        (padded_range(xs), padded_range(ys))
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad)..(hi + pad)
}

/// Metric name as used in output file names: spaces become underscores.
pub fn sanitize_metric(metric: &str) -> String {
    metric.replace(' ', "_")
}

/// `<output_dir>/plot_dim_<dim>_<metric>.<ext>`
pub fn output_path(output_dir: &Path, dim: u32, metric: &str, ext: &str) -> PathBuf {
    output_dir.join(format!("plot_dim_{dim}_{}.{ext}", sanitize_metric(metric)))
}
