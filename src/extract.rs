/// Metric extraction: scan a results folder and pull one value per
/// (dimension, limit) out of the matching run files.
use crate::config::Stat;
use crate::run_file::{Engine, RunFile};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Extracted values keyed by `(dimension, limit)`.
pub type ResultMap = BTreeMap<(u32, u64), f64>;

/// Pull the value out of one parsed line if it is the record we want.
///
/// Fields are read lazily in order: `metric`, then `stat`, then `limit`, and
/// `value` only once the other three match. A line for another metric may
/// therefore lack `stat`/`limit` or carry a null `value`. `limit` compares
/// numerically, so `250000.0` matches a filename limit of 250000.
fn record_value(
    record: &Value,
    metric: &str,
    stat: Stat,
    limit: u64,
    path: &Path,
    line: usize,
) -> Result<Option<f64>, ExtractError> {
    let field = |name: &'static str| {
        record.get(name).ok_or_else(|| ExtractError::MissingField {
            path: path.to_path_buf(),
            line,
            field: name,
        })
    };

    if field("metric")?.as_str() != Some(metric) {
        return Ok(None);
    }
    if field("stat")?.as_str() != Some(stat.as_str()) {
        return Ok(None);
    }
    if !limit_matches(field("limit")?, limit) {
        return Ok(None);
    }

    match field("value")?.as_f64() {
        Some(v) => Ok(Some(v)),
        None => Err(ExtractError::InvalidValue {
            path: path.to_path_buf(),
            line,
        }),
    }
}

fn limit_matches(value: &Value, limit: u64) -> bool {
    match value.as_u64() {
        Some(n) => n == limit,
        None => value.as_f64() == Some(limit as f64),
    }
}

/// Collect `metric` at `stat` from every `engine` run file in `folder`.
///
/// Names that don't follow the run-file convention and files from the other
/// engine are skipped. Within a file the first matching line wins and the
/// rest of the file is not read. A file with no matching line adds nothing.
/// Malformed lines before the match are errors.
pub fn extract(
    folder: &Path,
    engine: Engine,
    metric: &str,
    stat: Stat,
) -> Result<ResultMap, ExtractError> {
    let mut results = ResultMap::new();

    if !folder.is_dir() {
        tracing::warn!(folder = %folder.display(), %engine, "results folder not found");
        return Ok(results);
    }

    for path in run_file_candidates(folder)? {
        let Some(run) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(RunFile::parse)
        else {
            tracing::debug!(path = %path.display(), "skipping unrecognized file");
            continue;
        };
        if run.engine != engine {
            continue;
        }

        let Some(value) = find_value(&path, &run, metric, stat)? else {
            tracing::debug!(path = %path.display(), metric, %stat, "no matching record");
            continue;
        };

        if let Some(previous) = results.insert((run.dim, run.limit), value) {
            tracing::debug!(
                path = %path.display(),
                dim = run.dim,
                limit = run.limit,
                previous,
                value,
                "value overwritten by later file"
            );
        }
    }

    tracing::info!(
        folder = %folder.display(),
        %engine,
        metric,
        points = results.len(),
        "extracted metric"
    );
    Ok(results)
}

/// Every regular file directly inside `folder`, in sorted order.
fn run_file_candidates(folder: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let escaped = glob::Pattern::escape(&folder.to_string_lossy());
    let pattern = Path::new(&escaped).join("*");

    let entries = glob::glob(&pattern.to_string_lossy()).map_err(|e| ExtractError::Pattern {
        folder: folder.to_path_buf(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            ExtractError::Io {
                path,
                source: e.into_error(),
            }
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Scan one run file for the first matching record and return its value.
fn find_value(
    path: &Path,
    run: &RunFile,
    metric: &str,
    stat: Stat,
) -> Result<Option<f64>, ExtractError> {
    let io_err = |e| ExtractError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::open(path).map_err(io_err)?;
    let reader: Box<dyn BufRead> = if run.compressed {
        let decoder = zstd::stream::read::Decoder::new(file).map_err(io_err)?;
        Box::new(BufReader::new(decoder))
    } else {
        Box::new(BufReader::new(file))
    };

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let record: Value = serde_json::from_str(&line).map_err(|e| ExtractError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source: e,
        })?;
        if let Some(value) = record_value(&record, metric, stat, run.limit, path, idx + 1)? {
            return Ok(Some(value));
        }
    }

    Ok(None)
}

#[derive(Debug)]
pub enum ExtractError {
    Pattern {
        folder: PathBuf,
        source: glob::PatternError,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    MissingField {
        path: PathBuf,
        line: usize,
        field: &'static str,
    },
    InvalidValue {
        path: PathBuf,
        line: usize,
    },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Pattern { folder, source } => {
                write!(f, "cannot scan folder {}: {source}", folder.display())
            }
            ExtractError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ExtractError::Parse { path, line, source } => {
                write!(f, "{}:{line}: invalid metric record: {source}", path.display())
            }
            ExtractError::MissingField { path, line, field } => {
                write!(f, "{}:{line}: metric record has no `{field}`", path.display())
            }
            ExtractError::InvalidValue { path, line } => {
                write!(
                    f,
                    "{}:{line}: matching record has a non-numeric `value`",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Pattern { source, .. } => Some(source),
            ExtractError::Io { source, .. } => Some(source),
            ExtractError::Parse { source, .. } => Some(source),
            ExtractError::MissingField { .. } | ExtractError::InvalidValue { .. } => None,
        }
    }
}
