use crate::run_file::Engine;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the optional override file looked up in the working directory.
pub const CONFIG_FILE: &str = "benchplot.toml";

/// Aggregation applied to repeated measurements in a result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Avg,
    Min,
    Median,
    Max,
}

impl Stat {
    pub fn as_str(self) -> &'static str {
        match self {
            Stat::Avg => "avg",
            Stat::Min => "min",
            Stat::Median => "median",
            Stat::Max => "max",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plot settings, loaded from benchplot.toml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub cubvec_dir: PathBuf,
    pub pgvector_dir: PathBuf,
    /// Which stat line to pick from each result file.
    pub stat: Stat,
    /// One chart per dimension, in this order.
    pub dimensions: Vec<u32>,
    pub output_dir: PathBuf,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            cubvec_dir: PathBuf::from("cubvec-bench"),
            pgvector_dir: PathBuf::from("pgvector-bench"),
            stat: Stat::Avg,
            dimensions: vec![256, 768, 1536],
            output_dir: PathBuf::from("plots"),
        }
    }
}

impl PlotConfig {
    /// Results folder for an engine.
    pub fn engine_dir(&self, engine: Engine) -> &Path {
        match engine {
            Engine::Cubvec => &self.cubvec_dir,
            Engine::Pgvector => &self.pgvector_dir,
        }
    }
}

/// Load config from benchplot.toml in the given directory.
///
/// A missing file means defaults; a file that exists but can't be read or
/// parsed is an error.
pub fn load_config(dir: &Path) -> Result<PlotConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(PlotConfig::default());
        }
        Err(e) => return Err(ConfigError::Io { path, source: e }),
    };

    let config: PlotConfig =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}
