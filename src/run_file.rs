/// Benchmark run file naming: `<engine>_<run_id>_<limit>_tbl_<dim>_<rows_total>.jsonl`.
///
/// Example: `cubvec_10_250000_tbl_256_300000.jsonl`. A `.zst` suffix marks a
/// zstd-compressed copy of the same file.
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Compiled filename pattern.
/// Groups: 1 engine, 2 run id, 3 limit, 4 dim, 5 rows total, 6 zstd suffix.
static RUN_FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(cubvec|pgvector)_(\d+)_(\d+)_tbl_(\d+)_(\d+)\.jsonl(\.zst)?$").unwrap()
});

/// The two benchmarked database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Engine {
    Cubvec,
    Pgvector,
}

impl Engine {
    pub const ALL: [Engine; 2] = [Engine::Cubvec, Engine::Pgvector];

    /// Tag embedded in result filenames.
    pub fn tag(self) -> &'static str {
        match self {
            Engine::Cubvec => "cubvec",
            Engine::Pgvector => "pgvector",
        }
    }

    /// Legend label, named after the benchmark result folder.
    pub fn label(self) -> &'static str {
        match self {
            Engine::Cubvec => "cubvec-bench",
            Engine::Pgvector => "pgvector-bench",
        }
    }

    fn from_tag(tag: &str) -> Option<Engine> {
        Engine::ALL.into_iter().find(|e| e.tag() == tag)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Fields decoded from a run file's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFile {
    pub engine: Engine,
    /// Present in every name, never used for plotting.
    pub run_id: u64,
    pub limit: u64,
    pub dim: u32,
    pub rows_total: u64,
    pub compressed: bool,
}

impl RunFile {
    /// Parse a bare file name. Returns `None` for anything that doesn't follow
    /// the naming convention, including numbers too large for their field.
    pub fn parse(file_name: &str) -> Option<RunFile> {
        let caps = RUN_FILE_PATTERN.captures(file_name)?;
        Some(RunFile {
            engine: Engine::from_tag(&caps[1])?,
            run_id: caps[2].parse().ok()?,
            limit: caps[3].parse().ok()?,
            dim: caps[4].parse().ok()?,
            rows_total: caps[5].parse().ok()?,
            compressed: caps.get(6).is_some(),
        })
    }
}
