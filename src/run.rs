/// Driver shared by both binaries: extract each engine once, then render one
/// chart (or chart pair) per configured dimension.
use crate::config::{ConfigError, PlotConfig};
use crate::extract::{extract, ExtractError, ResultMap};
use crate::interactive;
use crate::run_file::Engine;
use crate::series::{output_path, Comparison};
use crate::static_plot::{render_png, LegendNames, RenderError};
use std::path::PathBuf;

/// Which kind of output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One PNG per dimension.
    Static,
    /// One HTML page plus a PNG thumbnail per dimension.
    Interactive,
}

impl Mode {
    pub fn summary(self) -> &'static str {
        match self {
            Mode::Static => "All plots generated.",
            Mode::Interactive => "All interactive plots generated.",
        }
    }
}

/// Files written for a single dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub dim: u32,
    pub html: Option<PathBuf>,
    pub png: PathBuf,
}

impl Rendered {
    /// Confirmation line printed after each dimension.
    pub fn confirmation(&self) -> String {
        match &self.html {
            Some(html) => format!("✓ Saved {} and {}", html.display(), self.png.display()),
            None => format!("✓ Saved {}", self.png.display()),
        }
    }
}

/// Both engines' extracted results for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineResults {
    pub cubvec: ResultMap,
    pub pgvector: ResultMap,
}

impl EngineResults {
    pub fn load(config: &PlotConfig, metric: &str) -> Result<Self, ExtractError> {
        let cubvec = extract(
            config.engine_dir(Engine::Cubvec),
            Engine::Cubvec,
            metric,
            config.stat,
        )?;
        let pgvector = extract(
            config.engine_dir(Engine::Pgvector),
            Engine::Pgvector,
            metric,
            config.stat,
        )?;
        Ok(Self { cubvec, pgvector })
    }

    pub fn comparison(&self, dim: u32) -> Comparison {
        Comparison::for_dimension(dim, &self.cubvec, &self.pgvector)
    }
}

/// Render every configured dimension into `config.output_dir`, calling
/// `on_saved` after each one.
pub fn render_all(
    config: &PlotConfig,
    results: &EngineResults,
    metric: &str,
    mode: Mode,
    mut on_saved: impl FnMut(&Rendered),
) -> Result<Vec<Rendered>, PlotError> {
    std::fs::create_dir_all(&config.output_dir).map_err(|e| PlotError::OutputDir {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let mut rendered = Vec::with_capacity(config.dimensions.len());
    for &dim in &config.dimensions {
        let comparison = results.comparison(dim);
        if comparison.is_empty() {
            tracing::warn!(dim, metric, "no data points for dimension");
        }
        let out = render_dimension(&comparison, metric, config, mode)?;
        on_saved(&out);
        rendered.push(out);
    }
    Ok(rendered)
}

fn render_dimension(
    comparison: &Comparison,
    metric: &str,
    config: &PlotConfig,
    mode: Mode,
) -> Result<Rendered, PlotError> {
    let dim = comparison.dim;
    let output_dir = &config.output_dir;
    match mode {
        Mode::Static => {
            let png = output_path(output_dir, dim, metric, "png");
            render_png(&png, comparison, metric, config.stat, LegendNames::Folder)?;
            Ok(Rendered {
                dim,
                html: None,
                png,
            })
        }
        Mode::Interactive => {
            let html = output_path(output_dir, dim, metric, "html");
            interactive::write_html(&html, comparison, metric, config.stat)?;
            // thumbnail sits next to the page
            let png = html.with_extension("png");
            render_png(&png, comparison, metric, config.stat, LegendNames::Tag)?;
            Ok(Rendered {
                dim,
                html: Some(html),
                png,
            })
        }
    }
}

/// Full run for one metric: extract, render, print confirmations.
pub fn run(config: &PlotConfig, metric: &str, mode: Mode) -> Result<Vec<Rendered>, PlotError> {
    tracing::info!(metric, stat = %config.stat, ?mode, "plotting benchmark results");
    let results = EngineResults::load(config, metric)?;
    let rendered = render_all(config, &results, metric, mode, |r| {
        println!("{}", r.confirmation());
    })?;
    println!("{}", mode.summary());
    Ok(rendered)
}

#[derive(Debug)]
pub enum PlotError {
    Config(ConfigError),
    Extract(ExtractError),
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Render(RenderError),
}

impl From<ConfigError> for PlotError {
    fn from(e: ConfigError) -> Self {
        PlotError::Config(e)
    }
}

impl From<ExtractError> for PlotError {
    fn from(e: ExtractError) -> Self {
        PlotError::Extract(e)
    }
}

impl From<RenderError> for PlotError {
    fn from(e: RenderError) -> Self {
        PlotError::Render(e)
    }
}

impl std::fmt::Display for PlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotError::Config(e) => write!(f, "{e}"),
            PlotError::Extract(e) => write!(f, "{e}"),
            PlotError::OutputDir { path, source } => {
                write!(f, "cannot create output directory {}: {source}", path.display())
            }
            PlotError::Render(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PlotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlotError::Config(e) => Some(e),
            PlotError::Extract(e) => Some(e),
            PlotError::OutputDir { source, .. } => Some(source),
            PlotError::Render(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Stat;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_jsonl(dir: &Path, name: &str, lines: &[&str]) {
        std::fs::create_dir_all(dir).unwrap();
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(f, "{}", line).unwrap();
        }
    }

    fn config_in(root: &Path) -> PlotConfig {
        PlotConfig {
            cubvec_dir: root.join("cubvec-bench"),
            pgvector_dir: root.join("pgvector-bench"),
            output_dir: root.join("plots"),
            ..PlotConfig::default()
        }
    }

    #[test]
    fn load_reads_each_engine_from_its_folder() {
        let root = TempDir::new().unwrap();
        let config = config_in(root.path());
        write_jsonl(
            &config.cubvec_dir,
            "cubvec_10_250000_tbl_256_300000.jsonl",
            &[r#"{"metric":"SELECT TIME","stat":"avg","limit":250000,"value":12.5}"#],
        );
        write_jsonl(
            &config.pgvector_dir,
            "pgvector_10_250000_tbl_256_300000.jsonl",
            &[r#"{"metric":"SELECT TIME","stat":"avg","limit":250000,"value":20.0}"#],
        );
        // stray cubvec file in the pgvector folder is ignored
        write_jsonl(
            &config.pgvector_dir,
            "cubvec_10_1000_tbl_256_300000.jsonl",
            &[r#"{"metric":"SELECT TIME","stat":"avg","limit":1000,"value":1.0}"#],
        );

        let results = EngineResults::load(&config, "SELECT TIME").unwrap();
        assert_eq!(results.cubvec.get(&(256, 250000)), Some(&12.5));
        assert_eq!(results.pgvector.get(&(256, 250000)), Some(&20.0));
        assert_eq!(results.pgvector.len(), 1);

        let c = results.comparison(256);
        assert_eq!(c.limits, vec![250000]);
    }

    #[test]
    fn load_honours_configured_stat() {
        let root = TempDir::new().unwrap();
        let mut config = config_in(root.path());
        config.stat = Stat::Median;
        write_jsonl(
            &config.cubvec_dir,
            "cubvec_1_100_tbl_768_500.jsonl",
            &[
                r#"{"metric":"SELECT TIME","stat":"avg","limit":100,"value":1.0}"#,
                r#"{"metric":"SELECT TIME","stat":"median","limit":100,"value":0.8}"#,
            ],
        );

        let results = EngineResults::load(&config, "SELECT TIME").unwrap();
        assert_eq!(results.cubvec.get(&(768, 100)), Some(&0.8));
        assert!(results.pgvector.is_empty());
    }

    #[test]
    fn load_propagates_parse_errors() {
        let root = TempDir::new().unwrap();
        let config = config_in(root.path());
        write_jsonl(&config.cubvec_dir, "cubvec_1_100_tbl_768_500.jsonl", &["nope"]);

        let err = EngineResults::load(&config, "SELECT TIME").unwrap_err();
        let err = PlotError::from(err);
        assert!(matches!(err, PlotError::Extract(ExtractError::Parse { .. })));
        assert!(err.to_string().contains("cubvec_1_100_tbl_768_500.jsonl:1"));
    }

    #[test]
    fn confirmation_lines() {
        let png_only = Rendered {
            dim: 256,
            html: None,
            png: PathBuf::from("plots/plot_dim_256_SELECT_TIME.png"),
        };
        assert_eq!(
            png_only.confirmation(),
            "✓ Saved plots/plot_dim_256_SELECT_TIME.png"
        );

        let pair = Rendered {
            dim: 768,
            html: Some(PathBuf::from("plots/plot_dim_768_SELECT_TIME.html")),
            png: PathBuf::from("plots/plot_dim_768_SELECT_TIME.png"),
        };
        assert_eq!(
            pair.confirmation(),
            "✓ Saved plots/plot_dim_768_SELECT_TIME.html and plots/plot_dim_768_SELECT_TIME.png"
        );
    }

    #[test]
    fn summaries() {
        assert_eq!(Mode::Static.summary(), "All plots generated.");
        assert_eq!(
            Mode::Interactive.summary(),
            "All interactive plots generated."
        );
    }

    #[test]
    fn render_all_fails_when_output_dir_is_a_file() {
        let root = TempDir::new().unwrap();
        let config = config_in(root.path());
        std::fs::write(&config.output_dir, "not a dir").unwrap();
        let results = EngineResults {
            cubvec: ResultMap::new(),
            pgvector: ResultMap::new(),
        };

        let err = render_all(&config, &results, "SELECT TIME", Mode::Static, |_| {}).unwrap_err();
        assert!(matches!(err, PlotError::OutputDir { .. }));
    }

    fn sample_results() -> EngineResults {
        EngineResults {
            cubvec: [((256, 100), 1.5), ((256, 1000), 2.5)].into_iter().collect(),
            pgvector: [((256, 1000), 4.0), ((768, 100), 9.0)].into_iter().collect(),
        }
    }

    #[test]
    fn static_run_writes_one_png_per_dimension() {
        let root = TempDir::new().unwrap();
        let config = config_in(root.path());
        let mut saved = Vec::new();

        let rendered = render_all(&config, &sample_results(), "SELECT TIME", Mode::Static, |r| {
            saved.push(r.confirmation())
        })
        .unwrap();

        // 1536 has no data but still gets a chart
        let dims: Vec<u32> = rendered.iter().map(|r| r.dim).collect();
        assert_eq!(dims, vec![256, 768, 1536]);
        for r in &rendered {
            let expected = config
                .output_dir
                .join(format!("plot_dim_{}_SELECT_TIME.png", r.dim));
            assert_eq!(r.png, expected);
            assert!(r.html.is_none());
            assert!(r.png.is_file(), "{} should exist", r.png.display());
            assert!(std::fs::metadata(&r.png).unwrap().len() > 0);
        }
        let expected: Vec<String> = rendered.iter().map(|r| r.confirmation()).collect();
        assert_eq!(saved, expected);
    }

    #[test]
    fn interactive_run_writes_html_with_thumbnail() {
        let root = TempDir::new().unwrap();
        let mut config = config_in(root.path());
        config.dimensions = vec![768, 256];
        let mut saved = Vec::new();

        let rendered = render_all(
            &config,
            &sample_results(),
            "SELECT TIME",
            Mode::Interactive,
            |r| saved.push(r.dim),
        )
        .unwrap();

        assert_eq!(saved, vec![768, 256]);
        for r in &rendered {
            let html = config
                .output_dir
                .join(format!("plot_dim_{}_SELECT_TIME.html", r.dim));
            assert_eq!(r.html.as_deref(), Some(html.as_path()));
            assert_eq!(r.png, html.with_extension("png"));
            assert!(html.is_file());
            assert!(r.png.is_file());

            let page = std::fs::read_to_string(&html).unwrap();
            assert!(page.contains(&format!("(dimension {})", r.dim)));
        }
    }

    #[test]
    fn run_creates_missing_output_dir() {
        let root = TempDir::new().unwrap();
        let mut config = config_in(root.path());
        config.output_dir = root.path().join("nested").join("plots");
        config.dimensions = vec![256];
        write_jsonl(
            &config.cubvec_dir,
            "cubvec_10_250000_tbl_256_300000.jsonl",
            &[r#"{"metric":"SELECT TIME","stat":"avg","limit":250000,"value":12.5}"#],
        );

        let rendered = run(&config, "SELECT TIME", Mode::Static).unwrap();
        assert_eq!(rendered.len(), 1);
        assert!(config
            .output_dir
            .join("plot_dim_256_SELECT_TIME.png")
            .is_file());
    }
}
