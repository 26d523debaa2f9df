//! Parse cubvec / pgvector benchmark result files and render comparison
//! charts, one per vector dimension.

pub mod cli;
pub mod config;
pub mod extract;
pub mod interactive;
pub mod run;
pub mod run_file;
pub mod series;
pub mod static_plot;
