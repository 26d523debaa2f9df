/// Interactive HTML charts: a standalone page that pulls plotly.js from its
/// CDN and draws both engines as `lines+markers` scatter traces.
use crate::config::Stat;
use crate::run_file::Engine;
use crate::series::Comparison;
use crate::static_plot::RenderError;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::path::Path;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

fn marker_symbol(engine: Engine) -> &'static str {
    match engine {
        Engine::Cubvec => "circle",
        Engine::Pgvector => "square",
    }
}

fn traces(comparison: &Comparison) -> Value {
    let traces: Vec<Value> = comparison
        .series
        .iter()
        .map(|s| {
            json!({
                "type": "scatter",
                "x": comparison.limits,
                // gaps serialize as null
                "y": s.values,
                "mode": "lines+markers",
                "name": s.engine.label(),
                "marker": { "symbol": marker_symbol(s.engine) },
            })
        })
        .collect();
    Value::Array(traces)
}

fn layout(comparison: &Comparison, metric: &str, stat: Stat) -> Value {
    json!({
        "title": { "text": format!("{metric} vs LIMIT (dimension {})", comparison.dim) },
        "xaxis": { "title": { "text": "LIMIT (# rows)" } },
        "yaxis": { "title": { "text": format!("{metric} – {stat}") } },
        "hovermode": "x unified",
        "template": "plotly_white",
        "legend": { "x": 0.01, "y": 0.99 },
    })
}

/// JSON safe to inline in a `<script>` block.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the full HTML page for one comparison.
pub fn render_html(
    comparison: &Comparison,
    metric: &str,
    stat: Stat,
    generated_at: DateTime<Utc>,
) -> String {
    let title = escape_html(&format!(
        "{metric} vs LIMIT (dimension {})",
        comparison.dim
    ));
    format!(
        r#"<!DOCTYPE html>
<!-- generated by benchplot {version} at {generated} -->
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:100vh;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#,
        version = env!("CARGO_PKG_VERSION"),
        generated = generated_at.format("%Y-%m-%dT%H:%M:%SZ"),
        cdn = PLOTLY_CDN,
        data = script_json(&traces(comparison)),
        layout = script_json(&layout(comparison, metric, stat)),
    )
}

/// Render and write the HTML page for one comparison.
pub fn write_html(
    path: &Path,
    comparison: &Comparison,
    metric: &str,
    stat: Stat,
) -> Result<(), RenderError> {
    let html = render_html(comparison, metric, stat, Utc::now());
    std::fs::write(path, html).map_err(|e| RenderError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), dim = comparison.dim, "wrote html");
    Ok(())
}
