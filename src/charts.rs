//! Embeddable chart fragments for the reporting pages.
//!
//! The reporting engine produces tables; this module turns a table the caller
//! has already checked for emptiness into an opaque HTML artifact: a `<div>`
//! wrapping a plotly-style figure config as JSON. Callers never inspect the
//! artifact, they only embed it.

use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

impl ChartKind {
    fn trace_type(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "scatter",
        }
    }
}

/// One named series of y-values, plotted against the shared x labels.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub values: Vec<Value>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

pub fn bar(title: &str, x_title: &str, y_title: &str, labels: &[Value], series: &[Series]) -> String {
    figure(ChartKind::Bar, title, x_title, y_title, labels, series)
}

pub fn line(title: &str, x_title: &str, y_title: &str, labels: &[Value], series: &[Series]) -> String {
    figure(ChartKind::Line, title, x_title, y_title, labels, series)
}

/// Explicit "no data" fragment, rendered instead of a chart whenever the
/// underlying table is the empty sentinel.
pub fn no_data(title: &str) -> String {
    format!(
        "<div class=\"chart chart-empty\"><p>No data available for {}.</p></div>",
        html_escape(title)
    )
}

fn figure(
    kind: ChartKind,
    title: &str,
    x_title: &str,
    y_title: &str,
    labels: &[Value],
    series: &[Series],
) -> String {
    let traces: Vec<Value> = series
        .iter()
        .map(|s| {
            json!({
                "type": kind.trace_type(),
                "name": s.name,
                "x": labels,
                "y": s.values,
            })
        })
        .collect();

    let config = json!({
        "data": traces,
        "layout": {
            "title": title,
            "xaxis": { "title": x_title },
            "yaxis": { "title": y_title },
            "barmode": "group",
        },
    });

    format!(
        "<div class=\"chart\"><script type=\"application/json\">{}</script></div>",
        embed_json(&config)
    )
}

// `<` must not appear verbatim inside the embedded <script> payload, or a
// value containing "</script>" would terminate the element early.
fn embed_json(value: &Value) -> String {
    value.to_string().replace('<', "\\u003c")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fragment_carries_series() {
        let html = bar(
            "Annual Orders",
            "Year",
            "Total",
            &[json!("2023"), json!("2024")],
            &[Series::new("Total", vec![json!("55.00"), json!("12.00")])],
        );
        assert!(html.starts_with("<div class=\"chart\">"));
        assert!(html.contains("\"type\":\"bar\""));
        assert!(html.contains("2023"));
        assert!(html.contains("55.00"));
    }

    #[test]
    fn line_uses_scatter_trace() {
        let html = line("Monthly", "Month", "Revenue", &[json!(1)], &[Series::new("r", vec![json!(2)])]);
        assert!(html.contains("\"type\":\"scatter\""));
    }

    #[test]
    fn embedded_json_cannot_break_out_of_script() {
        let html = bar(
            "t",
            "x",
            "y",
            &[json!("</script><script>alert(1)</script>")],
            &[Series::new("s", vec![json!(1)])],
        );
        assert!(!html.contains("</script><script>"));
    }

    #[test]
    fn no_data_is_escaped() {
        let html = no_data("Orders <then>");
        assert!(html.contains("chart-empty"));
        assert!(html.contains("Orders &lt;then&gt;"));
    }
}
