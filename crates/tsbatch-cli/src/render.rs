use std::io::Write;

use snafu::ResultExt;
use tabled::{
    builder::Builder,
    settings::{Style, object::Rows, style::LineText, width::MinWidth},
};
use tsbatch_core::TsStats;

use crate::error::{CliResult, JsonSnafu, OutputSnafu};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
}

/// Indent of the caption inside the top border.
const CAPTION_INDENT: usize = 2;

/// Rounded table whose top border carries `caption`, widened so the caption
/// never overflows a narrow table.
fn render_table(caption: &str, header: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| h.to_string()));
    rows.iter().for_each(|row| builder.push_record(row));

    let width = CAPTION_INDENT + caption.len() + 4;
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(MinWidth::new(width))
        .with(LineText::new(caption, Rows::first()).offset(CAPTION_INDENT))
        .with(MinWidth::new(width));
    table.to_string()
}

/// Durations print with 3 decimals; empty-class moments print as `NaN`.
fn fmt_time(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.3}")
    }
}

pub fn render_stats(report: &TsStats) -> String {
    let t = &report.total;
    let total = render_table(
        "Batch",
        &[
            "n_series",
            "n_classes",
            "n_ts_vars",
            "n_context_vars",
            "total_time",
            "series_time_mean",
            "series_time_std",
            "series_time_range",
        ],
        &[vec![
            t.n_series.to_string(),
            t.n_classes.to_string(),
            t.n_ts_vars.to_string(),
            t.n_context_vars.to_string(),
            fmt_time(t.total_time),
            fmt_time(t.series_time_mean),
            fmt_time(t.series_time_std),
            format!(
                "[{}, {}]",
                fmt_time(t.series_time_range.0),
                fmt_time(t.series_time_range.1)
            ),
        ]],
    );

    let rows: Vec<Vec<String>> = report
        .by_class
        .iter()
        .map(|c| {
            vec![
                c.label.clone(),
                c.n_series.to_string(),
                fmt_time(c.total_time),
                fmt_time(c.series_time_mean),
                fmt_time(c.series_time_std),
                fmt_time(c.series_time_min),
                fmt_time(c.series_time_max),
            ]
        })
        .collect();
    let classes = render_table(
        "Classes",
        &[
            "class",
            "n_series",
            "total_time",
            "series_time_mean",
            "series_time_std",
            "series_time_min",
            "series_time_max",
        ],
        &rows,
    );

    format!("{total}\n{classes}")
}

/// JSON output uses `null` for NaN moments.
pub fn write_stats<W: Write>(report: &TsStats, format: ReportFormat, out: &mut W) -> CliResult<()> {
    match format {
        ReportFormat::Table => writeln!(out, "{}", render_stats(report)).context(OutputSnafu),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(report).context(JsonSnafu)?;
            writeln!(out, "{json}").context(OutputSnafu)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsbatch_core::{ClassStats, TotalStats};

    fn report() -> TsStats {
        TsStats {
            total: TotalStats {
                n_series: 3,
                n_classes: 2,
                n_ts_vars: 1,
                n_context_vars: 0,
                total_time: 30.0,
                series_time_mean: 10.0,
                series_time_std: 0.0,
                series_time_range: (10.0, 10.0),
            },
            by_class: vec![
                ClassStats {
                    label: "healthy".to_string(),
                    n_series: 3,
                    total_time: 30.0,
                    series_time_mean: 10.0,
                    series_time_std: 0.0,
                    series_time_min: 10.0,
                    series_time_max: 10.0,
                },
                ClassStats {
                    label: "sick".to_string(),
                    n_series: 0,
                    total_time: 0.0,
                    series_time_mean: f64::NAN,
                    series_time_std: f64::NAN,
                    series_time_min: f64::NAN,
                    series_time_max: f64::NAN,
                },
            ],
        }
    }

    #[test]
    fn table_shows_both_sections() {
        let out = render_stats(&report());
        assert!(out.contains("Batch"));
        assert!(out.contains("Classes"));
        assert!(out.contains("healthy"));
        assert!(out.contains("30.000"));
        assert!(out.contains("NaN"));
    }

    #[test]
    fn caption_sits_in_the_top_border() {
        let out = render_table("Batch", &["n"], &[vec!["1".to_string()]]);
        let top = out.lines().next().unwrap();
        assert!(top.starts_with('╭') && top.contains("Batch"), "top border: {top}");
        assert!(out.lines().all(|l| l.chars().count() >= CAPTION_INDENT + "Batch".len() + 4));
    }

    #[test]
    fn json_maps_nan_to_null() {
        let mut buf = Vec::new();
        write_stats(&report(), ReportFormat::Json, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total"]["total_time"], 30.0);
        assert!(value["by_class"][1]["series_time_mean"].is_null());
    }
}
