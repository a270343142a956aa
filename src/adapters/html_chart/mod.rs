//! Standalone HTML chart of the cycle trajectory.
//!
//! Resolves the `{{PLACEHOLDER}}` markers of a template (the built-in one by
//! default) and writes the page to disk. The trajectory and the current point
//! are emitted as two JSON data series of `{x, y}` objects.

pub mod chart_template;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::domain::cycle::CycleReport;
use crate::domain::error::CycleError;
use crate::domain::instrument::Area;
use crate::domain::phase::Phase;
use crate::ports::chart_port::{ChartContext, ChartPort};

pub const DEFAULT_AXIS_LIMIT: f64 = 25.0;

pub struct HtmlChartAdapter {
    output_path: PathBuf,
    template: Option<String>,
}

impl HtmlChartAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            template: None,
        }
    }

    pub fn with_template(mut self, template: String) -> Self {
        self.template = Some(template);
        self
    }
}

impl ChartPort for HtmlChartAdapter {
    fn render(&self, report: &CycleReport, ctx: &ChartContext) -> Result<(), CycleError> {
        let template = self
            .template
            .as_deref()
            .unwrap_or(chart_template::template());
        let html = resolve(template, report, ctx)?;

        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output_path, html)?;

        info!(path = %self.output_path.display(), "chart written");
        Ok(())
    }
}

/// Replace every placeholder in `template`.
pub fn resolve(
    template: &str,
    report: &CycleReport,
    ctx: &ChartContext,
) -> Result<String, CycleError> {
    if !(ctx.axis_limit > 0.0) || !ctx.axis_limit.is_finite() {
        return Err(CycleError::Render {
            reason: format!("axis limit must be a positive number, got {}", ctx.axis_limit),
        });
    }

    let trajectory = to_json(&report.trajectory.vectors())?;
    let current = to_json(&[report.trajectory.current.vector])?;

    let phase_labels: BTreeMap<&str, &str> = Area::ALL
        .iter()
        .map(|&area| (area.short_name(), ctx.labels.label(Phase::for_area(area))))
        .collect();

    let area_labels: BTreeMap<&str, Vec<&str>> = Area::ALL
        .iter()
        .map(|&area| {
            let names = ctx
                .registry
                .in_area(area)
                .into_iter()
                .map(|s| s.name.as_str())
                .collect();
            (area.short_name(), names)
        })
        .collect();

    Ok(template
        .replace("{{TITLE}}", &escape_html(ctx.title))
        .replace("{{PHASE_LABELS}}", &to_json(&phase_labels)?)
        .replace("{{AREA_LABELS}}", &to_json(&area_labels)?)
        .replace("{{TRAJECTORY}}", &trajectory)
        .replace("{{CURRENT}}", &current)
        .replace("{{AXIS_LIMIT}}", &format!("{}", ctx.axis_limit)))
}

/// JSON for inline `<script>` use: `<`, `>` and `&` only occur inside
/// string literals, so they are written as unicode escapes.
fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, CycleError> {
    let json = serde_json::to_string(value).map_err(|e| CycleError::Render {
        reason: format!("JSON encoding failed: {}", e),
    })?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
