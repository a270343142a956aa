//! CMS page content: a short commentary block embedding the chart.
//!
//! The fragment is written to a file; pushing it to the CMS is left to
//! whatever picks the file up.

use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::info;

use crate::adapters::html_chart::escape_html;
use crate::domain::cycle::CycleReport;
use crate::domain::error::CycleError;
use crate::domain::instrument::{Area, InstrumentRegistry};
use crate::domain::phase::{Phase, PhaseLabels};
use crate::ports::publish_port::{PageContent, PublishPort};

pub struct PageSettings<'a> {
    pub title: &'a str,
    pub chart_url: &'a str,
    pub date_format: &'a str,
    pub registry: &'a InstrumentRegistry,
    pub labels: &'a PhaseLabels,
    pub ma_period: usize,
}

/// `chart_url` is embedded with a `?v=<YYYYMMDDHHMM>` suffix so the iframe
/// is not served from a stale cache.
///
/// Fails with `CycleError::Render` when `date_format` cannot format a date.
pub fn build_page_content(
    report: &CycleReport,
    settings: &PageSettings,
    generated_at: NaiveDateTime,
) -> Result<PageContent, CycleError> {
    let mut date_str = String::new();
    write!(date_str, "{}", report.as_of.format(settings.date_format)).map_err(|_| {
        CycleError::Render {
            reason: format!("date format {:?} cannot format a date", settings.date_format),
        }
    })?;
    let title = format!("{} {}", settings.title, date_str);
    let phase_label = settings.labels.label(report.phase);
    let iframe_src = format!(
        "{}?v={}",
        settings.chart_url,
        generated_at.format("%Y%m%d%H%M")
    );

    let mut html = String::new();
    html.push_str(&format!("<h3>{}</h3>\n", escape_html(&title)));
    html.push_str(&format!(
        "<p>The centre of gravity is in the <strong>{}</strong> area.<br>\n",
        escape_html(phase_label)
    ));
    html.push_str(
        "The chart traces the momentum of the tracked sectors over the past year. \
         The further the point sits from the centre, the stronger the trend; near the \
         centre there is no clear direction.</p>\n",
    );
    html.push_str(
        "<div style=\"width: 100%; max-width: 600px; aspect-ratio: 1; margin: 0 auto; \
         border: 1px solid #eee; overflow: hidden;\">\n",
    );
    html.push_str(&format!(
        "<iframe src=\"{}\" width=\"100%\" height=\"100%\" style=\"border:none; display:block;\" \
         title=\"{}\"></iframe>\n",
        escape_html(&iframe_src),
        escape_html(settings.title)
    ));
    html.push_str("</div>\n");
    html.push_str(&render_details(settings));

    Ok(PageContent { title, html })
}

fn render_details(settings: &PageSettings) -> String {
    let PageSettings {
        registry, labels, ..
    } = settings;
    let mut html = String::from(
        "<details class=\"wp-block-details\">\n<summary>Details</summary>\n<ul>\n",
    );
    for area in Area::ALL {
        let members: Vec<String> = registry
            .in_area(area)
            .iter()
            .map(|s| format!("{}({})", escape_html(&s.name), escape_html(&s.code)))
            .collect();
        if members.is_empty() {
            continue;
        }
        html.push_str(&format!(
            "<li><strong>{}:</strong> {}</li>\n",
            escape_html(labels.label(Phase::for_area(area))),
            members.join(", ")
        ));
    }
    html.push_str(&format!(
        "</ul>\n<p>Based on each instrument's deviation from its {}-day moving average.</p>\n",
        settings.ma_period
    ));
    html.push_str("</details>\n");
    html
}

pub struct PageFileAdapter {
    output_path: PathBuf,
}

impl PageFileAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }
}

impl PublishPort for PageFileAdapter {
    fn publish(&self, page: &PageContent) -> Result<(), CycleError> {
        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output_path, &page.html)?;
        info!(path = %self.output_path.display(), title = %page.title, "page content written");
        Ok(())
    }
}
