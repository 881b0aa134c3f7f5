//! Report rendering and output.
//!
//! A batch of per-document reports is wrapped in an envelope carrying the
//! run timestamp, the engine version, and the similarity settings, then
//! rendered as pretty console text, a single JSON document, or one JSON
//! line per input document.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use console::style;
use serde::{Deserialize, Serialize};

use crate::api::results::ExtractionReport;
use crate::core::config::ExtractionConfig;
use crate::core::errors::{MuninnError, Result};

/// Output format for a report set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Single pretty-printed JSON document with envelope
    Json,
    /// One JSON line per document report, no envelope
    Jsonl,
    /// Human-readable console text
    Pretty,
}

/// A batch of document reports with run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSet {
    /// When the extraction ran
    pub generated_at: DateTime<Utc>,

    /// Version of the engine that produced the reports
    pub engine_version: String,

    /// Similarity measure used
    pub similarity: String,

    /// Threshold used
    pub threshold: f64,

    /// Per-document reports, in input order
    pub documents: Vec<ExtractionReport>,
}

impl ReportSet {
    /// Wrap extraction results in a timestamped envelope.
    pub fn new(config: &ExtractionConfig, documents: Vec<ExtractionReport>) -> Self {
        Self {
            generated_at: Utc::now(),
            engine_version: crate::VERSION.to_string(),
            similarity: config.similarity.to_string(),
            threshold: config.threshold,
            documents,
        }
    }

    /// Total matches across all documents.
    pub fn total_matches(&self) -> usize {
        self.documents.iter().map(ExtractionReport::len).sum()
    }
}

/// Render a report set in the requested format.
pub fn render(set: &ReportSet, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(set)?),
        ReportFormat::Jsonl => {
            let mut out = String::new();
            for report in &set.documents {
                out.push_str(&serde_json::to_string(report)?);
                out.push('\n');
            }
            Ok(out)
        }
        ReportFormat::Pretty => Ok(render_pretty(set)),
    }
}

/// Render a report set to a file.
pub fn write_to_path(set: &ReportSet, format: ReportFormat, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let rendered = render(set, format)?;
    fs::write(path, rendered)
        .map_err(|e| MuninnError::io(format!("failed to write report to {}", path.display()), e))
}

fn render_pretty(set: &ReportSet) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} matches across {} documents ({} >= {})",
        style("muninn").bold().cyan(),
        set.total_matches(),
        set.documents.len(),
        set.similarity,
        set.threshold,
    );

    for (index, report) in set.documents.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} {}",
            style(format!("document {index}:")).bold(),
            style(&report.document).dim(),
        );
        if report.is_empty() {
            let _ = writeln!(out, "  {}", style("no matches").dim());
            continue;
        }
        for m in &report.matches {
            let marker = match m.valid {
                Some(true) => style("ok ").green(),
                Some(false) => style("no ").red(),
                None => style("?  ").dim(),
            };
            let score = match m.score {
                Some(s) => format!(" score={s:.3}"),
                None => String::new(),
            };
            let _ = writeln!(
                out,
                "  {}[{}..{}] {:?} <- {:?} (id {}){}",
                marker, m.span.0, m.span.1, m.text, m.entity.0, m.entity.1, score,
            );
        }
    }
    out
}
