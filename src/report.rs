use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::config::VotConfig;
use crate::error::VotError;
use crate::timeline::{Document, Tier};
use crate::types::{round_ms, VotRow, VowelContext};

pub const CSV_HEADER: &str =
    "Filename,Source,Word,V_pre,V_pre_dur,Segment,V_post,V_post_dur,VOT_beg,VOT_end,VOT,CLO";
/// Rendered in the CLO column when no closure was measured.
pub const CLO_UNSET: &str = "-999";
const NOT_AVAILABLE: &str = "NA";

pub const VOT_TIER_NAME: &str = "VOT";
pub const CLO_TIER_NAME: &str = "CLO";
const CLO_LABEL: &str = "CLO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Cumulative result table across a batch, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    pub rows: Vec<VotRow>,
    pub documents: usize,
}

impl ResultTable {
    pub fn push_document(&mut self, rows: &[VotRow]) {
        self.documents += 1;
        self.rows.extend_from_slice(rows);
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(CSV_HEADER.len() + 1 + self.rows.len() * 80);
        out.push_str(CSV_HEADER);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&csv_line(row));
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self, config: &VotConfig) -> Result<String, VotError> {
        let report = JsonReport {
            meta: JsonMeta {
                generated_at: Utc::now().to_rfc3339(),
                percent_voicing: config.percent_voicing,
                segments: config.segments.iter().cloned().collect(),
                document_count: self.documents,
                row_count: self.rows.len(),
            },
            rows: self.rows.iter().map(JsonRow::from).collect(),
        };
        serde_json::to_string_pretty(&report).map_err(|e| VotError::json("serialize report", e))
    }

    pub fn render(&self, format: OutputFormat, config: &VotConfig) -> Result<String, VotError> {
        match format {
            OutputFormat::Csv => Ok(self.to_csv()),
            OutputFormat::Json => self.to_json(config),
        }
    }

    /// Rewrites the whole table at `path`.
    pub fn write(&self, path: &Path, format: OutputFormat, config: &VotConfig) -> Result<(), VotError> {
        let contents = self.render(format, config)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| VotError::io("create result table directory", e))?;
            }
        }
        std::fs::write(path, contents).map_err(|e| VotError::io("write result table", e))
    }
}

/// One CSV record in header order.
pub fn csv_line(row: &VotRow) -> String {
    let m = &row.measurement;
    let fields = [
        escape_csv(&row.filename),
        escape_csv(row.source.as_deref().unwrap_or(NOT_AVAILABLE)),
        escape_csv(&row.word),
        vowel_label(row.v_pre.as_ref()),
        vowel_duration(row.v_pre.as_ref()),
        escape_csv(&row.segment),
        vowel_label(row.v_post.as_ref()),
        vowel_duration(row.v_post.as_ref()),
        ms(m.vot.beg * 1000.0),
        ms(m.vot.end * 1000.0),
        ms(m.reported_vot_ms()),
        m.reported_clo_ms()
            .map(ms)
            .unwrap_or_else(|| CLO_UNSET.to_string()),
    ];
    fields.join(",")
}

/// Builds the requested `VOT` and `CLO` tiers over the document's time base.
pub fn annotation_tiers(
    document: &Document,
    rows: &[VotRow],
    with_vot: bool,
    with_clo: bool,
) -> Vec<Tier> {
    let mut tiers = Vec::new();
    if with_vot {
        let mut tier = Tier::empty_interval_tier(VOT_TIER_NAME, document.xmin, document.xmax);
        for row in rows {
            let m = &row.measurement;
            let label = m.polarity().label();
            if !mark_span(&mut tier, m.vot.ordered(), label) {
                tracing::warn!(
                    document = document.name.as_str(),
                    word = row.word.as_str(),
                    vot_beg = m.vot.beg,
                    vot_end = m.vot.end,
                    "vot: span not drawn on VOT tier"
                );
            }
        }
        tiers.push(tier);
    }
    if with_clo {
        let mut tier = Tier::empty_interval_tier(CLO_TIER_NAME, document.xmin, document.xmax);
        for row in rows {
            let m = &row.measurement;
            if let (Some(closure), Some(_)) = (m.closure, m.reported_clo_ms()) {
                mark_span(&mut tier, (closure.beg, closure.end), CLO_LABEL);
            }
        }
        tiers.push(tier);
    }
    tiers
}

/// Labels [lo, hi] on a fresh tier. Zero-length or out-of-range spans are
/// left undrawn.
fn mark_span(tier: &mut Tier, (lo, hi): (f64, f64), label: &str) -> bool {
    if hi <= lo || lo < tier.xmin || hi > tier.xmax {
        return false;
    }
    tier.insert_boundary(lo);
    tier.insert_boundary(hi);
    tier.set_label_at((lo + hi) / 2.0, label).is_some()
}

#[derive(Serialize)]
struct JsonReport {
    meta: JsonMeta,
    rows: Vec<JsonRow>,
}

#[derive(Serialize)]
struct JsonMeta {
    generated_at: String,
    percent_voicing: f64,
    segments: Vec<String>,
    document_count: usize,
    row_count: usize,
}

#[derive(Serialize)]
struct JsonRow {
    filename: String,
    source: Option<String>,
    word: String,
    v_pre: Option<String>,
    v_pre_dur_ms: Option<f64>,
    segment: String,
    v_post: Option<String>,
    v_post_dur_ms: Option<f64>,
    vot_beg_ms: f64,
    vot_end_ms: f64,
    vot_ms: f64,
    vot_label: &'static str,
    clo_ms: Option<f64>,
    branch: &'static str,
}

impl From<&VotRow> for JsonRow {
    fn from(row: &VotRow) -> Self {
        let m = &row.measurement;
        Self {
            filename: row.filename.clone(),
            source: row.source.clone(),
            word: row.word.clone(),
            v_pre: row.v_pre.as_ref().map(|v| v.label.clone()),
            v_pre_dur_ms: row.v_pre.as_ref().map(|v| round_ms(v.duration * 1000.0)),
            segment: row.segment.clone(),
            v_post: row.v_post.as_ref().map(|v| v.label.clone()),
            v_post_dur_ms: row.v_post.as_ref().map(|v| round_ms(v.duration * 1000.0)),
            vot_beg_ms: round_ms(m.vot.beg * 1000.0),
            vot_end_ms: round_ms(m.vot.end * 1000.0),
            vot_ms: m.reported_vot_ms(),
            vot_label: m.polarity().label(),
            clo_ms: m.reported_clo_ms(),
            branch: m.branch.as_str(),
        }
    }
}

fn vowel_label(vowel: Option<&VowelContext>) -> String {
    vowel
        .map(|v| escape_csv(&v.label))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn vowel_duration(vowel: Option<&VowelContext>) -> String {
    vowel
        .map(|v| ms(v.duration * 1000.0))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn ms(value: f64) -> String {
    let rounded = round_ms(value);
    // avoid "-0.0" for values that round to zero
    if rounded == 0.0 {
        return "0.0".to_string();
    }
    format!("{rounded:.1}")
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
