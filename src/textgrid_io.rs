//! Reading and writing Praat TextGrid files.
//!
//! Files are parsed with the `textgrid` crate first. Files it rejects go
//! through a line-oriented reader for the long text format, and annotated
//! copies of such files are written back in that same format.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use textgrid::{TextGrid, TierType};

use crate::error::VotError;
use crate::timeline::{Document, Interval, Point, Tier, TierKind};

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub document: Document,
    parsed_by_crate: bool,
}

impl LoadedDocument {
    pub fn name(&self) -> &str {
        &self.document.name
    }
}

impl AsRef<Document> for LoadedDocument {
    fn as_ref(&self) -> &Document {
        &self.document
    }
}

pub fn read_document(path: &Path) -> Result<LoadedDocument, VotError> {
    let name = document_name(path)?;
    match TextGrid::from_file(path) {
        Ok(textgrid) => Ok(LoadedDocument {
            path: path.to_path_buf(),
            document: from_textgrid(name, &textgrid),
            parsed_by_crate: true,
        }),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "textgrid crate parse failed, using long-format fallback reader"
            );
            let contents = fs::read_to_string(path).map_err(|e| VotError::io("read TextGrid", e))?;
            let document = parse_long_format(name, &contents)
                .map_err(|message| VotError::textgrid(path.display().to_string(), message))?;
            Ok(LoadedDocument {
                path: path.to_path_buf(),
                document,
                parsed_by_crate: false,
            })
        }
    }
}

/// Writes a copy of the loaded document with `extra` tiers appended.
pub fn write_annotated(
    loaded: &LoadedDocument,
    extra: &[Tier],
    out_path: &Path,
) -> Result<(), VotError> {
    if out_path == loaded.path {
        return Err(VotError::invalid_input(format!(
            "refusing to overwrite input TextGrid '{}'",
            loaded.path.display()
        )));
    }
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| VotError::io("create annotated TextGrid directory", e))?;
        }
    }

    let out_display = out_path.display().to_string();
    if !loaded.parsed_by_crate {
        let mut document = loaded.document.clone();
        document.tiers.extend(extra.iter().cloned());
        return fs::write(out_path, to_long_format(&document))
            .map_err(|e| VotError::io("write annotated TextGrid", e));
    }

    let mut textgrid = TextGrid::from_file(&loaded.path)
        .map_err(|err| VotError::textgrid(loaded.path.display().to_string(), err))?;
    for tier in extra {
        textgrid
            .add_tier(to_textgrid_tier(tier))
            .map_err(|err| VotError::textgrid(out_display.clone(), err))?;
    }
    textgrid
        .to_file(out_path, false)
        .map_err(|err| VotError::textgrid(out_display, err))
}

/// `<dir>/<stem><suffix>.TextGrid`, next to the input when `dir` is `None`.
pub fn annotated_output_path(
    input: &Path,
    dir: Option<&Path>,
    suffix: &str,
) -> Result<PathBuf, VotError> {
    let stem = document_name(input)?;
    let file_name = format!("{stem}{suffix}.TextGrid");
    let out = match dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    };
    if out == input {
        return Err(VotError::invalid_input(format!(
            "annotated output would overwrite input '{}'; set a suffix or another directory",
            input.display()
        )));
    }
    Ok(out)
}

/// `*.TextGrid` files directly inside `dir`, sorted by path.
pub fn list_textgrids(dir: &Path) -> Result<Vec<PathBuf>, VotError> {
    let entries = fs::read_dir(dir).map_err(|e| VotError::io("read input directory", e))?;
    let mut out = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| VotError::io("read input directory entry", e))?
            .path();
        if path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("TextGrid"))
        {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn document_name(path: &Path) -> Result<String, VotError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            VotError::invalid_input(format!(
                "failed to derive document name from '{}'",
                path.display()
            ))
        })
}

fn from_textgrid(name: String, textgrid: &TextGrid) -> Document {
    let tiers: Vec<Tier> = textgrid
        .tiers
        .iter()
        .map(|tier| {
            if tier.tier_type == TierType::IntervalTier {
                let intervals = tier
                    .intervals
                    .iter()
                    .map(|i| Interval::new(i.xmin, i.xmax, i.text.clone()))
                    .collect();
                Tier {
                    name: tier.name.clone(),
                    kind: TierKind::Interval,
                    xmin: tier.xmin,
                    xmax: tier.xmax,
                    intervals,
                    points: Vec::new(),
                }
            } else {
                // Point tiers only matter as a classification here; the
                // original marks survive through the crate on write.
                Tier::point_tier(tier.name.clone(), tier.xmin, tier.xmax, Vec::new())
            }
        })
        .collect();
    if tiers.is_empty() {
        return Document::new(name, 0.0, 0.0, tiers);
    }
    let xmin = tiers.iter().map(|t| t.xmin).fold(f64::INFINITY, f64::min);
    let xmax = tiers.iter().map(|t| t.xmax).fold(f64::NEG_INFINITY, f64::max);
    Document::new(name, xmin, xmax, tiers)
}

fn to_textgrid_tier(tier: &Tier) -> textgrid::Tier {
    textgrid::Tier {
        name: tier.name.clone(),
        tier_type: TierType::IntervalTier,
        xmin: tier.xmin,
        xmax: tier.xmax,
        intervals: tier
            .intervals
            .iter()
            .map(|i| textgrid::Interval {
                xmin: i.start,
                xmax: i.end,
                text: i.label.clone(),
            })
            .collect(),
        points: Vec::new(),
    }
}

#[derive(Default)]
struct PendingTier {
    name: String,
    kind: Option<TierKind>,
    xmin: Option<f64>,
    xmax: Option<f64>,
    intervals: Vec<Interval>,
    points: Vec<Point>,
}

impl PendingTier {
    fn finish(self, number: usize) -> Result<Tier, String> {
        let kind = self
            .kind
            .ok_or_else(|| format!("tier {number} has no class"))?;
        Ok(Tier {
            name: self.name,
            kind,
            xmin: self.xmin.unwrap_or(0.0),
            xmax: self.xmax.unwrap_or(0.0),
            intervals: self.intervals,
            points: self.points,
        })
    }
}

#[derive(Default)]
struct PendingEntry {
    xmin: Option<f64>,
    xmax: Option<f64>,
    time: Option<f64>,
}

/// Line-oriented reader for the long ("ooTextFile") TextGrid format.
pub(crate) fn parse_long_format(name: String, contents: &str) -> Result<Document, String> {
    let mut doc_xmin = None;
    let mut doc_xmax = None;
    let mut tiers = Vec::new();
    let mut tier: Option<PendingTier> = None;
    let mut entry: Option<PendingEntry> = None;

    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.starts_with("item [") {
            if line.starts_with("item []") {
                continue;
            }
            if let Some(done) = tier.take() {
                tiers.push(done.finish(tiers.len() + 1)?);
            }
            tier = Some(PendingTier::default());
            entry = None;
            continue;
        }

        let Some(current) = tier.as_mut() else {
            if let Some(value) = parse_assignment_value(line, "xmin") {
                doc_xmin = Some(parse_number(value, "xmin")?);
            } else if let Some(value) = parse_assignment_value(line, "xmax") {
                doc_xmax = Some(parse_number(value, "xmax")?);
            }
            continue;
        };

        if line.starts_with("intervals [") || line.starts_with("points [") {
            entry = Some(PendingEntry::default());
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "class") {
            current.kind = match unquote(value).as_str() {
                "IntervalTier" => Some(TierKind::Interval),
                "TextTier" | "PointTier" => Some(TierKind::Point),
                other => return Err(format!("unknown tier class '{other}'")),
            };
            continue;
        }
        if let Some(value) = parse_assignment_value(line, "name") {
            current.name = unquote(value);
            continue;
        }

        match entry.as_mut() {
            None => {
                if let Some(value) = parse_assignment_value(line, "xmin") {
                    current.xmin = Some(parse_number(value, "xmin")?);
                } else if let Some(value) = parse_assignment_value(line, "xmax") {
                    current.xmax = Some(parse_number(value, "xmax")?);
                }
            }
            Some(pending) => {
                if let Some(value) = parse_assignment_value(line, "xmin") {
                    pending.xmin = Some(parse_number(value, "xmin")?);
                } else if let Some(value) = parse_assignment_value(line, "xmax") {
                    pending.xmax = Some(parse_number(value, "xmax")?);
                } else if let Some(value) = parse_assignment_value(line, "number")
                    .or_else(|| parse_assignment_value(line, "time"))
                {
                    pending.time = Some(parse_number(value, "time")?);
                } else if let Some(value) = parse_assignment_value(line, "text") {
                    let xmin = pending.xmin.ok_or("missing xmin before text")?;
                    let xmax = pending.xmax.ok_or("missing xmax before text")?;
                    current.intervals.push(Interval::new(xmin, xmax, unquote(value)));
                    entry = None;
                } else if let Some(value) = parse_assignment_value(line, "mark") {
                    let time = pending.time.ok_or("missing time before mark")?;
                    current.points.push(Point {
                        time,
                        label: unquote(value),
                    });
                    entry = None;
                }
            }
        }
    }
    if let Some(done) = tier.take() {
        tiers.push(done.finish(tiers.len() + 1)?);
    }
    if tiers.is_empty() {
        return Err("no tiers found".to_string());
    }

    Ok(Document::new(
        name,
        doc_xmin.unwrap_or(0.0),
        doc_xmax.unwrap_or(0.0),
        tiers,
    ))
}

pub(crate) fn to_long_format(document: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File type = \"ooTextFile\"");
    let _ = writeln!(out, "Object class = \"TextGrid\"");
    let _ = writeln!(out);
    let _ = writeln!(out, "xmin = {}", document.xmin);
    let _ = writeln!(out, "xmax = {}", document.xmax);
    let _ = writeln!(out, "tiers? <exists>");
    let _ = writeln!(out, "size = {}", document.tiers.len());
    let _ = writeln!(out, "item []:");
    for (n, tier) in document.tiers.iter().enumerate() {
        let _ = writeln!(out, "    item [{}]:", n + 1);
        let class = match tier.kind {
            TierKind::Interval => "IntervalTier",
            TierKind::Point => "TextTier",
        };
        let _ = writeln!(out, "        class = \"{class}\"");
        let _ = writeln!(out, "        name = \"{}\"", escape(&tier.name));
        let _ = writeln!(out, "        xmin = {}", tier.xmin);
        let _ = writeln!(out, "        xmax = {}", tier.xmax);
        match tier.kind {
            TierKind::Interval => {
                let _ = writeln!(out, "        intervals: size = {}", tier.intervals.len());
                for (k, interval) in tier.intervals.iter().enumerate() {
                    let _ = writeln!(out, "        intervals [{}]:", k + 1);
                    let _ = writeln!(out, "            xmin = {}", interval.start);
                    let _ = writeln!(out, "            xmax = {}", interval.end);
                    let _ = writeln!(out, "            text = \"{}\"", escape(&interval.label));
                }
            }
            TierKind::Point => {
                let _ = writeln!(out, "        points: size = {}", tier.points.len());
                for (k, point) in tier.points.iter().enumerate() {
                    let _ = writeln!(out, "        points [{}]:", k + 1);
                    let _ = writeln!(out, "            number = {}", point.time);
                    let _ = writeln!(out, "            mark = \"{}\"", escape(&point.label));
                }
            }
        }
    }
    out
}

fn parse_assignment_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (lhs, rhs) = line.split_once('=')?;
    if lhs.trim() == key {
        Some(rhs.trim())
    } else {
        None
    }
}

/// Strips the surrounding quotes and undoes Praat's `""` escaping.
fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
        .replace("\"\"", "\"")
}

fn escape(value: &str) -> String {
    value.replace('"', "\"\"")
}

fn parse_number(value: &str, field: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse {field}='{value}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

xmin = 0
xmax = 1.5
tiers? <exists>
size = 2
item []:
    item [1]:
        class = "IntervalTier"
        name = "word"
        xmin = 0
        xmax = 1.5
        intervals: size = 2
        intervals [1]:
            xmin = 0
            xmax = 0.5
            text = ""
        intervals [2]:
            xmin = 0.5
            xmax = 1.5
            text = "say ""pa"""
    item [2]:
        class = "TextTier"
        name = "events"
        xmin = 0
        xmax = 1.5
        points: size = 1
        points [1]:
            number = 0.75
            mark = "click"
"#;

    #[test]
    fn long_format_reader_handles_both_tier_classes() {
        let doc = parse_long_format("sample".to_string(), SAMPLE).expect("parse");
        assert_eq!(doc.xmax, 1.5);
        assert_eq!(doc.tiers.len(), 2);
        let words = &doc.tiers[0];
        assert_eq!(words.kind, TierKind::Interval);
        assert_eq!(words.name, "word");
        assert_eq!(words.intervals[1], Interval::new(0.5, 1.5, "say \"pa\""));
        let events = &doc.tiers[1];
        assert_eq!(events.kind, TierKind::Point);
        assert_eq!(events.points[0].time, 0.75);
        assert_eq!(events.points[0].label, "click");
    }

    #[test]
    fn long_format_writer_reads_back() {
        let doc = parse_long_format("sample".to_string(), SAMPLE).expect("parse");
        let text = to_long_format(&doc);
        let again = parse_long_format("sample".to_string(), &text).expect("reparse");
        assert_eq!(again, doc);
    }

    #[test]
    fn reader_rejects_documents_without_tiers() {
        let err = parse_long_format("x".to_string(), "xmin = 0\nxmax = 1\n")
            .expect_err("no tiers");
        assert!(err.contains("no tiers"));
    }

    #[test]
    fn output_path_never_matches_input() {
        let input = Path::new("/data/s01.TextGrid");
        assert_eq!(
            annotated_output_path(input, None, "_vot").expect("path"),
            PathBuf::from("/data/s01_vot.TextGrid")
        );
        assert_eq!(
            annotated_output_path(input, Some(Path::new("/out")), "").expect("path"),
            PathBuf::from("/out/s01.TextGrid")
        );
        assert!(annotated_output_path(input, None, "").is_err());
    }
}
