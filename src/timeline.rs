use std::fmt;
use std::ops::RangeInclusive;

use crate::error::StructuralError;

/// Labeled time span. Interval is [start, end), start inclusive/end exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

impl Interval {
    pub fn new(start: f64, end: f64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub time: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Interval,
    Point,
}

/// What a tier is used for during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierRole {
    Word,
    Segment,
    Phone,
    Source,
}

impl fmt::Display for TierRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Word => "Word",
            Self::Segment => "Segment",
            Self::Phone => "Phone",
            Self::Source => "Source",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub name: String,
    pub kind: TierKind,
    pub xmin: f64,
    pub xmax: f64,
    pub intervals: Vec<Interval>,
    pub points: Vec<Point>,
}

impl Tier {
    pub fn interval_tier(name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        let xmin = intervals.first().map(|i| i.start).unwrap_or(0.0);
        let xmax = intervals.last().map(|i| i.end).unwrap_or(0.0);
        Self {
            name: name.into(),
            kind: TierKind::Interval,
            xmin,
            xmax,
            intervals,
            points: Vec::new(),
        }
    }

    /// A fresh interval tier holding a single unlabeled interval over [xmin, xmax].
    pub fn empty_interval_tier(name: impl Into<String>, xmin: f64, xmax: f64) -> Self {
        Self {
            name: name.into(),
            kind: TierKind::Interval,
            xmin,
            xmax,
            intervals: vec![Interval::new(xmin, xmax, "")],
            points: Vec::new(),
        }
    }

    pub fn point_tier(name: impl Into<String>, xmin: f64, xmax: f64, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            kind: TierKind::Point,
            xmin,
            xmax,
            intervals: Vec::new(),
            points,
        }
    }

    pub fn is_interval_tier(&self) -> bool {
        self.kind == TierKind::Interval
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn start_time(&self) -> f64 {
        self.intervals.first().map(|i| i.start).unwrap_or(self.xmin)
    }

    pub fn end_time(&self) -> f64 {
        self.intervals.last().map(|i| i.end).unwrap_or(self.xmax)
    }

    /// Index of the interval containing `t`. The tier's final end time belongs
    /// to the last interval.
    pub fn interval_at(&self, t: f64) -> Option<usize> {
        let last = self.intervals.len().checked_sub(1)?;
        if t < self.intervals[0].start || t > self.intervals[last].end {
            return None;
        }
        if t == self.intervals[last].end {
            return Some(last);
        }
        // Intervals are sorted and contiguous: the first one ending after t holds it.
        let idx = self.intervals.partition_point(|i| i.end <= t);
        (idx <= last).then_some(idx)
    }

    /// Index of the interval whose end is the greatest value not exceeding `t`.
    /// Resolves a time lying exactly on a boundary to the left-hand interval.
    /// Not used by the extractor, which snaps ranges inward instead; kept for
    /// callers that need left-side boundary ownership.
    pub fn interval_at_or_before(&self, t: f64) -> Option<usize> {
        self.intervals.partition_point(|i| i.end <= t).checked_sub(1)
    }

    /// Inclusive index range of the intervals lying inside [span_start, span_end].
    ///
    /// Intervals straddling either edge of the span are excluded: the first
    /// index is advanced when its start differs from `span_start`, the last is
    /// retracted when its end differs from `span_end`.
    pub fn range_within(&self, span_start: f64, span_end: f64) -> Option<RangeInclusive<usize>> {
        let mut first = self.interval_at(span_start)?;
        let mut last = self.interval_at(span_end)?;
        if self.intervals[first].start != span_start {
            first += 1;
        }
        if self.intervals[last].end != span_end {
            last = last.checked_sub(1)?;
        }
        (first <= last).then_some(first..=last)
    }

    /// Splits the interval containing `t` in two. Existing boundaries and times
    /// outside the tier are left alone; returns whether a boundary was added.
    pub fn insert_boundary(&mut self, t: f64) -> bool {
        let Some(idx) = self.interval_at(t) else {
            return false;
        };
        let target = &self.intervals[idx];
        if t <= target.start || t >= target.end {
            return false;
        }
        let right = Interval::new(t, target.end, target.label.clone());
        self.intervals[idx].end = t;
        self.intervals.insert(idx + 1, right);
        true
    }

    pub fn set_label_at(&mut self, t: f64, label: impl Into<String>) -> Option<usize> {
        let idx = self.interval_at(t)?;
        self.intervals[idx].label = label.into();
        Some(idx)
    }
}

/// One annotation document: every tier of a TextGrid over a shared time base.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
    pub tiers: Vec<Tier>,
}

impl Document {
    pub fn new(name: impl Into<String>, xmin: f64, xmax: f64, tiers: Vec<Tier>) -> Self {
        Self {
            name: name.into(),
            xmin,
            xmax,
            tiers,
        }
    }

    /// Looks up a tier by its 1-based number and requires it to be an interval tier.
    pub fn interval_tier(&self, number: usize, role: TierRole) -> Result<&Tier, StructuralError> {
        let tier = number
            .checked_sub(1)
            .and_then(|idx| self.tiers.get(idx))
            .ok_or(StructuralError::MissingTier {
                role,
                number,
                available: self.tiers.len(),
            })?;
        if !tier.is_interval_tier() {
            return Err(StructuralError::PointTier {
                role,
                number,
                name: tier.name.clone(),
            });
        }
        Ok(tier)
    }

    pub fn tier_by_name(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.name == name)
    }
}

impl AsRef<Document> for Document {
    fn as_ref(&self) -> &Document {
        self
    }
}
