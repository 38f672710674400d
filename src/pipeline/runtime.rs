use crate::config::VotConfig;
use crate::error::{SkipReason, StructuralError, VotError};
use crate::extraction::{
    find_flanking_vowels, label_sequence, locate_components, phone_labels, resolve_vowel,
    target_segment, PhoneLabel,
};
use crate::pipeline::traits::{BoundaryResolver, TemplateMatcher};
use crate::report::annotation_tiers;
use crate::timeline::{Document, Interval, Tier, TierRole};
use crate::types::VotRow;

pub struct VotExtractor {
    config: VotConfig,
    template_matcher: Box<dyn TemplateMatcher>,
    boundary_resolver: Box<dyn BoundaryResolver>,
}

pub(crate) struct VotExtractorParts {
    pub config: VotConfig,
    pub template_matcher: Box<dyn TemplateMatcher>,
    pub boundary_resolver: Box<dyn BoundaryResolver>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedWord {
    pub word: String,
    pub start: f64,
    pub reason: SkipReason,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutcome {
    pub document: String,
    pub rows: Vec<VotRow>,
    pub skipped: Vec<SkippedWord>,
    /// Freshly built `VOT`/`CLO` tiers, empty unless requested.
    pub annotation_tiers: Vec<Tier>,
}

/// Tiers of one document, resolved and checked against the configuration.
struct RoleTiers<'a> {
    word: &'a Tier,
    segment: &'a Tier,
    phone: &'a Tier,
    source: Option<&'a Tier>,
}

enum WordOutcome {
    Measured(Box<VotRow>),
    Skipped(SkipReason),
}

impl VotExtractor {
    pub(crate) fn from_parts(parts: VotExtractorParts) -> Self {
        Self {
            config: parts.config,
            template_matcher: parts.template_matcher,
            boundary_resolver: parts.boundary_resolver,
        }
    }

    pub fn config(&self) -> &VotConfig {
        &self.config
    }

    /// Measures every labeled word of `document`.
    ///
    /// Structural annotation errors are returned as `VotError::Structural`;
    /// words that merely do not qualify are reported in `skipped`.
    pub fn process(&self, document: &Document) -> Result<DocumentOutcome, VotError> {
        let tiers = self
            .role_tiers(document)
            .map_err(|err| VotError::structural(&document.name, err))?;

        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        for word in &tiers.word.intervals {
            if word.label.trim().is_empty() {
                continue;
            }
            let outcome = self
                .analyze_word(document, &tiers, word)
                .map_err(|err| VotError::structural(&document.name, err))?;
            match outcome {
                WordOutcome::Measured(row) => rows.push(*row),
                WordOutcome::Skipped(reason) => {
                    tracing::debug!(
                        document = document.name.as_str(),
                        word = word.label.as_str(),
                        start = word.start,
                        reason = reason.as_str(),
                        "vot: word skipped"
                    );
                    skipped.push(SkippedWord {
                        word: word.label.trim().to_string(),
                        start: word.start,
                        reason,
                    });
                }
            }
        }

        let annotation_tiers = annotation_tiers(
            document,
            &rows,
            self.config.vot_tier,
            self.config.clo_tier,
        );
        tracing::info!(
            document = document.name.as_str(),
            rows = rows.len(),
            skipped = skipped.len(),
            "vot: document processed"
        );
        Ok(DocumentOutcome {
            document: document.name.clone(),
            rows,
            skipped,
            annotation_tiers,
        })
    }

    fn role_tiers<'a>(&self, document: &'a Document) -> Result<RoleTiers<'a>, StructuralError> {
        Ok(RoleTiers {
            word: document.interval_tier(self.config.word_tier, TierRole::Word)?,
            segment: document.interval_tier(self.config.segment_tier, TierRole::Segment)?,
            phone: document.interval_tier(self.config.phone_tier, TierRole::Phone)?,
            source: self
                .config
                .source_tier
                .map(|number| document.interval_tier(number, TierRole::Source))
                .transpose()?,
        })
    }

    fn analyze_word(
        &self,
        document: &Document,
        tiers: &RoleTiers<'_>,
        word: &Interval,
    ) -> Result<WordOutcome, StructuralError> {
        ensure_within(word, tiers.segment, TierRole::Segment)?;
        ensure_within(word, tiers.phone, TierRole::Phone)?;

        let Some(phone_range) = tiers.phone.range_within(word.start, word.end) else {
            return Ok(WordOutcome::Skipped(SkipReason::NoTemplateMatch));
        };
        let labels = phone_labels(tiers.phone, &phone_range);
        let templates = self.template_matcher.matching_templates(&labels);
        if templates.is_empty() {
            return Ok(WordOutcome::Skipped(SkipReason::NoTemplateMatch));
        }

        let vowels = find_flanking_vowels(&labels, &phone_range, word)?;
        for edge in straddling_vowel_edges(tiers.phone, word) {
            tracing::warn!(
                document = document.name.as_str(),
                word = word.label.as_str(),
                start = word.start,
                edge,
                "vot: V interval crosses the word boundary and is not used as a flanking vowel"
            );
        }

        let Some(segment) = tiers
            .segment
            .range_within(word.start, word.end)
            .and_then(|range| {
                target_segment(tiers.segment, &range, |label| {
                    self.config.is_target_segment(label)
                })
            })
        else {
            return Ok(WordOutcome::Skipped(SkipReason::NoTargetSegment));
        };

        let Some(components) = locate_components(&labels, &phone_range, tiers.phone) else {
            return Ok(WordOutcome::Skipped(SkipReason::ReleaseNotLocated));
        };
        let measurement = self
            .boundary_resolver
            .resolve(&components, self.config.percent_voicing);

        tracing::debug!(
            document = document.name.as_str(),
            word = word.label.as_str(),
            phones = label_sequence(&labels),
            templates = templates.len(),
            vowels = vowels.count(),
            branch = measurement.branch.as_str(),
            vot_ms = format!("{:.1}", measurement.vot_ms()),
            "vot: word measured"
        );

        let vowel = |index: Option<usize>| {
            index.and_then(|idx| resolve_vowel(tiers.phone, tiers.segment, idx))
        };
        let source = tiers.source.and_then(|tier| {
            tier.interval_at(word.midpoint())
                .and_then(|idx| tier.get(idx))
                .map(|interval| interval.label.trim().to_string())
                .filter(|label| !label.is_empty())
        });

        Ok(WordOutcome::Measured(Box::new(VotRow {
            filename: document.name.clone(),
            source,
            word: word.label.trim().to_string(),
            v_pre: vowel(vowels.pre),
            segment: segment.to_string(),
            v_post: vowel(vowels.post),
            measurement,
        })))
    }
}

fn ensure_within(word: &Interval, tier: &Tier, role: TierRole) -> Result<(), StructuralError> {
    let (tier_start, tier_end) = (tier.start_time(), tier.end_time());
    if tier.is_empty() || word.start < tier_start || word.end > tier_end {
        return Err(StructuralError::WordOutsideTier {
            word: word.label.trim().to_string(),
            start: word.start,
            end: word.end,
            role,
            tier_start,
            tier_end,
        });
    }
    Ok(())
}

/// Word edges ("start", "end") that fall strictly inside a `V` phone
/// interval. Such vowels are cut off by range snapping.
fn straddling_vowel_edges(phone: &Tier, word: &Interval) -> Vec<&'static str> {
    [("start", word.start), ("end", word.end)]
        .into_iter()
        .filter(|&(_, time)| {
            phone
                .interval_at(time)
                .and_then(|idx| phone.get(idx))
                .is_some_and(|interval| {
                    interval.start < time
                        && interval.end > time
                        && PhoneLabel::parse(&interval.label) == PhoneLabel::Vowel
                })
        })
        .map(|(edge, _)| edge)
        .collect()
}
