use std::ops::RangeInclusive;

use crate::timeline::Tier;

pub mod decision;
pub mod locator;
pub mod template;
pub mod vowels;

pub use decision::resolve_boundaries;
pub use locator::{locate_components, LocatedComponents, LocatedInterval};
pub use template::{label_sequence, matching_templates, Component, PhoneLabel, Template};
pub use vowels::{find_flanking_vowels, resolve_vowel, FlankingVowels};

/// Classified labels of the Phone-tier intervals in `range`, in order.
pub fn phone_labels(phone_tier: &Tier, range: &RangeInclusive<usize>) -> Vec<PhoneLabel> {
    phone_tier.intervals[range.clone()]
        .iter()
        .map(|interval| PhoneLabel::parse(&interval.label))
        .collect()
}

/// First Segment-tier label in `range` accepted by `is_target`.
pub fn target_segment<'a>(
    segment_tier: &'a Tier,
    range: &RangeInclusive<usize>,
    is_target: impl Fn(&str) -> bool,
) -> Option<&'a str> {
    segment_tier.intervals[range.clone()]
        .iter()
        .map(|interval| interval.label.trim())
        .find(|label| !label.is_empty() && is_target(label))
}
