use std::ops::RangeInclusive;

use crate::error::StructuralError;
use crate::extraction::template::PhoneLabel;
use crate::timeline::{Interval, Tier};
use crate::types::VowelContext;

/// Absolute Phone-tier indices of the vowels flanking a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlankingVowels {
    pub pre: Option<usize>,
    pub post: Option<usize>,
}

impl FlankingVowels {
    pub fn count(&self) -> usize {
        usize::from(self.pre.is_some()) + usize::from(self.post.is_some())
    }
}

/// Finds `V` labels in a word's phone range. Only the first and last
/// positions may carry one; anywhere else the annotation is broken.
pub fn find_flanking_vowels(
    labels: &[PhoneLabel],
    range: &RangeInclusive<usize>,
    word: &Interval,
) -> Result<FlankingVowels, StructuralError> {
    let mut found = FlankingVowels::default();
    let last = labels.len().saturating_sub(1);
    for (position, label) in labels.iter().enumerate() {
        if *label != PhoneLabel::Vowel {
            continue;
        }
        let index = range.start() + position;
        if position == 0 {
            found.pre = Some(index);
        } else if position == last {
            found.post = Some(index);
        } else {
            return Err(StructuralError::InteriorVowel {
                word: word.label.clone(),
                start: word.start,
                position: position + 1,
                len: labels.len(),
            });
        }
    }
    Ok(found)
}

/// Maps a Phone-tier vowel onto the Segment tier through its midpoint.
pub fn resolve_vowel(phone_tier: &Tier, segment_tier: &Tier, index: usize) -> Option<VowelContext> {
    let vowel = phone_tier.get(index)?;
    let segment = segment_tier
        .interval_at(vowel.midpoint())
        .and_then(|idx| segment_tier.get(idx))?;
    Some(VowelContext {
        label: segment.label.trim().to_string(),
        duration: segment.duration(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(seq: &[&str]) -> Vec<PhoneLabel> {
        seq.iter().map(|s| PhoneLabel::parse(s)).collect()
    }

    fn word() -> Interval {
        Interval::new(1.0, 2.0, "apa")
    }

    #[test]
    fn both_flanks_detected() {
        let found = find_flanking_vowels(&labels(&["V", "REL", "V"]), &(4..=6), &word())
            .expect("legal vowels");
        assert_eq!(found.pre, Some(4));
        assert_eq!(found.post, Some(6));
        assert_eq!(found.count(), 2);
    }

    #[test]
    fn no_vowels_is_legal() {
        let found = find_flanking_vowels(&labels(&["VLCLO", "REL"]), &(0..=1), &word())
            .expect("legal");
        assert_eq!(found, FlankingVowels::default());
        assert_eq!(found.count(), 0);
    }

    #[test]
    fn single_post_vowel() {
        let found = find_flanking_vowels(&labels(&["REL", "ASP", "V"]), &(2..=4), &word())
            .expect("legal");
        assert_eq!(found.pre, None);
        assert_eq!(found.post, Some(4));
    }

    #[test]
    fn interior_vowel_is_structural_error() {
        let err = find_flanking_vowels(&labels(&["REL", "V", "ASP"]), &(0..=2), &word())
            .expect_err("interior V");
        assert_eq!(
            err,
            StructuralError::InteriorVowel {
                word: "apa".to_string(),
                start: 1.0,
                position: 2,
                len: 3,
            }
        );
    }

    #[test]
    fn vowel_identity_comes_from_segment_tier() {
        let phones = Tier::interval_tier(
            "phone",
            vec![
                Interval::new(0.0, 0.1, "V"),
                Interval::new(0.1, 0.2, "REL"),
            ],
        );
        let segments = Tier::interval_tier(
            "segment",
            vec![
                Interval::new(0.0, 0.12, "a"),
                Interval::new(0.12, 0.2, "p"),
            ],
        );
        let vowel = resolve_vowel(&phones, &segments, 0).expect("vowel found");
        assert_eq!(vowel.label, "a");
        assert!((vowel.duration - 0.12).abs() < 1e-12);
        assert_eq!(resolve_vowel(&phones, &segments, 5), None);
    }
}
