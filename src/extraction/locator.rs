use std::ops::RangeInclusive;

use crate::extraction::template::{Component, PhoneLabel};
use crate::timeline::Tier;

/// Phone-tier interval found for one component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedInterval {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl LocatedInterval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedComponents {
    pub voiced_closure: Option<LocatedInterval>,
    pub voiceless_closure: Option<LocatedInterval>,
    pub release: LocatedInterval,
    pub aspiration: Option<LocatedInterval>,
}

/// First interval in the range labeled with `component`.
pub fn locate_component(
    labels: &[PhoneLabel],
    range: &RangeInclusive<usize>,
    phone_tier: &Tier,
    component: Component,
) -> Option<LocatedInterval> {
    let offset = labels
        .iter()
        .position(|label| label.component() == Some(component))?;
    let index = range.start() + offset;
    let interval = phone_tier.get(index)?;
    Some(LocatedInterval {
        index,
        start: interval.start,
        end: interval.end,
    })
}

/// Locates every component; `None` when the mandatory release is missing.
pub fn locate_components(
    labels: &[PhoneLabel],
    range: &RangeInclusive<usize>,
    phone_tier: &Tier,
) -> Option<LocatedComponents> {
    let find = |component| locate_component(labels, range, phone_tier, component);
    Some(LocatedComponents {
        release: find(Component::Release)?,
        voiced_closure: find(Component::VoicedClosure),
        voiceless_closure: find(Component::VoicelessClosure),
        aspiration: find(Component::Aspiration),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Interval;

    fn phones() -> (Tier, Vec<PhoneLabel>) {
        let intervals = vec![
            Interval::new(0.0, 0.1, ""),
            Interval::new(0.1, 0.2, "V"),
            Interval::new(0.2, 0.26, "VDCLO"),
            Interval::new(0.26, 0.28, "VLCLO"),
            Interval::new(0.28, 0.29, "REL"),
            Interval::new(0.29, 0.33, "ASP"),
            Interval::new(0.33, 0.4, "V"),
        ];
        let labels = intervals[1..]
            .iter()
            .map(|i| PhoneLabel::parse(&i.label))
            .collect();
        (Tier::interval_tier("phone", intervals), labels)
    }

    #[test]
    fn offsets_map_to_absolute_indices() {
        let (tier, labels) = phones();
        let located = locate_components(&labels, &(1..=6), &tier).expect("release present");
        assert_eq!(located.release.index, 4);
        assert_eq!(located.release.start, 0.28);
        assert_eq!(located.voiced_closure.map(|c| c.index), Some(2));
        assert_eq!(located.voiceless_closure.map(|c| c.index), Some(3));
        assert_eq!(located.aspiration.map(|c| c.end), Some(0.33));
    }

    #[test]
    fn missing_release_yields_none() {
        let (tier, _) = phones();
        let labels = vec![PhoneLabel::parse("VDCLO"), PhoneLabel::parse("ASP")];
        assert_eq!(locate_components(&labels, &(2..=3), &tier), None);
    }

    #[test]
    fn first_occurrence_wins() {
        let tier = Tier::interval_tier(
            "phone",
            vec![
                Interval::new(0.0, 0.1, "REL"),
                Interval::new(0.1, 0.2, "REL"),
            ],
        );
        let labels = vec![PhoneLabel::parse("REL"), PhoneLabel::parse("REL")];
        let rel = locate_component(&labels, &(0..=1), &tier, Component::Release)
            .expect("found");
        assert_eq!(rel.index, 0);
        assert!((rel.duration() - 0.1).abs() < 1e-12);
    }
}
