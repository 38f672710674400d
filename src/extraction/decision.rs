use crate::extraction::locator::LocatedComponents;
use crate::types::{DecisionBranch, TimeSpan, VotMeasurement};

/// Resolves VOT and closure boundaries from located components.
///
/// Precedence, first match wins:
/// 1. VDCLO and VLCLO: prevoiced (`REL.start -> VDCLO.start`) when the voiced
///    share of the closure exceeds `percent_voicing`, otherwise measured from
///    the release to the end of aspiration (or of the release itself).
/// 2. VDCLO alone: `REL.start -> VDCLO.start`.
/// 3. No VDCLO: `REL.start -> ASP.end`, or `REL.start -> REL.end`.
///
/// The closure runs from the earliest closure component to the release and is
/// dropped when its duration is not strictly positive.
pub fn resolve_boundaries(components: &LocatedComponents, percent_voicing: f64) -> VotMeasurement {
    let rel = components.release;
    let released = || match components.aspiration {
        Some(asp) => TimeSpan::new(rel.start, asp.end),
        None => TimeSpan::new(rel.start, rel.end),
    };

    let (vot, branch) = match (components.voiced_closure, components.voiceless_closure) {
        (Some(vd), Some(vl)) => {
            let voiced = vd.duration();
            let total = voiced + vl.duration();
            if voiced > total * percent_voicing / 100.0 {
                (
                    TimeSpan::new(rel.start, vd.start),
                    DecisionBranch::MixedClosurePrevoiced,
                )
            } else {
                (released(), DecisionBranch::MixedClosureReleased)
            }
        }
        (Some(vd), None) => (
            TimeSpan::new(rel.start, vd.start),
            DecisionBranch::VoicedClosure,
        ),
        (None, _) => (released(), DecisionBranch::Unvoiced),
    };

    let closure = components
        .voiced_closure
        .or(components.voiceless_closure)
        .map(|clo| TimeSpan::new(clo.start, rel.start))
        .filter(|span| span.end - span.beg > 0.0);

    VotMeasurement {
        vot,
        closure,
        branch,
    }
}
