use crate::extraction::{matching_templates, resolve_boundaries, LocatedComponents, PhoneLabel, Template};
use crate::pipeline::traits::{BoundaryResolver, TemplateMatcher};
use crate::types::VotMeasurement;

/// Matches against the eight fixed closure/release templates.
pub struct FixedTemplateMatcher;

impl TemplateMatcher for FixedTemplateMatcher {
    fn matching_templates(&self, labels: &[PhoneLabel]) -> Vec<Template> {
        matching_templates(labels)
    }
}

/// Voicing-threshold decision tree.
pub struct ThresholdBoundaryResolver;

impl BoundaryResolver for ThresholdBoundaryResolver {
    fn resolve(&self, components: &LocatedComponents, percent_voicing: f64) -> VotMeasurement {
        resolve_boundaries(components, percent_voicing)
    }
}
