use crate::extraction::{LocatedComponents, PhoneLabel, Template};
use crate::types::VotMeasurement;

pub trait TemplateMatcher: Send + Sync {
    /// Every permitted template found in the word's phone labels.
    fn matching_templates(&self, labels: &[PhoneLabel]) -> Vec<Template>;
}

pub trait BoundaryResolver: Send + Sync {
    fn resolve(&self, components: &LocatedComponents, percent_voicing: f64) -> VotMeasurement;
}
