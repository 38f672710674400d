use crate::config::VotConfig;
use crate::error::VotError;
use crate::pipeline::defaults::{FixedTemplateMatcher, ThresholdBoundaryResolver};
use crate::pipeline::runtime::{VotExtractor, VotExtractorParts};
use crate::pipeline::traits::{BoundaryResolver, TemplateMatcher};

pub struct VotExtractorBuilder {
    config: VotConfig,
    template_matcher: Option<Box<dyn TemplateMatcher>>,
    boundary_resolver: Option<Box<dyn BoundaryResolver>>,
}

impl VotExtractorBuilder {
    pub fn new(config: VotConfig) -> Self {
        Self {
            config,
            template_matcher: None,
            boundary_resolver: None,
        }
    }

    pub fn with_template_matcher(mut self, template_matcher: Box<dyn TemplateMatcher>) -> Self {
        self.template_matcher = Some(template_matcher);
        self
    }

    pub fn with_boundary_resolver(mut self, boundary_resolver: Box<dyn BoundaryResolver>) -> Self {
        self.boundary_resolver = Some(boundary_resolver);
        self
    }

    pub fn build(self) -> Result<VotExtractor, VotError> {
        self.config.validate()?;
        Ok(VotExtractor::from_parts(VotExtractorParts {
            config: self.config,
            template_matcher: self
                .template_matcher
                .unwrap_or_else(|| Box::new(FixedTemplateMatcher)),
            boundary_resolver: self
                .boundary_resolver
                .unwrap_or_else(|| Box::new(ThresholdBoundaryResolver)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{LocatedComponents, PhoneLabel, Template};
    use crate::types::{DecisionBranch, TimeSpan, VotMeasurement};

    struct AnythingMatches;

    impl TemplateMatcher for AnythingMatches {
        fn matching_templates(&self, _labels: &[PhoneLabel]) -> Vec<Template> {
            vec![Template::Release]
        }
    }

    struct ReleaseOnly;

    impl BoundaryResolver for ReleaseOnly {
        fn resolve(&self, components: &LocatedComponents, _percent_voicing: f64) -> VotMeasurement {
            VotMeasurement {
                vot: TimeSpan::new(components.release.start, components.release.end),
                closure: None,
                branch: DecisionBranch::Unvoiced,
            }
        }
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = VotConfig {
            percent_voicing: -1.0,
            ..VotConfig::default()
        };
        assert!(VotExtractorBuilder::new(config).build().is_err());
    }

    #[test]
    fn build_accepts_custom_stages() {
        let extractor = VotExtractorBuilder::new(VotConfig::default())
            .with_template_matcher(Box::new(AnythingMatches))
            .with_boundary_resolver(Box::new(ReleaseOnly))
            .build()
            .expect("valid config");
        assert_eq!(extractor.config().percent_voicing, 50.0);
    }
}
