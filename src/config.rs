use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::VotError;

/// Extraction parameters. Tier numbers are 1-based, as in Praat.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VotConfig {
    pub word_tier: usize,
    pub segment_tier: usize,
    pub phone_tier: usize,
    pub source_tier: Option<usize>,
    /// Voiced share of a VDCLO+VLCLO closure, in percent, above which the stop
    /// counts as prevoiced.
    pub percent_voicing: f64,
    pub segments: BTreeSet<String>,
    pub vot_tier: bool,
    pub clo_tier: bool,
}

impl VotConfig {
    pub const DEFAULT_PERCENT_VOICING: f64 = 50.0;
    pub const DEFAULT_SEGMENTS: [&'static str; 6] = ["b", "d", "g", "p", "t", "k"];

    pub fn load(path: &Path) -> Result<Self, VotError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| VotError::io("read config file", e))?;
        let config: Self =
            serde_json::from_str(&data).map_err(|e| VotError::json("parse config file", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VotError> {
        if !(0.0..=100.0).contains(&self.percent_voicing) {
            return Err(VotError::invalid_input(format!(
                "percent_voicing must be within [0, 100], got {}",
                self.percent_voicing
            )));
        }
        let mut numbers = vec![
            ("word_tier", self.word_tier),
            ("segment_tier", self.segment_tier),
            ("phone_tier", self.phone_tier),
        ];
        if let Some(source) = self.source_tier {
            numbers.push(("source_tier", source));
        }
        for (name, number) in &numbers {
            if *number == 0 {
                return Err(VotError::invalid_input(format!(
                    "{name} is 1-based and cannot be 0"
                )));
            }
        }
        for (i, (a_name, a)) in numbers.iter().enumerate() {
            if let Some((b_name, _)) = numbers[i + 1..].iter().find(|(_, b)| b == a) {
                return Err(VotError::invalid_input(format!(
                    "{a_name} and {b_name} both point at tier {a}"
                )));
            }
        }
        if self.segments.is_empty() {
            return Err(VotError::invalid_input("segment set is empty"));
        }
        Ok(())
    }

    pub fn is_target_segment(&self, label: &str) -> bool {
        self.segments.contains(label.trim())
    }

    pub fn with_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments = segments
            .into_iter()
            .map(Into::into)
            .map(|s: String| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }
}

impl Default for VotConfig {
    fn default() -> Self {
        Self {
            word_tier: 1,
            segment_tier: 2,
            phone_tier: 3,
            source_tier: None,
            percent_voicing: Self::DEFAULT_PERCENT_VOICING,
            segments: Self::DEFAULT_SEGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vot_tier: false,
            clo_tier: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vot_config_default() {
        let config = VotConfig::default();
        assert_eq!(config.word_tier, 1);
        assert_eq!(config.segment_tier, 2);
        assert_eq!(config.phone_tier, 3);
        assert_eq!(config.source_tier, None);
        assert_eq!(config.percent_voicing, 50.0);
        assert_eq!(config.segments.len(), 6);
        assert!(config.is_target_segment("k"));
        assert!(config.is_target_segment(" b "));
        assert!(!config.is_target_segment("a"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "percent_voicing": 80, "source_tier": 4, "segments": ["p", "t"] }"#;
        let config: VotConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.percent_voicing, 80.0);
        assert_eq!(config.source_tier, Some(4));
        assert_eq!(config.word_tier, 1);
        assert_eq!(config.segments.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = VotConfig {
            percent_voicing: 120.0,
            ..VotConfig::default()
        };
        assert!(config.validate().is_err());

        config.percent_voicing = 50.0;
        config.phone_tier = 1;
        let err = config.validate().expect_err("duplicate tiers");
        assert!(err.to_string().contains("word_tier and phone_tier"));

        config.phone_tier = 0;
        assert!(config.validate().is_err());

        let empty = VotConfig::default().with_segments(Vec::<String>::new());
        assert!(empty.validate().is_err());
    }

    #[test]
    fn with_segments_trims_and_drops_blanks() {
        let config = VotConfig::default().with_segments(["  p", "", "t "]);
        assert_eq!(
            config.segments.iter().cloned().collect::<Vec<_>>(),
            vec!["p".to_string(), "t".to_string()]
        );
    }
}
