use thiserror::Error;

use crate::timeline::TierRole;

#[derive(Debug, Error)]
pub enum VotError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("TextGrid error in '{path}': {message}")]
    TextGrid { path: String, message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("structural error in '{document}': {source}")]
    Structural {
        document: String,
        #[source]
        source: StructuralError,
    },
}

impl VotError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn textgrid(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::TextGrid {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn structural(document: impl Into<String>, source: StructuralError) -> Self {
        Self::Structural {
            document: document.into(),
            source,
        }
    }

    /// Structural errors abort the whole batch; everything else is plumbing.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }
}

/// Annotation defects that make every result of the run untrustworthy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("{role} tier {number} does not exist (document has {available} tiers)")]
    MissingTier {
        role: TierRole,
        number: usize,
        available: usize,
    },
    #[error("{role} tier {number} ('{name}') is a point tier, an interval tier is required")]
    PointTier {
        role: TierRole,
        number: usize,
        name: String,
    },
    #[error(
        "word '{word}' [{start:.4}, {end:.4}] lies outside the {role} tier [{tier_start:.4}, {tier_end:.4}]"
    )]
    WordOutsideTier {
        word: String,
        start: f64,
        end: f64,
        role: TierRole,
        tier_start: f64,
        tier_end: f64,
    },
    #[error(
        "word '{word}' at {start:.4}: V label at interior phone position {position} of {len}"
    )]
    InteriorVowel {
        word: String,
        start: f64,
        position: usize,
        len: usize,
    },
}

/// Reasons a word is silently left out of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoTemplateMatch,
    NoTargetSegment,
    ReleaseNotLocated,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoTemplateMatch => "no-template-match",
            Self::NoTargetSegment => "no-target-segment",
            Self::ReleaseNotLocated => "release-not-located",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_errors_are_flagged() {
        let err = VotError::structural(
            "f1",
            StructuralError::InteriorVowel {
                word: "apa".to_string(),
                start: 0.5,
                position: 2,
                len: 3,
            },
        );
        assert!(err.is_structural());
        let message = err.to_string();
        assert!(message.contains("f1"));
        assert!(!VotError::invalid_input("bad").is_structural());
    }

    #[test]
    fn point_tier_message_names_role() {
        let err = StructuralError::PointTier {
            role: TierRole::Phone,
            number: 3,
            name: "events".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Phone tier 3 ('events') is a point tier, an interval tier is required"
        );
    }
}
