use std::fmt;

/// Stop components that can be annotated on the Phone tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    VoicedClosure,
    VoicelessClosure,
    Release,
    Aspiration,
}

impl Component {
    pub fn label(self) -> &'static str {
        match self {
            Self::VoicedClosure => "VDCLO",
            Self::VoicelessClosure => "VLCLO",
            Self::Release => "REL",
            Self::Aspiration => "ASP",
        }
    }
}

/// A Phone-tier label, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneLabel {
    Vowel,
    Component(Component),
    Empty,
    Other(String),
}

impl PhoneLabel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" => Self::Empty,
            "V" => Self::Vowel,
            "VDCLO" => Self::Component(Component::VoicedClosure),
            "VLCLO" => Self::Component(Component::VoicelessClosure),
            "REL" => Self::Component(Component::Release),
            "ASP" => Self::Component(Component::Aspiration),
            other => Self::Other(other.to_string()),
        }
    }

    pub fn component(&self) -> Option<Component> {
        match self {
            Self::Component(component) => Some(*component),
            _ => None,
        }
    }
}

impl fmt::Display for PhoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vowel => f.write_str("V"),
            Self::Component(component) => f.write_str(component.label()),
            Self::Empty => Ok(()),
            Self::Other(label) => f.write_str(label),
        }
    }
}

/// The eight permitted closure/release layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    VoicedVoicelessReleaseAspiration,
    VoicedVoicelessRelease,
    VoicedReleaseAspiration,
    VoicedRelease,
    VoicelessReleaseAspiration,
    VoicelessRelease,
    ReleaseAspiration,
    Release,
}

impl Template {
    pub const ALL: [Template; 8] = [
        Template::VoicedVoicelessReleaseAspiration,
        Template::VoicedVoicelessRelease,
        Template::VoicedReleaseAspiration,
        Template::VoicedRelease,
        Template::VoicelessReleaseAspiration,
        Template::VoicelessRelease,
        Template::ReleaseAspiration,
        Template::Release,
    ];

    pub fn components(self) -> &'static [Component] {
        use Component::*;
        match self {
            Self::VoicedVoicelessReleaseAspiration => {
                &[VoicedClosure, VoicelessClosure, Release, Aspiration]
            }
            Self::VoicedVoicelessRelease => &[VoicedClosure, VoicelessClosure, Release],
            Self::VoicedReleaseAspiration => &[VoicedClosure, Release, Aspiration],
            Self::VoicedRelease => &[VoicedClosure, Release],
            Self::VoicelessReleaseAspiration => &[VoicelessClosure, Release, Aspiration],
            Self::VoicelessRelease => &[VoicelessClosure, Release],
            Self::ReleaseAspiration => &[Release, Aspiration],
            Self::Release => &[Release],
        }
    }

    /// Comma-joined form, e.g. `VDCLO,REL,ASP`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VoicedVoicelessReleaseAspiration => "VDCLO,VLCLO,REL,ASP",
            Self::VoicedVoicelessRelease => "VDCLO,VLCLO,REL",
            Self::VoicedReleaseAspiration => "VDCLO,REL,ASP",
            Self::VoicedRelease => "VDCLO,REL",
            Self::VoicelessReleaseAspiration => "VLCLO,REL,ASP",
            Self::VoicelessRelease => "VLCLO,REL",
            Self::ReleaseAspiration => "REL,ASP",
            Self::Release => "REL",
        }
    }

    /// True when the template appears as a contiguous run of whole labels.
    pub fn occurs_in(self, labels: &[PhoneLabel]) -> bool {
        let wanted = self.components();
        labels.windows(wanted.len()).any(|window| {
            window
                .iter()
                .zip(wanted)
                .all(|(label, component)| label.component() == Some(*component))
        })
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn matching_templates(labels: &[PhoneLabel]) -> Vec<Template> {
    Template::ALL
        .into_iter()
        .filter(|template| template.occurs_in(labels))
        .collect()
}

/// Renders labels the way annotators read them: `,VDCLO,REL,ASP`.
pub fn label_sequence(labels: &[PhoneLabel]) -> String {
    labels.iter().map(|label| format!(",{label}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(seq: &str) -> Vec<PhoneLabel> {
        seq.split(',').skip(1).map(PhoneLabel::parse).collect()
    }

    #[test]
    fn parse_classifies_vocabulary() {
        assert_eq!(PhoneLabel::parse(" V "), PhoneLabel::Vowel);
        assert_eq!(
            PhoneLabel::parse("REL"),
            PhoneLabel::Component(Component::Release)
        );
        assert_eq!(PhoneLabel::parse(""), PhoneLabel::Empty);
        assert_eq!(PhoneLabel::parse("rel"), PhoneLabel::Other("rel".to_string()));
    }

    #[test]
    fn full_sequence_matches_every_contained_template() {
        let matched = matching_templates(&labels(",VDCLO,VLCLO,REL,ASP"));
        assert_eq!(
            matched,
            vec![
                Template::VoicedVoicelessReleaseAspiration,
                Template::VoicedVoicelessRelease,
                Template::VoicelessReleaseAspiration,
                Template::VoicelessRelease,
                Template::ReleaseAspiration,
                Template::Release,
            ]
        );
        assert!(!matched.contains(&Template::VoicedReleaseAspiration));
    }

    #[test]
    fn flanking_vowels_leave_only_release() {
        assert_eq!(matching_templates(&labels(",V,REL,V")), vec![Template::Release]);
    }

    #[test]
    fn gap_breaks_contiguity() {
        let matched = matching_templates(&labels(",VDCLO,,REL"));
        assert_eq!(matched, vec![Template::Release]);
    }

    #[test]
    fn lookalike_labels_do_not_match() {
        assert!(matching_templates(&labels(",PREL,ASPX")).is_empty());
        assert!(matching_templates(&labels(",V,VDCLO,V")).is_empty());
        assert!(matching_templates(&[]).is_empty());
    }

    #[test]
    fn label_sequence_uses_leading_commas() {
        assert_eq!(label_sequence(&labels(",V,REL,,ASP")), ",V,REL,,ASP");
        assert_eq!(Template::VoicedRelease.to_string(), "VDCLO,REL");
    }
}
