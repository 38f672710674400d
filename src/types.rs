/// Pair of boundary times in seconds. `beg` may lie after `end`: a prevoiced
/// VOT runs backwards from the release to the onset of voicing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpan {
    pub beg: f64,
    pub end: f64,
}

impl TimeSpan {
    pub fn new(beg: f64, end: f64) -> Self {
        Self { beg, end }
    }

    /// Signed duration in milliseconds, `end - beg`.
    pub fn duration_ms(&self) -> f64 {
        (self.end - self.beg) * 1000.0
    }

    pub fn ordered(&self) -> (f64, f64) {
        if self.beg <= self.end {
            (self.beg, self.end)
        } else {
            (self.end, self.beg)
        }
    }
}

/// Segment-tier identity of a vowel flanking the stop.
#[derive(Debug, Clone, PartialEq)]
pub struct VowelContext {
    pub label: String,
    /// Seconds.
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotPolarity {
    /// Voicing lags the release.
    Lag,
    /// Voicing leads the release (prevoicing).
    Lead,
}

impl VotPolarity {
    pub fn from_duration_ms(vot_ms: f64) -> Self {
        if vot_ms < 0.0 {
            Self::Lead
        } else {
            Self::Lag
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lag => "VOT",
            Self::Lead => "mVOT",
        }
    }
}

/// Which arm of the VOT decision tree produced a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionBranch {
    /// VDCLO and VLCLO present, voiced share above threshold.
    MixedClosurePrevoiced,
    /// VDCLO and VLCLO present, voiced share at or below threshold.
    MixedClosureReleased,
    /// VDCLO present without VLCLO.
    VoicedClosure,
    /// No VDCLO.
    Unvoiced,
}

impl DecisionBranch {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MixedClosurePrevoiced => "mixed-closure-prevoiced",
            Self::MixedClosureReleased => "mixed-closure-released",
            Self::VoicedClosure => "voiced-closure",
            Self::Unvoiced => "unvoiced",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VotMeasurement {
    pub vot: TimeSpan,
    /// `None` when no closure was annotated or its duration is not positive.
    pub closure: Option<TimeSpan>,
    pub branch: DecisionBranch,
}

impl VotMeasurement {
    pub fn vot_ms(&self) -> f64 {
        self.vot.duration_ms()
    }

    pub fn clo_ms(&self) -> Option<f64> {
        self.closure.map(|span| span.duration_ms())
    }

    /// VOT at table resolution; sign and printed value both come from here.
    pub fn reported_vot_ms(&self) -> f64 {
        round_ms(self.vot_ms())
    }

    /// Closure at table resolution. Closures that round to zero are unset.
    pub fn reported_clo_ms(&self) -> Option<f64> {
        self.clo_ms().map(round_ms).filter(|clo| *clo > 0.0)
    }

    pub fn polarity(&self) -> VotPolarity {
        VotPolarity::from_duration_ms(self.reported_vot_ms())
    }
}

/// Rounds milliseconds to the 0.1 ms resolution of the result table.
pub fn round_ms(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One result-table row: a word whose stop was measured.
#[derive(Debug, Clone, PartialEq)]
pub struct VotRow {
    pub filename: String,
    pub source: Option<String>,
    pub word: String,
    pub v_pre: Option<VowelContext>,
    pub segment: String,
    pub v_post: Option<VowelContext>,
    pub measurement: VotMeasurement,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(vot: TimeSpan, closure: Option<TimeSpan>) -> VotMeasurement {
        VotMeasurement {
            vot,
            closure,
            branch: DecisionBranch::Unvoiced,
        }
    }

    #[test]
    fn sub_resolution_values_report_as_zero_lag_and_unset_closure() {
        // -0.03 ms VOT and 0.03 ms closure
        let m = measurement(
            TimeSpan::new(0.50003, 0.5),
            Some(TimeSpan::new(0.5, 0.50003)),
        );
        assert!(m.vot_ms() < 0.0);
        assert_eq!(m.reported_vot_ms(), 0.0);
        assert_eq!(m.polarity(), VotPolarity::Lag);
        assert!(m.clo_ms().expect("raw closure") > 0.0);
        assert_eq!(m.reported_clo_ms(), None);
    }

    #[test]
    fn reported_values_keep_sign_at_resolution() {
        let m = measurement(TimeSpan::new(0.5001, 0.5), Some(TimeSpan::new(0.5, 0.5001)));
        assert_eq!(m.reported_vot_ms(), -0.1);
        assert_eq!(m.polarity(), VotPolarity::Lead);
        assert_eq!(m.reported_clo_ms(), Some(0.1));
    }

    #[test]
    fn polarity_follows_sign_only() {
        assert_eq!(VotPolarity::from_duration_ms(-0.1), VotPolarity::Lead);
        assert_eq!(VotPolarity::from_duration_ms(0.0), VotPolarity::Lag);
        assert_eq!(VotPolarity::from_duration_ms(12.0).label(), "VOT");
        assert_eq!(VotPolarity::Lead.label(), "mVOT");
    }

    #[test]
    fn reversed_span_is_negative_and_orders() {
        let span = TimeSpan::new(0.25, 0.2);
        assert!((span.duration_ms() + 50.0).abs() < 1e-9);
        assert_eq!(span.ordered(), (0.2, 0.25));
    }
}
