//! Structured verdicts produced by the judgment stage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Longest rationale kept on a judgment, in characters.
pub const MAX_RATIONALE_CHARS: usize = 500;
/// Most key risks kept on a judgment.
pub const MAX_KEY_RISKS: usize = 10;

/// Recommended position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Yes,
    No,
    Abstain,
}

impl Decision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Abstain => "ABSTAIN",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" | "BUY_YES" | "BUY YES" => Ok(Self::Yes),
            "NO" | "BUY_NO" | "BUY NO" => Ok(Self::No),
            "ABSTAIN" | "PASS" | "HOLD" | "NONE" => Ok(Self::Abstain),
            other => Err(format!("unknown decision '{other}'")),
        }
    }
}

/// Confidence tier attached to a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Bucket a numeric confidence in `[0, 1]`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Self::High
        } else if score > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Weight used when scoring opportunities.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Low => 0.3,
            Self::Medium => 0.6,
            Self::High => 0.9,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" | "moderate" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown confidence '{other}'")),
        }
    }
}

/// Verdict for one market.
///
/// Deserialization goes through [`Judgment::try_new`], so a stored verdict
/// with an out-of-range probability is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawJudgment")]
pub struct Judgment {
    pub decision: Decision,
    estimated_probability: f64,
    pub confidence: Confidence,
    pub rationale: String,
    #[serde(default)]
    pub key_risks: Vec<String>,
}

#[derive(Deserialize)]
struct RawJudgment {
    decision: Decision,
    estimated_probability: f64,
    confidence: Confidence,
    rationale: String,
    #[serde(default)]
    key_risks: Vec<String>,
}

impl TryFrom<RawJudgment> for Judgment {
    type Error = DomainError;

    fn try_from(raw: RawJudgment) -> Result<Self, Self::Error> {
        Ok(Self::try_new(
            raw.decision,
            raw.estimated_probability,
            raw.confidence,
            raw.rationale,
        )?
        .with_key_risks(raw.key_risks))
    }
}

impl Judgment {
    /// Build a judgment, rejecting probabilities outside `[0, 1]`.
    ///
    /// The rationale is truncated to [`MAX_RATIONALE_CHARS`].
    pub fn try_new(
        decision: Decision,
        estimated_probability: f64,
        confidence: Confidence,
        rationale: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&estimated_probability) {
            return Err(DomainError::ProbabilityOutOfRange {
                value: estimated_probability,
            });
        }
        let rationale: String = rationale.into();
        Ok(Self {
            decision,
            estimated_probability,
            confidence,
            rationale: rationale.chars().take(MAX_RATIONALE_CHARS).collect(),
            key_risks: Vec::new(),
        })
    }

    /// An abstaining, low-confidence verdict used when no usable answer came back.
    #[must_use]
    pub fn abstain(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self {
            decision: Decision::Abstain,
            estimated_probability: 0.5,
            confidence: Confidence::Low,
            rationale: reason.chars().take(MAX_RATIONALE_CHARS).collect(),
            key_risks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_key_risks(mut self, risks: Vec<String>) -> Self {
        self.key_risks = risks.into_iter().take(MAX_KEY_RISKS).collect();
        self
    }

    /// Force an abstention when confidence is under `floor`.
    #[must_use]
    pub fn with_confidence_floor(mut self, floor: Confidence) -> Self {
        if self.confidence < floor {
            self.decision = Decision::Abstain;
        }
        self
    }

    #[must_use]
    pub const fn estimated_probability(&self) -> f64 {
        self.estimated_probability
    }

    #[must_use]
    pub fn is_abstain(&self) -> bool {
        self.decision == Decision::Abstain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_out_of_range_probability() {
        assert!(Judgment::try_new(Decision::Yes, -0.01, Confidence::High, "").is_err());
        assert!(Judgment::try_new(Decision::Yes, 1.01, Confidence::High, "").is_err());
        assert!(Judgment::try_new(Decision::Yes, 1.0, Confidence::High, "").is_ok());
    }

    #[test]
    fn rationale_is_truncated() {
        let long = "x".repeat(MAX_RATIONALE_CHARS + 50);
        let judgment = Judgment::try_new(Decision::No, 0.2, Confidence::Medium, long).unwrap();
        assert_eq!(judgment.rationale.chars().count(), MAX_RATIONALE_CHARS);
    }

    #[test]
    fn confidence_floor_forces_abstain() {
        let judgment = Judgment::try_new(Decision::Yes, 0.7, Confidence::Low, "thin")
            .unwrap()
            .with_confidence_floor(Confidence::Medium);
        assert_eq!(judgment.decision, Decision::Abstain);
    }

    #[test]
    fn confidence_floor_keeps_confident_decision() {
        let judgment = Judgment::try_new(Decision::Yes, 0.7, Confidence::High, "solid")
            .unwrap()
            .with_confidence_floor(Confidence::Medium);
        assert_eq!(judgment.decision, Decision::Yes);
    }

    #[test]
    fn abstain_is_low_confidence() {
        let judgment = Judgment::abstain("unparseable");
        assert!(judgment.is_abstain());
        assert_eq!(judgment.confidence, Confidence::Low);
    }

    #[test]
    fn key_risks_are_capped() {
        let risks = (0..15).map(|i| format!("risk {i}")).collect();
        let judgment = Judgment::abstain("x").with_key_risks(risks);
        assert_eq!(judgment.key_risks.len(), MAX_KEY_RISKS);
    }

    #[test]
    fn deserialization_validates_probability() {
        let valid = r#"{"decision":"YES","estimated_probability":0.7,"confidence":"high","rationale":"ok","key_risks":["a"]}"#;
        let judgment: Judgment = serde_json::from_str(valid).unwrap();
        assert_eq!(judgment.estimated_probability(), 0.7);
        assert_eq!(judgment.key_risks, vec!["a".to_string()]);

        let invalid = r#"{"decision":"YES","estimated_probability":1.7,"confidence":"high","rationale":"ok"}"#;
        assert!(serde_json::from_str::<Judgment>(invalid).is_err());
    }

    #[test]
    fn serialized_judgment_reads_back() {
        let judgment = Judgment::try_new(Decision::No, 0.3, Confidence::Medium, "why").unwrap();
        let json = serde_json::to_string(&judgment).unwrap();
        assert_eq!(serde_json::from_str::<Judgment>(&json).unwrap(), judgment);
    }

    #[test]
    fn decision_parses_aliases() {
        assert_eq!("yes".parse::<Decision>(), Ok(Decision::Yes));
        assert_eq!("PASS".parse::<Decision>(), Ok(Decision::Abstain));
        assert!("maybe".parse::<Decision>().is_err());
    }

    #[test]
    fn confidence_from_score_buckets() {
        assert_eq!(Confidence::from_score(0.8), Confidence::High);
        assert_eq!(Confidence::from_score(0.5), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.4), Confidence::Low);
    }
}
