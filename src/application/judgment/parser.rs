//! Strict parser for judgment responses.
//!
//! The judge answers in free text that should contain a JSON object. Nothing
//! from that text is trusted until it has been mapped onto a valid
//! decision/probability/confidence triple; anything else is `Unparseable`.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::application::extract::extract_json;
use crate::domain::judgment::{Confidence, Decision, Judgment};

/// Why a response could not be turned into a judgment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoJson,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("missing estimated probability")]
    MissingProbability,

    #[error("estimated probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("missing confidence")]
    MissingConfidence,

    #[error("invalid confidence: {0}")]
    InvalidConfidence(String),

    #[error("invalid decision: {0}")]
    InvalidDecision(String),

    #[error("decision {decision} contradicts estimate {estimate:.2} vs market {market:.2}")]
    Contradiction {
        decision: Decision,
        estimate: f64,
        market: f64,
    },
}

/// Result of parsing one judgment response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedJudgment {
    Valid(Judgment),
    Unparseable { reason: String },
}

impl ParsedJudgment {
    /// Collapse into a judgment, abstaining with low confidence when unparseable.
    #[must_use]
    pub fn into_judgment(self) -> Judgment {
        match self {
            Self::Valid(judgment) => judgment,
            Self::Unparseable { reason } => {
                Judgment::abstain(format!("Unparseable judgment: {reason}"))
            }
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

#[derive(Deserialize)]
struct RawJudgment {
    #[serde(default, alias = "probability")]
    estimated_probability: Option<Value>,
    #[serde(default, alias = "confidence_level")]
    confidence: Option<Value>,
    #[serde(default)]
    decision: Option<String>,
    #[serde(default, alias = "reasoning_summary", alias = "reasoning")]
    rationale: Option<String>,
    #[serde(default)]
    key_risks: Vec<String>,
}

/// Parse a judge response against the market's implied probability.
///
/// When the response omits a decision it is derived from the direction of
/// the estimate relative to the market.
#[must_use]
pub fn parse_judgment(text: &str, implied_probability: f64) -> ParsedJudgment {
    match try_parse(text, implied_probability) {
        Ok(judgment) => ParsedJudgment::Valid(judgment),
        Err(e) => ParsedJudgment::Unparseable {
            reason: e.to_string(),
        },
    }
}

fn try_parse(text: &str, implied: f64) -> Result<Judgment, ParseError> {
    let json = extract_json(text).ok_or(ParseError::NoJson)?;
    let raw: RawJudgment =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let estimate = raw
        .estimated_probability
        .as_ref()
        .and_then(as_number)
        .ok_or(ParseError::MissingProbability)?;
    if !(0.0..=1.0).contains(&estimate) {
        return Err(ParseError::ProbabilityOutOfRange(estimate));
    }

    let confidence = raw
        .confidence
        .as_ref()
        .ok_or(ParseError::MissingConfidence)
        .and_then(parse_confidence)?;

    let decision = match raw.decision.as_deref() {
        Some(d) => d.parse::<Decision>().map_err(ParseError::InvalidDecision)?,
        None => direction(estimate, implied),
    };

    let contradicts = match decision {
        Decision::Yes => estimate < implied,
        Decision::No => estimate > implied,
        Decision::Abstain => false,
    };
    if contradicts {
        return Err(ParseError::Contradiction {
            decision,
            estimate,
            market: implied,
        });
    }

    let judgment = Judgment::try_new(
        decision,
        estimate,
        confidence,
        raw.rationale.unwrap_or_default(),
    )
    .map_err(|_| ParseError::ProbabilityOutOfRange(estimate))?;

    Ok(judgment.with_key_risks(raw.key_risks))
}

fn direction(estimate: f64, implied: f64) -> Decision {
    if estimate > implied {
        Decision::Yes
    } else if estimate < implied {
        Decision::No
    } else {
        Decision::Abstain
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_confidence(value: &Value) -> Result<Confidence, ParseError> {
    if let Some(score) = as_number(value) {
        if !(0.0..=1.0).contains(&score) {
            return Err(ParseError::InvalidConfidence(score.to_string()));
        }
        return Ok(Confidence::from_score(score));
    }
    match value {
        Value::String(s) => s.parse().map_err(ParseError::InvalidConfidence),
        other => Err(ParseError::InvalidConfidence(other.to_string())),
    }
}
