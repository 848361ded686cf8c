//! The evidence schema consumed from an external Evidence Source.
//!
//! Evidence is untrusted input: numeric fields are clamped on ingestion via
//! [`Evidence::sanitized`], never mutated in place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TraitId;

/// Kind of signal an evidence item came from.
///
/// Known kinds get their own variant; any other label is preserved verbatim
/// in `Other` so new evidence sources don't need a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EvidenceType {
    KeywordMatch,
    Behavioral,
    SelfReport,
    Classifier,
    Annotation,
    LanguageModel,
    Other(String),
}

impl EvidenceType {
    pub const KNOWN: [EvidenceType; 6] = [
        Self::KeywordMatch,
        Self::Behavioral,
        Self::SelfReport,
        Self::Classifier,
        Self::Annotation,
        Self::LanguageModel,
    ];

    /// Label as string.
    pub fn name(&self) -> &str {
        match self {
            Self::KeywordMatch => "keyword_match",
            Self::Behavioral => "behavioral",
            Self::SelfReport => "self_report",
            Self::Classifier => "classifier",
            Self::Annotation => "annotation",
            Self::LanguageModel => "language_model",
            Self::Other(label) => label,
        }
    }

    /// Parse a label. Surrounding whitespace is ignored. Known labels match
    /// case-insensitively; anything else becomes `Other` with its case kept.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label.to_ascii_lowercase().as_str() {
            "keyword_match" => Self::KeywordMatch,
            "behavioral" => Self::Behavioral,
            "self_report" => Self::SelfReport,
            "classifier" => Self::Classifier,
            "annotation" => Self::Annotation,
            "language_model" => Self::LanguageModel,
            _ => Self::Other(label.to_string()),
        }
    }
}

impl fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for EvidenceType {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<&str> for EvidenceType {
    fn from(s: &str) -> Self {
        Self::from_label(s)
    }
}

impl From<EvidenceType> for String {
    fn from(t: EvidenceType) -> Self {
        match t {
            EvidenceType::Other(label) => label,
            known => known.name().to_string(),
        }
    }
}

/// Which way an evidence item pushes the trait score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
    Neutral,
}

impl Direction {
    /// +1, -1, or 0.
    pub fn sign(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
            Self::Neutral => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "+" => Ok(Self::Positive),
            "negative" | "-" => Ok(Self::Negative),
            "neutral" | "0" => Ok(Self::Neutral),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// One observed signal bearing on a trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub trait_id: TraitId,
    pub evidence_type: EvidenceType,
    pub direction: Direction,
    /// Signal strength in [0, 1].
    pub strength: f64,
    /// Source confidence in [0, 1].
    pub confidence: f64,
    /// Opaque note for the audit trail.
    #[serde(default)]
    pub source_note: String,
}

/// Strength and confidence after clamping, plus what had to be fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SanitizedSignal {
    pub strength: f64,
    pub confidence: f64,
    /// A finite value was outside [0, 1] and got clamped.
    pub clamped: bool,
    /// A value was NaN or infinite and got replaced.
    pub non_finite: bool,
}

impl Evidence {
    pub fn new(
        trait_id: impl Into<TraitId>,
        evidence_type: impl Into<EvidenceType>,
        direction: Direction,
        strength: f64,
        confidence: f64,
    ) -> Self {
        Self {
            trait_id: trait_id.into(),
            evidence_type: evidence_type.into(),
            direction,
            strength,
            confidence,
            source_note: String::new(),
        }
    }

    /// Attach an audit note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.source_note = note.into();
        self
    }

    /// Clamp strength and confidence to [0, 1].
    ///
    /// NaN becomes 0. Infinities clamp to the nearest bound but are still
    /// flagged as non-finite so the caller can report them.
    pub fn sanitized(&self) -> SanitizedSignal {
        let (strength, s_clamped, s_bad) = clamp_unit(self.strength);
        let (confidence, c_clamped, c_bad) = clamp_unit(self.confidence);
        SanitizedSignal {
            strength,
            confidence,
            clamped: s_clamped || c_clamped,
            non_finite: s_bad || c_bad,
        }
    }

    /// Parse a JSON array of evidence records.
    pub fn list_from_json(json: &str) -> Result<Vec<Evidence>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn clamp_unit(v: f64) -> (f64, bool, bool) {
    if v.is_nan() {
        return (0.0, false, true);
    }
    let clamped = v.clamp(0.0, 1.0);
    let non_finite = v.is_infinite();
    (clamped, !non_finite && clamped != v, non_finite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_type_labels() {
        for t in EvidenceType::KNOWN {
            assert_eq!(EvidenceType::from_label(t.name()), t);
        }
        assert_eq!(EvidenceType::from("Self_Report"), EvidenceType::SelfReport);
        assert_eq!(
            EvidenceType::from("forum_post"),
            EvidenceType::Other("forum_post".to_string())
        );
        assert_eq!(EvidenceType::from(" forum_post\t"), EvidenceType::from("forum_post"));
        assert_eq!(EvidenceType::from("Forum_Post").name(), "Forum_Post");
    }

    #[test]
    fn test_evidence_type_serde_is_plain_string() {
        let json = serde_json::to_string(&EvidenceType::LanguageModel).unwrap();
        assert_eq!(json, "\"language_model\"");
        let other: EvidenceType = serde_json::from_str("\"eye_tracking\"").unwrap();
        assert_eq!(other, EvidenceType::Other("eye_tracking".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"eye_tracking\"");
    }

    #[test]
    fn test_direction_sign_and_parse() {
        assert_eq!(Direction::Positive.sign(), 1.0);
        assert_eq!(Direction::Negative.sign(), -1.0);
        assert_eq!(Direction::Neutral.sign(), 0.0);
        assert_eq!("NEGATIVE".parse::<Direction>().unwrap(), Direction::Negative);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_sanitized_in_range_untouched() {
        let e = Evidence::new("t", "behavioral", Direction::Positive, 0.4, 0.9);
        let s = e.sanitized();
        assert_eq!(s.strength, 0.4);
        assert_eq!(s.confidence, 0.9);
        assert!(!s.clamped && !s.non_finite);
    }

    #[test]
    fn test_sanitized_clamps_out_of_range() {
        let e = Evidence::new("t", "behavioral", Direction::Positive, 1.7, -0.2);
        let s = e.sanitized();
        assert_eq!(s.strength, 1.0);
        assert_eq!(s.confidence, 0.0);
        assert!(s.clamped);
        assert!(!s.non_finite);
    }

    #[test]
    fn test_sanitized_non_finite() {
        let e = Evidence::new("t", "behavioral", Direction::Positive, f64::NAN, f64::INFINITY);
        let s = e.sanitized();
        assert_eq!(s.strength, 0.0);
        assert_eq!(s.confidence, 1.0);
        assert!(s.non_finite);
    }

    #[test]
    fn test_list_from_json() {
        let json = r#"[
            {"trait_id": "openness", "evidence_type": "self_report",
             "direction": "positive", "strength": 0.8, "confidence": 0.6,
             "source_note": "questionnaire item 4"},
            {"trait_id": "openness", "evidence_type": "diary_entry",
             "direction": "neutral", "strength": 0.1, "confidence": 0.3}
        ]"#;
        let list = Evidence::list_from_json(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].trait_id.as_str(), "openness");
        assert_eq!(list[0].evidence_type, EvidenceType::SelfReport);
        assert_eq!(list[1].evidence_type, EvidenceType::Other("diary_entry".into()));
        assert!(list[1].source_note.is_empty());
    }
}
