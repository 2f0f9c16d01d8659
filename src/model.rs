//! Domain types: labels, analysis results and the wire DTOs
//!
//! The classification endpoint speaks Portuguese field names
//! (`previsao`, `probabilidade`); they are part of the wire contract and
//! only appear in the serde attributes below.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SentimentError;

/// Minimum trimmed length accepted for analysis
pub const MIN_TEXT_CHARS: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Label
// ─────────────────────────────────────────────────────────────────────────────

/// Classifier label, normalized to a lowercase token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> SentimentKind {
        SentimentKind::from_token(&self.0)
    }

    /// Uppercased form used in the result panel
    pub fn display(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical sentiment classes
///
/// The upstream model answers in Portuguese; English tokens are accepted
/// too. Unknown tokens stay displayable as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentKind {
    Positive,
    Negative,
    Other,
}

impl SentimentKind {
    fn from_token(token: &str) -> Self {
        match token {
            "positive" | "positivo" => Self::Positive,
            "negative" | "negativo" => Self::Negative,
            _ => Self::Other,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Positive => "☺",
            Self::Negative => "☹",
            Self::Other => "?",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Analysis result
// ─────────────────────────────────────────────────────────────────────────────

/// One classification: label plus the model's probability for it
///
/// The probability is already conditioned on the label, so it doubles as
/// the displayed confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub label: Label,
    pub probability: f64,
}

impl AnalysisResult {
    pub fn new(label: Label, probability: f64) -> Self {
        Self { label, probability }
    }

    /// Display-only percentage, `round(p * 100)`
    pub fn percent(&self) -> u8 {
        percent(self.probability)
    }

    /// `"87%"`
    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent())
    }
}

pub fn percent(probability: f64) -> u8 {
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SentimentRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentimentResponse {
    #[serde(rename = "previsao")]
    pub prediction: String,
    #[serde(rename = "probabilidade")]
    pub probability: f64,
}

impl SentimentResponse {
    /// Validate the body and turn it into a domain result
    pub fn into_result(self, status: u16) -> Result<AnalysisResult, SentimentError> {
        let malformed = |reason: String| SentimentError::MalformedResponse { status, reason };

        let label = Label::new(&self.prediction);
        if label.as_str().is_empty() {
            return Err(malformed("empty `previsao`".to_string()));
        }
        if !self.probability.is_finite() || !(0.0..=1.0).contains(&self.probability) {
            return Err(malformed(format!(
                "`probabilidade` out of range: {}",
                self.probability
            )));
        }
        Ok(AnalysisResult::new(label, self.probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_normalizes_case() {
        let label = Label::new("Positivo");
        assert_eq!(label.as_str(), "positivo");
        assert_eq!(label.display(), "POSITIVO");
        assert_eq!(label.kind(), SentimentKind::Positive);
    }

    #[test]
    fn wire_label_is_normalized_on_the_way_in() {
        let body = r#"{"previsao": "  NEGATIVO ", "probabilidade": 0.4}"#;
        let response: SentimentResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result(200).unwrap();
        assert_eq!(result.label, Label::new("negativo"));
        assert_eq!(result.label.as_str(), "negativo");
    }

    #[test]
    fn label_kind_accepts_english_and_portuguese() {
        assert_eq!(Label::new("NEGATIVE").kind(), SentimentKind::Negative);
        assert_eq!(Label::new("negativo").kind(), SentimentKind::Negative);
        assert_eq!(Label::new("Positive").kind(), SentimentKind::Positive);
        assert_eq!(Label::new("neutro").kind(), SentimentKind::Other);
    }

    #[test]
    fn percent_rounds_for_display_only() {
        let result = AnalysisResult::new(Label::new("positivo"), 0.8734);
        assert_eq!(result.percent(), 87);
        assert_eq!(result.percent_label(), "87%");
        assert_eq!(result.probability, 0.8734);

        assert_eq!(percent(0.925), 93);
        assert_eq!(percent(0.0), 0);
        assert_eq!(percent(1.0), 100);
    }

    #[test]
    fn response_uses_wire_field_names() {
        let body = r#"{"previsao":"Positivo","probabilidade":0.92}"#;
        let response: SentimentResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result(200).unwrap();
        assert_eq!(result.label.as_str(), "positivo");
        assert_eq!(result.percent_label(), "92%");
    }

    #[test]
    fn response_missing_field_fails_to_parse() {
        let body = r#"{"previsao":"Positivo"}"#;
        assert!(serde_json::from_str::<SentimentResponse>(body).is_err());
    }

    #[test]
    fn response_out_of_range_probability_is_malformed() {
        let response = SentimentResponse {
            prediction: "positivo".into(),
            probability: 1.5,
        };
        assert!(matches!(
            response.into_result(200),
            Err(SentimentError::MalformedResponse { status: 200, .. })
        ));
    }

    #[test]
    fn response_blank_label_is_malformed() {
        let response = SentimentResponse {
            prediction: "  ".into(),
            probability: 0.5,
        };
        assert!(response.into_result(200).is_err());
    }

    #[test]
    fn request_serializes_text_field() {
        let json = serde_json::to_string(&SentimentRequest { text: "hello there" }).unwrap();
        assert_eq!(json, r#"{"text":"hello there"}"#);
    }
}
