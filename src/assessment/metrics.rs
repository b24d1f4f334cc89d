//! The six assessment metrics and their slider behavior.
//!
//! Every metric is a score on a 0–10 scale, edited through a slider with a
//! 0.5 step. The text path replaces the sliders with one of two fixed
//! profiles chosen by input length.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 10.0;
pub const SLIDER_STEP: f64 = 0.5;

/// Value every slider starts at.
pub const SLIDER_DEFAULT: f64 = 5.0;

/// Text longer than this (in UTF-16 code units) selects the high-risk profile.
pub const TEXT_HEURISTIC_THRESHOLD: usize = 50;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Identifies one of the six metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Suspiciousness,
    Coherence,
    Sleep,
    SocialWithdrawal,
    Attention,
    Functioning,
}

impl MetricField {
    pub const ALL: [MetricField; 6] = [
        MetricField::Suspiciousness,
        MetricField::Coherence,
        MetricField::Sleep,
        MetricField::SocialWithdrawal,
        MetricField::Attention,
        MetricField::Functioning,
    ];

    /// Wire / config key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Suspiciousness => "suspiciousness",
            Self::Coherence => "coherence",
            Self::Sleep => "sleep",
            Self::SocialWithdrawal => "social_withdrawal",
            Self::Attention => "attention",
            Self::Functioning => "functioning",
        }
    }

    /// Human-readable label for the slider.
    pub fn label(self) -> &'static str {
        match self {
            Self::Suspiciousness => "Suspiciousness",
            Self::Coherence => "Acoustic Coherence",
            Self::Sleep => "Sleep Quality",
            Self::SocialWithdrawal => "Social Withdrawal",
            Self::Attention => "Attention",
            Self::Functioning => "Role Functioning",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MetricField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        MetricField::ALL
            .into_iter()
            .find(|f| f.key() == normalized)
            .ok_or_else(|| format!("unknown metric '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Request body for the scoring service: exactly six numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricInput {
    pub suspiciousness: f64,
    pub coherence: f64,
    pub sleep: f64,
    pub social_withdrawal: f64,
    pub attention: f64,
    pub functioning: f64,
}

impl Default for MetricInput {
    fn default() -> Self {
        Self::uniform(SLIDER_DEFAULT)
    }
}

impl MetricInput {
    /// Profile used for long, concerning narratives.
    pub const HIGH_RISK_PROFILE: MetricInput = MetricInput {
        suspiciousness: 9.0,
        coherence: 2.0,
        sleep: 3.5,
        social_withdrawal: 9.0,
        attention: 8.5,
        functioning: 9.0,
    };

    /// Profile used for short, protective phrases.
    pub const LOW_RISK_PROFILE: MetricInput = MetricInput {
        suspiciousness: 0.5,
        coherence: 9.0,
        sleep: 9.0,
        social_withdrawal: 0.5,
        attention: 0.5,
        functioning: 0.5,
    };

    pub fn uniform(value: f64) -> Self {
        Self {
            suspiciousness: value,
            coherence: value,
            sleep: value,
            social_withdrawal: value,
            attention: value,
            functioning: value,
        }
    }

    /// Map free text to a fixed profile by length alone.
    ///
    /// This is a placeholder simulation, not text analysis. Length is
    /// measured in UTF-16 code units.
    pub fn from_text_heuristic(text: &str) -> Self {
        if text.encode_utf16().count() > TEXT_HEURISTIC_THRESHOLD {
            Self::HIGH_RISK_PROFILE
        } else {
            Self::LOW_RISK_PROFILE
        }
    }

    pub fn get(&self, field: MetricField) -> f64 {
        match field {
            MetricField::Suspiciousness => self.suspiciousness,
            MetricField::Coherence => self.coherence,
            MetricField::Sleep => self.sleep,
            MetricField::SocialWithdrawal => self.social_withdrawal,
            MetricField::Attention => self.attention,
            MetricField::Functioning => self.functioning,
        }
    }

    pub fn set(&mut self, field: MetricField, value: f64) {
        let slot = match field {
            MetricField::Suspiciousness => &mut self.suspiciousness,
            MetricField::Coherence => &mut self.coherence,
            MetricField::Sleep => &mut self.sleep,
            MetricField::SocialWithdrawal => &mut self.social_withdrawal,
            MetricField::Attention => &mut self.attention,
            MetricField::Functioning => &mut self.functioning,
        };
        *slot = value;
    }
}

/// A slider value that cannot be sent: NaN or infinite.
#[derive(Debug, Clone, Copy, Error)]
#[error("{field} must be a finite number, got {value}")]
pub struct NonFiniteMetric {
    pub field: MetricField,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Slider display
// ---------------------------------------------------------------------------

/// Text shown next to a slider: shortest decimal form (`7`, `3.5`).
pub fn display_value(value: f64) -> String {
    value.to_string()
}

/// Filled portion of the slider track, in percent.
pub fn range_progress(value: f64) -> f64 {
    (value - SLIDER_MIN) / (SLIDER_MAX - SLIDER_MIN) * 100.0
}

/// Snapshot of one slider for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderView {
    pub field: MetricField,
    pub label: &'static str,
    pub value: f64,
    pub display: String,
    pub progress_pct: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderView {
    pub fn new(field: MetricField, value: f64) -> Self {
        Self {
            field,
            label: field.label(),
            value,
            display: display_value(value),
            progress_pct: range_progress(value),
            min: SLIDER_MIN,
            max: SLIDER_MAX,
            step: SLIDER_STEP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_boundary_is_fifty() {
        let fifty = "a".repeat(50);
        let fifty_one = "a".repeat(51);
        assert_eq!(
            MetricInput::from_text_heuristic(&fifty),
            MetricInput::LOW_RISK_PROFILE
        );
        assert_eq!(
            MetricInput::from_text_heuristic(&fifty_one),
            MetricInput::HIGH_RISK_PROFILE
        );
        assert_eq!(
            MetricInput::from_text_heuristic(""),
            MetricInput::LOW_RISK_PROFILE
        );
    }

    #[test]
    fn heuristic_counts_utf16_units() {
        // 26 astral characters = 52 UTF-16 units but only 26 chars
        let emoji = "\u{1F600}".repeat(26);
        assert_eq!(
            MetricInput::from_text_heuristic(&emoji),
            MetricInput::HIGH_RISK_PROFILE
        );
    }

    #[test]
    fn get_and_set_round_trip_every_field() {
        let mut input = MetricInput::default();
        for (i, field) in MetricField::ALL.into_iter().enumerate() {
            input.set(field, i as f64);
        }
        assert_eq!(input.suspiciousness, 0.0);
        assert_eq!(input.social_withdrawal, 3.0);
        assert_eq!(input.get(MetricField::Functioning), 5.0);
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(MetricInput::LOW_RISK_PROFILE).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        assert_eq!(obj["social_withdrawal"], 0.5);
        assert_eq!(obj["coherence"], 9.0);
    }

    #[test]
    fn field_parsing() {
        assert_eq!("sleep".parse::<MetricField>(), Ok(MetricField::Sleep));
        assert_eq!(
            "Social-Withdrawal".parse::<MetricField>(),
            Ok(MetricField::SocialWithdrawal)
        );
        assert!("mood".parse::<MetricField>().is_err());
    }

    #[test]
    fn slider_display_sync() {
        assert_eq!(display_value(7.0), "7");
        assert_eq!(display_value(3.5), "3.5");
        assert_eq!(range_progress(0.0), 0.0);
        assert_eq!(range_progress(2.5), 25.0);
        assert_eq!(range_progress(10.0), 100.0);

        let view = SliderView::new(MetricField::Attention, 8.5);
        assert_eq!(view.display, "8.5");
        assert!((view.progress_pct - 85.0).abs() < 1e-9);
        assert_eq!(view.label, "Attention");
    }
}
