//! Risk tier classification and presentation metadata.
//!
//! Scores partition into three half-open intervals with inclusive lower
//! bounds: `[65, ∞)` is High, `[35, 65)` is Moderate, everything below 35
//! (including NaN, which fails both comparisons) is Low.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest score classified as High.
pub const HIGH_THRESHOLD: f64 = 65.0;

/// Lowest score classified as Moderate.
pub const MODERATE_THRESHOLD: f64 = 35.0;

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Ordered risk tier. `Low < Moderate < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Moderate, RiskTier::High];

    /// Tier for a numeric score.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Parse the tier name reported by the scoring service.
    ///
    /// Case-insensitive, ignores surrounding whitespace. Returns `None` for
    /// empty or unknown names.
    pub fn from_level_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Canonical name as used on the wire (`"Low"`, `"Moderate"`, `"High"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    /// Color role consumed by the rendering layer.
    pub fn color_role(self) -> &'static str {
        match self {
            Self::Low => "risk-low",
            Self::Moderate => "risk-moderate",
            Self::High => "risk-high",
        }
    }

    /// Label shown under the gauge value.
    pub fn gauge_label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    /// Style class for the action-plan text.
    pub fn action_style(self) -> &'static str {
        match self {
            Self::Low => "low-risk-text",
            Self::Moderate => "moderate-risk-text",
            Self::High => "high-risk-text",
        }
    }

    /// Icon token shown in front of the next-step message.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Low => "check-circle",
            Self::Moderate => "hand-holding-medical",
            Self::High => "exclamation-triangle",
        }
    }

    pub fn next_step_message(self) -> &'static str {
        match self {
            Self::Low => "Next Step: Recommend psychoeducation and routine follow-up in 6 months.",
            Self::Moderate => {
                "Next Step: Initiating preventative CBT and supportive psychological intervention."
            }
            Self::High => {
                "Next Step: URGENT referral for specialist diagnostic interview and intensive monitoring."
            }
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Tier plus the presentation tokens derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub tier: RiskTier,
    pub color_role: &'static str,
    pub gauge_label: &'static str,
    pub action_style: &'static str,
    pub icon: &'static str,
    pub next_step_message: &'static str,
}

/// Classify a score. Pure lookup, no range validation.
pub fn classify(score: f64) -> Classification {
    let tier = RiskTier::from_score(score);
    Classification {
        tier,
        color_role: tier.color_role(),
        gauge_label: tier.gauge_label(),
        action_style: tier.action_style(),
        icon: tier.icon(),
        next_step_message: tier.next_step_message(),
    }
}
