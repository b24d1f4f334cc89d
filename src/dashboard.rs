//! Dashboard view-model: everything a rendering surface needs to draw the
//! gauge, the triggered-rule list, the action plan and the timeline.
//!
//! The gauge and action plan follow the numeric score; the timeline follows
//! the tier name the service reported, so an unrecognized name renders an
//! empty plan rather than failing.

use serde::Serialize;

use crate::assessment::AssessmentResult;
use crate::risk::{self, RiskTier};
use crate::timeline::{self, TimelineLayout};

/// Gauge label before any assessment.
pub const AWAITING_LABEL: &str = "Awaiting Input";

/// Color role of the idle gauge.
pub const IDLE_COLOR_ROLE: &str = "primary";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub value: f64,
    pub label: &'static str,
    pub color_role: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlan {
    pub style_class: &'static str,
    pub icon: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub gauge: Gauge,
    pub tier: Option<RiskTier>,
    pub triggered_rules: Vec<String>,
    pub interpretation: Option<String>,
    pub action_plan: Option<ActionPlan>,
    pub timeline: TimelineLayout,
}

impl DashboardView {
    /// Dashboard before the first successful assessment.
    pub fn initial() -> Self {
        Self {
            gauge: Gauge {
                value: 0.0,
                label: AWAITING_LABEL,
                color_role: IDLE_COLOR_ROLE,
            },
            tier: None,
            triggered_rules: Vec::new(),
            interpretation: None,
            action_plan: None,
            timeline: timeline::layout_timeline(None),
        }
    }

    pub fn from_result(result: &AssessmentResult) -> Self {
        let class = risk::classify(result.risk_score);
        Self {
            gauge: Gauge {
                value: result.risk_score,
                label: class.gauge_label,
                color_role: class.color_role,
            },
            tier: Some(class.tier),
            triggered_rules: result.triggered_rules.clone(),
            interpretation: result.interpretation_text.clone(),
            action_plan: Some(ActionPlan {
                style_class: class.action_style,
                icon: class.icon,
                message: class.next_step_message,
            }),
            timeline: timeline::layout_timeline(result.reported_tier()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: f64, level: &str) -> AssessmentResult {
        AssessmentResult {
            risk_score: score,
            risk_level: level.to_string(),
            triggered_rules: vec!["rule one".to_string(), "rule two".to_string()],
            interpretation_text: None,
        }
    }

    #[test]
    fn initial_view_is_idle() {
        let view = DashboardView::initial();
        assert_eq!(view.gauge.value, 0.0);
        assert_eq!(view.gauge.label, "Awaiting Input");
        assert!(view.action_plan.is_none());
        assert!(view.timeline.items.is_empty());
        assert_eq!(view.timeline.ticks.len(), 24);
    }

    #[test]
    fn result_drives_gauge_and_plan() {
        let view = DashboardView::from_result(&result(42.5, "Moderate"));
        assert_eq!(view.gauge.value, 42.5);
        assert_eq!(view.gauge.label, "Moderate Risk");
        assert_eq!(view.gauge.color_role, "risk-moderate");
        assert_eq!(view.tier, Some(RiskTier::Moderate));
        assert_eq!(view.triggered_rules, vec!["rule one", "rule two"]);
        let plan = view.action_plan.unwrap();
        assert_eq!(plan.style_class, "moderate-risk-text");
        assert_eq!(view.timeline.items.len(), 7);
        assert_eq!(view.timeline.items[0].label, "Sleep Monitoring Phase");
    }

    #[test]
    fn unknown_level_name_renders_empty_timeline() {
        let view = DashboardView::from_result(&result(80.0, "Severe"));
        assert_eq!(view.gauge.label, "High Risk");
        assert!(view.timeline.items.is_empty());
        assert_eq!(view.timeline.ticks.len(), 24);
    }
}
