//! Static daily care-plan catalogs, one per risk tier.
//!
//! The catalogs are hand-curated so that cards in the same lane never
//! overlap; [`super::validate_plan`] checks that property.

use crate::risk::RiskTier;

use super::{ItemCategory, Lane, ScheduleItem};

const fn item(
    label: &'static str,
    category: ItemCategory,
    start_minute: u32,
    lane: Lane,
) -> ScheduleItem {
    ScheduleItem {
        label,
        category,
        start_minute,
        lane,
    }
}

use ItemCategory::{Default as Neutral, High, Low, Moderate};
use Lane::{Bottom, Top};

pub const LOW_PLAN: &[ScheduleItem] = &[
    item("Sleep Phase (Night)", Low, 0, Bottom),
    item("Morning Routine & Sunlight", Neutral, 420, Top),
    item("Psychoeducation Session", Low, 540, Bottom),
    item("Mindfulness Practice", Low, 750, Top),
    item("Routine Check-in", Neutral, 1080, Bottom),
    item("Social Connection Time", Low, 1260, Top),
    item("Pre-sleep Wind-down", Neutral, 1320, Bottom),
];

pub const MODERATE_PLAN: &[ScheduleItem] = &[
    item("Sleep Monitoring Phase", Moderate, 120, Bottom),
    item("Initial CBT for Anxiety", Moderate, 480, Top),
    item("Social Skill Training (SST)", Moderate, 660, Bottom),
    item("Family Check-in", Moderate, 780, Top),
    item("Sleep Hygiene Intervention", Moderate, 960, Bottom),
    item("Monthly Clinical Review", Neutral, 1140, Top),
    item("Late Evening Calm", Moderate, 1350, Bottom),
];

pub const HIGH_PLAN: &[ScheduleItem] = &[
    item("Night-time Surveillance", High, 30, Top),
    item("URGENT: Diagnostic Interview", High, 360, Bottom),
    item("Medication Review", High, 600, Top),
    item("Start Supportive Therapy", High, 780, Bottom),
    item("Symptom Tracking (PM)", High, 1020, Top),
    item("Crisis Plan Session", High, 1100, Bottom),
    item("Emergency Contact Check", Neutral, 1380, Top),
];

/// Catalog for a tier; the empty plan when no tier is known yet.
pub fn plan_for(tier: Option<RiskTier>) -> &'static [ScheduleItem] {
    match tier {
        Some(RiskTier::Low) => LOW_PLAN,
        Some(RiskTier::Moderate) => MODERATE_PLAN,
        Some(RiskTier::High) => HIGH_PLAN,
        None => &[],
    }
}
