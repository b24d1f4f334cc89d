//! Daily care-plan timeline layout.
//!
//! Maps the fixed day domain `[0, 1440)` minutes linearly onto a fixed
//! 3600 px axis. Produces hour ticks (tier-independent) and one positioned
//! card per catalog item. Cards are centered on their start time and placed
//! in one of two lanes; there is no collision avoidance, the catalogs are
//! curated instead (see [`validate_plan`]).
//!
//! Layout is pure and idempotent: the same tier always yields identical
//! geometry.

pub mod plans;

use serde::Serialize;

use crate::clock::{MINUTES_PER_DAY, format_clock_time};
use crate::risk::RiskTier;

/// Total axis width in pixels, independent of viewport.
pub const TIMELINE_WIDTH_PX: f64 = 3600.0;

/// Width of every timeline card.
pub const CARD_WIDTH_PX: f64 = 140.0;

/// Cards are shifted left by half their width so they center on the start time.
pub const CARD_CENTER_OFFSET_PX: f64 = CARD_WIDTH_PX / 2.0;

/// Minutes between axis ticks.
pub const TICK_INTERVAL_MINUTES: u32 = 60;

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// Visual category of a schedule item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Low,
    Moderate,
    High,
    Default,
}

impl ItemCategory {
    pub fn style_class(self) -> &'static str {
        match self {
            Self::Low => "timeline-item-low",
            Self::Moderate => "timeline-item-mod",
            Self::High => "timeline-item-high",
            Self::Default => "timeline-item-default",
        }
    }
}

/// Vertical lane of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Top,
    Bottom,
}

impl Lane {
    /// Vertical offset of the lane in pixels.
    pub fn top_px(self) -> f64 {
        match self {
            Self::Top => 10.0,
            Self::Bottom => 80.0,
        }
    }
}

/// One entry of a static care plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleItem {
    pub label: &'static str,
    pub category: ItemCategory,
    pub start_minute: u32,
    pub lane: Lane,
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Hour label on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub minute: u32,
    pub label: String,
    pub x_offset_px: f64,
}

/// A schedule item with its computed geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedItem {
    pub label: &'static str,
    pub category: ItemCategory,
    pub style_class: &'static str,
    pub lane: Lane,
    pub start_minute: u32,
    pub start_label: String,
    pub x_offset_px: f64,
    pub top_px: f64,
    pub width_px: f64,
}

/// Full timeline geometry for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub tier: Option<RiskTier>,
    pub width_px: f64,
    pub ticks: Vec<Tick>,
    pub items: Vec<PositionedItem>,
}

/// Linear position of a minute on the axis.
///
/// Multiplies before dividing so every whole-minute input maps exactly.
pub fn minute_to_px(minute: u32) -> f64 {
    f64::from(minute) * TIMELINE_WIDTH_PX / f64::from(MINUTES_PER_DAY)
}

/// Hour ticks from 0 (inclusive) to 1440 (exclusive).
pub fn ticks() -> Vec<Tick> {
    (0..MINUTES_PER_DAY)
        .step_by(TICK_INTERVAL_MINUTES as usize)
        .map(|minute| Tick {
            minute,
            label: format_clock_time(minute),
            x_offset_px: minute_to_px(minute),
        })
        .collect()
}

/// Position a single catalog item.
pub fn position_item(item: &ScheduleItem) -> PositionedItem {
    PositionedItem {
        label: item.label,
        category: item.category,
        style_class: item.category.style_class(),
        lane: item.lane,
        start_minute: item.start_minute,
        start_label: format_clock_time(item.start_minute),
        x_offset_px: minute_to_px(item.start_minute) - CARD_CENTER_OFFSET_PX,
        top_px: item.lane.top_px(),
        width_px: CARD_WIDTH_PX,
    }
}

/// Lay out the care plan for `tier`.
///
/// `None` is the uninitialized dashboard: no items, full tick set.
pub fn layout_timeline(tier: Option<RiskTier>) -> TimelineLayout {
    TimelineLayout {
        tier,
        width_px: TIMELINE_WIDTH_PX,
        ticks: ticks(),
        items: plans::plan_for(tier).iter().map(position_item).collect(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Two same-lane cards that would overlap on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanConflict {
    pub first: &'static str,
    pub second: &'static str,
    pub lane: Lane,
    pub gap_minutes: u32,
}

/// Smallest start-time gap (minutes) that keeps two same-lane cards apart.
pub fn min_gap_minutes() -> u32 {
    (CARD_WIDTH_PX * f64::from(MINUTES_PER_DAY) / TIMELINE_WIDTH_PX).ceil() as u32
}

/// Report every pair of same-lane items whose cards overlap.
pub fn validate_plan(items: &[ScheduleItem]) -> Vec<PlanConflict> {
    let min_gap = min_gap_minutes();
    let mut conflicts = Vec::new();

    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            if a.lane != b.lane {
                continue;
            }
            let gap = a.start_minute.abs_diff(b.start_minute);
            if gap < min_gap {
                conflicts.push(PlanConflict {
                    first: a.label,
                    second: b.label,
                    lane: a.lane,
                    gap_minutes: gap,
                });
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_cover_the_day_hourly() {
        let ticks = ticks();
        assert_eq!(ticks.len(), 24);
        assert_eq!(ticks[0].label, "12:00 AM");
        assert_eq!(ticks[12].label, "12:00 PM");
        assert_eq!(ticks[23].minute, 1380);
        assert_eq!(ticks[23].label, "11:00 PM");
    }

    #[test]
    fn tick_offsets_are_linear() {
        for tick in ticks() {
            let expected = f64::from(tick.minute) / 1440.0 * TIMELINE_WIDTH_PX;
            assert!((tick.x_offset_px - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn items_are_centered_on_start_time() {
        let layout = layout_timeline(Some(RiskTier::High));
        let first = &layout.items[0];
        assert_eq!(first.label, "Night-time Surveillance");
        // 30 min -> 75 px, minus half the card width
        assert_eq!(first.x_offset_px, 5.0);
        assert_eq!(first.width_px, 140.0);
        assert_eq!(first.top_px, 10.0);
        assert_eq!(first.start_label, "12:30 AM");
    }

    #[test]
    fn first_low_item_starts_left_of_axis() {
        let layout = layout_timeline(Some(RiskTier::Low));
        assert_eq!(layout.items[0].x_offset_px, -70.0);
        assert_eq!(layout.items[0].lane, Lane::Bottom);
        assert_eq!(layout.items[0].top_px, 80.0);
    }

    #[test]
    fn empty_tier_has_ticks_but_no_items() {
        let layout = layout_timeline(None);
        assert!(layout.items.is_empty());
        assert_eq!(layout.ticks.len(), 24);
    }

    #[test]
    fn style_classes() {
        assert_eq!(ItemCategory::Moderate.style_class(), "timeline-item-mod");
        assert_eq!(ItemCategory::Default.style_class(), "timeline-item-default");
    }

    #[test]
    fn min_gap_matches_card_width() {
        // 140 px at 2.5 px/min
        assert_eq!(min_gap_minutes(), 56);
    }

    #[test]
    fn overlapping_same_lane_items_conflict() {
        let items = [
            ScheduleItem {
                label: "A",
                category: ItemCategory::Low,
                start_minute: 600,
                lane: Lane::Top,
            },
            ScheduleItem {
                label: "B",
                category: ItemCategory::Low,
                start_minute: 630,
                lane: Lane::Top,
            },
            ScheduleItem {
                label: "C",
                category: ItemCategory::Low,
                start_minute: 610,
                lane: Lane::Bottom,
            },
        ];
        let conflicts = validate_plan(&items);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].first, "A");
        assert_eq!(conflicts[0].second, "B");
        assert_eq!(conflicts[0].gap_minutes, 30);
    }
}
