//! Two-panel metric input navigator.
//!
//! `Core` shows the first three metrics, `Extended` the remaining three.
//! `next` only moves Core → Extended and `prev` only Extended → Core; both
//! are no-ops at the ends.

use serde::Serialize;

use crate::assessment::MetricField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    Core,
    Extended,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Self::Core => "Core Metrics (1/2)",
            Self::Extended => "Extended Metrics (2/2)",
        }
    }

    /// Metrics whose sliders are visible on this panel.
    pub fn fields(self) -> &'static [MetricField] {
        match self {
            Self::Core => &[
                MetricField::Suspiciousness,
                MetricField::Coherence,
                MetricField::Sleep,
            ],
            Self::Extended => &[
                MetricField::SocialWithdrawal,
                MetricField::Attention,
                MetricField::Functioning,
            ],
        }
    }
}

/// What the tab header should show for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigatorView {
    pub panel: Panel,
    pub title: &'static str,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub fields: &'static [MetricField],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    panel: Panel,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Advance to the extended panel. Returns whether the state changed.
    pub fn next(&mut self) -> bool {
        if self.panel == Panel::Core {
            self.panel = Panel::Extended;
            true
        } else {
            false
        }
    }

    /// Go back to the core panel. Returns whether the state changed.
    pub fn prev(&mut self) -> bool {
        if self.panel == Panel::Extended {
            self.panel = Panel::Core;
            true
        } else {
            false
        }
    }

    pub fn view(&self) -> NavigatorView {
        NavigatorView {
            panel: self.panel,
            title: self.panel.title(),
            prev_enabled: self.panel != Panel::Core,
            next_enabled: self.panel != Panel::Extended,
            fields: self.panel.fields(),
        }
    }
}
