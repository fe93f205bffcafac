//! Compounding dashboard contracts and headline counters.
//!
//! `GET /metrics/compounding?weeks=N` returns a start-of-period and
//! end-of-period value for each headline metric. The headline panel counts
//! each figure up from its start value to its end value.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use soc_copilot_core::{AnimatedCounter, FrameScheduler};

use crate::config::AnimationSettings;

/// Reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

/// Start and end values of the headline metrics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Headline {
    pub nodes_start: f64,
    pub nodes_end: f64,
    pub auto_close_start: f64,
    pub auto_close_end: f64,
    pub mttr_start: f64,
    pub mttr_end: f64,
    pub fp_investigations_start: f64,
    pub fp_investigations_end: f64,
}

impl Headline {
    /// Auto-close rate change in percentage points.
    pub fn auto_close_change(&self) -> f64 {
        self.auto_close_end - self.auto_close_start
    }

    /// MTTR reduction as a percentage of the starting MTTR.
    pub fn mttr_reduction_percent(&self) -> f64 {
        reduction_percent(self.mttr_start, self.mttr_end)
    }

    /// False-positive investigation reduction as a percentage.
    pub fn fp_investigations_reduction_percent(&self) -> f64 {
        reduction_percent(self.fp_investigations_start, self.fp_investigations_end)
    }
}

fn reduction_percent(start: f64, end: f64) -> f64 {
    if start == 0.0 || !start.is_finite() {
        return 0.0;
    }
    (start - end) / start * 100.0
}

/// One point of the weekly trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMetric {
    pub week: u32,
    pub auto_close_rate: f64,
    pub mttr_minutes: f64,
    pub fp_rate: f64,
    pub pattern_count: f64,
}

/// A change to the deployed decision graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionEvent {
    pub id: String,
    pub event_type: String,
    pub description: String,
    pub timestamp: String,
    pub triggered_by: String,
}

/// Body of `GET /metrics/compounding`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundingData {
    pub period: Period,
    pub headline: Headline,
    #[serde(default)]
    pub weekly_trend: Vec<WeeklyMetric>,
    #[serde(default)]
    pub evolution_events: Vec<EvolutionEvent>,
}

/// A `{label, value}` pair as consumed by the charting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl CompoundingData {
    /// Project one weekly field into chart points labelled `Week N`.
    pub fn weekly_series(&self, field: impl Fn(&WeeklyMetric) -> f64) -> Vec<ChartPoint> {
        self.weekly_trend
            .iter()
            .map(|week| ChartPoint {
                label: format!("Week {}", week.week),
                value: field(week),
            })
            .collect()
    }
}

/// The animated headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadlineMetric {
    Nodes,
    AutoClose,
    Mttr,
    FpInvestigations,
}

impl HeadlineMetric {
    /// Every metric, in panel order.
    pub const ALL: [HeadlineMetric; 4] = [
        HeadlineMetric::Nodes,
        HeadlineMetric::AutoClose,
        HeadlineMetric::Mttr,
        HeadlineMetric::FpInvestigations,
    ];

    /// Displayed decimal places.
    pub fn decimals(self) -> i32 {
        match self {
            HeadlineMetric::Mttr => 1,
            _ => 0,
        }
    }

    /// `(start, end)` for this metric.
    pub fn range(self, headline: &Headline) -> (f64, f64) {
        match self {
            HeadlineMetric::Nodes => (headline.nodes_start, headline.nodes_end),
            HeadlineMetric::AutoClose => (headline.auto_close_start, headline.auto_close_end),
            HeadlineMetric::Mttr => (headline.mttr_start, headline.mttr_end),
            HeadlineMetric::FpInvestigations => {
                (headline.fp_investigations_start, headline.fp_investigations_end)
            }
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Current headline display values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadlineDisplay {
    pub nodes: f64,
    pub auto_close: f64,
    pub mttr: f64,
    pub fp_investigations: f64,
    pub animating: bool,
}

/// Animated counters for the compounding headline.
pub struct HeadlineCounters {
    settings: AnimationSettings,
    counters: [AnimatedCounter; 4],
}

impl HeadlineCounters {
    /// Create the panel and start counting up `headline`.
    pub fn new(scheduler: Arc<dyn FrameScheduler>, settings: AnimationSettings, headline: &Headline) -> Self {
        let counters = HeadlineMetric::ALL.map(|metric| {
            let (start, end) = metric.range(headline);
            let config = settings.counter_with(start, end, settings.duration_ms, metric.decimals());
            AnimatedCounter::new(scheduler.clone(), config)
        });

        Self { settings, counters }
    }

    /// Feed a freshly loaded headline. Metrics whose range is unchanged keep
    /// their current animation.
    pub fn apply(&self, headline: &Headline) {
        let mut restarted = 0;
        for metric in HeadlineMetric::ALL {
            let (start, end) = metric.range(headline);
            let config = self
                .settings
                .counter_with(start, end, self.settings.duration_ms, metric.decimals());
            if self.counters[metric.index()].update(config) {
                restarted += 1;
            }
        }
        tracing::debug!(target: "soc_copilot::compounding", restarted, "applied headline");
    }

    /// Current display values.
    pub fn snapshot(&self) -> HeadlineDisplay {
        let value = |metric: HeadlineMetric| self.counters[metric.index()].value();
        HeadlineDisplay {
            nodes: value(HeadlineMetric::Nodes),
            auto_close: value(HeadlineMetric::AutoClose),
            mttr: value(HeadlineMetric::Mttr),
            fp_investigations: value(HeadlineMetric::FpInvestigations),
            animating: self.is_animating(),
        }
    }

    /// The counter behind a metric.
    pub fn counter(&self, metric: HeadlineMetric) -> &AnimatedCounter {
        &self.counters[metric.index()]
    }

    /// Whether any counter is still moving.
    pub fn is_animating(&self) -> bool {
        self.counters.iter().any(AnimatedCounter::is_animating)
    }
}
