//! ROI calculator contracts and its animated results panel.
//!
//! The backend computes projections from a [`RoiRequest`]; the panel only
//! animates whatever [`RoiResponse`] comes back. Each new response counts up
//! from the previously shown result, so a prospect dragging a slider sees
//! the numbers move from where they were rather than from zero.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use soc_copilot_core::{AnimatedCounter, CountUpConfig, FrameScheduler};

use crate::config::AnimationSettings;

/// Prospect inputs sent to `POST /roi/calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiRequest {
    pub alerts_per_day: u32,
    pub analysts: u32,
    pub avg_salary: f64,
    pub current_mttr_minutes: f64,
    /// Fraction in `0.0..=0.95`.
    pub current_auto_close_pct: f64,
    pub avg_escalation_cost: f64,
}

/// Defaults have the same shape as a request.
pub type RoiDefaults = RoiRequest;

impl Default for RoiRequest {
    fn default() -> Self {
        Self {
            alerts_per_day: 500,
            analysts: 8,
            avg_salary: 85_000.0,
            current_mttr_minutes: 18.0,
            current_auto_close_pct: 0.35,
            avg_escalation_cost: 150.0,
        }
    }
}

impl RoiRequest {
    /// Clamp every field into the range the backend accepts.
    pub fn clamped(&self) -> Self {
        Self {
            alerts_per_day: self.alerts_per_day.clamp(50, 50_000),
            analysts: self.analysts.clamp(1, 200),
            avg_salary: clamp_finite(self.avg_salary, 40_000.0, 250_000.0),
            current_mttr_minutes: clamp_finite(self.current_mttr_minutes, 1.0, 120.0),
            current_auto_close_pct: clamp_finite(self.current_auto_close_pct, 0.0, 0.95),
            avg_escalation_cost: clamp_finite(self.avg_escalation_cost, 50.0, 1000.0),
        }
    }
}

fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

/// Body of `GET /roi/defaults`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiDefaultsResponse {
    pub defaults: RoiDefaults,
}

/// Projected operating metrics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoiProjected {
    pub auto_close_pct: f64,
    pub mttr_minutes: f64,
    pub alerts_auto_handled_daily: f64,
    pub analyst_hours_freed_monthly: f64,
}

/// Projected savings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoiSavings {
    pub analyst_time_annual: f64,
    pub escalation_cost_annual: f64,
    pub compliance_annual: f64,
    pub total_annual: f64,
    pub payback_weeks: f64,
    pub roi_multiple: f64,
}

/// Body of `POST /roi/calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiResponse {
    pub inputs_echo: RoiRequest,
    pub projected: RoiProjected,
    pub savings: RoiSavings,
    pub narrative: String,
}

/// The animated figures on the results panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoiMetric {
    AutoClosePct,
    MttrMinutes,
    AlertsAutoHandledDaily,
    AnalystHoursFreedMonthly,
    TotalAnnualSavings,
}

impl RoiMetric {
    /// Every metric, in panel order.
    pub const ALL: [RoiMetric; 5] = [
        RoiMetric::AutoClosePct,
        RoiMetric::MttrMinutes,
        RoiMetric::AlertsAutoHandledDaily,
        RoiMetric::AnalystHoursFreedMonthly,
        RoiMetric::TotalAnnualSavings,
    ];

    /// Animation length. The headline savings figure runs longer.
    pub fn duration_ms(self) -> f64 {
        match self {
            RoiMetric::TotalAnnualSavings => 1500.0,
            _ => 1000.0,
        }
    }

    /// Displayed decimal places.
    pub fn decimals(self) -> i32 {
        match self {
            RoiMetric::AutoClosePct => 2,
            RoiMetric::MttrMinutes => 1,
            _ => 0,
        }
    }

    /// The metric's value in a response.
    pub fn value(self, response: &RoiResponse) -> f64 {
        match self {
            RoiMetric::AutoClosePct => response.projected.auto_close_pct,
            RoiMetric::MttrMinutes => response.projected.mttr_minutes,
            RoiMetric::AlertsAutoHandledDaily => response.projected.alerts_auto_handled_daily,
            RoiMetric::AnalystHoursFreedMonthly => response.projected.analyst_hours_freed_monthly,
            RoiMetric::TotalAnnualSavings => response.savings.total_annual,
        }
    }

    /// What to show before any response has arrived.
    pub fn fallback(self, inputs: &RoiRequest) -> f64 {
        match self {
            RoiMetric::AutoClosePct => inputs.current_auto_close_pct,
            RoiMetric::MttrMinutes => inputs.current_mttr_minutes,
            _ => 0.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A point-in-time read of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoiDisplay {
    pub auto_close_pct: f64,
    pub mttr_minutes: f64,
    pub alerts_auto_handled_daily: f64,
    pub analyst_hours_freed_monthly: f64,
    pub total_annual_savings: f64,
    /// Whether any counter is still moving.
    pub animating: bool,
}

/// Animated counters for the ROI results panel.
pub struct RoiCounters {
    settings: AnimationSettings,
    inputs: RoiRequest,
    result: Option<RoiResponse>,
    counters: [AnimatedCounter; 5],
}

impl RoiCounters {
    /// Create the panel showing fallback values for `inputs`.
    pub fn new(scheduler: Arc<dyn FrameScheduler>, settings: AnimationSettings, inputs: RoiRequest) -> Self {
        let counters = RoiMetric::ALL.map(|metric| {
            let value = metric.fallback(&inputs);
            AnimatedCounter::new(scheduler.clone(), idle_config(&settings, metric, value))
        });

        Self {
            settings,
            inputs,
            result: None,
            counters,
        }
    }

    /// Animate from the currently applied result (or the fallbacks, for the
    /// first result) to `result`.
    pub fn apply_result(&mut self, result: RoiResponse) {
        for metric in RoiMetric::ALL {
            let start = match &self.result {
                Some(previous) => metric.value(previous),
                None => metric.fallback(&self.inputs),
            };
            let end = metric.value(&result);
            let config = self
                .settings
                .counter_with(start, end, metric.duration_ms(), metric.decimals());
            self.counters[metric.index()].update(config);
        }

        tracing::debug!(
            target: "soc_copilot::roi",
            total_annual = result.savings.total_annual,
            payback_weeks = result.savings.payback_weeks,
            "applied ROI result"
        );
        self.result = Some(result);
    }

    /// Replace the prospect inputs.
    ///
    /// Before the first result the fallbacks follow the inputs immediately.
    /// Once a result is showing, the panel waits for the next result.
    pub fn set_inputs(&mut self, inputs: RoiRequest) {
        self.inputs = inputs;
        if self.result.is_some() {
            return;
        }
        for metric in RoiMetric::ALL {
            let value = metric.fallback(&self.inputs);
            self.counters[metric.index()].update(idle_config(&self.settings, metric, value));
        }
    }

    /// Current display values.
    pub fn snapshot(&self) -> RoiDisplay {
        let value = |metric: RoiMetric| self.counters[metric.index()].value();
        RoiDisplay {
            auto_close_pct: value(RoiMetric::AutoClosePct),
            mttr_minutes: value(RoiMetric::MttrMinutes),
            alerts_auto_handled_daily: value(RoiMetric::AlertsAutoHandledDaily),
            analyst_hours_freed_monthly: value(RoiMetric::AnalystHoursFreedMonthly),
            total_annual_savings: value(RoiMetric::TotalAnnualSavings),
            animating: self.is_animating(),
        }
    }

    /// The counter behind a metric, for subscribing to its signals.
    pub fn counter(&self, metric: RoiMetric) -> &AnimatedCounter {
        &self.counters[metric.index()]
    }

    /// Whether any counter is still moving.
    pub fn is_animating(&self) -> bool {
        self.counters.iter().any(AnimatedCounter::is_animating)
    }

    /// The most recently applied result.
    pub fn result(&self) -> Option<&RoiResponse> {
        self.result.as_ref()
    }

    /// The current prospect inputs.
    pub fn inputs(&self) -> &RoiRequest {
        &self.inputs
    }
}

/// A non-animating config pinned at `value`.
fn idle_config(settings: &AnimationSettings, metric: RoiMetric, value: f64) -> CountUpConfig {
    settings
        .counter_with(value, value, metric.duration_ms(), metric.decimals())
        .with_enabled(false)
}

#[cfg(test)]
mod tests {
    use soc_copilot_core::ManualFrameScheduler;

    use super::*;
    use crate::api::{Endpoint, decode};

    const RESPONSE: &str = r#"{
        "inputs_echo": {
            "alerts_per_day": 500, "analysts": 8, "avg_salary": 85000.0,
            "current_mttr_minutes": 18.0, "current_auto_close_pct": 0.35,
            "avg_escalation_cost": 150.0
        },
        "projected": {
            "auto_close_pct": 0.89, "mttr_minutes": 4.5,
            "alerts_auto_handled_daily": 445, "analyst_hours_freed_monthly": 1094
        },
        "savings": {
            "analyst_time_annual": 536856.92, "escalation_cost_annual": 174960.0,
            "compliance_annual": 40000.0, "total_annual": 751816.92,
            "payback_weeks": 8, "roi_multiple": 6.3
        },
        "narrative": "Projected savings of $751,817 per year."
    }"#;

    fn response() -> RoiResponse {
        decode(Endpoint::RoiCalculate, RESPONSE.as_bytes()).unwrap()
    }

    fn panel() -> (Arc<ManualFrameScheduler>, RoiCounters) {
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let panel = RoiCounters::new(scheduler.clone(), AnimationSettings::default(), RoiRequest::default());
        (scheduler, panel)
    }

    #[test]
    fn test_decode_contracts() {
        let response = response();
        assert_eq!(response.inputs_echo, RoiRequest::default());
        assert_eq!(response.projected.alerts_auto_handled_daily, 445.0);
        assert_eq!(response.savings.payback_weeks, 8.0);

        let defaults: RoiDefaultsResponse = decode(
            Endpoint::RoiDefaults,
            br#"{"defaults":{"alerts_per_day":500,"analysts":8,"avg_salary":85000,
                "current_mttr_minutes":18,"current_auto_close_pct":0.35,"avg_escalation_cost":150}}"#,
        )
        .unwrap();
        assert_eq!(defaults.defaults, RoiRequest::default());
    }

    #[test]
    fn test_fallbacks_before_first_result() {
        let (scheduler, panel) = panel();
        let display = panel.snapshot();

        assert_eq!(display.auto_close_pct, 0.35);
        assert_eq!(display.mttr_minutes, 18.0);
        assert_eq!(display.total_annual_savings, 0.0);
        assert!(!display.animating);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_set_inputs_before_result() {
        let (_scheduler, mut panel) = panel();
        panel.set_inputs(RoiRequest {
            current_mttr_minutes: 30.0,
            ..RoiRequest::default()
        });
        assert_eq!(panel.snapshot().mttr_minutes, 30.0);
    }

    #[test]
    fn test_first_result_animates_from_fallbacks() {
        let (scheduler, mut panel) = panel();
        panel.apply_result(response());

        let display = panel.snapshot();
        assert_eq!(display.auto_close_pct, 0.35);
        assert_eq!(display.mttr_minutes, 18.0);
        assert_eq!(display.total_annual_savings, 0.0);
        assert!(display.animating);

        scheduler.run_until_idle(16.0, 500);
        let display = panel.snapshot();
        assert_eq!(display.auto_close_pct, 0.89);
        assert_eq!(display.mttr_minutes, 4.5);
        assert_eq!(display.alerts_auto_handled_daily, 445.0);
        assert_eq!(display.analyst_hours_freed_monthly, 1094.0);
        assert_eq!(display.total_annual_savings, 751_817.0);
        assert!(!display.animating);
    }

    #[test]
    fn test_next_result_animates_from_previous() {
        let (scheduler, mut panel) = panel();
        panel.apply_result(response());
        scheduler.run_until_idle(16.0, 500);

        let mut next = response();
        next.savings.total_annual = 900_000.0;
        panel.apply_result(next);

        // Restarted from the previous result, not from zero
        assert_eq!(panel.snapshot().total_annual_savings, 751_817.0);
        let total = panel.counter(RoiMetric::TotalAnnualSavings);
        assert!(total.is_animating());

        scheduler.run_until_idle(16.0, 500);
        assert_eq!(panel.snapshot().total_annual_savings, 900_000.0);
    }

    #[test]
    fn test_durations_per_metric() {
        let (scheduler, mut panel) = panel();
        panel.apply_result(response());

        scheduler.run_frame(0.0);
        scheduler.run_frame(1000.0);
        assert!(!panel.counter(RoiMetric::AutoClosePct).is_animating());
        assert!(panel.counter(RoiMetric::TotalAnnualSavings).is_animating());

        scheduler.run_frame(1500.0);
        assert!(!panel.is_animating());
    }

    #[test]
    fn test_disabled_animation_jumps() {
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let settings = AnimationSettings {
            enabled: false,
            ..AnimationSettings::default()
        };
        let mut panel = RoiCounters::new(scheduler.clone(), settings, RoiRequest::default());
        panel.apply_result(response());

        assert_eq!(panel.snapshot().total_annual_savings, 751_817.0);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_clamped_inputs() {
        let wild = RoiRequest {
            alerts_per_day: 10,
            analysts: 0,
            avg_salary: 1e9,
            current_mttr_minutes: f64::NAN,
            current_auto_close_pct: 1.5,
            avg_escalation_cost: 10.0,
        };
        let clamped = wild.clamped();
        assert_eq!(clamped.alerts_per_day, 50);
        assert_eq!(clamped.analysts, 1);
        assert_eq!(clamped.avg_salary, 250_000.0);
        assert_eq!(clamped.current_mttr_minutes, 1.0);
        assert_eq!(clamped.current_auto_close_pct, 0.95);
        assert_eq!(clamped.avg_escalation_cost, 50.0);
    }
}
