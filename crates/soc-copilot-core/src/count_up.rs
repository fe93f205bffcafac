//! Count-up animation for displayed metrics.
//!
//! [`CountUp`] is the pure state machine: it owns an [`AnimationState`],
//! accepts new inputs through [`CountUp::update`], and moves forward only
//! through [`CountUp::advance_frame`]. It never schedules anything itself.
//!
//! [`AnimatedCounter`] binds a `CountUp` to a [`FrameScheduler`]. It requests
//! one frame at a time, cancels the pending frame whenever the inputs change
//! or the counter is torn down, and notifies the host on every frame through
//! [`AnimatedCounter::value_changed`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use soc_copilot_core::{AnimatedCounter, CountUpConfig, ManualFrameScheduler};
//!
//! let scheduler = Arc::new(ManualFrameScheduler::new());
//! let counter = AnimatedCounter::new(
//!     scheduler.clone(),
//!     CountUpConfig::new(0.0, 100.0).with_duration_ms(1000.0),
//! );
//!
//! scheduler.run_frame(0.0);
//! assert_eq!(counter.value(), 0.0);
//! scheduler.run_frame(500.0);
//! assert_eq!(counter.value(), 88.0);
//! scheduler.run_frame(1000.0);
//! assert_eq!(counter.value(), 100.0);
//! assert!(!counter.is_animating());
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::easing::Easing;
use crate::error::ParamError;
use crate::frame::{FrameHandle, FrameScheduler};
use crate::logging::{span_names, targets};
use crate::signal::Signal;

/// Default animation length in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 1500.0;

/// Largest number of decimal places honored when rounding.
pub const MAX_DECIMALS: u32 = 15;

/// Magnitude from which every `f64` is an integer.
const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0; // 2^52

/// Round `value` to `decimals` places for display.
///
/// With `decimals == 0` halves round toward positive infinity (`2.5 -> 3`,
/// `-2.5 -> -2`), matching browser `Math.round`. Otherwise halves round
/// away from zero. `decimals` above [`MAX_DECIMALS`] is capped.
///
/// Values too large to carry the requested digits are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() || value.abs() >= EXACT_INTEGER_LIMIT {
        return value;
    }
    if decimals == 0 {
        let floor = value.floor();
        return if value - floor >= 0.5 { floor + 1.0 } else { floor };
    }
    let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    let scaled = value * factor;
    if scaled.abs() >= EXACT_INTEGER_LIMIT {
        return value;
    }
    scaled.round() / factor
}

/// Inputs to a count-up animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountUpConfig {
    /// Value shown when the animation begins.
    pub start: f64,
    /// Value shown when the animation completes.
    pub end: f64,
    /// Animation length in milliseconds.
    pub duration_ms: f64,
    /// Decimal places in the displayed value.
    pub decimals: u32,
    /// When false the value jumps straight to `end`.
    pub enabled: bool,
    /// Progress curve.
    pub easing: Easing,
}

impl CountUpConfig {
    /// Animate from `start` to `end` with the default duration, zero
    /// decimals and ease-out cubic easing.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            duration_ms: DEFAULT_DURATION_MS,
            decimals: 0,
            enabled: true,
            easing: Easing::EaseOutCubic,
        }
    }

    /// Set the duration in milliseconds.
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the duration.
    pub fn with_duration(self, duration: Duration) -> Self {
        self.with_duration_ms(duration.as_secs_f64() * 1000.0)
    }

    /// Set the number of decimal places. Negative values mean zero.
    pub fn with_decimals(mut self, decimals: i32) -> Self {
        self.decimals = decimals.max(0) as u32;
        self
    }

    /// Enable or disable the animation.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Same settings, different range.
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Report parameters the animator would have to sanitize.
    ///
    /// Animators accept any config; this is for callers that prefer an
    /// error over silent correction.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !self.start.is_finite() {
            return Err(ParamError::NonFinite {
                field: "start",
                value: self.start,
            });
        }
        if !self.end.is_finite() {
            return Err(ParamError::NonFinite {
                field: "end",
                value: self.end,
            });
        }
        if !(self.duration_ms.is_finite() && self.duration_ms > 0.0) {
            return Err(ParamError::NonPositiveDuration(self.duration_ms));
        }
        Ok(())
    }

    /// Replace non-finite bounds and durations with usable values.
    fn sanitized(mut self) -> Self {
        match (self.start.is_finite(), self.end.is_finite()) {
            (true, true) => {}
            (false, true) => self.start = self.end,
            (true, false) => self.end = self.start,
            (false, false) => {
                self.start = 0.0;
                self.end = 0.0;
            }
        }
        if !(self.duration_ms.is_finite() && self.duration_ms > 0.0) {
            // Completes on the first frame.
            self.duration_ms = 0.0;
        }
        self.decimals = self.decimals.min(MAX_DECIMALS);
        self
    }

    /// Inputs whose change restarts the animation. Decimals only affect
    /// rounding.
    fn trigger(&self) -> (u64, u64, u64, bool, Easing) {
        (
            self.start.to_bits(),
            self.end.to_bits(),
            self.duration_ms.to_bits(),
            self.enabled,
            self.easing,
        )
    }
}

impl Default for CountUpConfig {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Result of advancing an animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// Not finished; another frame is needed.
    Continue,
    /// This frame completed the animation.
    Complete,
    /// Nothing was animating.
    Idle,
}

/// Mutable animation state for one displayed value.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    /// Interpolated value at full precision.
    pub current_value: f64,
    /// Value at the start of the interpolation.
    pub target_start: f64,
    /// Value at the end of the interpolation.
    pub target_end: f64,
    /// Frame time at which the animation began. `None` before its first frame.
    pub start_timestamp: Option<f64>,
    /// Pending frame, if a scheduler-driven counter has one outstanding.
    pub frame_handle: Option<FrameHandle>,
    /// Incremented on every restart, finish and teardown.
    pub generation: u64,
    /// Linear progress of the latest frame, `0.0..=1.0`.
    pub progress: f64,
    /// Whether frames are still needed.
    pub animating: bool,
}

/// A count-up animation stepped by explicit frame timestamps.
#[derive(Debug, Clone)]
pub struct CountUp {
    config: CountUpConfig,
    state: AnimationState,
}

impl CountUp {
    /// Create an animator and start it.
    ///
    /// When `config.enabled` is false the value is `end` immediately.
    pub fn new(config: CountUpConfig) -> Self {
        let config = sanitize_logged(config);
        let mut count_up = Self {
            config,
            state: AnimationState {
                current_value: config.start,
                target_start: config.start,
                target_end: config.end,
                start_timestamp: None,
                frame_handle: None,
                generation: 0,
                progress: 0.0,
                animating: false,
            },
        };
        count_up.restart();
        count_up
    }

    /// Supply new inputs.
    ///
    /// Returns `true` if the animation restarted, which happens when start,
    /// end, duration, enabled or easing changed. A change to `decimals`
    /// alone takes effect without restarting.
    pub fn update(&mut self, config: CountUpConfig) -> bool {
        let config = sanitize_logged(config);
        let changed = config.trigger() != self.config.trigger();
        self.config = config;
        if changed {
            self.restart();
        }
        changed
    }

    /// Supply a new range, keeping the other settings.
    pub fn set_range(&mut self, start: f64, end: f64) -> bool {
        self.update(self.config.with_range(start, end))
    }

    /// Advance to frame time `now`.
    ///
    /// The first frame after a restart fixes the start timestamp and shows
    /// `start`. Progress is `min(elapsed / duration, 1)`; at `1` the value is
    /// exactly `end` and the animation stops.
    pub fn advance_frame(&mut self, now: f64) -> FrameStep {
        if !self.state.animating {
            return FrameStep::Idle;
        }

        let started = *self.state.start_timestamp.get_or_insert(now);
        let elapsed = (now - started).max(0.0);
        let duration = self.config.duration_ms;
        let progress = if duration > 0.0 {
            (elapsed / duration).min(1.0)
        } else {
            1.0
        };
        self.state.progress = progress;

        if progress >= 1.0 {
            self.state.current_value = self.state.target_end;
            self.state.animating = false;
            tracing::debug!(
                target: targets::COUNT_UP,
                generation = self.state.generation,
                end = self.state.target_end,
                "count-up complete"
            );
            return FrameStep::Complete;
        }

        let (start, end) = (self.state.target_start, self.state.target_end);
        let value = self.config.easing.interpolate(start, end, progress);
        self.state.current_value = value.clamp(start.min(end), start.max(end));
        FrameStep::Continue
    }

    /// Jump to `end` and stop.
    pub fn finish(&mut self) {
        self.state.generation += 1;
        self.state.current_value = self.state.target_end;
        self.state.progress = 1.0;
        self.state.animating = false;
    }

    /// Stop where the animation is, leaving the current value in place.
    pub fn halt(&mut self) {
        self.state.generation += 1;
        self.state.animating = false;
    }

    /// The displayed value, rounded to the configured decimals.
    pub fn current_value(&self) -> f64 {
        round_to(self.state.current_value, self.config.decimals)
    }

    /// The interpolated value at full precision.
    pub fn raw_value(&self) -> f64 {
        self.state.current_value
    }

    /// Linear progress of the most recent frame.
    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    /// Whether more frames are needed.
    pub fn is_animating(&self) -> bool {
        self.state.animating
    }

    /// Current restart generation.
    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    /// The active, sanitized inputs.
    pub fn config(&self) -> &CountUpConfig {
        &self.config
    }

    /// The animation state.
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub(crate) fn set_frame_handle(&mut self, handle: Option<FrameHandle>) {
        self.state.frame_handle = handle;
    }

    pub(crate) fn take_frame_handle(&mut self) -> Option<FrameHandle> {
        self.state.frame_handle.take()
    }

    fn restart(&mut self) {
        let config = self.config;
        let state = &mut self.state;
        state.generation += 1;
        state.target_start = config.start;
        state.target_end = config.end;
        state.start_timestamp = None;

        if config.enabled {
            state.current_value = config.start;
            state.progress = 0.0;
            state.animating = true;
        } else {
            state.current_value = config.end;
            state.progress = 1.0;
            state.animating = false;
        }

        tracing::debug!(
            target: targets::COUNT_UP,
            generation = state.generation,
            start = config.start,
            end = config.end,
            duration_ms = config.duration_ms,
            enabled = config.enabled,
            "count-up restarted"
        );
    }
}

fn sanitize_logged(config: CountUpConfig) -> CountUpConfig {
    if let Err(err) = config.validate() {
        tracing::warn!(target: targets::COUNT_UP, %err, "sanitizing count-up parameters");
    }
    config.sanitized()
}

struct CounterInner {
    scheduler: Arc<dyn FrameScheduler>,
    animation: Mutex<CountUp>,
    value_changed: Signal<f64>,
    finished: Signal<f64>,
}

impl CounterInner {
    /// Request the next frame for the animation's current generation.
    fn schedule(self: &Arc<Self>, animation: &mut CountUp) {
        let generation = animation.generation();
        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = self.scheduler.request_frame(Box::new(move |now| {
            if let Some(inner) = weak.upgrade() {
                inner.on_frame(generation, now);
            }
        }));
        animation.set_frame_handle(Some(handle));
    }

    fn cancel_pending(&self, animation: &mut CountUp) {
        if let Some(handle) = animation.take_frame_handle() {
            if let Err(err) = self.scheduler.cancel_frame(handle) {
                tracing::trace!(target: targets::COUNT_UP, %err, "pending frame already gone");
            }
        }
    }

    fn on_frame(self: &Arc<Self>, generation: u64, now: f64) {
        let _span = tracing::trace_span!(target: targets::COUNT_UP, span_names::COUNT_UP, generation).entered();
        let (step, value) = {
            let mut animation = self.animation.lock();
            if animation.generation() != generation {
                tracing::trace!(target: targets::COUNT_UP, generation, "dropping stale frame");
                return;
            }
            animation.set_frame_handle(None);

            let step = animation.advance_frame(now);
            if step == FrameStep::Continue {
                self.schedule(&mut animation);
            }
            (step, animation.current_value())
        };

        if step != FrameStep::Idle {
            self.value_changed.emit(value);
        }
        if step == FrameStep::Complete {
            self.finished.emit(value);
        }
    }
}

/// A count-up animation driven by a [`FrameScheduler`].
///
/// At most one frame is pending per counter. Changing the inputs cancels
/// it before a new one is requested, and frames that were already handed
/// to the scheduler carry a generation number so that a superseded frame
/// can never write. Dropping the counter cancels its pending frame.
pub struct AnimatedCounter {
    inner: Arc<CounterInner>,
}

impl AnimatedCounter {
    /// Create a counter and, if enabled, request its first frame.
    pub fn new(scheduler: Arc<dyn FrameScheduler>, config: CountUpConfig) -> Self {
        let inner = Arc::new(CounterInner {
            scheduler,
            animation: Mutex::new(CountUp::new(config)),
            value_changed: Signal::new(),
            finished: Signal::new(),
        });

        {
            let mut animation = inner.animation.lock();
            if animation.is_animating() {
                inner.schedule(&mut animation);
            }
        }

        Self { inner }
    }

    /// Supply new inputs.
    ///
    /// If the restart trigger changed, the pending frame is cancelled, the
    /// value resets (to `start`, or to `end` when disabled) and
    /// `value_changed` fires. Returns whether the animation restarted.
    pub fn update(&self, config: CountUpConfig) -> bool {
        let value = {
            let mut animation = self.inner.animation.lock();
            if !animation.update(config) {
                return false;
            }
            self.inner.cancel_pending(&mut animation);
            if animation.is_animating() {
                self.inner.schedule(&mut animation);
            }
            animation.current_value()
        };

        self.inner.value_changed.emit(value);
        true
    }

    /// Supply a new range, keeping the other settings.
    pub fn set_range(&self, start: f64, end: f64) -> bool {
        let config = self.config().with_range(start, end);
        self.update(config)
    }

    /// Jump to the end value and stop.
    pub fn finish(&self) {
        let value = {
            let mut animation = self.inner.animation.lock();
            if !animation.is_animating() {
                return;
            }
            self.inner.cancel_pending(&mut animation);
            animation.finish();
            animation.current_value()
        };

        self.inner.value_changed.emit(value);
        self.inner.finished.emit(value);
    }

    /// Cancel any pending frame and freeze the value.
    ///
    /// Called automatically on drop.
    pub fn teardown(&self) {
        let mut animation = self.inner.animation.lock();
        self.inner.cancel_pending(&mut animation);
        animation.halt();
    }

    /// The displayed value.
    pub fn value(&self) -> f64 {
        self.inner.animation.lock().current_value()
    }

    /// The interpolated value at full precision.
    pub fn raw_value(&self) -> f64 {
        self.inner.animation.lock().raw_value()
    }

    /// Linear progress of the most recent frame.
    pub fn progress(&self) -> f64 {
        self.inner.animation.lock().progress()
    }

    /// Whether frames are still being requested.
    pub fn is_animating(&self) -> bool {
        self.inner.animation.lock().is_animating()
    }

    /// Whether a frame is currently outstanding with the scheduler.
    pub fn has_pending_frame(&self) -> bool {
        self.inner
            .animation
            .lock()
            .state()
            .frame_handle
            .is_some_and(|handle| self.inner.scheduler.is_pending(handle))
    }

    /// The active, sanitized inputs.
    pub fn config(&self) -> CountUpConfig {
        *self.inner.animation.lock().config()
    }

    /// A copy of the animation state.
    pub fn state(&self) -> AnimationState {
        self.inner.animation.lock().state().clone()
    }

    /// Emitted with the displayed value on every frame and every restart.
    pub fn value_changed(&self) -> &Signal<f64> {
        &self.inner.value_changed
    }

    /// Emitted with the end value once per completed animation.
    pub fn finished(&self) -> &Signal<f64> {
        &self.inner.finished
    }
}

impl Drop for AnimatedCounter {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for AnimatedCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let animation = self.inner.animation.lock();
        f.debug_struct("AnimatedCounter")
            .field("config", animation.config())
            .field("state", animation.state())
            .finish()
    }
}

static_assertions::assert_impl_all!(AnimatedCounter: Send, Sync);
