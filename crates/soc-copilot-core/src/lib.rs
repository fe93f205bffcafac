//! Core systems for SOC Copilot counters.
//!
//! This crate provides the animation engine behind every animated metric on
//! the SOC Copilot dashboards:
//!
//! - **Easing**: progress curves, ease-out cubic by default
//! - **Frames**: an injectable animation-frame scheduler with cancellable handles
//! - **Count-up**: a numeric animation that eases a displayed value from a
//!   start to an end value over a fixed duration
//! - **Signals**: change notification so hosts re-render on every frame
//!
//! # Count-up Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use soc_copilot_core::{AnimatedCounter, CountUpConfig, ManualFrameScheduler};
//!
//! let scheduler = Arc::new(ManualFrameScheduler::new());
//! let savings = AnimatedCounter::new(
//!     scheduler.clone(),
//!     CountUpConfig::new(0.0, 412_000.0).with_duration_ms(1500.0),
//! );
//!
//! let renders = Arc::new(AtomicUsize::new(0));
//! let renders_clone = renders.clone();
//! savings.value_changed().connect(move |_value| {
//!     renders_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! // Drive at ~60 fps until the animation settles
//! scheduler.run_until_idle(16.0, 200);
//! assert_eq!(savings.value(), 412_000.0);
//! assert!(renders.load(Ordering::SeqCst) > 1);
//! ```

mod count_up;
mod easing;
mod error;
mod frame;
pub mod logging;
mod signal;

pub use count_up::{
    AnimatedCounter, AnimationState, CountUp, CountUpConfig, DEFAULT_DURATION_MS, FrameStep,
    MAX_DECIMALS, round_to,
};
pub use easing::Easing;
pub use error::{CoreError, FrameError, ParamError, Result};
pub use frame::{FrameCallback, FrameClock, FrameHandle, FrameScheduler, ManualFrameScheduler};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
