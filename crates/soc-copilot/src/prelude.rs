//! Prelude module for SOC Copilot.
//!
//! ```ignore
//! use soc_copilot::prelude::*;
//! ```

// ============================================================================
// Animation Core
// ============================================================================

pub use crate::{AnimatedCounter, CountUpConfig, Easing, FrameStep};

// ============================================================================
// Frame Scheduling
// ============================================================================

pub use crate::{FrameClock, FrameHandle, FrameScheduler, ManualFrameScheduler};

// ============================================================================
// Signals
// ============================================================================

pub use crate::{ConnectionId, Signal};

// ============================================================================
// Dashboard Panels
// ============================================================================

pub use crate::compounding::{CompoundingData, HeadlineCounters, HeadlineDisplay, HeadlineMetric};
pub use crate::roi::{RoiCounters, RoiDisplay, RoiMetric, RoiRequest, RoiResponse};

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use crate::config::{AnimationSettings, DashboardConfig};
pub use crate::{Error, Result};
