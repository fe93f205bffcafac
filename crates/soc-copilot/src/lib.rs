//! SOC Copilot dashboard counters.
//!
//! This is the host-side crate. It re-exports the animation core and adds
//! the pieces the dashboards build on top of it:
//!
//! - [`config`]: TOML settings for animation defaults and the API location
//! - [`api`]: backend routes and the error body
//! - [`roi`]: ROI calculator contracts and its five animated result metrics
//! - [`compounding`]: compounding metrics contracts and the headline counters
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use soc_copilot::config::AnimationSettings;
//! use soc_copilot::roi::{RoiCounters, RoiRequest};
//! use soc_copilot::ManualFrameScheduler;
//!
//! let scheduler = Arc::new(ManualFrameScheduler::new());
//! let panel = RoiCounters::new(scheduler.clone(), AnimationSettings::default(), RoiRequest::default());
//!
//! // Nothing animates until a calculation result arrives.
//! assert!(!panel.is_animating());
//! assert_eq!(panel.snapshot().total_annual_savings, 0.0);
//! ```

pub use soc_copilot_core::*;

pub mod api;
pub mod compounding;
pub mod config;
mod error;
pub mod prelude;
pub mod roi;

pub use error::{Error, Result};
