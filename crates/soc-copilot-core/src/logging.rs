//! Logging facilities for SOC Copilot core.
//!
//! The core crate is instrumented with `tracing`. Nothing is printed unless
//! the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("soc_copilot_core::count_up=debug")
//!     .init();
//! ```
//!
//! Frame runs and signal emission log at `trace`, animation restarts and
//! completions at `debug`, and sanitized parameters at `warn`.

/// Span names used throughout SOC Copilot for tracing.
pub mod span_names {
    /// Count-up animation span.
    pub const COUNT_UP: &str = "soc_copilot::count_up";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "soc_copilot_core";
    /// Frame scheduler target.
    pub const FRAME: &str = "soc_copilot_core::frame";
    /// Count-up animator target.
    pub const COUNT_UP: &str = "soc_copilot_core::count_up";
    /// Signal target.
    pub const SIGNAL: &str = "soc_copilot_core::signal";
}

/// A span guard for timing an operation.
///
/// The span is entered on creation and exited when the guard drops.
///
/// ```
/// use soc_copilot_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("render_dashboard");
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "soc_copilot::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
