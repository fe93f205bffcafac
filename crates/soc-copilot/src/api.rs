//! Backend endpoint contracts.
//!
//! The dashboards talk to a JSON-over-HTTP backend that lives outside this
//! workspace. This module only describes the routes and the generic error
//! body; transports are supplied by the host.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::Result;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend routes used by the four dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // SOC analytics
    SocQuery,
    // Runtime evolution
    Deployments,
    ProcessAlert,
    ProcessAlertBlocked,
    SimulateFailedGate,
    // Alert triage
    AlertQueue,
    AnalyzeAlert,
    ExecuteAction,
    ResetAlerts,
    // Compounding
    CompoundingMetrics { weeks: u32 },
    EvolutionEvents { limit: u32 },
    ResetDemo,
    ResetAllDemo,
    // ROI calculator
    RoiDefaults,
    RoiCalculate,
}

impl Endpoint {
    /// HTTP method.
    pub fn method(self) -> Method {
        match self {
            Endpoint::Deployments
            | Endpoint::AlertQueue
            | Endpoint::CompoundingMetrics { .. }
            | Endpoint::EvolutionEvents { .. }
            | Endpoint::RoiDefaults => Method::Get,
            _ => Method::Post,
        }
    }

    /// Path relative to the API base, including any query string.
    pub fn path(self) -> String {
        match self {
            Endpoint::SocQuery => "/soc/query".into(),
            Endpoint::Deployments => "/deployments".into(),
            Endpoint::ProcessAlert => "/alert/process".into(),
            Endpoint::ProcessAlertBlocked => "/alert/process-blocked".into(),
            Endpoint::SimulateFailedGate => "/eval/simulate-failure".into(),
            Endpoint::AlertQueue => "/alerts/queue".into(),
            Endpoint::AnalyzeAlert => "/alert/analyze".into(),
            Endpoint::ExecuteAction => "/action/execute".into(),
            Endpoint::ResetAlerts => "/alerts/reset".into(),
            Endpoint::CompoundingMetrics { weeks } => format!("/metrics/compounding?weeks={weeks}"),
            Endpoint::EvolutionEvents { limit } => format!("/metrics/evolution-events?limit={limit}"),
            Endpoint::ResetDemo => "/demo/reset".into(),
            Endpoint::ResetAllDemo => "/demo/reset-all".into(),
            Endpoint::RoiDefaults => "/roi/defaults".into(),
            Endpoint::RoiCalculate => "/roi/calculate".into(),
        }
    }

    /// Full relative URL under `base_path`, e.g. `/api/roi/defaults`.
    pub fn url(self, base_path: &str) -> String {
        format!("{}{}", base_path.trim_end_matches('/'), self.path())
    }
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable reason.
    pub detail: serde_json::Value,
}

impl ApiErrorBody {
    /// The reason as display text.
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Decode a response body, logging the failure the way the dashboards do.
pub fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::warn!(
            target: "soc_copilot::api",
            method = %endpoint.method(),
            path = %endpoint.path(),
            %err,
            "failed to decode response"
        );
        err.into()
    })
}
