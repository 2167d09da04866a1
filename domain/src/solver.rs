//! Wire types for the external solver service.
//!
//! The solver is a black box reached over HTTP: it receives the model and a
//! solver name and answers with a status, objective value and variable
//! assignment.

use crate::mcp::entities::OptimizationModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub problem: OptimizationModel,
    pub solver: String,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    #[serde(alias = "optimal")]
    Optimal,
    #[serde(alias = "feasible")]
    Feasible,
    #[serde(alias = "infeasible")]
    Infeasible,
    #[serde(alias = "unbounded")]
    Unbounded,
    #[serde(alias = "error")]
    Error,
}

impl SolveStatus {
    /// Whether the response carries a usable assignment.
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
    pub status: SolveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_value: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolveResponse {
    pub fn optimal(objective_value: f64, variables: BTreeMap<String, f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective_value: Some(objective_value),
            variables,
            error: None,
        }
    }

    pub fn failed(status: SolveStatus, error: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variables: BTreeMap::new(),
            error: Some(error.into()),
        }
    }
}
