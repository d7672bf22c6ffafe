//! # Flag Registry
//!
//! The static, closed set of feature flags compiled into the binary.
//!
//! Invariants:
//! - Every `FlagId` appears exactly once in `REGISTRY`.
//! - `rollout` is `Some` if and only if the flag is percentage-rolled-out;
//!   the `Option` makes the pairing structural rather than a runtime check.

use crate::{FlagError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// FLAG ID
// =============================================================================

/// Identifier for a feature flag.
///
/// A closed enum: the registry cannot grow at runtime. The wire form is the
/// SCREAMING_SNAKE_CASE token (`"CARERS_DASHBOARD"` etc.), stable across
/// releases because persisted state and the HTTP API both key on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagId {
    CarersDashboard,
    AdvancedSearch,
    AiInsights,
    EnhancedReporting,
    WorkflowAutomation,
}

impl FlagId {
    /// All ids, in registry order.
    pub const ALL: [FlagId; 5] = [
        FlagId::CarersDashboard,
        FlagId::AdvancedSearch,
        FlagId::AiInsights,
        FlagId::EnhancedReporting,
        FlagId::WorkflowAutomation,
    ];

    /// The stable wire token for this id.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagId::CarersDashboard => "CARERS_DASHBOARD",
            FlagId::AdvancedSearch => "ADVANCED_SEARCH",
            FlagId::AiInsights => "AI_INSIGHTS",
            FlagId::EnhancedReporting => "ENHANCED_REPORTING",
            FlagId::WorkflowAutomation => "WORKFLOW_AUTOMATION",
        }
    }
}

impl fmt::Display for FlagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagId {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CARERS_DASHBOARD" => Ok(FlagId::CarersDashboard),
            "ADVANCED_SEARCH" => Ok(FlagId::AdvancedSearch),
            "AI_INSIGHTS" => Ok(FlagId::AiInsights),
            "ENHANCED_REPORTING" => Ok(FlagId::EnhancedReporting),
            "WORKFLOW_AUTOMATION" => Ok(FlagId::WorkflowAutomation),
            other => Err(FlagError::UnknownFlag(other.to_string())),
        }
    }
}

// =============================================================================
// FLAG DEFINITION
// =============================================================================

/// Immutable definition of a feature flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDefinition {
    /// Stable identifier.
    pub id: FlagId,

    /// Human-readable name for admin surfaces.
    pub display_name: &'static str,

    /// What the flag controls.
    pub description: &'static str,

    /// Resolved value when the flag is not percentage-rolled-out.
    pub default_enabled: bool,

    /// Rollout percentage (0-100). `Some` means membership is decided by
    /// the rollout evaluator instead of `default_enabled`.
    pub rollout: Option<u8>,
}

impl FlagDefinition {
    /// Whether this flag is governed by a percentage rollout.
    #[must_use]
    pub fn is_rollout(&self) -> bool {
        self.rollout.is_some()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// The compiled-in flag registry. One entry per `FlagId`, in `FlagId::ALL`
/// order.
pub const REGISTRY: [FlagDefinition; 5] = [
    FlagDefinition {
        id: FlagId::CarersDashboard,
        display_name: "Carers Dashboard",
        description: "Redesigned dashboard for foster carers with placement timelines",
        default_enabled: false,
        rollout: Some(20),
    },
    FlagDefinition {
        id: FlagId::AdvancedSearch,
        display_name: "Advanced Search",
        description: "Cross-record search over case notes, tasks and correspondence",
        default_enabled: true,
        rollout: None,
    },
    FlagDefinition {
        id: FlagId::AiInsights,
        display_name: "AI Insights",
        description: "Assistant-generated summaries on case note timelines",
        default_enabled: false,
        rollout: Some(10),
    },
    FlagDefinition {
        id: FlagId::EnhancedReporting,
        display_name: "Enhanced Reporting",
        description: "Exportable caseload and compliance reports",
        default_enabled: false,
        rollout: Some(50),
    },
    FlagDefinition {
        id: FlagId::WorkflowAutomation,
        display_name: "Workflow Automation",
        description: "Automatic task creation from statutory visit schedules",
        default_enabled: false,
        rollout: None,
    },
];

/// All flag definitions, in registry order.
#[must_use]
pub fn definitions() -> &'static [FlagDefinition] {
    &REGISTRY
}

/// Look up the definition for an id.
///
/// Always succeeds: the registry carries exactly one entry per `FlagId`.
#[must_use]
pub fn definition(id: FlagId) -> &'static FlagDefinition {
    // REGISTRY is in FlagId::ALL order; index by discriminant position.
    match id {
        FlagId::CarersDashboard => &REGISTRY[0],
        FlagId::AdvancedSearch => &REGISTRY[1],
        FlagId::AiInsights => &REGISTRY[2],
        FlagId::EnhancedReporting => &REGISTRY[3],
        FlagId::WorkflowAutomation => &REGISTRY[4],
    }
}

// =============================================================================
// TESTS
// =============================================================================
