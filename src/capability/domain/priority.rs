//! Coarse execution tiers.

use super::ParsePriorityTierError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered tier used to break ties between capabilities that no dependency
/// edge orders.
///
/// Variants are declared lowest first; the derived `Ord` is the tie-break
/// order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    /// Site, climate and geometry inputs.
    #[default]
    Foundation,
    /// Heating and cooling demand.
    Demand,
    /// Building systems (HVAC, hot water).
    Systems,
    /// Site energy and carbon totals.
    Aggregation,
    /// Compliance checks and reporting.
    Analysis,
}

impl PriorityTier {
    /// Every tier, lowest first.
    pub const ALL: [Self; 5] = [
        Self::Foundation,
        Self::Demand,
        Self::Systems,
        Self::Aggregation,
        Self::Analysis,
    ];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Demand => "demand",
            Self::Systems => "systems",
            Self::Aggregation => "aggregation",
            Self::Analysis => "analysis",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PriorityTier {
    type Error = ParsePriorityTierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "foundation" => Ok(Self::Foundation),
            "demand" => Ok(Self::Demand),
            "systems" => Ok(Self::Systems),
            "aggregation" => Ok(Self::Aggregation),
            "analysis" => Ok(Self::Analysis),
            _ => Err(ParsePriorityTierError(value.to_owned())),
        }
    }
}
