//! The ordered list of tier names, highest first.

use crate::models::ladder::LadderError;
use serde::{Deserialize, Serialize};

/// Tiers of the reference ladder, highest to lowest.
pub const DEFAULT_TIERS: [&str; 15] = [
    "Cosmic",
    "Universal",
    "Galaxy",
    "Global",
    "International",
    "Elite 1",
    "Elite 2",
    "Elite 3",
    "Gold 1",
    "Gold 2",
    "Gold 3",
    "Silver 1",
    "Silver 2",
    "Silver 3",
    "Bronze",
];

/// Fixed ordered tier sequence. Index 0 is the top of the ladder.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierLadder {
    names: Vec<String>,
}

impl Default for TierLadder {
    fn default() -> Self {
        Self::new(DEFAULT_TIERS).unwrap_or(Self { names: Vec::new() })
    }
}

impl TierLadder {
    /// Build a ladder from names (highest first). Names are trimmed; empty or
    /// duplicate (case-insensitive) names are rejected.
    pub fn new<I, S>(names: I) -> Result<Self, LadderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || out.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                return Err(LadderError::TierInvalid(name.to_string()));
            }
            out.push(name.to_string());
        }
        if out.is_empty() {
            return Err(LadderError::TierInvalid(String::new()));
        }
        Ok(Self { names: out })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a tier (case-insensitive).
    pub fn index_of(&self, tier: &str) -> Option<usize> {
        let tier = tier.trim();
        self.names.iter().position(|n| n.eq_ignore_ascii_case(tier))
    }

    /// Canonical spelling of a tier name, or `TierInvalid`.
    pub fn resolve(&self, tier: &str) -> Result<&str, LadderError> {
        self.index_of(tier)
            .map(|i| self.names[i].as_str())
            .ok_or_else(|| LadderError::TierInvalid(tier.trim().to_string()))
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Tier one step up (promotion direction), `None` at the top.
    pub fn above(&self, index: usize) -> Option<&str> {
        index.checked_sub(1).and_then(|i| self.name(i))
    }

    /// Tier one step down (demotion direction), `None` at the bottom.
    pub fn below(&self, index: usize) -> Option<&str> {
        self.name(index + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
