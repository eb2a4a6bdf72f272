//! Ladder configuration: tiers, capacity, thresholds and the bottom-tier policy.
//!
//! Defaults describe the reference ladder (15 tiers of 4, two wins up, two
//! losses down). `LadderConfig::from_env` overrides any of them from the
//! environment:
//!
//! - `LADDER_TIERS`: comma-separated tier names, highest first
//! - `LADDER_CAPACITY`: players per tier
//! - `LADDER_PROMOTION_WINS` / `LADDER_DEMOTION_LOSSES`: round thresholds
//! - `LADDER_BOTTOM_DEMOTION`: `eliminate` or `stay`

use crate::models::{LadderError, TierLadder};
use serde::{Deserialize, Serialize};

/// What happens to a player who reaches the demotion threshold in the lowest tier.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomDemotion {
    /// Removed from the ladder. The open slot is not refilled automatically.
    #[default]
    Eliminate,
    /// Kept in the lowest tier with a fresh round.
    Stay,
}

impl std::str::FromStr for BottomDemotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eliminate" | "remove" => Ok(BottomDemotion::Eliminate),
            "stay" | "reset" => Ok(BottomDemotion::Stay),
            other => Err(format!("unknown bottom demotion policy: {}", other)),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LadderConfig {
    pub tiers: TierLadder,
    /// Active (non-pending) players allowed per tier.
    pub capacity: usize,
    /// Round wins that end a player's round with a promotion.
    pub promotion_threshold: u32,
    /// Round losses that end a player's round with a demotion.
    pub demotion_threshold: u32,
    pub bottom_demotion: BottomDemotion,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            tiers: TierLadder::default(),
            capacity: default_capacity(),
            promotion_threshold: default_threshold(),
            demotion_threshold: default_threshold(),
            bottom_demotion: BottomDemotion::default(),
        }
    }
}

fn default_capacity() -> usize {
    4
}

fn default_threshold() -> u32 {
    2
}

impl LadderConfig {
    /// Defaults overridden by `LADDER_*` environment variables. Unparseable
    /// numbers fall back to the default with a warning; an invalid tier list
    /// is an error.
    pub fn from_env() -> Result<Self, LadderError> {
        let mut config = Self::default();
        if let Some(raw) = env_value("LADDER_TIERS") {
            config.tiers = TierLadder::new(raw.split(','))?;
        }
        config.capacity = env_parse("LADDER_CAPACITY")
            .filter(|c: &usize| *c > 0)
            .unwrap_or(config.capacity);
        config.promotion_threshold = env_parse("LADDER_PROMOTION_WINS")
            .filter(|t: &u32| *t > 0)
            .unwrap_or(config.promotion_threshold);
        config.demotion_threshold = env_parse("LADDER_DEMOTION_LOSSES")
            .filter(|t: &u32| *t > 0)
            .unwrap_or(config.demotion_threshold);
        config.bottom_demotion = env_parse("LADDER_BOTTOM_DEMOTION").unwrap_or(config.bottom_demotion);
        Ok(config)
    }

    pub fn with_tiers(mut self, tiers: TierLadder) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_bottom_demotion(mut self, policy: BottomDemotion) -> Self {
        self.bottom_demotion = policy;
        self
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_value(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
