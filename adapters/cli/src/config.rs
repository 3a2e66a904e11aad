//! Layered game configuration: defaults, then a TOML file, then flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Args;
use hamster_maze_core::{BorderPolicy, GameConfig, GoalPolicy};
use serde::{Deserialize, Serialize};

/// Largest seed accepted on the command line; TOML integers are signed 64-bit.
const MAX_SEED: u64 = i64::MAX as u64;

/// Game settings where every field may be left unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Args)]
#[serde(deny_unknown_fields)]
pub(crate) struct PartialConfig {
    /// Number of maze rows
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) rows: Option<u32>,
    /// Number of maze columns
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) columns: Option<u32>,
    /// Tick interval on level 1, in milliseconds
    #[arg(long = "base-speed-ms")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) base_speed_ms: Option<u64>,
    /// What happens at the maze edge: block or wrap
    #[arg(long = "border")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) border_policy: Option<BorderPolicy>,
    /// Handling of unreachable goals: as-carved or connected
    #[arg(long = "goal")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) goal_policy: Option<GoalPolicy>,
    /// Seed for reproducible mazes
    #[arg(long, value_parser = clap::value_parser!(u64).range(..=MAX_SEED))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) seed: Option<u64>,
}

impl PartialConfig {
    /// Reads a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overlays `other` on top of `self`; values set in `other` win.
    pub(crate) fn merge(self, other: PartialConfig) -> Self {
        Self {
            rows: other.rows.or(self.rows),
            columns: other.columns.or(self.columns),
            base_speed_ms: other.base_speed_ms.or(self.base_speed_ms),
            border_policy: other.border_policy.or(self.border_policy),
            goal_policy: other.goal_policy.or(self.goal_policy),
            seed: other.seed.or(self.seed),
        }
    }

    /// Fills unset values from [`GameConfig::default`].
    pub(crate) fn or_defaults(self) -> GameConfig {
        let default = GameConfig::default();
        GameConfig {
            rows: self.rows.unwrap_or(default.rows),
            columns: self.columns.unwrap_or(default.columns),
            base_speed_ms: self.base_speed_ms.unwrap_or(default.base_speed_ms),
            border_policy: self.border_policy.unwrap_or(default.border_policy),
            goal_policy: self.goal_policy.unwrap_or(default.goal_policy),
            seed: self.seed.or(default.seed),
        }
    }
}
