// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Scheduler configuration (`scheduler.toml`).
//!
//! Every field is optional; missing fields take their defaults.
//!
//! ```toml
//! strategy = "parallel_exhaustive"
//! time_limit_ms = 2000
//! step_limit = 5000000
//! log_interval_ms = 500
//! prune_dominated = true
//! threads = 4
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which algorithm searches for the placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Every subset and ordering, sequentially. Proves maximality.
    #[default]
    Exhaustive,
    /// Every subset and ordering on a rayon pool; same result as `Exhaustive`.
    ParallelExhaustive,
    /// Smallest task into the tightest gap. Fast, not always maximal.
    BestFit,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Exhaustive => write!(f, "exhaustive"),
            StrategyKind::ParallelExhaustive => write!(f, "parallel_exhaustive"),
            StrategyKind::BestFit => write!(f, "best_fit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub strategy: StrategyKind,
    /// Wall-clock budget for one search.
    pub time_limit_ms: Option<u64>,
    /// Budget of ordered fit attempts for one search.
    pub step_limit: Option<u64>,
    /// Interval between progress lines; no progress logging when unset.
    pub log_interval_ms: Option<u64>,
    /// Skip subsets that cannot beat the incumbent. Never changes the result.
    pub prune_dominated: bool,
    /// Worker count for `parallel_exhaustive`; the global rayon pool when unset.
    pub threads: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            time_limit_ms: None,
            step_limit: None,
            log_interval_ms: None,
            prune_dominated: true,
            threads: None,
        }
    }
}

impl SchedulerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Rejects limits of zero, which would stop every search before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero = |field| Err(ConfigError::ZeroLimit { field });
        if self.time_limit_ms == Some(0) {
            return zero("time_limit_ms");
        }
        if self.step_limit == Some(0) {
            return zero("step_limit");
        }
        if self.log_interval_ms == Some(0) {
            return zero("log_interval_ms");
        }
        if self.threads == Some(0) {
            return zero("threads");
        }
        Ok(())
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    #[inline]
    pub fn log_interval(&self) -> Option<Duration> {
        self.log_interval_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = SchedulerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SchedulerConfig::default());
        assert_eq!(config.strategy, StrategyKind::Exhaustive);
        assert!(config.prune_dominated);
        assert_eq!(config.time_limit(), None);
    }

    #[test]
    fn test_full_document() {
        let raw = r#"
            strategy = "parallel_exhaustive"
            time_limit_ms = 2000
            step_limit = 5000000
            log_interval_ms = 500
            prune_dominated = false
            threads = 4
        "#;
        let config = SchedulerConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.strategy, StrategyKind::ParallelExhaustive);
        assert_eq!(config.time_limit(), Some(Duration::from_secs(2)));
        assert_eq!(config.step_limit, Some(5_000_000));
        assert_eq!(config.log_interval(), Some(Duration::from_millis(500)));
        assert!(!config.prune_dominated);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_strategy_names() {
        for (name, kind) in [
            ("exhaustive", StrategyKind::Exhaustive),
            ("parallel_exhaustive", StrategyKind::ParallelExhaustive),
            ("best_fit", StrategyKind::BestFit),
        ] {
            let config = SchedulerConfig::from_toml_str(&format!("strategy = \"{name}\"")).unwrap();
            assert_eq!(config.strategy, kind);
            assert_eq!(kind.to_string(), name);
        }
    }

    #[test]
    fn test_rejects_unknown_strategy_and_fields() {
        assert!(matches!(
            SchedulerConfig::from_toml_str("strategy = \"random\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SchedulerConfig::from_toml_str("time_limit = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_zero_limits() {
        assert_eq!(
            SchedulerConfig::from_toml_str("step_limit = 0"),
            Err(ConfigError::ZeroLimit {
                field: "step_limit"
            })
        );
        assert_eq!(
            SchedulerConfig::from_toml_str("time_limit_ms = 0"),
            Err(ConfigError::ZeroLimit {
                field: "time_limit_ms"
            })
        );
        assert_eq!(
            SchedulerConfig::from_toml_str("threads = 0"),
            Err(ConfigError::ZeroLimit { field: "threads" })
        );
    }

    #[test]
    fn test_toml_round_trip_of_custom_config() {
        let config = SchedulerConfig {
            strategy: StrategyKind::BestFit,
            step_limit: Some(100),
            ..SchedulerConfig::default()
        };
        let raw = config.to_toml_string().unwrap();
        assert!(raw.contains("strategy = \"best_fit\""));
        assert_eq!(SchedulerConfig::from_toml_str(&raw).unwrap(), config);
    }
}
