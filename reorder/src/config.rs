//! Reorder configuration loaded from the environment

use crate::position::{PositionPolicy, Stride};

/// Reorder configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | REORDER_POSITION_POLICY | dense | `dense` or `sparse` |
/// | REORDER_POSITION_STRIDE | 1000 | Stride for `sparse`, at least 100 |
/// | REORDER_MAX_CONCURRENT_UPDATES | 8 | Position writes in flight per reorder |
/// | REORDER_REFRESH | true | Refresh server caches after a successful reorder |
///
/// # Example
///
/// ```ignore
/// REORDER_POSITION_POLICY=sparse REORDER_POSITION_STRIDE=100 cargo run
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderConfig {
    /// How positions are derived from the new order
    pub policy: PositionPolicy,
    /// Upper bound on concurrent persistence calls for one reorder
    pub max_concurrent_updates: usize,
    /// Whether to call the refresher after all writes succeed
    pub refresh_after_persist: bool,
}

impl ReorderConfig {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let stride = std::env::var("REORDER_POSITION_STRIDE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .and_then(|v| match Stride::new(v) {
                Ok(stride) => Some(stride),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring REORDER_POSITION_STRIDE");
                    None
                }
            })
            .unwrap_or_default();

        let policy = match std::env::var("REORDER_POSITION_POLICY")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            Ok("sparse") => PositionPolicy::Sparse { stride },
            Ok("dense") | Err(_) => PositionPolicy::Dense,
            Ok(other) => {
                tracing::warn!(policy = %other, "Unknown position policy, using dense");
                PositionPolicy::Dense
            }
        };

        Self {
            policy,
            max_concurrent_updates: std::env::var("REORDER_MAX_CONCURRENT_UPDATES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(8),
            refresh_after_persist: std::env::var("REORDER_REFRESH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    pub fn with_policy(mut self, policy: PositionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Clamped to at least one
    pub fn with_max_concurrent_updates(mut self, max: usize) -> Self {
        self.max_concurrent_updates = max.max(1);
        self
    }

    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh_after_persist = refresh;
        self
    }
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            policy: PositionPolicy::Dense,
            max_concurrent_updates: 8,
            refresh_after_persist: true,
        }
    }
}
