//! Reconciliation configuration.
//!
//! All knobs are explicit values threaded into the policy and driver; there
//! is no process-global configuration state.

use serde::{Deserialize, Serialize};

/// Configuration for descriptor placement and batch processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Whether items are grouped into subdirectories under the group root.
    /// When false, every item lands directly in the group root and
    /// organizational labels and category grouping are ignored entirely.
    pub make_subdirs: bool,

    /// Bound on concurrently processed items in a batch.
    pub max_concurrent_transfers: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            make_subdirs: true,
            max_concurrent_transfers: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_subdirs() {
        let config = ReconcileConfig::default();
        assert!(config.make_subdirs);
        assert!(config.max_concurrent_transfers > 0);
    }
}
