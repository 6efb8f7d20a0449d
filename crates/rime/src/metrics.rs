//! Instrumentation counters.
//!
//! Enabled via `--features metrics`. Compiles to no-ops when disabled, and
//! [`snapshot`] then always reports zeros.

use serde::Serialize;

/// Increment a metric counter. No-op when the `metrics` feature is disabled.
#[cfg(feature = "metrics")]
macro_rules! inc_metric {
    ($counter:ident) => {
        $crate::metrics::counters::$counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    };
    ($counter:ident, $amount:expr) => {
        $crate::metrics::counters::$counter
            .fetch_add($amount as u64, std::sync::atomic::Ordering::Relaxed);
    };
}

#[cfg(not(feature = "metrics"))]
macro_rules! inc_metric {
    ($counter:ident) => {};
    ($counter:ident, $amount:expr) => {};
}

pub(crate) use inc_metric;

#[cfg(feature = "metrics")]
pub(crate) mod counters {
    use std::sync::atomic::AtomicU64;

    pub static CONTAINERS_BUILT: AtomicU64 = AtomicU64::new(0);
    pub static HASHES_COMPUTED: AtomicU64 = AtomicU64::new(0);
    pub static PATH_NODES_REBUILT: AtomicU64 = AtomicU64::new(0);
    pub static INTERMEDIATES_SYNTHESIZED: AtomicU64 = AtomicU64::new(0);
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub containers_built: u64,
    pub hashes_computed: u64,
    pub path_nodes_rebuilt: u64,
    pub intermediates_synthesized: u64,
}

#[cfg(feature = "metrics")]
pub fn snapshot() -> MetricsSnapshot {
    use std::sync::atomic::Ordering;

    MetricsSnapshot {
        containers_built: counters::CONTAINERS_BUILT.load(Ordering::Relaxed),
        hashes_computed: counters::HASHES_COMPUTED.load(Ordering::Relaxed),
        path_nodes_rebuilt: counters::PATH_NODES_REBUILT.load(Ordering::Relaxed),
        intermediates_synthesized: counters::INTERMEDIATES_SYNTHESIZED.load(Ordering::Relaxed),
    }
}

#[cfg(not(feature = "metrics"))]
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot::default()
}

/// Reset all counters to zero.
pub fn reset() {
    #[cfg(feature = "metrics")]
    {
        use std::sync::atomic::Ordering;

        counters::CONTAINERS_BUILT.store(0, Ordering::Relaxed);
        counters::HASHES_COMPUTED.store(0, Ordering::Relaxed);
        counters::PATH_NODES_REBUILT.store(0, Ordering::Relaxed);
        counters::INTERMEDIATES_SYNTHESIZED.store(0, Ordering::Relaxed);
    }
}

/// Dump all counters at `info` level.
pub fn log_counters() {
    let snapshot = snapshot();
    log::info!(
        "[rime-metrics] containers_built={}, hashes_computed={}, path_nodes_rebuilt={}, intermediates_synthesized={}",
        snapshot.containers_built,
        snapshot.hashes_computed,
        snapshot.path_nodes_rebuilt,
        snapshot.intermediates_synthesized,
    );
}
