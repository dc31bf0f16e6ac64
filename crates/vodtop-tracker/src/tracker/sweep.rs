//! Finds sessions due for eviction.

use std::time::Duration;

use vodtop_core::EventKind;

use super::{Eviction, EvictionReason, SessionStore};

/// Lists every session that should be evicted at `now`, in key order.
///
/// A session idle past `idle_threshold` is evicted whatever its state. A
/// session whose history holds a `disconnect` is evicted once idle past
/// `disconnect_grace`. Both comparisons are strict.
pub fn find_stale(
    store: &SessionStore,
    now: f64,
    idle_threshold: Duration,
    disconnect_grace: Duration,
) -> Vec<Eviction> {
    let idle_limit = idle_threshold.as_secs_f64();
    let grace_limit = disconnect_grace.as_secs_f64();

    store
        .iter()
        .filter_map(|(key, history, last_active)| {
            let idle_secs = now - last_active;
            let reason = if idle_secs > idle_limit {
                EvictionReason::Idle
            } else if history.contains(&EventKind::Disconnect) && idle_secs > grace_limit {
                EvictionReason::DisconnectGrace
            } else {
                return None;
            };
            Some(Eviction {
                key: key.clone(),
                reason,
                idle_secs,
            })
        })
        .collect()
}
