//! Single-writer lanes keyed by resource identifier.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

/// Serialises async work per key.
///
/// Holders of a lane guard for the same key run one at a time, in the order
/// they asked (tokio's mutex is fair). Different keys never wait on each
/// other. Idle lanes are pruned on the next acquisition.
#[derive(Debug, Default)]
pub struct KeyedSerializer {
    lanes: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedSerializer {
    /// Creates a serializer with no lanes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of the lane for `key`.
    ///
    /// The lane is held until the returned guard is dropped.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lane = {
            let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
            lanes.retain(|lane_key, lane| lane_key == key || Arc::strong_count(lane) > 1);
            Arc::clone(lanes.entry(key.to_owned()).or_default())
        };
        lane.lock_owned().await
    }

    /// Returns the number of lanes currently tracked.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lanes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
