use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Live usage counter for one `(action, identifier)` key.
///
/// One live counter exists per key at a time; it is superseded, not
/// accumulated, once its window or block period elapses. `count` never
/// exceeds the configured attempt cap — reaching the cap flips `blocked`
/// and sets `block_until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Window start, epoch millis.
    pub window_start: u64,
    /// Attempts recorded in the current window.
    pub count: u32,
    /// Whether the key is inside a block period.
    pub blocked: bool,
    /// Block end, epoch millis; 0 when not blocked.
    pub block_until: u64,
}

/// Abstract storage interface for rate limit counters.
///
/// This trait is designed to support both in-memory and distributed
/// backends. A multi-instance deployment backs it with a shared store; the
/// decision logic stays in `fixed_window::step`, pure over counter state.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the current counter for a key.
    async fn get(&self, key: &str) -> Result<Option<CounterState>, Self::Error>;

    /// Commit `next` iff the stored counter still equals `prev`
    /// (compare-and-set; `None` means the key must not exist yet).
    ///
    /// Returns `Ok(true)` if the write committed, `Ok(false)` if a
    /// concurrent writer got there first (retry needed).
    async fn compare_and_set(
        &self,
        key: &str,
        next: CounterState,
        prev: Option<CounterState>,
    ) -> Result<bool, Self::Error>;
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Simple in-memory counter store.
#[derive(Default, Clone, Debug)]
pub struct InMemoryCounterStore {
    data: Arc<Mutex<HashMap<String, CounterState>>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live counters, for inspection in tests and diagnostics.
    pub fn len(&self) -> usize {
        self.data.lock().expect("counter store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    type Error = std::convert::Infallible;

    async fn get(&self, key: &str) -> Result<Option<CounterState>, Self::Error> {
        let guard = self.data.lock().expect("counter store poisoned");
        Ok(guard.get(key).copied())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        next: CounterState,
        prev: Option<CounterState>,
    ) -> Result<bool, Self::Error> {
        let mut guard = self.data.lock().expect("counter store poisoned");
        let current = guard.get(key).copied();
        if current != prev {
            return Ok(false); // Race detected
        }
        guard.insert(key.to_string(), next);
        Ok(true)
    }
}
