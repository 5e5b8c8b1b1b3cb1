use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::{clock::Clock, error::ServiceError};

struct Snapshot<T> {
    value: Arc<T>,
    fetched_at: DateTime<Utc>,
}

/// Holds one value fetched from upstream along with the time it was fetched.
///
/// The value and its timestamp are swapped together under a single write lock, so readers
/// never see a new timestamp paired with old data. Refreshes go through `refresh_gate`:
/// while one caller is fetching, everyone else who found the value stale waits on the gate
/// and then takes the outcome of that fetch, the stored value or its error, instead of
/// issuing their own request.
pub(crate) struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Option<Snapshot<T>>>,
    /// Guards the error of the last finished refresh, `None` after a success.
    refresh_gate: Mutex<Option<ServiceError>>,
    /// Bumped under the gate each time a refresh finishes.
    refreshes: AtomicU64,
}

impl<T: Send + Sync> TtlCache<T> {
    pub(crate) fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            snapshot: RwLock::new(None),
            refresh_gate: Mutex::new(None),
            refreshes: AtomicU64::new(0),
        }
    }

    async fn fresh_value(&self) -> Option<Arc<T>> {
        let now = self.clock.now();
        self.snapshot
            .read()
            .await
            .as_ref()
            .filter(|snapshot| now - snapshot.fetched_at < self.ttl)
            .map(|snapshot| snapshot.value.clone())
    }

    /// Returns the cached value while it is fresh, otherwise runs `fetch` and stores its result.
    /// A failed fetch clears whatever was cached and hands the error back, to this caller and to
    /// everyone who was queued behind it. Stale data is never served in its place.
    pub(crate) async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<Arc<T>, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let seen = self.refreshes.load(Ordering::Acquire);
        if let Some(value) = self.fresh_value().await {
            return Ok(value);
        }
        let mut last_failure = self.refresh_gate.lock().await;
        // somebody else may have refreshed while we were queued on the gate
        if let Some(value) = self.fresh_value().await {
            return Ok(value);
        }
        if self.refreshes.load(Ordering::Acquire) != seen {
            if let Some(e) = last_failure.as_ref() {
                return Err(e.clone());
            }
        }
        let started = self.clock.now();
        info!(cache = self.name, "refreshing from upstream");
        let result = match fetch().await {
            Ok(value) => {
                let value = Arc::new(value);
                *self.snapshot.write().await = Some(Snapshot {
                    value: value.clone(),
                    fetched_at: started,
                });
                *last_failure = None;
                Ok(value)
            }
            Err(e) => {
                warn!(cache = self.name, error = %e, "refresh failed, dropping cached value");
                *self.snapshot.write().await = None;
                *last_failure = Some(e.clone());
                Err(e)
            }
        };
        self.refreshes.fetch_add(1, Ordering::AcqRel);
        result
    }
}
