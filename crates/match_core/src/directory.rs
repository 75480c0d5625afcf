//! Ports that feed candidate drivers to the engine, plus an in-memory implementation.
//!
//! - [`CandidateSource`]: pull port returning online drivers near a pickup.
//! - [`DriverListFeed`]: push port notifying subscribers whenever the driver list changes.
//!
//! The hosted platform normally sits behind these traits. [`DriverDirectory`] implements
//! both in memory so the engine can be exercised end to end without it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use h3o::Resolution;
use tracing::debug;

use crate::candidate::{DriverCandidate, DriverId};
use crate::config::MatchingConfig;
use crate::error::{ConfigError, DirectoryError};
use crate::spatial::{distance_to_pickup_km, DriverSpatialIndex, GeoPoint};

/// Pull port: current online drivers near a location.
pub trait CandidateSource: Send + Sync {
    /// Online drivers with a known location within `radius_km` of `pickup`.
    fn fetch_candidate_drivers(&self, pickup: GeoPoint, radius_km: f64) -> Vec<DriverCandidate>;
}

impl<T: CandidateSource + ?Sized> CandidateSource for Arc<T> {
    fn fetch_candidate_drivers(&self, pickup: GeoPoint, radius_km: f64) -> Vec<DriverCandidate> {
        (**self).fetch_candidate_drivers(pickup, radius_km)
    }
}

/// Callback invoked with the full driver list after every change.
pub type DriverListHandler = Arc<dyn Fn(&[DriverCandidate]) + Send + Sync>;

/// Handle returned by [`DriverListFeed::on_driver_list_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Push port: notifies subscribers when drivers come online, move or leave.
pub trait DriverListFeed: Send + Sync {
    fn on_driver_list_changed(&self, handler: DriverListHandler) -> SubscriptionId;

    /// Returns `false` when the subscription was not active.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

impl<T: DriverListFeed + ?Sized> DriverListFeed for Arc<T> {
    fn on_driver_list_changed(&self, handler: DriverListHandler) -> SubscriptionId {
        (**self).on_driver_list_changed(handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }
}

#[derive(Debug)]
struct DirectoryState {
    drivers: BTreeMap<DriverId, DriverCandidate>,
    index: DriverSpatialIndex,
    /// Bumped on every change that subscribers must hear about.
    version: u64,
}

/// Clears the delivery flag if a handler panics mid-delivery.
struct DeliveryGuard<'a>(&'a Mutex<bool>);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            *self.0.lock().unwrap_or_else(PoisonError::into_inner) = false;
        }
    }
}

/// In-memory driver registry backed by an H3 spatial index.
///
/// Subscribers receive snapshots in version order and always end on the newest
/// state. When several threads mutate concurrently, one of them delivers on behalf
/// of the others, so a mutation may return before its own snapshot is pushed.
pub struct DriverDirectory {
    state: RwLock<DirectoryState>,
    subscribers: Mutex<Vec<(SubscriptionId, DriverListHandler)>>,
    /// Set while one thread is pushing snapshots to subscribers.
    delivering: Mutex<bool>,
    next_subscription: AtomicU64,
}

impl DriverDirectory {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            state: RwLock::new(DirectoryState {
                drivers: BTreeMap::new(),
                index: DriverSpatialIndex::new(resolution),
                version: 0,
            }),
            subscribers: Mutex::new(Vec::new()),
            delivering: Mutex::new(false),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// Directory using the config's spatial resolution.
    pub fn from_config(config: &MatchingConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.resolution()?))
    }

    /// Insert or replace a driver. Returns `false` when nothing changed.
    pub fn upsert(&self, driver: DriverCandidate) -> bool {
        {
            let mut state = self.write_state();
            if state.drivers.get(&driver.id) == Some(&driver) {
                return false;
            }
            debug!(driver = %driver.id, online = driver.is_online, "Upserting driver");
            state.index.upsert(&driver.id, driver.location);
            state.drivers.insert(driver.id.clone(), driver);
            state.version += 1;
        }
        self.notify();
        true
    }

    pub fn remove(&self, id: &DriverId) -> Result<DriverCandidate, DirectoryError> {
        let removed = {
            let mut state = self.write_state();
            let removed = state
                .drivers
                .remove(id)
                .ok_or_else(|| DirectoryError::UnknownDriver(id.clone()))?;
            state.index.remove(id);
            state.version += 1;
            removed
        };
        debug!(driver = %id, "Removed driver");
        self.notify();
        Ok(removed)
    }

    pub fn set_online(&self, id: &DriverId, is_online: bool) -> Result<(), DirectoryError> {
        self.modify(id, |driver| driver.is_online = is_online)
    }

    pub fn update_location(
        &self,
        id: &DriverId,
        location: Option<GeoPoint>,
    ) -> Result<(), DirectoryError> {
        self.modify(id, |driver| driver.location = location)
    }

    pub fn get(&self, id: &DriverId) -> Option<DriverCandidate> {
        self.read_state().drivers.get(id).cloned()
    }

    /// Every registered driver, online or not, ordered by id.
    pub fn snapshot(&self) -> Vec<DriverCandidate> {
        self.read_state().drivers.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read_state().drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().drivers.is_empty()
    }

    /// Register a closure as a driver-list subscriber.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&[DriverCandidate]) + Send + Sync + 'static,
    {
        self.on_driver_list_changed(Arc::new(handler))
    }

    fn modify(
        &self,
        id: &DriverId,
        change: impl FnOnce(&mut DriverCandidate),
    ) -> Result<(), DirectoryError> {
        let changed = {
            let mut state = self.write_state();
            let DirectoryState {
                drivers,
                index,
                version,
            } = &mut *state;
            let driver = drivers
                .get_mut(id)
                .ok_or_else(|| DirectoryError::UnknownDriver(id.clone()))?;
            let before = driver.clone();
            change(driver);
            if *driver == before {
                false
            } else {
                index.upsert(id, driver.location);
                *version += 1;
                debug!(driver = %id, online = driver.is_online, "Updated driver");
                true
            }
        };
        if changed {
            self.notify();
        }
        Ok(())
    }

    /// Push the current state to subscribers, unless another thread is already
    /// delivering; that thread picks up the newer version before it stops.
    fn notify(&self) {
        {
            let mut delivering = self.lock_delivering();
            if *delivering {
                return;
            }
            *delivering = true;
        }
        let _guard = DeliveryGuard(&self.delivering);
        loop {
            let handlers: Vec<DriverListHandler> = self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|(_, handler)| Arc::clone(handler))
                .collect();
            // Snapshot and version are read under the same lock so they agree.
            let (version, snapshot) = {
                let state = self.read_state();
                let snapshot: Vec<DriverCandidate> = if handlers.is_empty() {
                    Vec::new()
                } else {
                    state.drivers.values().cloned().collect()
                };
                (state.version, snapshot)
            };
            // Handlers run without any directory lock held so they may query the directory.
            for handler in handlers {
                handler(&snapshot);
            }

            let mut delivering = self.lock_delivering();
            if self.read_state().version == version {
                *delivering = false;
                return;
            }
            debug!(
                delivered = version,
                "Driver list changed during delivery, pushing newer snapshot"
            );
        }
    }

    fn lock_delivering(&self) -> std::sync::MutexGuard<'_, bool> {
        self.delivering.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DriverDirectory {
    fn default() -> Self {
        Self::new(crate::spatial::DEFAULT_RESOLUTION)
    }
}

impl fmt::Debug for DriverDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("DriverDirectory")
            .field("drivers", &self.len())
            .field("subscribers", &subscribers)
            .finish()
    }
}

impl CandidateSource for DriverDirectory {
    fn fetch_candidate_drivers(&self, pickup: GeoPoint, radius_km: f64) -> Vec<DriverCandidate> {
        let state = self.read_state();
        let candidates: Vec<DriverCandidate> = state
            .index
            .drivers_near(pickup, radius_km)
            .iter()
            .filter_map(|id| state.drivers.get(id))
            .filter(|driver| driver.is_online)
            .filter(|driver| {
                distance_to_pickup_km(driver.location, pickup).is_some_and(|km| km <= radius_km)
            })
            .cloned()
            .collect();
        debug!(
            radius_km,
            registered = state.drivers.len(),
            returned = candidates.len(),
            "Fetched candidate drivers"
        );
        candidates
    }
}

impl DriverListFeed for DriverDirectory {
    fn on_driver_list_changed(&self, handler: DriverListHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }
}
