//! Spatial operations: great-circle distance and an H3-based driver index.
//!
//! This module provides:
//!
//! - **GeoPoint**: latitude/longitude pair in degrees
//! - **Distance calculations**: Haversine distance between points
//! - **Grid disk queries**: H3 cells within K grid distance, LRU cached
//! - **DriverSpatialIndex**: H3 cell → driver mappings for radius queries
//!
//! Default resolution is 7 (~1.4 km edge), which keeps a 20 km pickup radius
//! within about two thousand cells.

use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use h3o::{CellIndex, LatLng, Resolution};
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::candidate::DriverId;

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default H3 resolution for the driver index.
pub const DEFAULT_RESOLUTION: Resolution = Resolution::Seven;

/// Beyond this ring size a radius query scans every indexed driver instead.
const MAX_GRID_DISK_K: u32 = 100;

/// Distance covered by one grid ring along the worst bearing, in cell edges.
const RING_STEP_EDGES: f64 = 1.5;

/// Share of the average edge length assumed for the smallest cells at a resolution.
const MIN_EDGE_FRACTION: f64 = 0.4;

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within the latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// H3 cell containing this point, `None` for invalid coordinates.
    pub fn to_cell(&self, resolution: Resolution) -> Option<CellIndex> {
        if !self.is_valid() {
            return None;
        }
        LatLng::new(self.lat, self.lng)
            .ok()
            .map(|ll| ll.to_cell(resolution))
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance between a driver's optional location and a pickup.
///
/// Returns `None` when either point is unusable so callers can apply worst-case scoring.
pub fn distance_to_pickup_km(location: Option<GeoPoint>, pickup: GeoPoint) -> Option<f64> {
    let location = location?;
    if !location.is_valid() || !pickup.is_valid() {
        return None;
    }
    let km = haversine_km(location, pickup);
    km.is_finite().then_some(km)
}

/// Smallest grid distance whose disk covers `radius_km` around a cell.
pub fn grid_k_for_radius(radius_km: f64, resolution: Resolution) -> u32 {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return 0;
    }
    // Along the worst bearing one ring step advances 1.5 edges. Cells near the
    // icosahedron vertices have edges well under the average, so only count on
    // 40% of the nominal step.
    let spacing_km = resolution.edge_length_km() * RING_STEP_EDGES * MIN_EDGE_FRACTION;
    let k = (radius_km / spacing_km).ceil() + 1.0;
    if k >= u32::MAX as f64 {
        u32::MAX
    } else {
        k as u32
    }
}

/// Grid disk cache shared by every index in the process.
struct GridDiskCache {
    cache: Mutex<LruCache<(CellIndex, u32), Vec<CellIndex>>>,
}

impl GridDiskCache {
    fn new() -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(1_000).expect("cache size must be non-zero"),
            )),
        }
    }

    fn get_or_compute(&self, origin: CellIndex, k: u32) -> Vec<CellIndex> {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(_) => return origin.grid_disk::<Vec<_>>(k), // Fallback: compute without cache if mutex poisoned
        };
        cache
            .get_or_insert((origin, k), || origin.grid_disk::<Vec<_>>(k))
            .clone()
    }
}

static GRID_DISK_CACHE: OnceLock<GridDiskCache> = OnceLock::new();

/// Get grid disk with caching.
pub fn grid_disk_cached(origin: CellIndex, k: u32) -> Vec<CellIndex> {
    GRID_DISK_CACHE
        .get_or_init(GridDiskCache::new)
        .get_or_compute(origin, k)
}

/// Spatial index for driver lookups by H3 cell.
///
/// Maintains cell → driver mappings plus the reverse mapping so moves and removals
/// stay O(1) per driver. Drivers without a usable location are not indexed.
#[derive(Debug)]
pub struct DriverSpatialIndex {
    resolution: Resolution,
    drivers_by_cell: HashMap<CellIndex, Vec<DriverId>>,
    driver_to_cell: HashMap<DriverId, CellIndex>,
}

impl DriverSpatialIndex {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            drivers_by_cell: HashMap::new(),
            driver_to_cell: HashMap::new(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.driver_to_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.driver_to_cell.is_empty()
    }

    /// Place `id` at `location`, moving it if it was indexed elsewhere.
    /// An unusable location removes the driver from the index.
    pub fn upsert(&mut self, id: &DriverId, location: Option<GeoPoint>) {
        let Some(cell) = location.and_then(|point| point.to_cell(self.resolution)) else {
            self.remove(id);
            return;
        };
        match self.driver_to_cell.get(id).copied() {
            Some(old_cell) if old_cell == cell => {}
            Some(old_cell) => {
                self.detach(id, old_cell);
                self.attach(id, cell);
            }
            None => self.attach(id, cell),
        }
    }

    pub fn remove(&mut self, id: &DriverId) {
        if let Some(cell) = self.driver_to_cell.get(id).copied() {
            self.detach(id, cell);
            self.driver_to_cell.remove(id);
        }
    }

    pub fn cell_of(&self, id: &DriverId) -> Option<CellIndex> {
        self.driver_to_cell.get(id).copied()
    }

    /// Drivers whose cell lies in the disk covering `radius_km` around `point`.
    ///
    /// This is a coarse prefilter: callers check exact distance afterwards.
    /// Result is sorted by id.
    pub fn drivers_near(&self, point: GeoPoint, radius_km: f64) -> Vec<DriverId> {
        let Some(origin) = point.to_cell(self.resolution) else {
            return Vec::new();
        };
        let k = grid_k_for_radius(radius_km, self.resolution);
        let ids: BTreeSet<DriverId> = if k > MAX_GRID_DISK_K {
            self.driver_to_cell.keys().cloned().collect()
        } else {
            grid_disk_cached(origin, k)
                .iter()
                .filter_map(|cell| self.drivers_by_cell.get(cell))
                .flatten()
                .cloned()
                .collect()
        };
        ids.into_iter().collect()
    }

    pub fn clear(&mut self) {
        self.drivers_by_cell.clear();
        self.driver_to_cell.clear();
    }

    fn attach(&mut self, id: &DriverId, cell: CellIndex) {
        self.drivers_by_cell.entry(cell).or_default().push(id.clone());
        self.driver_to_cell.insert(id.clone(), cell);
    }

    fn detach(&mut self, id: &DriverId, cell: CellIndex) {
        if let Some(ids) = self.drivers_by_cell.get_mut(&cell) {
            ids.retain(|existing| existing != id);
            if ids.is_empty() {
                self.drivers_by_cell.remove(&cell);
            }
        }
    }
}

impl Default for DriverSpatialIndex {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}
