use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::domain::TransportType;
use crate::geo::Location;

use super::{Directions, OracleError, Profile, RoutingOracle};

/// Keys a cached directions leg by mode and endpoints, rounded to a fixed
/// decimal precision so near-identical float inputs still hit the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    mot: TransportType,
    from: (i64, i64),
    to: (i64, i64),
}

const ROUNDING_SCALE: f64 = 1e7;

fn round_coord(v: f64) -> i64 {
    (v * ROUNDING_SCALE).round() as i64
}

impl CacheKey {
    fn new(mot: TransportType, from: Location, to: Location) -> Self {
        CacheKey {
            mot,
            from: (round_coord(from.lat), round_coord(from.lng)),
            to: (round_coord(to.lat), round_coord(to.lng)),
        }
    }
}

/// Wraps any [`RoutingOracle`] with a concurrent-safe memoization cache for
/// `directions`, keyed by `(mot, from_loc, to_loc)` (§5 Shared resources).
/// Entries are immutable once inserted; writers use a mutex-guarded
/// insert-if-absent. `snap` is forwarded uncached — its inputs are rarely
/// repeated within a request.
pub struct CachingOracle<O: RoutingOracle> {
    inner: O,
    cache: Mutex<LruCache<CacheKey, Directions>>,
}

impl<O: RoutingOracle> CachingOracle<O> {
    pub fn new(inner: O, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        CachingOracle { inner, cache: Mutex::new(LruCache::new(capacity)) }
    }
}

impl<O: RoutingOracle> RoutingOracle for CachingOracle<O> {
    fn snap(&self, locations: &[Location], profile: Profile, radius_m: f64) -> Result<Vec<Location>, OracleError> {
        self.inner.snap(locations, profile, radius_m)
    }

    fn directions(&self, from: Location, to: Location, mot: TransportType) -> Result<Directions, OracleError> {
        let key = CacheKey::new(mot, from, to);

        if let Some(hit) = self.cache.lock().expect("oracle cache mutex poisoned").get(&key) {
            log::debug!("oracle cache hit for {:?} {:?}->{:?}", mot, from, to);
            return Ok(hit.clone());
        }

        let result = self.inner.directions(from, to, mot)?;
        self.cache.lock().expect("oracle cache mutex poisoned").put(key, result.clone());
        Ok(result)
    }
}
