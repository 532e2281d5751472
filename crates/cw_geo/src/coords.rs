use serde::Deserialize;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Fallback coordinates when a region cannot be resolved.
pub const GLOBAL_COORDS: (f64, f64) = (0.0, 0.0);

/// Well-known regions resolved without any external call.
const KNOWN_REGIONS: &[(&str, (f64, f64))] = &[
    ("Kenya", (-1.2921, 36.8219)),
    ("Global", (0.0, 0.0)),
    ("USA", (37.0902, -95.7129)),
    ("UK", (51.5074, -0.1278)),
    ("EU", (50.8503, 4.3517)),
    ("Africa", (0.0236, 37.9062)),
    ("Asia", (34.0479, 100.6197)),
    ("Europe", (54.5260, 15.2551)),
    ("North America", (54.5260, -105.2551)),
    ("South America", (-8.7832, -55.4915)),
    ("Australia", (-25.2744, 133.7751)),
];

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = "cyberwatch-news-aggregator";

/// Minimum spacing between geocoding requests.
const REQUEST_INTERVAL: Duration = Duration::from_secs(1);
/// Extra wait after an explicit rate-limit signal.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CACHE_CAPACITY: usize = 128;
const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub fn known_region(region: &str) -> Option<(f64, f64)> {
    KNOWN_REGIONS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, coords)| *coords)
}

/// Time source for the coordinate cache, injectable so expiry is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Bounded TTL cache for geocoded regions. When full, the oldest entry by
/// insertion order is evicted.
pub(crate) struct CoordinateCache {
    entries: HashMap<String, ((f64, f64), Instant)>,
    order: VecDeque<String>,
    capacity: usize,
    ttl: Duration,
}

impl CoordinateCache {
    pub(crate) fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            ttl,
        }
    }

    pub(crate) fn get(&self, region: &str, now: Instant) -> Option<(f64, f64)> {
        let (coords, inserted_at) = self.entries.get(region)?;
        if now.duration_since(*inserted_at) >= self.ttl {
            return None;
        }
        Some(*coords)
    }

    pub(crate) fn insert(&mut self, region: String, coords: (f64, f64), now: Instant) {
        if !self.entries.contains_key(&region) {
            while self.order.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.order.push_back(region.clone());
        }
        self.entries.insert(region, (coords, now));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Resolves region names to coordinates: static table first, then a
/// rate-limited Nominatim lookup with a bounded per-process cache. Resolution
/// never fails; anything unresolvable maps to [`GLOBAL_COORDS`].
pub struct Geocoder {
    client: reqwest::Client,
    clock: Arc<dyn Clock>,
    cache: Mutex<CoordinateCache>,
    last_request: Mutex<Option<Instant>>,
    base_url: String,
}

impl Geocoder {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            client: reqwest::Client::new(),
            clock,
            cache: Mutex::new(CoordinateCache::new(CACHE_CAPACITY, CACHE_TTL)),
            last_request: Mutex::new(None),
            base_url: NOMINATIM_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub async fn resolve(&self, region: &str) -> (f64, f64) {
        if let Some(coords) = known_region(region) {
            return coords;
        }

        let now = self.clock.now();
        if let Some(coords) = self.cache.lock().await.get(region, now) {
            debug!("coordinate cache hit for {}", region);
            return coords;
        }

        let coords = self.geocode(region).await;
        let now = self.clock.now();
        self.cache.lock().await.insert(region.to_string(), coords, now);
        coords
    }

    async fn geocode(&self, region: &str) -> (f64, f64) {
        self.throttle().await;

        match self.request(region).await {
            Ok(Some(coords)) => coords,
            Ok(None) => {
                debug!("no geocoding result for {}", region);
                GLOBAL_COORDS
            }
            Err(e) => {
                if e.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
                    warn!("geocoding rate limit hit for {}", region);
                    tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
                } else {
                    warn!("geocoding failed for {}: {}", region, e);
                }
                GLOBAL_COORDS
            }
        }
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < REQUEST_INTERVAL {
                tokio::time::sleep(REQUEST_INTERVAL - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn request(&self, region: &str) -> std::result::Result<Option<(f64, f64)>, reqwest::Error> {
        let places: Vec<Place> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", region), ("format", "json"), ("limit", "1")])
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(places.first().and_then(|place| {
            let lat = place.lat.parse().ok()?;
            let lon = place.lon.parse().ok()?;
            Some((lat, lon))
        }))
    }
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_regions() {
        assert_eq!(known_region("Kenya"), Some((-1.2921, 36.8219)));
        assert_eq!(known_region("Global"), Some((0.0, 0.0)));
        assert_eq!(known_region("Atlantis"), None);
    }

    #[tokio::test]
    async fn test_known_region_bypasses_geocoding() {
        // An unroutable base URL proves no network call is made.
        let geocoder = Geocoder::new().with_base_url("http://127.0.0.1:1".to_string());
        assert_eq!(geocoder.resolve("Kenya").await, (-1.2921, 36.8219));
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let mut cache = CoordinateCache::new(4, Duration::from_secs(60));
        let start = Instant::now();

        cache.insert("Mars".to_string(), (1.0, 2.0), start);
        assert_eq!(cache.get("Mars", start + Duration::from_secs(59)), Some((1.0, 2.0)));
        assert_eq!(cache.get("Mars", start + Duration::from_secs(60)), None);
    }

    #[test]
    fn test_cache_is_bounded() {
        let mut cache = CoordinateCache::new(3, Duration::from_secs(60));
        let now = Instant::now();

        for i in 0..5 {
            cache.insert(format!("region-{}", i), (i as f64, 0.0), now);
        }

        assert_eq!(cache.len(), 3);
        // Oldest entries were evicted.
        assert_eq!(cache.get("region-0", now), None);
        assert_eq!(cache.get("region-4", now), Some((4.0, 0.0)));
    }

    #[test]
    fn test_cache_reinsert_refreshes_entry() {
        let mut cache = CoordinateCache::new(3, Duration::from_secs(60));
        let start = Instant::now();

        cache.insert("Mars".to_string(), (1.0, 2.0), start);
        cache.insert("Mars".to_string(), (3.0, 4.0), start + Duration::from_secs(30));
        assert_eq!(
            cache.get("Mars", start + Duration::from_secs(80)),
            Some((3.0, 4.0))
        );
    }
}
