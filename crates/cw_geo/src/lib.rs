pub mod coords;
pub mod map;
pub mod severity;

pub use coords::{known_region, Clock, Geocoder, SystemClock, GLOBAL_COORDS};
pub use map::{build_map_model, RegionThreat, RegionThreatAggregate};
pub use severity::{threat_severity, MAX_SEVERITY};
