use serde::{Deserialize, Serialize};

/// Multiplier applied to a great-circle distance to approximate the
/// length of the road route between the same two points.
pub const ROAD_DISTANCE_MULTIPLIER: f64 = 1.35;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in kilometers
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Estimate the road distance between two points from their
/// great-circle distance
pub fn approximate_road_distance(from: Coordinate, to: Coordinate) -> f64 {
    haversine_distance(from, to) * ROAD_DISTANCE_MULTIPLIER
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRAHA: Coordinate = Coordinate { lat: 50.0755, lon: 14.4378 };
    const BRNO: Coordinate = Coordinate { lat: 49.1951, lon: 16.6068 };

    #[test]
    fn test_haversine_praha_brno() {
        let distance = haversine_distance(PRAHA, BRNO);
        // Straight line is approximately 185 km
        assert!(distance > 170.0 && distance < 200.0);
    }

    #[test]
    fn test_haversine_zero_for_identical_points() {
        assert!(haversine_distance(PRAHA, PRAHA).abs() < 1e-9);
    }

    #[test]
    fn test_road_approximation_applies_multiplier() {
        let straight = haversine_distance(PRAHA, BRNO);
        let road = approximate_road_distance(PRAHA, BRNO);
        assert!((road - straight * 1.35).abs() < 1e-9);
    }
}
