use serde::Serialize;

use crate::clients::osrm::OsrmClient;
use crate::clients::ClientError;
use crate::utils::geo::{approximate_road_distance, Coordinate};

/// Where a distance figure came from. The fare formula does not depend
/// on it, but it is kept as an audit field on every quote.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceProvenance {
    Road,
    Approximated,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RouteDistance {
    pub km: f64,
    pub provenance: DistanceProvenance,
}

/// Obtains a road-network distance from OSRM, with an analytic
/// fallback when the service is unavailable.
#[derive(Clone)]
pub struct DistanceEstimator {
    osrm: OsrmClient,
}

impl DistanceEstimator {
    pub fn new(osrm: OsrmClient) -> Self {
        Self { osrm }
    }

    pub async fn estimate(&self, from: Coordinate, to: Coordinate) -> RouteDistance {
        resolve_distance(self.osrm.road_distance_km(from, to).await, from, to)
    }
}

/// Two-step distance strategy: a successful routing call wins; any
/// failure (network, bad status, empty route list) falls back to the
/// Haversine approximation. A single failed attempt is enough, no
/// retries, and an implausible-looking road distance is still a road
/// distance.
pub fn resolve_distance(
    primary: Result<f64, ClientError>,
    from: Coordinate,
    to: Coordinate,
) -> RouteDistance {
    match primary {
        Ok(km) => RouteDistance {
            km,
            provenance: DistanceProvenance::Road,
        },
        Err(err) => {
            tracing::warn!("routing failed, falling back to Haversine estimate: {}", err);
            RouteDistance {
                km: approximate_road_distance(from, to),
                provenance: DistanceProvenance::Approximated,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geo::haversine_distance;

    const PRAHA: Coordinate = Coordinate { lat: 50.0755, lon: 14.4378 };
    const BRNO: Coordinate = Coordinate { lat: 49.1951, lon: 16.6068 };

    #[test]
    fn test_primary_distance_is_road() {
        let distance = resolve_distance(Ok(205.3), PRAHA, BRNO);
        assert_eq!(distance.km, 205.3);
        assert_eq!(distance.provenance, DistanceProvenance::Road);
    }

    #[test]
    fn test_failure_falls_back_to_corrected_haversine() {
        let distance = resolve_distance(Err(ClientError::Empty), PRAHA, BRNO);
        let expected = haversine_distance(PRAHA, BRNO) * 1.35;
        assert_eq!(distance.provenance, DistanceProvenance::Approximated);
        assert!((distance.km - expected).abs() < 1e-9);
        assert!(distance.km >= 0.0);
    }
}
