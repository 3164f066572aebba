use serde::Deserialize;

use crate::clients::ClientError;
use crate::config::Config;
use crate::utils::geo::Coordinate;

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Route length in meters
    distance: f64,
}

/// Client for the OSRM routing service (driving profile)
#[derive(Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: config.osrm_url.clone(),
        }
    }

    /// Road distance between two points in kilometers. An empty route
    /// list counts as a failure so the caller can fall back.
    pub async fn road_distance_km(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<f64, ClientError> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=false&alternatives=false&steps=false",
            self.base_url, from.lon, from.lat, to.lon, to.lat
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let body: OsrmResponse = response.json().await?;
        match body.routes.first() {
            Some(route) => Ok(route.distance / 1000.0),
            None => Err(ClientError::Empty),
        }
    }
}
