use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::clients::ClientError;
use crate::config::Config;
use crate::gazetteer;
use crate::utils::geo::Coordinate;

/// Queries shorter than this never reach the geocoding service
pub const MIN_QUERY_LEN: usize = 3;
pub const MAX_SUGGESTIONS: usize = 5;

/// Trimmed query, or `None` when it is too short to send upstream
pub fn validated_query(raw: &str) -> Option<&str> {
    let query = raw.trim();
    (query.chars().count() >= MIN_QUERY_LEN).then_some(query)
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    place_id: u64,
    // Nominatim returns lat/lon as numeric strings
    lat: String,
    lon: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Suggestion {
    pub description: String,
    pub place_id: String,
    pub lat: f64,
    pub lon: f64,
}

/// Client for the Nominatim geocoding service, restricted to the
/// configured country and language preference.
#[derive(Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    country_codes: String,
    accept_language: String,
    language_header: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: config.nominatim_url.clone(),
            country_codes: config.country_codes.clone(),
            accept_language: config.accept_language.clone(),
            language_header: config.language_header.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Resolve a free-text address to a single coordinate. `Ok(None)`
    /// means the service answered but found nothing; there is no
    /// gazetteer fallback on this path, the caller surfaces the miss.
    pub async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, ClientError> {
        let places = self.search(address, 1, false).await?;
        match places.first() {
            Some(place) => Ok(Some(parse_coordinate(place)?)),
            None => Ok(None),
        }
    }

    /// Ranked autocomplete candidates for a partial query
    pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, ClientError> {
        let places = self.search(query, MAX_SUGGESTIONS, true).await?;
        places.iter().map(suggestion_from_place).collect()
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        address_details: bool,
    ) -> Result<Vec<NominatimPlace>, ClientError> {
        let mut params = vec![
            ("format", "json".to_string()),
            ("limit", limit.to_string()),
            ("countrycodes", self.country_codes.clone()),
            ("accept-language", self.accept_language.clone()),
            ("q", query.to_string()),
        ];
        if address_details {
            params.push(("addressdetails", "1".to_string()));
        }

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT_LANGUAGE, &self.language_header)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

fn parse_coordinate(place: &NominatimPlace) -> Result<Coordinate, ClientError> {
    let lat = place
        .lat
        .parse()
        .map_err(|_| ClientError::Parse(format!("bad latitude: {}", place.lat)))?;
    let lon = place
        .lon
        .parse()
        .map_err(|_| ClientError::Parse(format!("bad longitude: {}", place.lon)))?;

    Ok(Coordinate { lat, lon })
}

fn suggestion_from_place(place: &NominatimPlace) -> Result<Suggestion, ClientError> {
    let coordinate = parse_coordinate(place)?;

    Ok(Suggestion {
        description: place.display_name.clone(),
        place_id: place.place_id.to_string(),
        lat: coordinate.lat,
        lon: coordinate.lon,
    })
}

/// Two-step autocomplete strategy: pass the primary result through, or
/// fall back to the built-in city list when the service failed. An
/// empty list on both paths means "no candidates" and is not an error.
pub fn suggestions_or_fallback(
    primary: Result<Vec<Suggestion>, ClientError>,
    query: &str,
) -> Vec<Suggestion> {
    match primary {
        Ok(suggestions) => suggestions.into_iter().take(MAX_SUGGESTIONS).collect(),
        Err(err) => {
            tracing::warn!("address search failed, using city fallback: {}", err);
            gazetteer::matches(query)
                .into_iter()
                .map(|city| Suggestion {
                    description: city.name.to_string(),
                    place_id: city.name.replace(' ', "_"),
                    lat: city.lat,
                    lon: city.lon,
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(lat: &str, lon: &str) -> NominatimPlace {
        NominatimPlace {
            display_name: "Brno, Czech Republic".to_string(),
            place_id: 42,
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    fn suggestion(description: &str) -> Suggestion {
        Suggestion {
            description: description.to_string(),
            place_id: "1".to_string(),
            lat: 50.0,
            lon: 14.0,
        }
    }

    #[test]
    fn test_short_queries_never_go_upstream() {
        assert_eq!(validated_query("Br"), None);
        assert_eq!(validated_query("  Br  "), None);
        assert_eq!(validated_query(""), None);
    }

    #[test]
    fn test_valid_query_is_trimmed() {
        assert_eq!(validated_query("  Brno  "), Some("Brno"));
        assert_eq!(validated_query("Brn"), Some("Brn"));
    }

    #[test]
    fn test_parse_coordinate_from_numeric_strings() {
        let coordinate = parse_coordinate(&place("49.1951", "16.6068")).unwrap();
        assert_eq!(coordinate, Coordinate { lat: 49.1951, lon: 16.6068 });
    }

    #[test]
    fn test_parse_coordinate_rejects_garbage() {
        assert!(parse_coordinate(&place("north", "16.6068")).is_err());
    }

    #[test]
    fn test_primary_suggestions_pass_through() {
        let primary = Ok(vec![suggestion("Brno"), suggestion("Brno-sever")]);
        let result = suggestions_or_fallback(primary, "Brno");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].description, "Brno");
    }

    #[test]
    fn test_suggestions_capped_at_five() {
        let primary = Ok((0..8).map(|i| suggestion(&format!("city {i}"))).collect());
        assert_eq!(suggestions_or_fallback(primary, "city").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_fallback_serves_known_city_on_failure() {
        let primary = Err(ClientError::Empty);
        let result = suggestions_or_fallback(primary, "Brno");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].lat, 49.1951);
        assert_eq!(result[0].lon, 16.6068);
    }

    #[test]
    fn test_fallback_without_match_is_empty() {
        let primary = Err(ClientError::Empty);
        assert!(suggestions_or_fallback(primary, "Bratislava").is_empty());
    }
}
