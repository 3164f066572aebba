use serde::Serialize;
use uuid::Uuid;

use crate::utils::geo::Coordinate;

/// Everything the user needs to complete the external checkout.
/// Write-once, built only after a fare breakdown exists. The amount is
/// shown for manual entry; nothing is transmitted to the payment
/// provider programmatically.
#[derive(Clone, Debug, Serialize)]
pub struct PaymentHandoff {
    pub quote_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub route_description: String,
    pub coordinates: Option<String>,
    pub map_link: String,
    pub checkout_url: String,
}

impl PaymentHandoff {
    pub fn new(
        quote_id: Uuid,
        amount: f64,
        start_address: &str,
        end_address: &str,
        start: Option<Coordinate>,
        end: Option<Coordinate>,
        checkout_url: String,
    ) -> Self {
        Self {
            quote_id,
            amount,
            currency: "CZK".to_string(),
            route_description: format!("{} → {}", start_address, end_address),
            coordinates: coordinate_pair(start, end),
            map_link: route_map_link(start_address, end_address, start, end),
            checkout_url,
        }
    }
}

fn coordinate_pair(start: Option<Coordinate>, end: Option<Coordinate>) -> Option<String> {
    match (start, end) {
        (Some(from), Some(to)) => Some(format!(
            "{},{} → {},{}",
            from.lat, from.lon, to.lat, to.lon
        )),
        _ => None,
    }
}

/// Directions link for the payment description. Coordinates give an
/// exact route; without them the link degrades to an address search.
pub fn route_map_link(
    start_address: &str,
    end_address: &str,
    start: Option<Coordinate>,
    end: Option<Coordinate>,
) -> String {
    match (start, end) {
        (Some(from), Some(to)) => format!(
            "https://www.openstreetmap.org/directions?engine=fossgis_osrm_car&route={}%2C{}%3B{}%2C{}",
            from.lat, from.lon, to.lat, to.lon
        ),
        _ => reqwest::Url::parse_with_params(
            "https://www.openstreetmap.org/search",
            &[("query", format!("{} to {}", start_address, end_address))],
        )
        .expect("static base URL is valid")
        .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRAHA: Coordinate = Coordinate { lat: 50.0755, lon: 14.4378 };
    const BRNO: Coordinate = Coordinate { lat: 49.1951, lon: 16.6068 };

    #[test]
    fn test_directions_link_from_coordinates() {
        let link = route_map_link("Praha", "Brno", Some(PRAHA), Some(BRNO));
        assert_eq!(
            link,
            "https://www.openstreetmap.org/directions?engine=fossgis_osrm_car&route=50.0755%2C14.4378%3B49.1951%2C16.6068"
        );
    }

    #[test]
    fn test_search_link_without_coordinates() {
        let link = route_map_link("Praha", "Brno", Some(PRAHA), None);
        assert!(link.starts_with("https://www.openstreetmap.org/search?query="));
        assert!(link.contains("Praha"));
        assert!(link.contains("Brno"));
    }

    #[test]
    fn test_handoff_carries_route_details() {
        let handoff = PaymentHandoff::new(
            Uuid::new_v4(),
            95.0,
            "Praha",
            "Brno",
            Some(PRAHA),
            Some(BRNO),
            "https://example.com/checkout".to_string(),
        );
        assert_eq!(handoff.route_description, "Praha → Brno");
        assert_eq!(
            handoff.coordinates.as_deref(),
            Some("50.0755,14.4378 → 49.1951,16.6068")
        );
        assert_eq!(handoff.amount, 95.0);
    }
}
