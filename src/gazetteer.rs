use crate::utils::geo::Coordinate;

/// A known city the autocomplete can offer when the geocoding service
/// is unreachable.
pub struct FallbackCity {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl FallbackCity {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

pub const FALLBACK_CITIES: [FallbackCity; 10] = [
    FallbackCity { name: "Praha, Czech Republic", lat: 50.0755, lon: 14.4378 },
    FallbackCity { name: "Brno, Czech Republic", lat: 49.1951, lon: 16.6068 },
    FallbackCity { name: "Ostrava, Czech Republic", lat: 49.8209, lon: 18.2625 },
    FallbackCity { name: "Plzeň, Czech Republic", lat: 49.7384, lon: 13.3736 },
    FallbackCity { name: "Liberec, Czech Republic", lat: 50.7663, lon: 15.0543 },
    FallbackCity { name: "Olomouc, Czech Republic", lat: 49.5938, lon: 17.2509 },
    FallbackCity { name: "Ústí nad Labem, Czech Republic", lat: 50.6607, lon: 14.0322 },
    FallbackCity { name: "České Budějovice, Czech Republic", lat: 48.9745, lon: 14.4743 },
    FallbackCity { name: "Hradec Králové, Czech Republic", lat: 50.2093, lon: 15.8327 },
    FallbackCity { name: "Pardubice, Czech Republic", lat: 50.0343, lon: 15.7812 },
];

/// Case-insensitive substring match against the built-in city list
pub fn matches(query: &str) -> Vec<&'static FallbackCity> {
    let needle = query.to_lowercase();
    FALLBACK_CITIES
        .iter()
        .filter(|city| city.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brno_lookup() {
        let cities = matches("Brno");
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].coordinate(), Coordinate { lat: 49.1951, lon: 16.6068 });
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(matches("brno").len(), 1);
        assert_eq!(matches("OSTRAVA").len(), 1);
    }

    #[test]
    fn test_substring_matches_every_city() {
        // "Czech Republic" is part of every entry
        assert_eq!(matches("czech").len(), FALLBACK_CITIES.len());
    }

    #[test]
    fn test_unknown_query_matches_nothing() {
        assert!(matches("Vienna").is_empty());
    }
}
