use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-km rate of the rate-toggle policy, CZK
pub const BASE_RATE_CZK_PER_KM: f64 = 8.5562;
/// Flat per-km rate of the flat-return policy, CZK
pub const FLAT_RETURN_RATE_CZK_PER_KM: f64 = 3.67;

const RATE_TOGGLE_FEE_BASE_CZK: f64 = 7.0;
const RATE_TOGGLE_FEE_RATE: f64 = 0.012;
const FLAT_RETURN_FEE_BASE_CZK: f64 = 7.0;
const FLAT_RETURN_FEE_RATE: f64 = 0.0125;

/// The two pricing policies evolved in parallel and are not
/// reconcilable into one formula (rounding granularity, distance
/// doubling and the fee differ), so a deployment picks one via
/// `PRICING_POLICY`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingPolicy {
    /// Per-km rate with an optional discounted rate, bucket-rounded
    /// totals (nearest 5 CZK, or nearest 10 CZK when discounted)
    RateToggle,
    /// Every trip priced as a round trip at a flat rate, cent-precision
    /// totals
    FlatReturn,
}

impl FromStr for PricingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rate-toggle" => Ok(PricingPolicy::RateToggle),
            "flat-return" => Ok(PricingPolicy::FlatReturn),
            other => Err(format!("unknown pricing policy: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripMode {
    #[default]
    OneWay,
    Return,
}

/// Complete price breakdown for one trip. Derived by a pure function
/// of (distance, mode, discount, policy) and recomputed fresh on every
/// calculation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FareBreakdown {
    /// Billed distance: doubled for return trips
    pub distance_km: f64,
    pub rate_per_km: f64,
    pub base_fare: f64,
    pub processing_fee: f64,
    pub final_total: f64,
    pub mode: TripMode,
    pub discounted: bool,
}

pub fn quote(
    policy: PricingPolicy,
    distance_km: f64,
    mode: TripMode,
    discounted: bool,
) -> FareBreakdown {
    match policy {
        PricingPolicy::RateToggle => rate_toggle_quote(distance_km, mode, discounted),
        PricingPolicy::FlatReturn => flat_return_quote(distance_km, mode, discounted),
    }
}

fn rate_toggle_quote(distance_km: f64, mode: TripMode, discounted: bool) -> FareBreakdown {
    let rate = if discounted {
        discounted_rate(BASE_RATE_CZK_PER_KM)
    } else {
        BASE_RATE_CZK_PER_KM
    };

    let actual_distance = match mode {
        TripMode::Return => distance_km * 2.0,
        TripMode::OneWay => distance_km,
    };
    let price = actual_distance * rate;

    if discounted {
        // No processing fee; total rounded to the nearest 10 CZK
        FareBreakdown {
            distance_km: actual_distance,
            rate_per_km: rate,
            base_fare: round2(price),
            processing_fee: 0.0,
            final_total: round_to_nearest(price, 10.0),
            mode,
            discounted,
        }
    } else {
        // 7 CZK + 1.2% processing fee; total rounded to the nearest 5 CZK
        let fee = round2(RATE_TOGGLE_FEE_BASE_CZK + price * RATE_TOGGLE_FEE_RATE);
        FareBreakdown {
            distance_km: actual_distance,
            rate_per_km: rate,
            base_fare: round2(price),
            processing_fee: fee,
            final_total: round_to_nearest(price + fee, 5.0),
            mode,
            discounted,
        }
    }
}

/// Discounted per-km rate: one unit below the base rate, rounded to
/// the nearest 0.5 step, floored to the next lower step if the
/// rounding left it less than 1 CZK below base.
fn discounted_rate(base: f64) -> f64 {
    let reduced = base - 1.0;
    let mut rate = ((reduced * 2.0).round() / 2.0).min(reduced);
    if base - rate < 1.0 {
        rate = (reduced * 2.0).floor() / 2.0;
    }
    rate
}

/// The flat-return policy treats every trip as a round trip, whatever
/// the mode selector says, and has no discount concept; both are still
/// recorded on the breakdown.
fn flat_return_quote(distance_km: f64, mode: TripMode, discounted: bool) -> FareBreakdown {
    let actual_distance = distance_km * 2.0;
    let price = round2(actual_distance * FLAT_RETURN_RATE_CZK_PER_KM);
    let fee = round2(FLAT_RETURN_FEE_BASE_CZK + price * FLAT_RETURN_FEE_RATE);

    FareBreakdown {
        distance_km: actual_distance,
        rate_per_km: FLAT_RETURN_RATE_CZK_PER_KM,
        base_fare: price,
        processing_fee: fee,
        final_total: round2(price + fee),
        mode,
        discounted,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round_to_nearest(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rate_toggle_one_way_regular() {
        let fare = quote(PricingPolicy::RateToggle, 10.0, TripMode::OneWay, false);
        // price 85.562, fee round2(7 + 1.026744) = 8.03, total rounds to 95
        assert!(close(fare.rate_per_km, 8.5562));
        assert!(close(fare.base_fare, 85.56));
        assert!(close(fare.processing_fee, 8.03));
        assert!(close(fare.final_total, 95.0));
    }

    #[test]
    fn test_rate_toggle_return_doubles_distance() {
        let fare = quote(PricingPolicy::RateToggle, 10.0, TripMode::Return, false);
        assert!(close(fare.distance_km, 20.0));
        assert!(close(fare.base_fare, 171.12));
    }

    #[test]
    fn test_rate_toggle_discounted_return() {
        let fare = quote(PricingPolicy::RateToggle, 5.0, TripMode::Return, true);
        // rate 7.5562 rounded to 7.5, price 10 * 7.5 = 75, nearest 10 is 80
        assert!(close(fare.rate_per_km, 7.5));
        assert!(close(fare.processing_fee, 0.0));
        assert!(close(fare.final_total, 80.0));
    }

    #[test]
    fn test_discounted_rate_stays_a_full_unit_below_base() {
        for base in [8.5562, 8.3, 8.2, 7.73, 9.0, 10.26] {
            let rate = discounted_rate(base);
            assert!(base - rate >= 1.0 - 1e-9, "base {base} gave rate {rate}");
        }
    }

    #[test]
    fn test_flat_return_five_km() {
        let fare = quote(PricingPolicy::FlatReturn, 5.0, TripMode::OneWay, false);
        // actual 10 km, price 36.70, fee round2(7.45875) = 7.46
        assert!(close(fare.distance_km, 10.0));
        assert!(close(fare.base_fare, 36.70));
        assert!(close(fare.processing_fee, 7.46));
        assert!(close(fare.final_total, 44.16));
    }

    #[test]
    fn test_flat_return_ignores_mode_selector() {
        let one_way = quote(PricingPolicy::FlatReturn, 5.0, TripMode::OneWay, false);
        let round_trip = quote(PricingPolicy::FlatReturn, 5.0, TripMode::Return, false);
        assert!(close(one_way.final_total, round_trip.final_total));
    }

    #[test]
    fn test_quote_is_idempotent() {
        let first = quote(PricingPolicy::RateToggle, 12.345, TripMode::Return, true);
        let second = quote(PricingPolicy::RateToggle, 12.345, TripMode::Return, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("rate-toggle".parse::<PricingPolicy>(), Ok(PricingPolicy::RateToggle));
        assert_eq!("flat-return".parse::<PricingPolicy>(), Ok(PricingPolicy::FlatReturn));
        assert!("cheapest".parse::<PricingPolicy>().is_err());
    }
}
