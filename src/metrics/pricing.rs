use crate::rng::SeededRng;

use super::types::{InventoryVehicle, PricingReason, PricingSuggestion};

/// Listings more than this far above the market average are pulled back to `MARKET_CEILING`.
const ABOVE_MARKET_RATIO: f64 = 1.05;
const MARKET_CEILING: f64 = 1.03;
/// Listings this far below the market average are raised to `MARKET_FLOOR`.
const BELOW_MARKET_RATIO: f64 = 0.90;
const MARKET_FLOOR: f64 = 0.95;

const AGING_DAYS: u64 = 60;
const STALE_DAYS: u64 = 90;
const AGING_MARKDOWN: f64 = 0.05;
const STALE_MARKDOWN: f64 = 0.10;

/// Never suggest less than purchase price plus this margin.
const MIN_MARGIN: f64 = 0.05;
const PRICE_STEP: u64 = 1_000;

/// Sample stock used by the pricing view until a dealer registers inventory URLs.
const SAMPLE_INVENTORY: &[(&str, &str, u32, u64, u64, u64, u64)] = &[
    ("V-1001", "トヨタ プリウス S", 2019, 42_000, 1_480_000, 1_980_000, 18),
    ("V-1002", "ホンダ N-BOX G・L", 2020, 31_000, 860_000, 1_190_000, 47),
    ("V-1003", "トヨタ アクア G", 2018, 56_000, 720_000, 1_080_000, 73),
    ("V-1004", "日産 ノート e-POWER X", 2021, 22_000, 1_350_000, 1_690_000, 35),
    ("V-1005", "トヨタ アルファード S", 2017, 78_000, 2_400_000, 3_280_000, 96),
    ("V-1006", "スズキ ジムニー XC", 2021, 15_000, 1_520_000, 1_880_000, 12),
    ("V-1007", "マツダ CX-5 XD", 2018, 64_000, 1_390_000, 1_750_000, 64),
    ("V-1008", "ホンダ フィット ホーム", 2020, 28_000, 1_050_000, 1_490_000, 121),
];

pub fn sample_inventory() -> Vec<InventoryVehicle> {
    SAMPLE_INVENTORY
        .iter()
        .map(
            |&(id, model, year, mileage_km, purchase_price, list_price, days_on_lot)| {
                InventoryVehicle {
                    id: id.to_string(),
                    model: model.to_string(),
                    year,
                    mileage_km,
                    purchase_price,
                    list_price,
                    days_on_lot,
                }
            },
        )
        .collect()
}

/// Market average for the i-th vehicle: list price scaled into 85%..115%.
pub fn market_average(vehicle: &InventoryVehicle, seed: i64) -> u64 {
    let mut rng = SeededRng::new(seed);
    let factor = 0.85 + rng.next_f64() * 0.30;
    round_to_step(vehicle.list_price as f64 * factor)
}

pub fn suggest(vehicle: &InventoryVehicle, market_avg: u64) -> PricingSuggestion {
    let mut reasons = Vec::new();
    let list = vehicle.list_price as f64;
    let market = market_avg as f64;

    let mut price = if market > 0.0 && list > market * ABOVE_MARKET_RATIO {
        reasons.push(PricingReason::AboveMarket);
        market * MARKET_CEILING
    } else if market > 0.0 && list < market * BELOW_MARKET_RATIO {
        reasons.push(PricingReason::BelowMarket);
        market * MARKET_FLOOR
    } else {
        list
    };

    if vehicle.days_on_lot > STALE_DAYS {
        reasons.push(PricingReason::Aging);
        price *= 1.0 - STALE_MARKDOWN;
    } else if vehicle.days_on_lot > AGING_DAYS {
        reasons.push(PricingReason::Aging);
        price *= 1.0 - AGING_MARKDOWN;
    }

    let mut suggested = round_to_step(price);
    let floor = round_up_to_step(vehicle.purchase_price as f64 * (1.0 + MIN_MARGIN));
    if suggested < floor {
        reasons.push(PricingReason::MarginFloor);
        suggested = floor;
    }

    if reasons.is_empty() {
        reasons.push(PricingReason::AtMarket);
    }

    PricingSuggestion {
        vehicle_id: vehicle.id.clone(),
        model: vehicle.model.clone(),
        current_price: vehicle.list_price,
        market_avg,
        suggested_price: suggested,
        adjustment: suggested as i64 - vehicle.list_price as i64,
        reasons,
    }
}

/// Suggestions for a whole lot; vehicle i draws its market average from `seed + i`.
pub fn suggest_all(vehicles: &[InventoryVehicle], seed: i64) -> Vec<PricingSuggestion> {
    vehicles
        .iter()
        .enumerate()
        .map(|(i, vehicle)| {
            suggest(vehicle, market_average(vehicle, seed.wrapping_add(i as i64)))
        })
        .collect()
}

fn round_to_step(value: f64) -> u64 {
    let steps = (value / PRICE_STEP as f64).round();
    steps.max(0.0) as u64 * PRICE_STEP
}

fn round_up_to_step(value: f64) -> u64 {
    let steps = (value / PRICE_STEP as f64).ceil();
    steps.max(0.0) as u64 * PRICE_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(list_price: u64, purchase_price: u64, days_on_lot: u64) -> InventoryVehicle {
        InventoryVehicle {
            id: "V-TEST".into(),
            model: "テスト車両".into(),
            year: 2020,
            mileage_km: 10_000,
            purchase_price,
            list_price,
            days_on_lot,
        }
    }

    #[test]
    fn keeps_price_close_to_market() {
        let suggestion = suggest(&vehicle(1_000_000, 700_000, 10), 1_000_000);
        assert_eq!(suggestion.suggested_price, 1_000_000);
        assert_eq!(suggestion.adjustment, 0);
        assert_eq!(suggestion.reasons, vec![PricingReason::AtMarket]);
    }

    #[test]
    fn pulls_overpriced_listing_toward_market() {
        let suggestion = suggest(&vehicle(1_200_000, 700_000, 10), 1_000_000);
        assert_eq!(suggestion.suggested_price, 1_030_000);
        assert_eq!(suggestion.adjustment, -170_000);
        assert_eq!(suggestion.reasons, vec![PricingReason::AboveMarket]);
    }

    #[test]
    fn raises_underpriced_listing() {
        let suggestion = suggest(&vehicle(800_000, 500_000, 10), 1_000_000);
        assert_eq!(suggestion.suggested_price, 950_000);
        assert_eq!(suggestion.reasons, vec![PricingReason::BelowMarket]);
    }

    #[test]
    fn marks_down_aging_stock() {
        let aging = suggest(&vehicle(1_000_000, 500_000, 61), 1_000_000);
        assert_eq!(aging.suggested_price, 950_000);
        assert_eq!(aging.reasons, vec![PricingReason::Aging]);

        let stale = suggest(&vehicle(1_000_000, 500_000, 91), 1_000_000);
        assert_eq!(stale.suggested_price, 900_000);
    }

    #[test]
    fn never_goes_below_margin_floor() {
        let suggestion = suggest(&vehicle(1_000_000, 950_000, 120), 1_000_000);
        assert_eq!(suggestion.suggested_price, 998_000);
        assert!(suggestion.reasons.contains(&PricingReason::MarginFloor));
    }

    #[test]
    fn market_average_is_seeded() {
        let car = vehicle(1_000_000, 700_000, 10);
        assert_eq!(market_average(&car, 99), market_average(&car, 99));
        let avg = market_average(&car, 99);
        assert!((850_000..=1_150_000).contains(&avg));
    }

    #[test]
    fn suggest_all_covers_sample_inventory() {
        let inventory = sample_inventory();
        let suggestions = suggest_all(&inventory, 99);
        assert_eq!(suggestions.len(), inventory.len());
        for (suggestion, vehicle) in suggestions.iter().zip(&inventory) {
            assert_eq!(suggestion.vehicle_id, vehicle.id);
            assert!(suggestion.suggested_price >= vehicle.purchase_price);
        }
    }

    #[test]
    fn suggest_all_accepts_extreme_seeds() {
        let inventory = sample_inventory();
        for seed in [i64::MAX, i64::MIN] {
            assert_eq!(suggest_all(&inventory, seed).len(), inventory.len());
        }
    }
}
