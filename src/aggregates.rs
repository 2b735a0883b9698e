//! Totals derived from a build.

use crate::domain::build::BuildState;
use crate::domain::category::Category;

/// Draw assumed for fans, drives and the board itself before any part is picked.
pub const BASE_SYSTEM_WATTAGE: f64 = 50.0;

/// Sum of the prices of every selected part.
pub fn total_price(build: &BuildState) -> f64 {
    build.iter().map(|(_, product)| product.price.get()).sum()
}

/// Estimated consumption of the build in watts.
///
/// The power supply's own wattage is its capacity, not a draw, so the PSU
/// slot is left out of the sum.
pub fn total_wattage(build: &BuildState) -> f64 {
    BASE_SYSTEM_WATTAGE
        + build
            .iter()
            .filter(|(category, _)| *category != Category::Psu)
            .map(|(_, product)| product.wattage())
            .sum::<f64>()
}

pub fn selected_items_count(build: &BuildState) -> usize {
    build.len()
}

/// Supply capacity that leaves a 20% margin above `draw`, rounded up to a
/// whole watt.
pub fn recommended_psu_wattage(draw: f64) -> f64 {
    (draw * 12.0 / 10.0).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test::product_with;
    use serde_json::json;

    #[test]
    fn empty_build_totals() {
        let build = BuildState::empty();
        assert_eq!(total_price(&build), 0.0);
        assert_eq!(total_wattage(&build), 50.0);
        assert_eq!(selected_items_count(&build), 0);
    }

    #[test]
    fn psu_capacity_is_not_counted_as_draw() {
        let mut build = BuildState::empty();
        build
            .set(
                Category::Psu,
                product_with(9, Category::Psu, 180.0, json!({ "wattage": 1000 })),
            )
            .unwrap();

        assert_eq!(total_wattage(&build), 50.0);
        assert_eq!(total_price(&build), 180.0);
        assert_eq!(selected_items_count(&build), 1);
    }

    #[test]
    fn sums_every_consumer() {
        let mut build = BuildState::empty();
        let parts = [
            product_with(1, Category::Cpu, 620.0, json!({ "wattage": 253 })),
            product_with(5, Category::Ram, 150.0, json!({ "wattage": 10 })),
            product_with(7, Category::Gpu, 1800.0, json!({ "wattage": 450 })),
            product_with(3, Category::Motherboard, 700.0, json!({ "socket": "LGA1700" })),
        ];
        for part in parts {
            build.set(part.category, part).unwrap();
        }

        assert_eq!(total_wattage(&build), 50.0 + 253.0 + 10.0 + 450.0);
        assert_eq!(total_price(&build), 3270.0);
        assert_eq!(selected_items_count(&build), 4);
    }

    #[test]
    fn recommended_wattage_rounds_up() {
        assert_eq!(recommended_psu_wattage(400.0), 480.0);
        assert_eq!(recommended_psu_wattage(763.0), 916.0);
        assert_eq!(recommended_psu_wattage(50.0), 60.0);
    }
}
