//! City metrics derived from domestic visitor totals.
//!
//! All three metrics scale linearly with `total / reference_visitors`:
//!
//! * popularity: `min(round(ratio * 100), 100)`
//! * cost index: `80 + round(ratio * 40)`
//! * rating: `round1(3.5 + popularity / 100 * 1.5)`

use globetrotter_catalog_models::CityMetrics;

/// Default visitor count that maps to a popularity of 100.
pub const DEFAULT_REFERENCE_VISITORS: f64 = 4_500_000.0;

const MAX_POPULARITY: f64 = 100.0;
const COST_INDEX_FLOOR: u32 = 80;
const COST_INDEX_SPAN: f64 = 40.0;
const RATING_FLOOR: f64 = 3.5;
const RATING_SPAN: f64 = 1.5;

/// Normalization reference for metric derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricScale {
    /// Visitor total that counts as "maximally popular". Must be finite and
    /// positive.
    pub reference_visitors: f64,
}

impl Default for MetricScale {
    fn default() -> Self {
        Self {
            reference_visitors: DEFAULT_REFERENCE_VISITORS,
        }
    }
}

/// Derives popularity, cost index and rating from a visitor total.
///
/// `domestic_visitors_total` must be non-negative and finite; the
/// aggregator guarantees this. The cost index saturates at `u32::MAX`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
pub fn derive(domestic_visitors_total: f64, scale: &MetricScale) -> CityMetrics {
    let ratio = domestic_visitors_total / scale.reference_visitors;

    let popularity_score = (ratio * 100.0).round().min(MAX_POPULARITY) as u8;
    let cost_index = COST_INDEX_FLOOR.saturating_add((ratio * COST_INDEX_SPAN).round() as u32);
    let rating = round1(RATING_FLOOR + f64::from(popularity_score) / 100.0 * RATING_SPAN);

    CityMetrics {
        popularity_score,
        cost_index,
        rating,
    }
}

/// Rounds to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(total: f64) -> CityMetrics {
        derive(total, &MetricScale::default())
    }

    #[test]
    fn derives_worked_example() {
        let m = metrics(1_500_000.0);
        assert_eq!(m.popularity_score, 33);
        assert_eq!(m.cost_index, 93);
        assert!((m.rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_visitors_hit_the_floors() {
        let m = metrics(0.0);
        assert_eq!(m.popularity_score, 0);
        assert_eq!(m.cost_index, 80);
        assert!((m.rating - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn reference_visitors_hit_the_ceilings() {
        let m = metrics(DEFAULT_REFERENCE_VISITORS);
        assert_eq!(m.popularity_score, 100);
        assert_eq!(m.cost_index, 120);
        assert!((m.rating - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn popularity_is_clamped_but_cost_is_not() {
        let m = metrics(45_000_000.0);
        assert_eq!(m.popularity_score, 100);
        assert_eq!(m.cost_index, 480);
        assert!((m.rating - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn metrics_stay_in_bounds() {
        let mut total = 0.0;
        while total < 20_000_000.0 {
            let m = metrics(total);
            assert!(m.popularity_score <= 100, "popularity {total}");
            assert!((3.5..=5.0).contains(&m.rating), "rating {total}");
            assert!(m.cost_index >= 80, "cost {total}");
            assert!(
                ((m.rating * 10.0).round() - m.rating * 10.0).abs() < 1e-9,
                "rating {} not one decimal",
                m.rating
            );
            total += 123_457.0;
        }
    }

    #[test]
    fn huge_totals_saturate_the_cost_index() {
        for total in [1e15, 1e300, f64::MAX] {
            let m = metrics(total);
            assert_eq!(m.popularity_score, 100);
            assert_eq!(m.cost_index, u32::MAX);
            assert!((m.rating - 5.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn cost_index_just_below_saturation_is_exact() {
        // ratio * 40 lands one short of the point where the floor would overflow.
        let headroom = f64::from(u32::MAX - COST_INDEX_FLOOR - 1);
        let m = metrics(headroom / COST_INDEX_SPAN * DEFAULT_REFERENCE_VISITORS);
        assert_eq!(m.cost_index, u32::MAX - 1);
    }

    #[test]
    fn rounds_half_up() {
        // 0.5% of the reference rounds up to a popularity of 1.
        let m = metrics(22_500.0);
        assert_eq!(m.popularity_score, 1);
    }

    #[test]
    fn scale_is_configurable() {
        let m = derive(1_000_000.0, &MetricScale {
            reference_visitors: 2_000_000.0,
        });
        assert_eq!(m.popularity_score, 50);
        assert_eq!(m.cost_index, 100);
        assert!((m.rating - 4.3).abs() < 1e-9);
    }
}
