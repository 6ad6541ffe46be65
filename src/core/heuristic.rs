use crate::core::{EstimateSource, LineItem, PriceBreakdown, PriceEstimate, RequestDescriptor};
use crate::domain::model::{Urgency, DEFAULT_BASE_PRICE};

pub const BASE_SERVICE_PRICE: f64 = 7000.0;
pub const URGENT_MULTIPLIER: f64 = 1.5;
pub const RELAXED_MULTIPLIER: f64 = 0.8;
pub const COMPLEXITY_MULTIPLIER: f64 = 1.2;
/// Descriptions longer than this many UTF-16 code units count as complex.
pub const COMPLEX_DESCRIPTION_UNITS: usize = 100;

pub const BASE_COST_LABEL: &str = "Biaya dasar";
pub const SERVICE_COST_LABEL: &str = "Biaya jasa";

/// Offline, rule-based pricing. Pure: the same request always yields the same
/// estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl HeuristicEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(&self, request: &RequestDescriptor) -> PriceEstimate {
        let base_price = request
            .category()
            .map(|c| c.base_price)
            .unwrap_or(DEFAULT_BASE_PRICE);

        // Multiplier order is fixed and rounding happens once at the end.
        let mut service = BASE_SERVICE_PRICE;
        match request.urgency() {
            Urgency::Urgent => service *= URGENT_MULTIPLIER,
            Urgency::Relaxed => service *= RELAXED_MULTIPLIER,
            Urgency::Normal => {}
        }
        if request.people_needed() > 1 {
            service *= f64::from(request.people_needed());
        }
        if description_units(request.description()) > COMPLEX_DESCRIPTION_UNITS {
            service *= COMPLEXITY_MULTIPLIER;
        }
        let service_price = service.round() as u64;

        tracing::debug!(
            "Heuristic price for '{}': base={}, service={}",
            request.title(),
            base_price,
            service_price
        );

        PriceEstimate {
            base_price,
            service_price,
            total_price: base_price + service_price,
            breakdown: PriceBreakdown::new(vec![
                LineItem::new(BASE_COST_LABEL, base_price),
                LineItem::new(SERVICE_COST_LABEL, service_price),
            ]),
            source: EstimateSource::Heuristic,
        }
    }
}

/// Length as client-side text fields report it: UTF-16 code units, so a
/// character outside the Basic Multilingual Plane counts twice.
fn description_units(description: &str) -> usize {
    description.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        description: &str,
        urgency: Urgency,
        people: i64,
        category: Option<u32>,
    ) -> RequestDescriptor {
        RequestDescriptor::new("Print dokumen", description, urgency, people, category).unwrap()
    }

    #[test]
    fn test_plain_request_has_no_multipliers() {
        let estimate = HeuristicEstimator::new()
            .estimate(&request("cetak 5 halaman", Urgency::Normal, 1, Some(1)));

        assert_eq!(estimate.base_price, 5000);
        assert_eq!(estimate.service_price, 7000);
        assert_eq!(estimate.total_price, 12000);
        assert_eq!(estimate.source, EstimateSource::Heuristic);
        assert_eq!(
            estimate.breakdown.items(),
            &[
                LineItem::new("Biaya dasar", 5000),
                LineItem::new("Biaya jasa", 7000)
            ]
        );
    }

    #[test]
    fn test_all_multipliers_apply_before_rounding() {
        let description = "x".repeat(150);
        let estimate =
            HeuristicEstimator::new().estimate(&request(&description, Urgency::Urgent, 3, Some(1)));

        assert_eq!(estimate.service_price, 37800);
        assert_eq!(estimate.total_price, 42800);
        assert!(estimate.is_consistent());
    }

    #[test]
    fn test_relaxed_urgency_discount() {
        let estimate =
            HeuristicEstimator::new().estimate(&request("", Urgency::Relaxed, 1, Some(2)));
        assert_eq!(estimate.base_price, 10000);
        assert_eq!(estimate.service_price, 5600);
        assert_eq!(estimate.total_price, 15600);
    }

    #[test]
    fn test_unknown_or_missing_category_uses_default_base() {
        let heuristic = HeuristicEstimator::new();
        let absent = heuristic.estimate(&request("", Urgency::Normal, 1, None));
        let unknown = heuristic.estimate(&request("", Urgency::Normal, 1, Some(42)));
        assert_eq!(absent.base_price, 15000);
        assert_eq!(unknown.base_price, 15000);
    }

    #[test]
    fn test_description_threshold_is_exclusive() {
        let heuristic = HeuristicEstimator::new();
        let at_limit = heuristic.estimate(&request(&"a".repeat(100), Urgency::Normal, 1, None));
        assert_eq!(at_limit.service_price, 7000);

        // 100 characters but 200 bytes
        let accented = heuristic.estimate(&request(&"é".repeat(100), Urgency::Normal, 1, None));
        assert_eq!(accented.service_price, 7000);
    }

    #[test]
    fn test_emoji_count_as_two_units() {
        let heuristic = HeuristicEstimator::new();
        // 60 characters, 120 UTF-16 code units
        let emoji = heuristic.estimate(&request(&"😀".repeat(60), Urgency::Normal, 1, None));
        assert_eq!(emoji.service_price, 8400);

        let fifty = heuristic.estimate(&request(&"😀".repeat(50), Urgency::Normal, 1, None));
        assert_eq!(fifty.service_price, 7000);
    }

    #[test]
    fn test_service_price_increases_with_urgency() {
        let heuristic = HeuristicEstimator::new();
        for people in [1, 2, 7] {
            let relaxed = heuristic.estimate(&request("desc", Urgency::Relaxed, people, Some(3)));
            let normal = heuristic.estimate(&request("desc", Urgency::Normal, people, Some(3)));
            let urgent = heuristic.estimate(&request("desc", Urgency::Urgent, people, Some(3)));
            assert!(relaxed.service_price < normal.service_price);
            assert!(normal.service_price < urgent.service_price);
        }
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let heuristic = HeuristicEstimator::new();
        let req = request(&"y".repeat(120), Urgency::Relaxed, 4, Some(6));
        let first = heuristic.estimate(&req);
        for _ in 0..10 {
            assert_eq!(heuristic.estimate(&req), first);
        }
    }

    #[test]
    fn test_breakdown_always_matches_total() {
        let heuristic = HeuristicEstimator::new();
        for category in [None, Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)] {
            for urgency in [Urgency::Relaxed, Urgency::Normal, Urgency::Urgent] {
                for people in 1..=10 {
                    let req = request(&"z".repeat(101), urgency, people, category);
                    let estimate = heuristic.estimate(&req);
                    assert!(estimate.is_consistent());
                    assert_eq!(
                        estimate.total_price,
                        estimate.base_price + estimate.service_price
                    );
                }
            }
        }
    }
}
