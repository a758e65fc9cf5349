//! Pickup aggregation tests
//!
//! Tests for the pickup summary including:
//! - Total weight additivity and order independence
//! - Net balance identity (revenue minus treatment cost)
//! - Recycling rate, including the zero-weight guard

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::{
    generate_pickup_number, Company, Destination, FacilityType, PickupItem, Site, StockTracking,
    Truck, WasteCategory,
};
use shared::types::line_amount;
use waste_recycling_core::services::pickup::{CreatePickupInput, PickupItemInput};
use waste_recycling_core::services::reporting::summarize_items;
use waste_recycling_core::services::{PickupService, ReportingService};
use waste_recycling_core::{AppError, Config, Registry};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

struct TestContext {
    registry: Arc<Registry>,
    company_id: Uuid,
    site_id: Uuid,
    pickups: PickupService,
    reporting: ReportingService,
}

fn setup() -> TestContext {
    let registry = Arc::new(Registry::new());
    let config = Arc::new(Config::load().unwrap());
    let company_id = Uuid::new_v4();
    let site_id = Uuid::new_v4();
    let now = Utc::now();

    registry.register_company(Company {
        id: company_id,
        name: "Maroc Agro Industrie".to_string(),
        ice: "001234567000089".to_string(),
        city: "Casablanca".to_string(),
        address: None,
        phone: None,
        email: None,
        created_at: now,
        updated_at: now,
    });
    registry.register_site(Site {
        id: site_id,
        company_id,
        name: "Dépôt Ain Sebaa".to_string(),
        city: "Casablanca".to_string(),
        address: None,
    });

    TestContext {
        pickups: PickupService::new(registry.clone(), config.clone()),
        reporting: ReportingService::new(registry.clone(), config),
        registry,
        company_id,
        site_id,
    }
}

fn item_input(category: &str, label: &str, quantity: &str) -> PickupItemInput {
    PickupItemInput {
        category: category.to_string(),
        label: label.to_string(),
        quantity_kg: dec(quantity),
        unit: None,
        client_sale_unit_price: None,
        service_unit_price: None,
        purchase_unit_price: None,
        treatment_unit_price: None,
    }
}

fn pickup_input(
    ctx: &TestContext,
    number: &str,
    items: Vec<PickupItemInput>,
) -> CreatePickupInput {
    CreatePickupInput {
        pickup_number: number.to_string(),
        pickup_date: Utc::now(),
        destination_date: None,
        company_id: ctx.company_id,
        site_id: ctx.site_id,
        truck_id: None,
        driver_name: None,
        destination_id: None,
        items,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_pickup_summary_end_to_end() {
        let ctx = setup();

        let mut carton = item_input("recyclable", "carton", "100");
        carton.purchase_unit_price = Some(dec("1.5"));
        let mut dib = item_input("banal", "DIB", "50");
        dib.treatment_unit_price = Some(dec("1.6"));
        let mut solvants = item_input("to_destroy", "solvants", "10");
        solvants.treatment_unit_price = Some(dec("2.0"));

        let pickup = ctx
            .pickups
            .create_pickup(None, pickup_input(&ctx, "ENL-2024-0001", vec![carton, dib, solvants]))
            .unwrap();

        let summary = ctx.reporting.pickup_summary(pickup.id).unwrap();
        assert_eq!(summary.totals.total_weight_kg, dec("160"));
        assert_eq!(summary.totals.recycling_revenue_mad, dec("150.00"));
        assert_eq!(summary.totals.treatment_cost_mad, dec("100.00"));
        assert_eq!(summary.totals.net_balance_mad, dec("50.00"));
        assert_eq!(summary.totals.recycling_rate_percent, dec("62.5000"));
    }

    #[test]
    fn test_empty_pickup_summary_is_all_zero() {
        let ctx = setup();
        let pickup = ctx
            .pickups
            .create_pickup(None, pickup_input(&ctx, "ENL-2024-0002", vec![]))
            .unwrap();

        let summary = ctx.reporting.pickup_summary(pickup.id).unwrap();
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.totals.total_weight_kg, Decimal::ZERO);
        assert_eq!(summary.totals.recycling_revenue_mad, Decimal::ZERO);
        assert_eq!(summary.totals.treatment_cost_mad, Decimal::ZERO);
        assert_eq!(summary.totals.net_balance_mad, Decimal::ZERO);
        assert_eq!(summary.totals.recycling_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_zero_weight_rate_is_zero() {
        let ctx = setup();
        let pickup = ctx
            .pickups
            .create_pickup(
                None,
                pickup_input(&ctx, "ENL-2024-0003", vec![item_input("recyclable", "carton", "0")]),
            )
            .unwrap();

        let summary = ctx.reporting.pickup_summary(pickup.id).unwrap();
        assert_eq!(summary.totals.recycling_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_net_balance_can_be_negative() {
        let ctx = setup();

        let mut carton = item_input("recyclable", "carton", "10");
        carton.purchase_unit_price = Some(dec("1.0"));
        let mut dib = item_input("banal", "DIB", "100");
        dib.treatment_unit_price = Some(dec("2.0"));

        let pickup = ctx
            .pickups
            .create_pickup(None, pickup_input(&ctx, "ENL-2024-0004", vec![carton, dib]))
            .unwrap();

        let summary = ctx.reporting.pickup_summary(pickup.id).unwrap();
        assert_eq!(summary.totals.recycling_revenue_mad, dec("10.00"));
        assert_eq!(summary.totals.treatment_cost_mad, dec("200.00"));
        assert_eq!(summary.totals.net_balance_mad, dec("-190.00"));
    }

    #[test]
    fn test_static_fields_copied_through() {
        let ctx = setup();
        let truck_id = Uuid::new_v4();
        let destination_id = Uuid::new_v4();
        ctx.registry.register_truck(Truck {
            id: truck_id,
            registration_number: "12345-A-6".to_string(),
            capacity_kg: Some(dec("3500")),
        });
        ctx.registry.register_destination(Destination {
            id: destination_id,
            name: "Centre de tri Bernoussi".to_string(),
            facility_type: FacilityType::SortingCenter,
            city: "Casablanca".to_string(),
        });

        let number = generate_pickup_number("ENL", 2024, 5);
        let mut input = pickup_input(&ctx, &number, vec![]);
        input.truck_id = Some(truck_id);
        input.destination_id = Some(destination_id);
        let pickup = ctx.pickups.create_pickup(None, input).unwrap();

        let summary = ctx.reporting.pickup_summary(pickup.id).unwrap();
        assert_eq!(summary.pickup_number, "ENL-2024-0005");
        assert_eq!(summary.company_id, ctx.company_id);
        assert_eq!(summary.company_name, "Maroc Agro Industrie");
        assert_eq!(summary.site_name, "Dépôt Ain Sebaa");
        assert_eq!(summary.truck_id, Some(truck_id));
        assert_eq!(summary.destination_name, Some("Centre de tri Bernoussi".to_string()));
        assert_eq!(summary.currency, "MAD");
    }

    #[test]
    fn test_unknown_truck_reference_rejected() {
        let ctx = setup();
        let mut input = pickup_input(&ctx, "ENL-2024-0010", vec![]);
        input.truck_id = Some(Uuid::new_v4());
        let err = ctx.pickups.create_pickup(None, input).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_only_category_role_enters_summary() {
        let ctx = setup();

        // A recyclable line priced only for treatment contributes nothing
        // to revenue; client sale and service amounts never enter totals.
        let mut carton = item_input("recyclable", "carton", "100");
        carton.treatment_unit_price = Some(dec("3.0"));
        carton.client_sale_unit_price = Some(dec("9.0"));
        carton.service_unit_price = Some(dec("9.0"));

        let pickup = ctx
            .pickups
            .create_pickup(None, pickup_input(&ctx, "ENL-2024-0006", vec![carton]))
            .unwrap();

        let summary = ctx.reporting.pickup_summary(pickup.id).unwrap();
        assert_eq!(summary.totals.recycling_revenue_mad, Decimal::ZERO);
        assert_eq!(summary.totals.treatment_cost_mad, Decimal::ZERO);
    }

    #[test]
    fn test_unrecognized_category_rejected_at_ingestion() {
        let ctx = setup();
        let err = ctx
            .pickups
            .create_pickup(
                None,
                pickup_input(&ctx, "ENL-2024-0007", vec![item_input("plastic", "PET", "10")]),
            )
            .unwrap_err();

        assert!(matches!(err, AppError::DataIntegrity(_)));
        assert_eq!(err.code(), "DATA_INTEGRITY_ERROR");
    }

    #[test]
    fn test_item_amounts_computed_at_ingestion() {
        let ctx = setup();

        let mut carton = item_input("recyclable", "carton", "33.333");
        carton.purchase_unit_price = Some(dec("1.5"));

        let pickup = ctx
            .pickups
            .create_pickup(None, pickup_input(&ctx, "ENL-2024-0008", vec![carton]))
            .unwrap();

        assert_eq!(pickup.items[0].purchase_amount, Some(dec("50.00")));
        assert_eq!(pickup.items[0].unit, "kg");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn make_item(category: WasteCategory, quantity: Decimal, unit_price: Decimal) -> PickupItem {
        PickupItem {
            id: Uuid::new_v4(),
            category,
            label: "papier".to_string(),
            quantity_kg: quantity,
            unit: "kg".to_string(),
            client_sale_unit_price: None,
            client_sale_amount: None,
            service_unit_price: None,
            service_amount: None,
            purchase_unit_price: Some(unit_price),
            purchase_amount: Some(line_amount(quantity, unit_price)),
            treatment_unit_price: Some(unit_price),
            treatment_amount: Some(line_amount(quantity, unit_price)),
            stock: category
                .is_recyclable()
                .then(|| StockTracking::new(quantity)),
        }
    }

    fn category_strategy() -> impl Strategy<Value = WasteCategory> {
        prop_oneof![
            Just(WasteCategory::Recyclable),
            Just(WasteCategory::Banal),
            Just(WasteCategory::ToDestroy),
        ]
    }

    /// Quantities between 0.0 and 1000.0 kg
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Unit prices between 0.00 and 1000.00 MAD
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn ledger_strategy() -> impl Strategy<Value = Vec<PickupItem>> {
        prop::collection::vec(
            (category_strategy(), quantity_strategy(), price_strategy()),
            0..12,
        )
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(category, quantity, price)| make_item(category, quantity, price))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Total weight is the plain sum of item quantities
        #[test]
        fn prop_total_weight_is_sum_of_quantities(items in ledger_strategy()) {
            let expected: Decimal = items.iter().map(|i| i.quantity_kg).sum();
            let totals = summarize_items(&items);
            prop_assert_eq!(totals.total_weight_kg, expected);
        }

        /// Net balance always equals revenue minus treatment cost
        #[test]
        fn prop_net_balance_identity(items in ledger_strategy()) {
            let totals = summarize_items(&items);
            prop_assert_eq!(
                totals.net_balance_mad,
                totals.recycling_revenue_mad - totals.treatment_cost_mad
            );
        }

        /// The recycling rate is a percentage between 0 and 100
        #[test]
        fn prop_recycling_rate_bounds(items in ledger_strategy()) {
            let totals = summarize_items(&items);
            prop_assert!(totals.recycling_rate_percent >= Decimal::ZERO);
            prop_assert!(totals.recycling_rate_percent <= Decimal::ONE_HUNDRED);
        }

        /// Aggregation does not depend on item order
        #[test]
        fn prop_summary_order_independent(items in ledger_strategy()) {
            let mut reversed = items.clone();
            reversed.reverse();
            prop_assert_eq!(summarize_items(&items), summarize_items(&reversed));
        }
    }
}
