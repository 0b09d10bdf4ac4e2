//! Property tests for tier selection, fee comparison and aggregation

use plansim_core::catalog::{TierCatalog, TierType, DEFAULT_TIER_SET};
use plansim_core::exceptions::{ExceptionTable, OPEN_SOURCE_COLLECTIVE_HOST_ID};
use plansim_core::fees::{calculate_fees, Interval, SelectedPlan};
use plansim_core::host::{Host, MonthlyCount};
use plansim_core::metrics::yearly_average;
use plansim_core::revenue::aggregate_revenue;
use plansim_core::selector::{is_eligible, quote_tier, select_best_tier, Usage, YEARLY_BASE_MONTHS};
use plansim_core::{SimulatorConfig, Tier};
use proptest::prelude::*;

fn default_tiers() -> Vec<Tier> {
    TierCatalog::new().tier_set(DEFAULT_TIER_SET).unwrap()
}

fn usage_strategy() -> impl Strategy<Value = Usage> {
    (0i64..5_000, 0i64..3_000, any::<bool>(), any::<bool>()).prop_map(
        |(expenses, collectives, automated_payouts, tax_forms)| Usage {
            expenses,
            collectives,
            automated_payouts,
            tax_forms,
        },
    )
}

fn series(counts: &[i64]) -> Vec<MonthlyCount> {
    counts
        .iter()
        .enumerate()
        .map(|(i, count)| MonthlyCount { month: format!("2024-{:02}", i + 1), count: *count })
        .collect()
}

prop_compose! {
    fn host_strategy()(
        id in 1i64..10_000,
        expenses in prop::collection::vec(0i64..400, 0..=12),
        collectives in prop::collection::vec(0i64..80, 0..=12),
        raised in 0i64..50_000_000,
        host_fees in 0i64..5_000_000,
        crowdfunding_share in 0i64..=100,
        tips in 0i64..100_000,
        automated_payouts in any::<bool>(),
        tax_forms in any::<bool>(),
    ) -> Host {
        let mut host = Host::new(id, format!("host-{id}"));
        host.monthly_expenses = series(&expenses);
        host.monthly_active_collectives = series(&collectives);
        host.total_raised_crowdfunding_usd = raised;
        host.total_host_fees_usd = host_fees;
        host.total_host_fees_crowdfunding_usd = host_fees * crowdfunding_share / 100;
        host.total_platform_tips = tips;
        host.automated_payouts = automated_payouts;
        host.tax_forms = tax_forms;
        host
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_selection_is_minimal(usage in usage_strategy()) {
        let tiers = default_tiers();
        let best = select_best_tier(&tiers, &usage).unwrap();

        prop_assert!(is_eligible(&best.tier, &usage));
        for tier in tiers.iter().filter(|t| is_eligible(t, &usage)) {
            prop_assert!(best.yearly_cost <= quote_tier(tier, &usage).yearly_cost);
        }
    }

    #[test]
    fn test_selection_is_monotonic(usage in usage_strategy(), more_expenses in 0i64..500, more_collectives in 0i64..500) {
        let tiers = default_tiers();
        let bigger = Usage {
            expenses: usage.expenses + more_expenses,
            collectives: usage.collectives + more_collectives,
            ..usage
        };

        let small = select_best_tier(&tiers, &usage).unwrap();
        let large = select_best_tier(&tiers, &bigger).unwrap();
        prop_assert!(small.yearly_cost <= large.yearly_cost);
    }

    #[test]
    fn test_quote_is_monotonic_per_tier(usage in usage_strategy(), more_expenses in 0i64..500, more_collectives in 0i64..500) {
        let bigger = Usage {
            expenses: usage.expenses + more_expenses,
            collectives: usage.collectives + more_collectives,
            ..usage
        };

        for tier in default_tiers() {
            let small = quote_tier(&tier, &usage);
            let large = quote_tier(&tier, &bigger);
            prop_assert!(small.monthly_cost <= large.monthly_cost, "{}", tier.title);
            prop_assert!(small.yearly_cost <= large.yearly_cost, "{}", tier.title);
            prop_assert!(small.additional_expenses <= large.additional_expenses);
            prop_assert!(small.additional_collectives <= large.additional_collectives);
        }
    }

    #[test]
    fn test_tax_forms_always_selects_top(usage in usage_strategy()) {
        let usage = Usage { tax_forms: true, ..usage };
        let best = select_best_tier(&default_tiers(), &usage).unwrap();
        prop_assert_eq!(best.tier.tier_type, TierType::Top);
    }

    #[test]
    fn test_yearly_base_is_discounted(usage in usage_strategy()) {
        for tier in default_tiers() {
            let quote = quote_tier(&tier, &usage);
            let overage = quote.monthly_cost - tier.pricing_model.price_per_month;
            prop_assert_eq!(
                quote.yearly_cost,
                tier.pricing_model.price_per_month * YEARLY_BASE_MONTHS + overage * 12
            );
        }
    }

    #[test]
    fn test_average_divides_by_twelve(counts in prop::collection::vec(0i64..10_000, 0..=12)) {
        let sum: i64 = counts.iter().sum();
        let expected = (sum * 2 + 12) / 24;
        prop_assert_eq!(yearly_average(&series(&counts)), expected);
    }

    #[test]
    fn test_exceptions_only_touch_listed_hosts(host in host_strategy(), yearly in any::<bool>()) {
        prop_assume!(host.id != OPEN_SOURCE_COLLECTIVE_HOST_ID);
        let interval = if yearly { Interval::Yearly } else { Interval::Monthly };
        let plan = SelectedPlan::new(default_tiers()[3].clone(), interval);

        let with_defaults = calculate_fees(&host, &plan, &ExceptionTable::default());
        let without = calculate_fees(&host, &plan, &ExceptionTable::empty());
        prop_assert_eq!(with_defaults, without);
    }

    #[test]
    fn test_breakdown_totals_add_up(host in host_strategy(), yearly in any::<bool>()) {
        let interval = if yearly { Interval::Yearly } else { Interval::Monthly };
        let plan = SelectedPlan::new(default_tiers()[5].clone(), interval);
        let fees = calculate_fees(&host, &plan, &ExceptionTable::default()).unwrap();

        for side in [&fees.before, &fees.after] {
            prop_assert_eq!(
                side.total_host_plans,
                side.base_price + side.extra_collectives_amount + side.extra_expenses_amount
            );
            prop_assert_eq!(
                side.total,
                side.platform_fees_on_crowdfunding + side.platform_fees_on_non_crowdfunding + side.total_host_plans
            );
            prop_assert!(side.total >= 0);
        }
        prop_assert_eq!(fees.before.base_price, 0);
        prop_assert_eq!(fees.after.platform_fees_on_non_crowdfunding, 0);
        prop_assert_eq!(fees.after.platform_fees_on_crowdfunding, fees.before.platform_fees_on_crowdfunding);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn test_aggregation_is_additive(hosts in prop::collection::vec(host_strategy(), 0..8)) {
        let tiers = default_tiers();
        let config = SimulatorConfig::plain();
        let total = aggregate_revenue(&tiers, &hosts, &config).unwrap();

        let mut before = 0;
        let mut after = 0;
        let mut tips = 0;
        for host in &hosts {
            let single = aggregate_revenue(&tiers, std::slice::from_ref(host), &config).unwrap();
            before += single.before.fees;
            after += single.after.fees;
            tips += single.after.platform_tips;
        }

        prop_assert_eq!(total.before.fees, before);
        prop_assert_eq!(total.after.fees, after);
        prop_assert_eq!(total.after.platform_tips, tips);
        prop_assert_eq!(total.before.platform_tips, total.after.platform_tips);
    }
}
