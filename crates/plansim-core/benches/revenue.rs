//! Revenue projection benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plansim_core::catalog::{TierCatalog, DEFAULT_TIER_SET};
use plansim_core::host::{Host, MonthlyCount};
use plansim_core::revenue::aggregate_revenue;
use plansim_core::selector::{select_best_tier, Usage};
use plansim_core::SimulatorConfig;

fn synthetic_hosts(count: i64) -> Vec<Host> {
    (1..=count)
        .map(|id| {
            let mut host = Host::new(id, format!("host-{id}"));
            host.monthly_expenses = (1..=12)
                .map(|m| MonthlyCount { month: format!("2024-{m:02}"), count: (id * 7 + m) % 500 })
                .collect();
            host.monthly_active_collectives = (1..=12)
                .map(|m| MonthlyCount { month: format!("2024-{m:02}"), count: (id * 3 + m) % 120 })
                .collect();
            host.total_raised_crowdfunding_usd = id * 10_000;
            host.total_host_fees_usd = id * 1_500;
            host.total_host_fees_crowdfunding_usd = id * 300;
            host.total_platform_tips = id * 50;
            host.automated_payouts = id % 3 == 0;
            host.tax_forms = id % 11 == 0;
            host
        })
        .collect()
}

fn selection_benchmark(c: &mut Criterion) {
    let tiers = TierCatalog::new().tier_set(DEFAULT_TIER_SET).unwrap();
    let usage = Usage { expenses: 240, collectives: 45, automated_payouts: true, tax_forms: false };

    c.bench_function("select_best_tier", |b| {
        b.iter(|| select_best_tier(black_box(&tiers), black_box(&usage)))
    });
}

fn aggregation_benchmark(c: &mut Criterion) {
    let tiers = TierCatalog::new().tier_set(DEFAULT_TIER_SET).unwrap();
    let config = SimulatorConfig::default();
    let mut group = c.benchmark_group("aggregate_revenue");

    for size in [100, 1_000, 10_000].iter() {
        let hosts = synthetic_hosts(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &hosts, |b, hosts| {
            b.iter(|| aggregate_revenue(black_box(&tiers), black_box(hosts), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, selection_benchmark, aggregation_benchmark);
criterion_main!(benches);
