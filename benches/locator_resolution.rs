//! Locator resolution benchmark suite.
//!
//! Measures the pure, driver-free part of element lookup:
//! - Platform fallback resolution for every platform
//! - Placeholder formatting of selectors
//! - jQuery query composition for nested chains
//!
//! Run with: cargo bench --bench locator_resolution
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use page_object_driver::locator::ChainLink;
use page_object_driver::{FieldLocators, Locate, Locator, LocatorChain, Platform, Strategy};

// ============================================================================
// Fixtures
// ============================================================================

const SUBMIT: FieldLocators = FieldLocators::new(
    "CheckoutPage",
    "submit",
    &[
        Locate::new(Platform::Default, Strategy::Id, "submit"),
        Locate::new(Platform::Web, Strategy::Css, "button[type='submit']"),
        Locate::new(Platform::WebDesktopChrome, Strategy::Css, "#checkout button.primary"),
        Locate::new(Platform::Mobile, Strategy::AccessibilityId, "Submit"),
        Locate::new(Platform::MobileIos, Strategy::IosClassChain, "**/XCUIElementTypeButton[`name == 'Submit'`]"),
    ],
);

const CHAIN_DEPTHS: &[usize] = &[1, 4, 16];

// ============================================================================
// Benchmark: Platform Resolution
// ============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    group.bench_function("all_platforms", |b| {
        b.iter(|| {
            for platform in Platform::ALL {
                let _ = black_box(SUBMIT.resolve(black_box(platform)));
            }
        });
    });

    group.bench_function("deepest_fallback", |b| {
        b.iter(|| black_box(SUBMIT.resolve(black_box(Platform::WebIosSmallTablet))));
    });

    group.finish();
}

// ============================================================================
// Benchmark: Selector Formatting
// ============================================================================

fn bench_format(c: &mut Criterion) {
    let locator = Locator::new(Strategy::XPath, "//table[@id='%s']//tr[%d]/td[%d]");
    let args = vec!["orders".to_string(), "12".to_string(), "3".to_string()];

    c.bench_function("format_selector", |b| {
        b.iter(|| black_box(locator.by(black_box(&args))));
    });
}

// ============================================================================
// Benchmark: Query Composition
// ============================================================================

fn bench_query_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_chain");

    for &depth in CHAIN_DEPTHS {
        let ancestors: Vec<ChainLink> = (0..depth)
            .map(|i| ChainLink::new(Locator::new(Strategy::JQuery, format!(".level-{i}")), Vec::new()))
            .collect();
        let target = ChainLink::new(
            Locator::new(Strategy::JQuery, "li:contains('%s')"),
            vec!["needle".to_string()],
        );
        let chain = LocatorChain::with_ancestors(ancestors, target);

        group.bench_with_input(BenchmarkId::new("depth", depth), &chain, |b, chain| {
            b.iter(|| black_box(chain.query_by()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_format, bench_query_chain);
criterion_main!(benches);
