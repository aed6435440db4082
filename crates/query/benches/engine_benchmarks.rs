use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront_catalog::{FilterSpecification, PageRequest, Price, Product, SortMode};
use storefront_core::{CategoryId, ProductId};
use storefront_infra::InMemoryCatalogStore;
use storefront_query::{CatalogQueryEngine, ListingConfig, Storefront};
use uuid::Uuid;

const NAMES: [&str; 6] = ["Laptop", "Mouse", "Monitor", "Silla", "Lampara", "Teclado"];

fn catalog(size: usize) -> Arc<InMemoryCatalogStore> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let products = (0..size).map(|i| {
        Product::new(
            ProductId::from_uuid(Uuid::from_u128(i as u128 + 1)),
            format!("{} {i}", NAMES[i % NAMES.len()]),
            Price::new(Decimal::from((i * 37 % 900) as u64)).unwrap(),
            start + Duration::minutes(i as i64),
        )
        .in_category(CategoryId::new((i % 8) as i64))
        .featured(i % 5 == 0)
        .pinned(i % 97 == 0)
        .active(i % 11 != 0)
    });
    Arc::new(InMemoryCatalogStore::with_catalog([], products))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

fn bench_category_page(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("category_page");

    for size in [100usize, 1_000, 10_000] {
        let engine = CatalogQueryEngine::new(catalog(size));
        let filter = FilterSpecification::public().in_category(CategoryId::new(3));
        group.throughput(Throughput::Elements(size as u64));
        for mode in SortMode::ALL {
            group.bench_with_input(BenchmarkId::new(mode.as_str(), size), &mode, |b, &mode| {
                b.iter(|| {
                    let result = rt
                        .block_on(engine.query(&filter, mode, PageRequest::new(2, 48)))
                        .unwrap();
                    black_box(result);
                });
            });
        }
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("search");
    let storefront = Storefront::new(catalog(10_000), ListingConfig::default());

    group.bench_function("substring_hit", |b| {
        b.iter(|| black_box(rt.block_on(storefront.search("lamp")).unwrap()));
    });
    group.bench_function("blank_query", |b| {
        b.iter(|| black_box(rt.block_on(storefront.search("   ")).unwrap()));
    });

    group.finish();
}

fn bench_product_detail(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("product_detail");
    let storefront = Storefront::new(catalog(10_000), ListingConfig::default());
    let id = ProductId::from_uuid(Uuid::from_u128(42));

    group.bench_function("detail_with_related", |b| {
        b.iter(|| black_box(rt.block_on(storefront.product_detail(id)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_category_page, bench_search, bench_product_detail);
criterion_main!(benches);
