use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cinema_menu::menu::build_forest;
use cinema_menu::models::MenuItemRow;

// Дерево с фиксированным ветвлением, id растут в порядке обхода в ширину
fn rows(count: i64, fanout: i64) -> Vec<MenuItemRow> {
    let created_at = Utc.with_ymd_and_hms(2021, 4, 27, 15, 35, 15).unwrap();
    (1..=count)
        .map(|id| MenuItemRow {
            id,
            name: format!("item {id}"),
            url: format!("/items/{id}"),
            parent_id: if id == 1 { None } else { Some((id - 2) / fanout + 1) },
            created_at,
        })
        .collect()
}

fn bench_build_forest(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_forest");
    for count in [100i64, 10_000, 100_000] {
        let input = rows(count, 4);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| build_forest(black_box(input.clone()), 64).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_forest);
criterion_main!(benches);
