use criterion::{black_box, criterion_group, criterion_main, Criterion};
use travel_map::countries;
use travel_map::map::renderer::{Country, MapRenderer};
use travel_map::map::Projection;
use travel_map::reconcile::compare_country_lists;

/// Synthetic world: a grid of square countries roughly the size of the real
/// dataset, enough to exercise the spatial index and polygon tests.
fn synthetic_world() -> MapRenderer {
    let mut countries = Vec::new();
    for i in 0..15 {
        for j in 0..13 {
            let lon = -170.0 + i as f64 * 22.0;
            let lat = -80.0 + j as f64 * 12.0;
            countries.push(Country {
                name: format!("Country {i}-{j}"),
                polygons: vec![vec![vec![
                    (lon, lat),
                    (lon + 18.0, lat),
                    (lon + 18.0, lat + 9.0),
                    (lon, lat + 9.0),
                ]]],
            });
        }
    }
    MapRenderer::new(countries)
}

fn bench_country_at(c: &mut Criterion) {
    let renderer = synthetic_world();
    c.bench_function("country_at", |b| {
        b.iter(|| {
            let mut hits = 0;
            for lon in (-170..170).step_by(7) {
                for lat in (-80..80).step_by(7) {
                    if renderer.country_at(black_box(lon as f64), black_box(lat as f64)).is_some() {
                        hits += 1;
                    }
                }
            }
            hits
        })
    });
}

fn bench_projection(c: &mut Criterion) {
    let proj = Projection::world(3200, 2400);
    c.bench_function("project_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..10_000 {
                let lon = -180.0 + (i % 360) as f64;
                let lat = -85.0 + (i % 170) as f64;
                let (x, y) = proj.project(black_box(lon), black_box(lat));
                acc += x + y;
            }
            acc
        })
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let map_names: Vec<String> = countries::ALL.iter().map(|n| n.to_string()).collect();
    c.bench_function("reconcile_full_lists", |b| {
        b.iter(|| compare_country_lists(black_box(&map_names), black_box(&countries::ALL)))
    });
}

criterion_group!(benches, bench_country_at, bench_projection, bench_reconcile);
criterion_main!(benches);
