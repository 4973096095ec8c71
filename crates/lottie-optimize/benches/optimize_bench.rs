use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lottie_data::{Color, Composition, Layer, LayerCollection, LayerKind};
use lottie_optimize::{LayerMergeOptimizer, PassKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Solids in a handful of colors, each shown for a short random window.
fn generated_composition(layer_count: u32) -> Composition {
    let mut rng = StdRng::seed_from_u64(7);
    let palette = [
        Color::rgb(1.0, 0.0, 0.0),
        Color::rgb(0.0, 1.0, 0.0),
        Color::rgb(0.0, 0.0, 1.0),
    ];
    let layers = (0..layer_count)
        .map(|index| {
            let in_point = f64::from(rng.gen_range(0..200u32));
            let length = f64::from(rng.gen_range(5..30u32));
            let kind = LayerKind::Solid {
                width: 64.0,
                height: 64.0,
                color: palette[rng.gen_range(0..palette.len())],
            };
            Layer::new(index, kind, in_point, in_point + length)
        })
        .collect();

    Composition {
        name: "bench".into(),
        version: String::new(),
        width: 512.0,
        height: 512.0,
        in_point: 0.0,
        out_point: 240.0,
        frames_per_second: 30.0,
        is_3d: false,
        assets: Vec::new(),
        layers: LayerCollection::from_top_to_bottom(layers),
        markers: Vec::new(),
    }
}

fn bench_general_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("LayerMergeOptimizer::run");
    let optimizer = LayerMergeOptimizer::default();

    for &count in &[16u32, 64, 128] {
        let composition = generated_composition(count);
        group.bench_with_input(BenchmarkId::new("all_layers", count), &composition, |b, comp| {
            b.iter(|| optimizer.run(comp, PassKind::AllLayers))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_general_pass);
criterion_main!(benches);
