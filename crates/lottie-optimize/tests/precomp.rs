mod common;

use common::*;
use lottie_data::{Asset, Color, Layer, LayerKind};
use lottie_optimize::shift::shift_layer_collection;
use lottie_optimize::{get_optimized, LayerMergeOptimizer, MergeHelper, PassKind, TimeRange};

/// Ten solids over `[0, 10)`. The first `shared` use colors common to every
/// call, the rest get colors unique to `variant`.
fn precomp_layers(shared: usize, variant: f64) -> Vec<Layer> {
    precomp_layers_over(shared, variant, 0.0, 10.0)
}

fn precomp_layers_over(shared: usize, variant: f64, in_point: f64, out_point: f64) -> Vec<Layer> {
    (0..10u32)
        .map(|i| {
            let color = if (i as usize) < shared {
                Color::rgb(f64::from(i) / 10.0, 0.0, 0.0)
            } else {
                Color::rgb(0.0, f64::from(i) / 10.0, variant)
            };
            colored_solid(i + 1, in_point, out_point, color)
        })
        .collect()
}

fn duplicated_precomps() -> lottie_data::Composition {
    let mut comp = composition(
        0.0,
        20.0,
        vec![precomp(1, "first", 0.0, 10.0), precomp(2, "second", 10.0, 20.0)],
    );
    comp.assets = vec![
        asset("first", precomp_layers(8, 0.25)),
        asset("second", precomp_layers(8, 0.75)),
    ];
    comp
}

#[test]
fn test_duplicate_precomps_share_one_asset() {
    let comp = duplicated_precomps();
    let optimizer = LayerMergeOptimizer::default();
    let (optimized, report) = optimizer.run(&comp, PassKind::PreCompsOnly).unwrap();

    let layers = top_to_bottom(&optimized);
    assert_eq!(layers.len(), 1);
    assert_eq!((layers[0].in_point, layers[0].out_point), (0.0, 20.0));
    let LayerKind::PreComp { ref_id, .. } = &layers[0].kind else {
        panic!("merged layer is not a precomp");
    };
    assert!(ref_id.starts_with("first second "));

    assert_eq!(report.assets_generated, 1);
    assert_eq!(optimized.assets.len(), 3);
    assert_eq!(optimized.assets[0].id(), ref_id);
    assert_eq!(optimized.assets[1..], comp.assets[..]);

    let merged = layer_collection(&optimized, ref_id).unwrap();
    assert_eq!(merged.len(), 12);

    let mut indices: Vec<u32> = merged.layers_bottom_to_top().iter().map(|layer| layer.index).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..12).collect::<Vec<u32>>());

    // shared solids span both windows, the others keep their own
    let spans: Vec<(f64, f64)> = merged
        .layers_top_to_bottom()
        .map(|layer| (layer.in_point, layer.out_point))
        .collect();
    assert_eq!(spans.iter().filter(|span| **span == (0.0, 20.0)).count(), 8);
    assert_eq!(spans.iter().filter(|span| **span == (0.0, 10.0)).count(), 2);
    assert_eq!(spans.iter().filter(|span| **span == (10.0, 20.0)).count(), 2);
}

#[test]
fn test_unrelated_precomps_are_not_merged() {
    let mut comp = duplicated_precomps();
    comp.assets = vec![
        asset("first", precomp_layers(0, 0.25)),
        asset("second", precomp_layers(0, 0.75)),
    ];
    assert_eq!(get_optimized(&comp).unwrap(), comp);
}

#[test]
fn test_rejected_attempts_leave_no_assets() {
    let mut comp = duplicated_precomps();
    comp.assets = vec![
        asset("first", precomp_layers(1, 0.25)),
        asset("second", precomp_layers(1, 0.75)),
    ];
    // one shared layer out of ten scores 0.1, below every round's threshold
    let optimized = get_optimized(&comp).unwrap();
    assert_eq!(optimized, comp);
    assert!(optimized
        .assets
        .iter()
        .all(|asset| matches!(asset, Asset::LayerCollection(a) if a.id == "first" || a.id == "second")));
}

#[test]
fn test_text_inside_precomp_blocks_merge() {
    let mut comp = duplicated_precomps();
    let mut layers = precomp_layers(8, 0.75);
    layers.push(Layer::new(20, LayerKind::Text { ref_id: "font".into() }, 0.0, 10.0));
    comp.assets[1] = asset("second", layers);
    assert_eq!(get_optimized(&comp).unwrap(), comp);
}

#[test]
fn test_duplicate_precomp_collection_score() {
    let comp = duplicated_precomps();
    let first = layer_collection(&comp, "first").unwrap();
    let second = layer_collection(&comp, "second").unwrap();
    // second starts 10 frames after first
    let second = shift_layer_collection(second, 10.0).unwrap();

    let mut helper = MergeHelper::new(&comp);
    let merged = helper
        .merge_layer_collections(first, TimeRange::new(0.0, 10.0), &second, TimeRange::new(10.0, 20.0))
        .unwrap();
    assert_eq!(merged.value().map(|layers| layers.len()), Some(12));
    assert!((merged.score() - 0.8).abs() < 1e-9);
}

#[test]
fn test_precomp_start_time_sets_content_offset() {
    let mut comp = duplicated_precomps();
    // second shows its asset frames [5, 15) during [10, 20)
    let mut second = precomp(2, "second", 10.0, 20.0);
    second.start_time = 5.0;
    comp.layers = lottie_data::LayerCollection::from_top_to_bottom(vec![precomp(1, "first", 0.0, 10.0), second]);
    comp.assets[1] = asset("second", precomp_layers_over(8, 0.75, 5.0, 15.0));

    let optimized = get_optimized(&comp).unwrap();
    let layers = top_to_bottom(&optimized);
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].start_time, 0.0);
    assert_eq!((layers[0].in_point, layers[0].out_point), (0.0, 20.0));
    let LayerKind::PreComp { ref_id, .. } = &layers[0].kind else {
        panic!("merged layer is not a precomp");
    };

    let merged = layer_collection(&optimized, ref_id).unwrap();
    let spans: Vec<(f64, f64)> = merged
        .layers_top_to_bottom()
        .map(|layer| (layer.in_point, layer.out_point))
        .collect();
    assert_eq!(spans.len(), 12);
    assert_eq!(spans.iter().filter(|span| **span == (0.0, 20.0)).count(), 8);
    assert_eq!(spans.iter().filter(|span| **span == (0.0, 10.0)).count(), 2);
    // second's own layers land on its window in first's timeline
    assert_eq!(spans.iter().filter(|span| **span == (10.0, 20.0)).count(), 2);
}
