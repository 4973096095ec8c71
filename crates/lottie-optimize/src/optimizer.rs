use std::collections::HashMap;
use std::fmt;

use lottie_data::{Composition, Layer, LayerCollection, LayerKind};
use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::config::OptimizerConfig;
use crate::drawables::drawable_count;
use crate::error::OptimizeError;
use crate::index_mapper::{IndexGenerator, LayersIndexMapper};
use crate::layer_group::LayerGroup;
use crate::merge::MergeHelper;
use crate::parenting::pinned_parents;
use crate::validate::validate_composition;

/// Which top-level layers a pass tries to merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PassKind {
    /// Every layer kind that supports merging.
    AllLayers,
    /// Only precomp layers, so duplicated precomps collapse into one asset.
    PreCompsOnly,
}

impl PassKind {
    fn accepts(self, layer: &Layer) -> bool {
        match self {
            PassKind::AllLayers => true,
            PassKind::PreCompsOnly => matches!(layer.kind, LayerKind::PreComp { .. }),
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::AllLayers => write!(f, "all-layers"),
            PassKind::PreCompsOnly => write!(f, "precomps-only"),
        }
    }
}

/// Summary of one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    pub pass: PassKind,
    pub layers_before: usize,
    pub layers_after: usize,
    pub merges_accepted: usize,
    pub assets_generated: usize,
    pub drawables_before: usize,
    pub drawables_after: usize,
}

impl fmt::Display for OptimizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: layers {} -> {}, {} merges, {} generated assets, drawables {} -> {}",
            self.pass,
            self.layers_before,
            self.layers_after,
            self.merges_accepted,
            self.assets_generated,
            self.drawables_before,
            self.drawables_after
        )
    }
}

/// A top-level group together with its stacking position. Lower is on top.
#[derive(Debug, Clone)]
struct Entry {
    group: LayerGroup,
    z: usize,
}

/// Stacking position the merge of `entries[i]` and `entries[j]` may take, if any.
///
/// The merged group replaces both. Taking the lower position moves the upper
/// group's content down past everything stacked between them, which is only
/// safe when none of that overlaps the upper group in time. Same for the other
/// direction.
fn merged_z(entries: &[Entry], i: usize, j: usize) -> Option<usize> {
    let (upper, lower) = if entries[i].z < entries[j].z {
        (&entries[i], &entries[j])
    } else {
        (&entries[j], &entries[i])
    };
    let between = || {
        entries
            .iter()
            .filter(move |entry| entry.z > upper.z && entry.z < lower.z)
    };

    let upper_range = upper.group.range();
    if !between().any(|entry| entry.group.range().intersects(&upper_range)) {
        return Some(lower.z);
    }
    let lower_range = lower.group.range();
    if !between().any(|entry| entry.group.range().intersects(&lower_range)) {
        return Some(upper.z);
    }
    None
}

/// Follows alias chains to the index that survived.
fn resolve(aliases: &HashMap<u32, u32>, index: u32) -> u32 {
    let mut current = index;
    for _ in 0..=aliases.len() {
        match aliases.get(&current) {
            Some(&next) if next != current => current = next,
            _ => break,
        }
    }
    current
}

/// Merges temporally disjoint top-level layers of a composition.
#[derive(Debug, Clone, Default)]
pub struct LayerMergeOptimizer {
    config: OptimizerConfig,
}

impl LayerMergeOptimizer {
    pub fn new(config: OptimizerConfig) -> Result<Self, OptimizeError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Runs one pass. A composition where nothing merges comes back unchanged.
    #[instrument(level = "debug", skip_all, fields(pass = %pass, layers = composition.layers.len()))]
    pub fn run(
        &self,
        composition: &Composition,
        pass: PassKind,
    ) -> Result<(Composition, OptimizationReport), OptimizeError> {
        validate_composition(composition)?;

        let layers: Vec<Layer> = composition.layers.layers_top_to_bottom().cloned().collect();
        let pinned = pinned_parents(&layers);
        let groups = LayerGroup::from_layers(&layers, |main, matte| {
            pass.accepts(main)
                && !pinned.contains(&main.index)
                && matte.map_or(true, |m| !pinned.contains(&m.index))
        });
        let mut entries: Vec<Entry> = groups
            .into_iter()
            .enumerate()
            .map(|(z, group)| Entry { group, z })
            .collect();
        entries.sort_by(|a, b| a.group.main_layer.in_point.total_cmp(&b.group.main_layer.in_point));

        let mut helper = MergeHelper::new(composition);
        let mut aliases: HashMap<u32, u32> = HashMap::new();
        let mut merges = 0;
        let duration = composition.duration();

        for min_score in self.config.min_scores() {
            for allowed_distance in self.config.distances(duration) {
                merges += self.merge_pass(&mut entries, &mut helper, &mut aliases, min_score, allowed_distance)?;
            }
        }

        let drawables_before = drawable_count(composition);
        let mut report = OptimizationReport {
            pass,
            layers_before: composition.layers.len(),
            layers_after: composition.layers.len(),
            merges_accepted: merges,
            assets_generated: 0,
            drawables_before,
            drawables_after: drawables_before,
        };
        if merges == 0 {
            info!(%report, "No layers merged");
            return Ok((composition.clone(), report));
        }

        entries.sort_by_key(|entry| entry.z);
        let groups: Vec<LayerGroup> = entries.into_iter().map(|entry| entry.group).collect();
        let layers = reindex(&groups, &aliases)?;

        let generated = helper.into_generated_assets();
        report.assets_generated = generated.len();
        let mut assets = generated;
        assets.extend(composition.assets.iter().cloned());

        let optimized = Composition {
            assets,
            layers: LayerCollection::from_top_to_bottom(layers),
            ..composition.clone()
        };
        report.layers_after = optimized.layers.len();
        report.drawables_after = drawable_count(&optimized);
        info!(%report, "Optimization pass finished");
        Ok((optimized, report))
    }

    #[instrument(level = "debug", skip(self, entries, helper, aliases), fields(count = entries.len()))]
    fn merge_pass(
        &self,
        entries: &mut Vec<Entry>,
        helper: &mut MergeHelper<'_>,
        aliases: &mut HashMap<u32, u32>,
        min_score: f64,
        allowed_distance: f64,
    ) -> Result<usize, OptimizeError> {
        let mut merges = 0;
        let mut i = 0;
        while i < entries.len() {
            let mut j = i + 1;
            while j < entries.len() {
                let (a, b) = (&entries[i].group, &entries[j].group);
                let gap = b.main_layer.in_point - a.main_layer.out_point;
                if !a.can_be_merged || !b.can_be_merged || gap > allowed_distance {
                    j += 1;
                    continue;
                }
                let Some(z) = merged_z(entries, i, j) else {
                    trace!(a = a.main_layer.index, b = b.main_layer.index, "Merge would reorder overlapping layers");
                    j += 1;
                    continue;
                };

                let checkpoint = helper.checkpoint();
                let result = helper.merge_layer_groups(a, b)?;
                let score = result.score();
                match result.into_value() {
                    Some(mut merged) if score >= min_score => {
                        debug!(
                            a = a.main_layer.index,
                            b = b.main_layer.index,
                            score,
                            "Merged layers"
                        );
                        record_aliases(aliases, a, &merged);
                        record_aliases(aliases, b, &merged);
                        merged.can_be_merged = true;
                        entries[i] = Entry { group: merged, z };
                        entries.remove(j);
                        merges += 1;
                    }
                    _ => {
                        trace!(a = a.main_layer.index, b = b.main_layer.index, score, "Merge rejected");
                        helper.rollback(checkpoint);
                        j += 1;
                    }
                }
            }
            i += 1;
        }
        Ok(merges)
    }
}

fn record_aliases(aliases: &mut HashMap<u32, u32>, source: &LayerGroup, merged: &LayerGroup) {
    if source.main_layer.index != merged.main_layer.index {
        aliases.insert(source.main_layer.index, merged.main_layer.index);
    }
    if let (Some(matte), Some(merged_matte)) = (&source.matte_layer, &merged.matte_layer) {
        if matte.index != merged_matte.index {
            aliases.insert(matte.index, merged_matte.index);
        }
    }
}

/// Dense indices in top-to-bottom order. Indices of merged-away layers map to
/// their survivor.
fn reindex(groups: &[LayerGroup], aliases: &HashMap<u32, u32>) -> Result<Vec<Layer>, OptimizeError> {
    let layers: Vec<Layer> = groups.iter().flat_map(|group| group.layers()).cloned().collect();
    let mut mapper = LayersIndexMapper::new();
    let mut generator = IndexGenerator::new();
    for layer in &layers {
        mapper.set_mapping(layer.index, generator.generate_index());
    }
    for &alias in aliases.keys() {
        let survivor = mapper.get_mapping(resolve(aliases, alias))?;
        mapper.set_mapping(alias, survivor);
    }
    mapper.remap_layers(&layers)
}

/// Runs the general pass with the default schedule.
pub fn optimize(composition: &Composition) -> Result<Composition, OptimizeError> {
    let (optimized, _) = LayerMergeOptimizer::default().run(composition, PassKind::AllLayers)?;
    Ok(optimized)
}

/// Runs the duplicate-precomp pass with the default schedule.
pub fn get_optimized(composition: &Composition) -> Result<Composition, OptimizeError> {
    let (optimized, _) = LayerMergeOptimizer::default().run(composition, PassKind::PreCompsOnly)?;
    Ok(optimized)
}
