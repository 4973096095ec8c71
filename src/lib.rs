//! File-level driver for the layer-merge optimizer: loads a composition, runs
//! the selected passes and writes the result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use lottie_data::Composition;
use lottie_optimize::{normalize_composition, LayerMergeOptimizer, OptimizationReport, OptimizerConfig, PassKind};
use tracing::info;

pub use lottie_data as data;
pub use lottie_optimize as optimize;

/// Passes to run, in order.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum Pass {
    /// Merge any compatible layers
    #[default]
    All,
    /// Merge duplicated precomps only
    Precomps,
    /// Precomps first, then everything
    Both,
}

impl Pass {
    pub fn kinds(self) -> &'static [PassKind] {
        match self {
            Pass::All => &[PassKind::AllLayers],
            Pass::Precomps => &[PassKind::PreCompsOnly],
            Pass::Both => &[PassKind::PreCompsOnly, PassKind::AllLayers],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub pass: Pass,
    pub config: OptimizerConfig,
    /// Split whole-vector animations with per-channel easing before merging.
    pub split_vector_channels: bool,
}

pub fn load_composition(path: &Path) -> Result<Composition> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse composition {}", path.display()))
}

pub fn save_composition(composition: &Composition, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(composition).context("Failed to serialize composition")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn load_config(path: &Path) -> Result<OptimizerConfig> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse optimizer config {}", path.display()))
}

/// Runs the requested passes, feeding each one the previous pass's output.
pub fn run(composition: &Composition, options: &RunOptions) -> Result<(Composition, Vec<OptimizationReport>)> {
    let optimizer = LayerMergeOptimizer::new(options.config.clone()).context("Invalid optimizer configuration")?;

    let mut current = if options.split_vector_channels {
        info!("Splitting vector channels");
        normalize_composition(composition)
    } else {
        composition.clone()
    };

    let mut reports = Vec::new();
    for &kind in options.pass.kinds() {
        let (optimized, report) = optimizer
            .run(&current, kind)
            .with_context(|| format!("Optimization pass {kind} failed"))?;
        current = optimized;
        reports.push(report);
    }
    Ok((current, reports))
}
