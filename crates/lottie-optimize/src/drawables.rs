//! Resolution of shape contents into the geometries that actually get drawn.
//!
//! Styles apply to the geometries listed before them in the same group (and in
//! nested groups), so contents are folded from the last item to the first,
//! carrying the styles seen so far.

use std::collections::{HashMap, HashSet};

use lottie_data::{
    Asset, Composition, LayerCollection, LayerKind, MergeMode, Repeater, RoundCorners,
    ShapeLayerContent, Transform, TrimPath,
};

/// Styles in effect at one point of the fold.
#[derive(Debug, Clone, Default)]
pub struct StyleContext<'a> {
    pub fill: Option<&'a ShapeLayerContent>,
    pub stroke: Option<&'a ShapeLayerContent>,
    pub trim_path: Option<&'a TrimPath>,
    pub round_corners: Option<&'a RoundCorners>,
    pub merge_mode: Option<MergeMode>,
    pub repeater: Option<&'a Repeater>,
    /// Innermost transform last.
    pub transforms: Vec<&'a Transform>,
}

impl<'a> StyleContext<'a> {
    /// Folds one non-geometry item into the context.
    fn with(&self, content: &'a ShapeLayerContent) -> Self {
        let mut next = self.clone();
        match content {
            ShapeLayerContent::SolidColorFill(_)
            | ShapeLayerContent::LinearGradientFill(_)
            | ShapeLayerContent::RadialGradientFill(_) => next.fill = Some(content),
            ShapeLayerContent::SolidColorStroke(_)
            | ShapeLayerContent::LinearGradientStroke(_)
            | ShapeLayerContent::RadialGradientStroke(_) => next.stroke = Some(content),
            ShapeLayerContent::TrimPath(trim_path) => next.trim_path = Some(trim_path),
            ShapeLayerContent::RoundCorners(round_corners) => next.round_corners = Some(round_corners),
            ShapeLayerContent::MergePaths(merge_paths) => next.merge_mode = Some(merge_paths.mode),
            ShapeLayerContent::Repeater(repeater) => next.repeater = Some(repeater),
            ShapeLayerContent::Transform(transform) => next.transforms.push(transform),
            ShapeLayerContent::Group(_)
            | ShapeLayerContent::Path(_)
            | ShapeLayerContent::Ellipse(_)
            | ShapeLayerContent::Rectangle(_)
            | ShapeLayerContent::Polystar(_) => {}
        }
        next
    }

    pub fn is_painted(&self) -> bool {
        self.fill.is_some() || self.stroke.is_some()
    }

    /// Copies produced by the active repeater.
    pub fn copies(&self) -> usize {
        self.repeater
            .map_or(1, |repeater| repeater.count.initial_value.round().max(1.0) as usize)
    }
}

/// A geometry together with the styles it is drawn with.
#[derive(Debug, Clone)]
pub struct StyledGeometry<'a> {
    pub geometry: &'a ShapeLayerContent,
    pub context: StyleContext<'a>,
}

pub fn styled_geometries(contents: &[ShapeLayerContent]) -> Vec<StyledGeometry<'_>> {
    let mut geometries = Vec::new();
    collect(contents, &StyleContext::default(), &mut geometries);
    // fold order is last-to-first
    geometries.reverse();
    geometries
}

fn collect<'a>(contents: &'a [ShapeLayerContent], parent: &StyleContext<'a>, out: &mut Vec<StyledGeometry<'a>>) {
    let mut context = parent.clone();
    for content in contents.iter().rev() {
        match content {
            ShapeLayerContent::Group(group) => collect(&group.contents, &context, out),
            geometry if geometry.is_geometry() => out.push(StyledGeometry {
                geometry,
                context: context.clone(),
            }),
            style => context = context.with(style),
        }
    }
}

/// Number of things drawn by the composition: painted shape geometries, solids,
/// images and text, following precomps into their assets.
pub fn drawable_count(composition: &Composition) -> usize {
    let mut counter = DrawableCounter {
        composition,
        visiting: HashSet::new(),
        counted: HashMap::new(),
    };
    counter.count_layers(&composition.layers)
}

/// Walks layer collections once per asset. Assets on the current precomp path
/// count as empty.
struct DrawableCounter<'a> {
    composition: &'a Composition,
    visiting: HashSet<&'a str>,
    counted: HashMap<&'a str, usize>,
}

impl<'a> DrawableCounter<'a> {
    fn count_layers(&mut self, layers: &'a LayerCollection) -> usize {
        layers
            .layers_bottom_to_top()
            .iter()
            .map(|layer| match &layer.kind {
                LayerKind::Shape { contents } => styled_geometries(contents)
                    .iter()
                    .filter(|styled| styled.context.is_painted())
                    .map(|styled| styled.context.copies())
                    .sum(),
                LayerKind::Solid { .. } | LayerKind::Image { .. } | LayerKind::Text { .. } => 1,
                LayerKind::Null => 0,
                LayerKind::PreComp { ref_id, .. } => self.count_asset(ref_id),
            })
            .sum()
    }

    fn count_asset(&mut self, id: &'a str) -> usize {
        if let Some(&count) = self.counted.get(id) {
            return count;
        }
        let Some(Asset::LayerCollection(asset)) = self.composition.asset_by_id(id) else {
            return 0;
        };
        if !self.visiting.insert(id) {
            return 0;
        }
        let count = self.count_layers(&asset.layers);
        self.visiting.remove(id);
        self.counted.insert(id, count);
        count
    }
}
