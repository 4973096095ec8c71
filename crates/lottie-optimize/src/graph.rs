use std::collections::HashSet;

use tracing::{debug, instrument, trace};

use crate::error::OptimizeError;
use crate::index_mapper::{IndexGenerator, LayersIndexMapper};
use crate::layer_group::LayerGroup;
use crate::merge::MergeHelper;
use crate::range::TimeRange;

/// Draw-order constraints between layer groups of one collection.
///
/// Groups come in top-to-bottom order. A group depends on every earlier group
/// it overlaps in time, so any linearization that emits dependencies first keeps
/// the relative stacking of everything that is visible at the same moment.
/// Groups that are not ordered against each other may be merged.
#[derive(Debug)]
pub struct LayersGraph {
    groups: Vec<LayerGroup>,
    parents: Vec<Vec<usize>>,
    merged_with: Vec<Option<usize>>,
    merged_group: Vec<Option<LayerGroup>>,
}

impl LayersGraph {
    pub fn new(groups: Vec<LayerGroup>) -> Self {
        let ranges: Vec<TimeRange> = groups.iter().map(LayerGroup::range).collect();
        let mut graph = Self {
            parents: vec![Vec::new(); groups.len()],
            merged_with: vec![None; groups.len()],
            merged_group: vec![None; groups.len()],
            groups,
        };

        for node in 0..graph.groups.len() {
            for other in (0..node).rev() {
                if ranges[node].intersects(&ranges[other]) && !graph.is_child_of(node, other) {
                    graph.parents[node].push(other);
                }
            }
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Whether `ancestor` is reachable from `node` through parent edges.
    pub fn is_child_of(&self, node: usize, ancestor: usize) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            for &parent in &self.parents[current] {
                if parent == ancestor {
                    return true;
                }
                if visited.insert(parent) {
                    stack.push(parent);
                }
            }
        }
        false
    }

    /// Members of the contracted node `node` belongs to.
    fn members(&self, node: usize) -> impl Iterator<Item = usize> {
        std::iter::once(node).chain(self.merged_with[node])
    }

    /// Reachability over the graph where merged pairs count as a single node.
    fn depends_on(&self, node: usize, ancestor: usize) -> bool {
        let targets: HashSet<usize> = self.members(ancestor).collect();
        let mut visited: HashSet<usize> = self.members(node).collect();
        let mut stack: Vec<usize> = visited.iter().copied().collect();
        while let Some(current) = stack.pop() {
            for &parent in &self.parents[current] {
                if targets.contains(&parent) {
                    return true;
                }
                for member in self.members(parent) {
                    if visited.insert(member) {
                        stack.push(member);
                    }
                }
            }
        }
        false
    }

    /// Unordered pairs of mergeable groups, found before any merge is applied.
    pub fn merge_candidates(&self) -> Vec<(usize, usize)> {
        let mut candidates = Vec::new();
        for i in 0..self.groups.len() {
            if !self.groups[i].can_be_merged {
                continue;
            }
            for j in i + 1..self.groups.len() {
                if self.groups[j].can_be_merged && !self.is_child_of(i, j) && !self.is_child_of(j, i) {
                    candidates.push((i, j));
                }
            }
        }
        candidates
    }

    /// Merges every candidate pair whose nodes are still free. Returns the number
    /// of merges applied.
    #[instrument(level = "debug", skip_all, fields(groups = self.groups.len()))]
    pub fn merge_all_possible_layer_groups(
        &mut self,
        helper: &mut MergeHelper<'_>,
    ) -> Result<usize, OptimizeError> {
        let mut merges = 0;
        for (a, b) in self.merge_candidates() {
            if self.merged_with[a].is_some() || self.merged_with[b].is_some() {
                continue;
            }
            // earlier merges may have connected the two nodes
            if self.depends_on(a, b) || self.depends_on(b, a) {
                trace!(a, b, "Merge would create a cycle");
                continue;
            }

            let merged = helper.merge_layer_groups(&self.groups[a], &self.groups[b])?;
            let Some(group) = merged.into_value() else {
                continue;
            };
            debug!(
                a = self.groups[a].main_layer.index,
                b = self.groups[b].main_layer.index,
                "Merged layer groups"
            );
            self.merged_group[a] = Some(group.clone());
            self.merged_group[b] = Some(group);
            self.merged_with[a] = Some(b);
            self.merged_with[b] = Some(a);
            merges += 1;
        }
        Ok(merges)
    }

    /// Linearizes the graph with dependencies first and reindexes the result
    /// densely. Both halves of a merged pair share their new indices.
    pub fn into_layer_groups(self) -> Result<Vec<LayerGroup>, OptimizeError> {
        let mut visited = vec![false; self.groups.len()];
        let mut emitted = Vec::with_capacity(self.groups.len());
        let mut mapper = LayersIndexMapper::new();
        let mut generator = IndexGenerator::new();

        for node in 0..self.groups.len() {
            self.walk(node, &mut visited, &mut emitted, &mut mapper, &mut generator);
        }
        mapper.remap_layer_groups(&emitted)
    }

    fn walk(
        &self,
        node: usize,
        visited: &mut [bool],
        emitted: &mut Vec<LayerGroup>,
        mapper: &mut LayersIndexMapper,
        generator: &mut IndexGenerator,
    ) {
        if visited[node] {
            return;
        }
        let members: Vec<usize> = self.members(node).collect();
        for &member in &members {
            visited[member] = true;
        }
        for &member in &members {
            for &parent in &self.parents[member] {
                self.walk(parent, visited, emitted, mapper, generator);
            }
        }

        if self.groups[node].matte_layer.is_some() {
            let matte_index = generator.generate_index();
            for &member in &members {
                if let Some(matte) = &self.groups[member].matte_layer {
                    mapper.set_mapping(matte.index, matte_index);
                }
            }
        }
        let main_index = generator.generate_index();
        for &member in &members {
            mapper.set_mapping(self.groups[member].main_layer.index, main_index);
        }

        let group = self.merged_group[node]
            .clone()
            .unwrap_or_else(|| self.groups[node].clone());
        emitted.push(group);
    }
}
