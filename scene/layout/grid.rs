/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::{Point2D, Rect, Size2D};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::{LayoutAlgorithm, normalize};
use crate::config::SceneConfig;
use crate::scene::{ActionStyle, DpRect, FULL_SIZE, Scene};

/// Row-major grid placement.
///
/// Screens come before compact boxes. Within each group a destination is
/// placed after the destinations its actions lead to, so flows read right to
/// left from their entry point; cycles fall back to model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayoutAlgorithm {
    pub column_gap: i32,
    pub row_gap: i32,
    pub wrap_width: i32,
    pub padding: i32,
}

impl Default for GridLayoutAlgorithm {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

impl GridLayoutAlgorithm {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            column_gap: config.column_gap,
            row_gap: config.row_gap,
            wrap_width: config.wrap_width,
            padding: config.padding,
        }
    }

    /// Place every component whose `placed` flag is false, skipping cells that
    /// overlap the already placed ones.
    pub(crate) fn place(&self, scene: &mut Scene, placed: &[bool]) {
        let occupied: Vec<DpRect> = scene
            .components()
            .iter()
            .zip(placed)
            .filter(|(_, placed)| **placed)
            .map(|(component, _)| component.rect())
            .collect();
        let cell = Size2D::new(
            (FULL_SIZE.width + self.column_gap).max(1),
            (FULL_SIZE.height + self.row_gap).max(1),
        );
        let columns = (self.wrap_width / cell.width).max(1);

        let mut cell_index = 0;
        for index in placement_order(scene, placed) {
            let component = &mut scene.components_mut()[index];
            loop {
                let origin = Point2D::new(
                    (cell_index % columns) * cell.width,
                    (cell_index / columns) * cell.height,
                );
                cell_index += 1;
                let rect = Rect::new(origin, component.size());
                if occupied.iter().any(|other| other.intersects(&rect)) {
                    continue;
                }
                component.set_position(origin.x, origin.y);
                break;
            }
        }
    }
}

impl LayoutAlgorithm for GridLayoutAlgorithm {
    fn layout(&mut self, scene: &mut Scene) {
        scene.reset_layout_offset();
        let placed = vec![false; scene.components().len()];
        self.place(scene, &placed);
        normalize(scene, self.padding);
    }
}

fn placement_order(scene: &Scene, placed: &[bool]) -> Vec<usize> {
    let components = scene.components();
    let mut order = Vec::with_capacity(components.len());
    for compact in [false, true] {
        let group: Vec<usize> = (0..components.len())
            .filter(|index| !placed.get(*index).copied().unwrap_or(false))
            .filter(|index| components[*index].is_compact() == compact)
            .collect();
        order.extend(targets_first(scene, &group));
    }
    order
}

/// Kahn ordering over "target before source" edges, preferring the earliest
/// ready component.
fn targets_first(scene: &Scene, group: &[usize]) -> Vec<usize> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(group.len(), 0);
    let nodes: Vec<NodeIndex> = group.iter().map(|index| graph.add_node(*index)).collect();
    for (source, index) in group.iter().enumerate() {
        for action in scene.components()[*index].actions() {
            if action.style == ActionStyle::SelfAction {
                continue;
            }
            let Some(target) = scene
                .index_of(&action.target)
                .and_then(|target| group.iter().position(|member| *member == target))
            else {
                continue;
            };
            if target != source {
                graph.update_edge(nodes[target], nodes[source], ());
            }
        }
    }

    let mut in_degree: Vec<usize> = nodes
        .iter()
        .map(|node| graph.neighbors_directed(*node, Direction::Incoming).count())
        .collect();
    let mut done = vec![false; group.len()];
    let mut order = Vec::with_capacity(group.len());
    while order.len() < group.len() {
        let Some(next) = (0..group.len())
            .find(|n| !done[*n] && in_degree[*n] == 0)
            .or_else(|| (0..group.len()).find(|n| !done[*n]))
        else {
            break;
        };
        done[next] = true;
        order.push(group[next]);
        for successor in graph.neighbors_directed(nodes[next], Direction::Outgoing) {
            let degree = &mut in_degree[successor.index()];
            *degree = degree.saturating_sub(1);
        }
    }
    order
}
