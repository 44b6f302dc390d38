// SwTopo: Reconciling Static and Discovered Switch Topologies
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Switch Graph
//!
//! Node-level view of the reconciled topology. Every switch is a node of the graph, and every
//! effective link is a directed edge between the two switches it connects. This is the
//! representation used when computing paths through the network.

use crate::topology::view::{EffectiveLink, TopologyView};
use crate::topology::NodeId;

use petgraph::algo::{astar, has_path_connecting};
use petgraph::prelude::*;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

type IndexType = u32;
/// Index of a switch in the graph
pub type SwitchIndex = NodeIndex<IndexType>;
/// Switch network graph, edges are effective links
pub type SwitchNetwork = StableGraph<NodeId, EffectiveLink, Directed, IndexType>;

/// # Switch Graph
///
/// Links whose ports are malformed (and thus have no node) are skipped. Several effective links
/// between the same pair of switches result in parallel edges.
#[derive(Debug, Clone)]
pub struct SwitchGraph {
    graph: SwitchNetwork,
    index: HashMap<NodeId, SwitchIndex>,
}

impl SwitchGraph {
    /// Build the graph from the effective links of the view. `nodes` adds switches which might not
    /// have any link.
    pub fn from_view<I: IntoIterator<Item = NodeId>>(nodes: I, view: &TopologyView) -> Self {
        let mut g = Self { graph: SwitchNetwork::new(), index: HashMap::new() };
        for node in nodes {
            g.node_index(node);
        }
        for link in view.links() {
            let (src, dst) = match (link.source.node(), link.destination.node()) {
                (Some(src), Some(dst)) => (src, dst),
                _ => continue,
            };
            let a = g.node_index(src);
            let b = g.node_index(dst);
            g.graph.add_edge(a, b, link.clone());
        }
        g
    }

    /// Returns a reference to the underlying graph (PetGraph struct)
    pub fn get_topology(&self) -> &SwitchNetwork {
        &self.graph
    }

    /// Returns the number of switches
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of links
    pub fn num_links(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the switch is part of the graph
    pub fn contains_node(&self, node: &NodeId) -> bool {
        self.index.contains_key(node)
    }

    /// Returns all switches which can be reached from `node` over a single link, sorted.
    pub fn neighbors(&self, node: &NodeId) -> Vec<NodeId> {
        let idx = match self.index.get(node) {
            Some(idx) => *idx,
            None => return Vec::new(),
        };
        let mut neighbors: Vec<NodeId> =
            self.graph.neighbors(idx).map(|n| self.graph[n].clone()).collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors
    }

    /// Returns `true` if there exists a directed path from `from` to `to`.
    pub fn is_reachable(&self, from: &NodeId, to: &NodeId) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(a), Some(b)) => has_path_connecting(&self.graph, *a, *b, None),
            _ => false,
        }
    }

    /// Returns the shortest path (in number of links) from `from` to `to`, as the sequence of
    /// effective links to traverse. If several links connect two switches, the one with the
    /// smallest source port is taken. The route from a switch to itself is empty. `None` is
    /// returned if either switch is unknown or `to` cannot be reached.
    pub fn route(&self, from: &NodeId, to: &NodeId) -> Option<Vec<EffectiveLink>> {
        let a = *self.index.get(from)?;
        let b = *self.index.get(to)?;
        let (_, path) = astar(&self.graph, a, |n| n == b, |_| 1u32, |_| 0u32)?;
        path.windows(2).map(|w| self.link_between(w[0], w[1])).collect()
    }

    fn link_between(&self, a: SwitchIndex, b: SwitchIndex) -> Option<EffectiveLink> {
        self.graph
            .edges(a)
            .filter(|e| e.target() == b)
            .map(|e| e.weight())
            .min_by(|x, y| x.source.cmp(&y.source))
            .cloned()
    }

    fn node_index(&mut self, node: NodeId) -> SwitchIndex {
        if let Some(idx) = self.index.get(&node) {
            return *idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.index.insert(node, idx);
        idx
    }
}
