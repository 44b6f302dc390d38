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

//! # Topology View
//!
//! This module contains the output of the reconciler: the set of effective links, and the set of
//! links which were ignored. Effective links are keyed by their source port. Ignored links are
//! keyed by their source port and their origin, since a port can have both a static and a
//! discovered link which are suppressed at the same time.

use crate::topology::graph::SwitchGraph;
use crate::topology::{NodeId, PortId};

use std::collections::{BTreeMap, HashSet};

/// The single authoritative directed link recognized for a given source port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectiveLink {
    /// Source port
    pub source: PortId,
    /// Destination port
    pub destination: PortId,
    /// `true` if the link stems from the static configuration, `false` if it was discovered.
    pub is_static: bool,
}

impl EffectiveLink {
    /// Create a link which was configured statically.
    pub fn new_static(source: PortId, destination: PortId) -> Self {
        Self { source, destination, is_static: true }
    }

    /// Create a link which was discovered by the device layer.
    pub fn new_dynamic(source: PortId, destination: PortId) -> Self {
        Self { source, destination, is_static: false }
    }
}

/// The rule which caused a link to be ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IgnoreReason {
    /// A static link with this destination claims the same source port. Only discovered links are
    /// ignored for this reason.
    StaticLink {
        /// Destination of the static link
        destination: PortId,
    },
    /// The port (either the source or the destination of the link) is configured as edge port.
    EdgePort {
        /// The edge port
        port: PortId,
    },
}

/// A static or discovered link that is valid in isolation, but suppressed by a rule with higher
/// precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IgnoredLink {
    /// Source port
    pub source: PortId,
    /// Destination port
    pub destination: PortId,
    /// `true` if the link stems from the static configuration, `false` if it was discovered.
    pub is_static: bool,
    /// Why the link is ignored
    pub reason: IgnoreReason,
}

impl IgnoredLink {
    /// Create an ignored link which was configured statically.
    pub fn new_static(source: PortId, destination: PortId, reason: IgnoreReason) -> Self {
        Self { source, destination, is_static: true, reason }
    }

    /// Create an ignored link which was discovered by the device layer.
    pub fn new_dynamic(source: PortId, destination: PortId, reason: IgnoreReason) -> Self {
        Self { source, destination, is_static: false, reason }
    }
}

/// # Topology View
///
/// There is at most one effective link for each source port. For ignored links, there is at most
/// one discovered and one static link for each source port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyView {
    links: BTreeMap<PortId, EffectiveLink>,
    ignored: BTreeMap<(PortId, bool), IgnoredLink>,
}

impl TopologyView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over all effective links, ordered by the source port.
    pub fn links(&self) -> impl Iterator<Item = &EffectiveLink> {
        self.links.values()
    }

    /// Returns an iterator over all ignored links, ordered by the source port. The discovered link
    /// of a port comes before its static link.
    pub fn ignored_links(&self) -> impl Iterator<Item = &IgnoredLink> {
        self.ignored.values()
    }

    /// Returns the effective link starting at `source`.
    pub fn link(&self, source: &PortId) -> Option<&EffectiveLink> {
        self.links.get(source)
    }

    /// Returns the ignored discovered link starting at `source`.
    pub fn ignored_link(&self, source: &PortId) -> Option<&IgnoredLink> {
        self.ignored.get(&(source.clone(), false))
    }

    /// Returns the ignored static link starting at `source`.
    pub fn ignored_static_link(&self, source: &PortId) -> Option<&IgnoredLink> {
        self.ignored.get(&(source.clone(), true))
    }

    /// Returns the number of effective links
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Returns the number of ignored links
    pub fn num_ignored(&self) -> usize {
        self.ignored.len()
    }

    /// Returns `true` if neither an effective nor an ignored link exists.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.ignored.is_empty()
    }

    /// Returns `true` if the port is an edge port, i.e., it is neither the source nor the
    /// destination of any effective link. Unknown ports are edge ports as well.
    pub fn is_edge(&self, port: &PortId) -> bool {
        !self.links.contains_key(port) && !self.links.values().any(|l| &l.destination == port)
    }

    /// Returns all effective links which start or end at the given node.
    pub fn links_of_node(&self, node: &NodeId) -> Vec<&EffectiveLink> {
        let on_node = |p: &PortId| p.node().as_ref() == Some(node);
        self.links.values().filter(|l| on_node(&l.source) || on_node(&l.destination)).collect()
    }

    /// Build the node-level graph of all effective links.
    pub fn switch_graph(&self) -> SwitchGraph {
        SwitchGraph::from_view(std::iter::empty(), self)
    }

    /// Compute what changed from `self` to `other`.
    pub fn diff(&self, other: &Self) -> TopologyDiff {
        let mut diff = TopologyDiff::default();
        for (source, old) in self.links.iter() {
            match other.links.get(source) {
                None => diff.links_removed.push(old.clone()),
                Some(new) if new != old => diff.links_changed.push((old.clone(), new.clone())),
                Some(_) => {}
            }
        }
        for (source, new) in other.links.iter() {
            if !self.links.contains_key(source) {
                diff.links_added.push(new.clone());
            }
        }
        let old_ignored: HashSet<&IgnoredLink> = self.ignored.values().collect();
        let new_ignored: HashSet<&IgnoredLink> = other.ignored.values().collect();
        diff.ignored_removed = old_ignored.difference(&new_ignored).map(|l| (*l).clone()).collect();
        diff.ignored_added = new_ignored.difference(&old_ignored).map(|l| (*l).clone()).collect();
        diff.ignored_removed.sort();
        diff.ignored_added.sort();
        diff
    }

    pub(crate) fn insert_link(&mut self, link: EffectiveLink) {
        self.links.insert(link.source.clone(), link);
    }

    pub(crate) fn insert_ignored(&mut self, link: IgnoredLink) {
        self.ignored.insert((link.source.clone(), link.is_static), link);
    }
}

/// Difference between two [`TopologyView`]s. A changed ignored link is reported as removed and
/// added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyDiff {
    /// Effective links which appeared
    pub links_added: Vec<EffectiveLink>,
    /// Effective links which disappeared
    pub links_removed: Vec<EffectiveLink>,
    /// Effective links whose destination or origin changed, as `(old, new)`
    pub links_changed: Vec<(EffectiveLink, EffectiveLink)>,
    /// Ignored links which appeared
    pub ignored_added: Vec<IgnoredLink>,
    /// Ignored links which disappeared
    pub ignored_removed: Vec<IgnoredLink>,
}

impl TopologyDiff {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.links_added.is_empty()
            && self.links_removed.is_empty()
            && self.links_changed.is_empty()
            && self.ignored_added.is_empty()
            && self.ignored_removed.is_empty()
    }

    /// Returns the number of changes
    pub fn len(&self) -> usize {
        self.links_added.len()
            + self.links_removed.len()
            + self.links_changed.len()
            + self.ignored_added.len()
            + self.ignored_removed.len()
    }
}
