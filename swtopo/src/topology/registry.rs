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

//! # Port and Node Registry
//!
//! The registry is owned by the device layer. It tracks which switches and ports exist, whether
//! the ports are up, and which peer was discovered on each port. The reconciler only consumes the
//! [`PortRegistry`] trait. [`SwitchRegistry`] is an in-memory device layer, where every mutation
//! returns the [`Event`]s that a real device layer would emit.
//!
//! ```rust
//! use swtopo::topology::{Event, NodeId, PortId, PortRegistry, SwitchRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut reg = SwitchRegistry::new();
//! reg.add_node(NodeId::new("1000"))?;
//! reg.add_node(NodeId::new("1001"))?;
//! reg.add_port(PortId::new("1000:1"))?;
//! reg.add_port(PortId::new("1001:1"))?;
//!
//! // discovery is symmetric, resulting in two events.
//! let events = reg.add_link(&PortId::new("1000:1"), &PortId::new("1001:1"))?;
//! assert_eq!(events.len(), 2);
//! assert_eq!(reg.peer(&PortId::new("1001:1")), Some(PortId::new("1000:1")));
//! assert!(matches!(events[0], Event::PeerChanged(_, Some(_))));
//! # Ok(())
//! # }
//! ```

use crate::topology::{Event, NodeId, PortId, PortState, RegistryError};

use log::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Read access to the device layer's view of nodes and ports.
pub trait PortRegistry {
    /// Returns all currently known nodes.
    fn list_nodes(&self) -> Vec<NodeId>;

    /// Returns all ports of the node. If `edge_only` is set, only ports without a discovered peer
    /// are returned. An unknown node has no ports.
    fn list_ports(&self, node: &NodeId, edge_only: bool) -> Vec<PortId>;

    /// Returns the state of the port, or `None` if the port does not exist.
    fn port_state(&self, port: &PortId) -> Option<PortState>;

    /// Returns the peer discovered on the port, or `None` if there is none or the port does not
    /// exist.
    fn peer(&self, port: &PortId) -> Option<PortId>;
}

#[derive(Debug, Clone)]
struct PortEntry {
    state: PortState,
    peer: Option<PortId>,
}

/// # In-memory device layer
///
/// Ports are created in the [`PortState::Up`] state. Changing the state of a port leaves its
/// discovered peer untouched; the reconciler ignores peers of ports which are down.
#[derive(Debug, Clone, Default)]
pub struct SwitchRegistry {
    nodes: BTreeMap<NodeId, BTreeSet<PortId>>,
    ports: HashMap<PortId, PortEntry>,
}

impl SwitchRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from a snapshot. Events emitted while building are dropped.
    pub fn from_snapshot(snapshot: &RegistrySnapshot) -> Result<Self, RegistryError> {
        let mut reg = Self::new();
        for node in snapshot.nodes.iter() {
            reg.add_node(node.id.clone())?;
            for port in node.ports.iter() {
                reg.add_port_with_state(PortId::from_parts(&node.id, port.number), port.state)?;
            }
        }
        for link in snapshot.links.iter() {
            reg.add_link(&link.source, &link.destination)?;
        }
        Ok(reg)
    }

    /// Returns the number of known nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of known ports
    pub fn num_ports(&self) -> usize {
        self.ports.len()
    }

    /// Returns `true` if the port exists.
    pub fn contains_port(&self, port: &PortId) -> bool {
        self.ports.contains_key(port)
    }

    /// Add a new node without any ports.
    pub fn add_node(&mut self, node: NodeId) -> Result<Vec<Event>, RegistryError> {
        if self.nodes.contains_key(&node) {
            return Err(RegistryError::NodeAlreadyExists(node));
        }
        debug!("Add node {}", node);
        self.nodes.insert(node.clone(), BTreeSet::new());
        Ok(vec![Event::NodeAdded(node)])
    }

    /// Remove a node, together with all of its ports. The peers of the removed ports lose their
    /// discovered link.
    pub fn remove_node(&mut self, node: &NodeId) -> Result<Vec<Event>, RegistryError> {
        let ports = self.nodes.get(node).ok_or_else(|| RegistryError::NodeNotFound(node.clone()))?;
        debug!("Remove node {}", node);
        let mut events = Vec::new();
        for port in ports.clone() {
            events.extend(self.remove_port(&port)?);
        }
        self.nodes.remove(node);
        events.push(Event::NodeRemoved(node.clone()));
        Ok(events)
    }

    /// Add a new port, which is up. The node is derived from the port identifier, and must exist.
    pub fn add_port(&mut self, port: PortId) -> Result<Vec<Event>, RegistryError> {
        self.add_port_with_state(port, PortState::Up)
    }

    /// Add a new port in the given state.
    pub fn add_port_with_state(
        &mut self,
        port: PortId,
        state: PortState,
    ) -> Result<Vec<Event>, RegistryError> {
        let node = match port.node() {
            Some(node) if port.is_valid() => node,
            _ => return Err(RegistryError::InvalidPortId(port)),
        };
        let node_ports = self.nodes.get_mut(&node).ok_or(RegistryError::NodeNotFound(node))?;
        if self.ports.contains_key(&port) {
            return Err(RegistryError::PortAlreadyExists(port));
        }
        trace!("Add port {} ({:?})", port, state);
        node_ports.insert(port.clone());
        self.ports.insert(port.clone(), PortEntry { state, peer: None });
        let mut events = vec![Event::PortAdded(port.clone())];
        if state != PortState::Up {
            events.push(Event::PortState(port, state));
        }
        Ok(events)
    }

    /// Remove a port. If a link was discovered on the port, the link is removed as well.
    pub fn remove_port(&mut self, port: &PortId) -> Result<Vec<Event>, RegistryError> {
        if !self.ports.contains_key(port) {
            return Err(RegistryError::PortNotFound(port.clone()));
        }
        trace!("Remove port {}", port);
        let mut events = Vec::new();
        self.unlink(port, &mut events);
        self.ports.remove(port);
        if let Some(ports) = port.node().and_then(|n| self.nodes.get_mut(&n)) {
            ports.remove(port);
        }
        events.push(Event::PortRemoved(port.clone()));
        Ok(events)
    }

    /// Change the state of a port. No event is emitted if the state does not change.
    pub fn set_port_state(
        &mut self,
        port: &PortId,
        state: PortState,
    ) -> Result<Vec<Event>, RegistryError> {
        let entry =
            self.ports.get_mut(port).ok_or_else(|| RegistryError::PortNotFound(port.clone()))?;
        if entry.state == state {
            return Ok(Vec::new());
        }
        debug!("Port {} is now {:?}", port, state);
        entry.state = state;
        Ok(vec![Event::PortState(port.clone(), state)])
    }

    /// Discover a link between the two ports. Discovery is symmetric: both ports learn each other
    /// as peer. Links discovered earlier on either port are replaced.
    pub fn add_link(&mut self, a: &PortId, b: &PortId) -> Result<Vec<Event>, RegistryError> {
        if a == b {
            return Err(RegistryError::SelfLink(a.clone()));
        }
        for p in [a, b].iter() {
            if !self.ports.contains_key(*p) {
                return Err(RegistryError::PortNotFound((*p).clone()));
            }
        }
        if self.peer(a).as_ref() == Some(b) && self.peer(b).as_ref() == Some(a) {
            return Ok(Vec::new());
        }
        debug!("Discovered link {} <-> {}", a, b);
        let mut events = Vec::new();
        self.unlink(a, &mut events);
        self.unlink(b, &mut events);
        self.set_peer_unchecked(a, Some(b.clone()), &mut events);
        self.set_peer_unchecked(b, Some(a.clone()), &mut events);
        Ok(events)
    }

    /// Remove the link discovered on the port, in both directions.
    pub fn remove_link(&mut self, port: &PortId) -> Result<Vec<Event>, RegistryError> {
        if !self.ports.contains_key(port) {
            return Err(RegistryError::PortNotFound(port.clone()));
        }
        let mut events = Vec::new();
        self.unlink(port, &mut events);
        Ok(events)
    }

    /// Change the discovered peer of a single port, without touching the peer itself. This models
    /// a discovery result which was only received in one direction. The peer does not need to
    /// exist.
    pub fn set_peer(
        &mut self,
        port: &PortId,
        peer: Option<PortId>,
    ) -> Result<Vec<Event>, RegistryError> {
        if peer.as_ref() == Some(port) {
            return Err(RegistryError::SelfLink(port.clone()));
        }
        if !self.ports.contains_key(port) {
            return Err(RegistryError::PortNotFound(port.clone()));
        }
        let mut events = Vec::new();
        self.set_peer_unchecked(port, peer, &mut events);
        Ok(events)
    }

    /// Clear the peer of `port`, and the peer of its peer if that points back to `port`.
    fn unlink(&mut self, port: &PortId, events: &mut Vec<Event>) {
        let peer = match self.ports.get_mut(port).and_then(|e| e.peer.take()) {
            Some(peer) => peer,
            None => return,
        };
        events.push(Event::PeerChanged(port.clone(), None));
        if let Some(entry) = self.ports.get_mut(&peer) {
            if entry.peer.as_ref() == Some(port) {
                entry.peer = None;
                events.push(Event::PeerChanged(peer, None));
            }
        }
    }

    fn set_peer_unchecked(&mut self, port: &PortId, peer: Option<PortId>, events: &mut Vec<Event>) {
        if let Some(entry) = self.ports.get_mut(port) {
            if entry.peer != peer {
                entry.peer = peer.clone();
                events.push(Event::PeerChanged(port.clone(), peer));
            }
        }
    }
}

impl PortRegistry for SwitchRegistry {
    fn list_nodes(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    fn list_ports(&self, node: &NodeId, edge_only: bool) -> Vec<PortId> {
        match self.nodes.get(node) {
            Some(ports) => ports
                .iter()
                .filter(|p| !edge_only || self.ports.get(*p).map_or(true, |e| e.peer.is_none()))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    fn port_state(&self, port: &PortId) -> Option<PortState> {
        self.ports.get(port).map(|e| e.state)
    }

    fn peer(&self, port: &PortId) -> Option<PortId> {
        self.ports.get(port).and_then(|e| e.peer.clone())
    }
}

/// Serializable description of a device layer, used to build a [`SwitchRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// All nodes, together with their ports
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
    /// All discovered links. Each link is discovered in both directions.
    #[serde(default)]
    pub links: Vec<LinkSnapshot>,
}

/// Node of a [`RegistrySnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Node identifier
    pub id: NodeId,
    /// Ports of the node
    #[serde(default)]
    pub ports: Vec<PortSnapshot>,
}

/// Port of a [`NodeSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSnapshot {
    /// Port number on the node
    pub number: u32,
    /// Port state, `up` if omitted
    #[serde(default)]
    pub state: PortState,
}

/// Discovered link of a [`RegistrySnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    /// One end of the link
    pub source: PortId,
    /// The other end of the link
    pub destination: PortId,
}
