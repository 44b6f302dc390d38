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


//! Topologies for testing

use crate::topology::registry::{LinkSnapshot, NodeSnapshot, PortSnapshot};
use crate::topology::{
    NodeId, PortId, PortState, RegistryError, RegistrySnapshot, StaticTopology, SwitchRegistry,
};

mod triangle;
pub use triangle::TriangleTopology;

mod ring;
pub use ring::RingTopology;

/// Trait for easier access to example topologies.
pub trait ExampleTopology {
    /// Get the device layer, with all nodes, ports and discovered links.
    fn snapshot() -> RegistrySnapshot;

    /// Get the static configuration of the chosen variant.
    ///
    /// # Panics
    /// Panics if the variant does not exist.
    fn static_config(variant: usize) -> StaticTopology;

    /// Number of variants accepted by [`ExampleTopology::static_config`]
    fn num_variants() -> usize;

    /// Get the port registry built from [`ExampleTopology::snapshot`].
    fn registry() -> Result<SwitchRegistry, RegistryError> {
        SwitchRegistry::from_snapshot(&Self::snapshot())
    }
}

/// Look up an example topology by name, returning its snapshot and the static configuration of
/// the chosen variant. Returns `None` if either the name or the variant is unknown.
pub fn by_name(name: &str, variant: usize) -> Option<(RegistrySnapshot, StaticTopology)> {
    match name.to_lowercase().as_str() {
        "triangle" => example::<TriangleTopology>(variant),
        "ring" => example::<RingTopology>(variant),
        _ => None,
    }
}

fn example<T: ExampleTopology>(variant: usize) -> Option<(RegistrySnapshot, StaticTopology)> {
    if variant < T::num_variants() {
        Some((T::snapshot(), T::static_config(variant)))
    } else {
        None
    }
}

fn node(id: &str, num_ports: u32) -> NodeSnapshot {
    NodeSnapshot {
        id: NodeId::new(id),
        ports: (1..=num_ports).map(|number| PortSnapshot { number, state: PortState::Up }).collect(),
    }
}

fn link(source: &str, destination: &str) -> LinkSnapshot {
    LinkSnapshot { source: PortId::new(source), destination: PortId::new(destination) }
}
