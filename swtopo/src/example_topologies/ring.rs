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


//! # Ring Topology

use super::{link, node, ExampleTopology};
use crate::topology::registry::LinkSnapshot;
use crate::topology::{PortId, PortState, RegistrySnapshot, StaticTopology};

/// # Ring
///
/// Four OpenFlow switches `openflow:1` to `openflow:4`, connected as a ring. Port `2` of each
/// switch is connected to port `1` of the next one. The segment `openflow:4:2 <-> openflow:1:1`
/// is not discovered by the device layer, and must be configured statically. Port `openflow:3:3`
/// is down.
#[derive(Debug)]
pub struct RingTopology {}

impl RingTopology {
    /// Number of switches in the ring
    pub const SIZE: usize = 4;

    fn discovered() -> Vec<LinkSnapshot> {
        vec![
            link("openflow:1:2", "openflow:2:1"),
            link("openflow:2:2", "openflow:3:1"),
            link("openflow:3:2", "openflow:4:1"),
        ]
    }
}

impl ExampleTopology for RingTopology {
    fn snapshot() -> RegistrySnapshot {
        let mut nodes: Vec<_> =
            (1..=Self::SIZE).map(|i| node(&format!("openflow:{}", i), 3)).collect();
        nodes[2].ports[2].state = PortState::Down;
        RegistrySnapshot { nodes, links: Self::discovered() }
    }

    /// Get the static configuration
    ///
    /// # Variant 0
    /// - No static configuration
    ///
    /// # Variant 1
    /// - static link openflow:4:2 --> openflow:1:1
    /// - static link openflow:1:1 --> openflow:4:2
    ///
    /// # Variant 2
    /// - static link openflow:4:2 --> openflow:1:1
    /// - static link openflow:1:1 --> openflow:4:2
    /// - edge port openflow:2:1
    fn static_config(variant: usize) -> StaticTopology {
        let mut c = StaticTopology::new();

        if variant >= 1 {
            c.add_switch_link(PortId::new("openflow:4:2"), PortId::new("openflow:1:1"));
            c.add_switch_link(PortId::new("openflow:1:1"), PortId::new("openflow:4:2"));
        }
        if variant >= 2 {
            c.add_edge_port(PortId::new("openflow:2:1"));
        }
        if variant > 2 {
            panic!("Invalid variant number");
        }

        c
    }

    fn num_variants() -> usize {
        3
    }
}
