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


//! # Triangle Topology

use super::{link, node, ExampleTopology};
use crate::topology::{PortId, RegistrySnapshot, StaticTopology};

/// # Triangle
///
/// Three switches `1000`, `1001` and `1002`, each with the ports `1`, `2` and `3`. The device layer
/// discovered the links `1000:1 <-> 1001:1` and `1000:2 <-> 1002:1`. All remaining ports are edge
/// ports.
#[derive(Debug)]
pub struct TriangleTopology {}

impl ExampleTopology for TriangleTopology {
    fn snapshot() -> RegistrySnapshot {
        RegistrySnapshot {
            nodes: vec![node("1000", 3), node("1001", 3), node("1002", 3)],
            links: vec![link("1000:1", "1001:1"), link("1000:2", "1002:1")],
        }
    }

    /// Get the static configuration
    ///
    /// # Variant 0
    /// - No static configuration
    ///
    /// # Variant 1
    /// - static link 1000:1 --> 1001:2
    ///
    /// # Variant 2
    /// - static link 1000:1 --> 1001:2
    /// - edge port 1001:1
    fn static_config(variant: usize) -> StaticTopology {
        let mut c = StaticTopology::new();

        if variant >= 1 {
            c.add_switch_link(PortId::new("1000:1"), PortId::new("1001:2"));
        }
        if variant >= 2 {
            c.add_edge_port(PortId::new("1001:1"));
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
