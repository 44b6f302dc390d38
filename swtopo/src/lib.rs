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


#![deny(missing_docs)]

//! # SwTopo: Reconciling Static and Discovered Switch Topologies
//! This is a library for computing the authoritative inter-switch topology of an SDN controller.
//! It merges the links discovered by the device layer with the static links and edge ports
//! configured by the operator.
//!
//! ## Problem Statement
//! Given
//! - the set of switches and ports known by the device layer, together with their state and the
//!   peer each port has discovered,
//! - a set of directed static links, keyed by their source port, and
//! - a set of ports which are forced to be edge ports,
//!
//! compute exactly one effective link per source port, such that static links take precedence
//! over discovered links and no link touches an edge port. Every link that is suppressed by the
//! static configuration is reported as ignored.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`Topology`](topology)**: The reconciler and all of its parts. The main entry point is the
//!   [`TopologyManager`](topology::TopologyManager), which owns the
//!   [static configuration](topology::StaticTopology), the
//!   [configuration storage](topology::ConfigStorage), the
//!   [port registry](topology::PortRegistry) and the current
//!   [topology view](topology::TopologyView).
//!
//! - **[`ExampleTopologies`](example_topologies)**: Collection of prepared registries and static
//!   configurations, used for testing and by the command line tool.
//!
//! ## Usage
//!
//! Prepare a [port registry](topology::PortRegistry), open the manager on a
//! [storage](topology::ConfigStorage), stage some changes and apply them.
//!
//! ```
//! use swtopo::topology::{MemoryStorage, PortId, TopologyManager};
//! use swtopo::Error;
//! # use swtopo::example_topologies::*;
//!
//! fn main() -> Result<(), Error> {
//!     // prepare the registry
//!     // let registry = ...
//! # let registry = TriangleTopology::registry()?;
//!
//!     let mut manager = TopologyManager::open(MemoryStorage::new(), registry)?;
//!
//!     // configure a static link, and force a port to be an edge port
//!     manager.config_mut().add_switch_link(PortId::new("1000:1"), PortId::new("1001:2"));
//!     manager.config_mut().add_edge_port(PortId::new("1002:1"));
//!     let diff = manager.apply()?;
//!
//!     // Do something with the result
//!     println!("{:#?}", diff);
//!     println!("{:#?}", manager.view());
//!
//!     Ok(())
//! }
//! ```

// test modules
pub mod example_topologies;
mod test;

mod error;
pub mod topology;

pub use error::Error;
