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

#![deny(missing_docs, missing_debug_implementations)]

//! # Topology
//!
//! This module merges operator-supplied static link and edge-port configuration with the
//! inter-switch links discovered by the device layer. The result is a single authoritative
//! [`TopologyView`], holding one effective link per source port, plus the set of links which were
//! ignored because the static configuration takes precedence or marks an edge port.
//!
//! ## Example usage
//!
//! Three switches `1000`, `1001` and `1002` are connected by the discovered links
//! `1000:1 <-> 1001:1` and `1000:2 <-> 1002:1`. A static link `1000:1 -> 1001:2` overrides the
//! discovered link starting at `1000:1`, while the reverse direction stays dynamic.
//!
//! ```rust
//! use swtopo::topology::{
//!     IgnoreReason, MemoryStorage, NodeId, PortId, PortRegistry, SwitchRegistry, TopologyManager,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let p = |s: &str| PortId::new(s);
//!
//!     let mut reg = SwitchRegistry::new();
//!     for node in ["1000", "1001", "1002"].iter() {
//!         reg.add_node(NodeId::new(*node))?;
//!         for i in 1..=3 {
//!             reg.add_port(PortId::new(format!("{}:{}", node, i)))?;
//!         }
//!     }
//!     reg.add_link(&p("1000:1"), &p("1001:1"))?;
//!     reg.add_link(&p("1000:2"), &p("1002:1"))?;
//!
//!     let mut mgr = TopologyManager::open(MemoryStorage::new(), reg)?;
//!     assert_eq!(mgr.view().num_links(), 4);
//!
//!     mgr.config_mut().add_switch_link(p("1000:1"), p("1001:2"));
//!     mgr.apply()?;
//!
//!     let view = mgr.view();
//!     assert!(view.link(&p("1000:1")).unwrap().is_static);
//!     assert_eq!(view.link(&p("1000:1")).unwrap().destination, p("1001:2"));
//!     assert_eq!(
//!         view.ignored_link(&p("1000:1")).unwrap().reason,
//!         IgnoreReason::StaticLink { destination: p("1001:2") }
//!     );
//!     assert!(!view.link(&p("1001:1")).unwrap().is_static);
//!
//!     // edge ports listed by the registry only consider discovered links
//!     assert_eq!(mgr.registry().list_ports(&NodeId::new("1001"), true).len(), 2);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub(crate) mod event;
pub mod graph;
pub(crate) mod manager;
pub mod printer;
pub mod reconciler;
pub mod registry;
pub mod storage;
pub(crate) mod types;
pub mod view;

pub use config::StaticTopology;
pub use event::Event;
pub use graph::SwitchGraph;
pub use manager::TopologyManager;
pub use reconciler::reconcile;
pub use registry::{PortRegistry, RegistrySnapshot, SwitchRegistry};
pub use storage::{ConfigStorage, JsonFileStorage, MemoryStorage, StaticTopologyRecord};
pub use types::{ConfigError, NodeId, PortId, PortState, RegistryError, StorageError};
pub use view::{EffectiveLink, IgnoreReason, IgnoredLink, TopologyDiff, TopologyView};
