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

//! # Topology Manager
//!
//! The manager ties the static configuration, its persistent storage, the device registry and the
//! reconciler together. It is the single writer of the topology: configuration changes are staged
//! and committed with [`TopologyManager::apply`], and device-layer events are passed to
//! [`TopologyManager::handle_events`]. Both trigger a full recompute of the view.

use crate::error::Error;
use crate::topology::config::{StaticPatch, StaticTopology};
use crate::topology::event::Event;
use crate::topology::graph::SwitchGraph;
use crate::topology::printer;
use crate::topology::reconciler::reconcile;
use crate::topology::registry::PortRegistry;
use crate::topology::storage::ConfigStorage;
use crate::topology::view::{TopologyDiff, TopologyView};
use crate::topology::RegistryError;

use log::*;

/// # Topology Manager
///
/// The manager holds two copies of the static configuration. The *staged* configuration is
/// modified by the caller (see [`TopologyManager::config_mut`]), and the *applied* configuration
/// is the one which was persisted last and which the view is computed from. Staged changes have no
/// effect until they are applied.
///
/// ```rust
/// use swtopo::topology::{MemoryStorage, NodeId, PortId, SwitchRegistry, TopologyManager};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut reg = SwitchRegistry::new();
/// for node in ["1000", "1001"].iter() {
///     reg.add_node(NodeId::new(*node))?;
///     reg.add_port(PortId::new(format!("{}:1", node)))?;
///     reg.add_port(PortId::new(format!("{}:2", node)))?;
/// }
/// reg.add_link(&PortId::new("1000:1"), &PortId::new("1001:1"))?;
///
/// let mut mgr = TopologyManager::open(MemoryStorage::new(), reg)?;
/// assert_eq!(mgr.view().num_links(), 2);
///
/// mgr.config_mut().add_switch_link(PortId::new("1000:1"), PortId::new("1001:2"));
/// mgr.apply()?;
///
/// let link = mgr.view().link(&PortId::new("1000:1")).unwrap();
/// assert_eq!(link.destination, PortId::new("1001:2"));
/// assert!(link.is_static);
/// assert!(mgr.view().ignored_link(&PortId::new("1000:1")).is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TopologyManager<S, R> {
    storage: S,
    registry: R,
    staged: StaticTopology,
    applied: StaticTopology,
    view: TopologyView,
}

impl<S: ConfigStorage, R: PortRegistry> TopologyManager<S, R> {
    /// Create the manager, loading the persisted static topology from the storage. Both the staged
    /// and the applied configuration are initialized from the stored record.
    pub fn open(storage: S, registry: R) -> Result<Self, Error> {
        let record = storage.load()?;
        let config = StaticTopology::from_record(record.as_ref());
        info!(
            "Loaded static topology with {} expressions ({})",
            config.len(),
            if record.is_some() { "record present" } else { "no record" }
        );
        let view = reconcile(&config, &registry);
        Ok(Self { storage, registry, staged: config.clone(), applied: config, view })
    }

    /// Returns the staged configuration
    pub fn config(&self) -> &StaticTopology {
        &self.staged
    }

    /// Returns a mutable reference to the staged configuration. Changes take effect once
    /// [`TopologyManager::apply`] succeeds.
    pub fn config_mut(&mut self) -> &mut StaticTopology {
        &mut self.staged
    }

    /// Returns the applied configuration
    pub fn applied_config(&self) -> &StaticTopology {
        &self.applied
    }

    /// Returns `true` if the staged configuration differs from the applied one.
    pub fn has_pending_changes(&self) -> bool {
        self.staged != self.applied
    }

    /// Returns the patch which [`TopologyManager::apply`] would commit.
    pub fn pending_changes(&self) -> StaticPatch {
        self.applied.get_diff(&self.staged)
    }

    /// Apply a patch on the staged configuration. If any modifier does not match the staged
    /// configuration, the error is returned and the staged configuration is not changed.
    pub fn stage(&mut self, patch: &StaticPatch) -> Result<(), Error> {
        self.staged.apply_patch(patch)?;
        debug!("Staged {} modifiers", patch.modifiers.len());
        Ok(())
    }

    /// Drop all staged changes, resetting the staged configuration to the applied one.
    pub fn discard(&mut self) {
        self.staged = self.applied.clone();
    }

    /// Persist the staged configuration and recompute the topology. If both the static links and
    /// the edge ports are empty, the persisted record is deleted instead.
    ///
    /// The pending changes are committed as a [`StaticPatch`] on a copy of the applied
    /// configuration, which only replaces the applied configuration once the record is persisted.
    /// If the storage rejects the write, the error is returned and nothing changes: the applied
    /// configuration and the view remain as they were, and the staged configuration is kept such
    /// that the caller may retry.
    pub fn apply(&mut self) -> Result<TopologyDiff, Error> {
        let patch = self.pending_changes();
        let mut next = self.applied.clone();
        next.apply_patch(&patch)?;
        if let Err(e) = self.storage.put(next.to_record().as_ref()) {
            warn!("Cannot persist the static topology: {}", e);
            return Err(e.into());
        }
        for modifier in patch.modifiers.iter() {
            debug!("Applied {}", printer::static_modifier(modifier));
        }
        self.applied = next;
        Ok(self.recompute())
    }

    /// Handle a single device-layer event.
    pub fn handle_event(&mut self, event: &Event) -> TopologyDiff {
        debug!("Handle event: {}", printer::event(event));
        self.recompute()
    }

    /// Handle a batch of device-layer events, recomputing the topology once.
    pub fn handle_events<I: IntoIterator<Item = Event>>(&mut self, events: I) -> TopologyDiff {
        let mut n = 0usize;
        for event in events {
            debug!("Handle event: {}", printer::event(&event));
            n += 1;
        }
        if n == 0 {
            return TopologyDiff::default();
        }
        self.recompute()
    }

    /// Modify the registry, and handle all events emitted by the modification.
    pub fn update_registry<F>(&mut self, f: F) -> Result<TopologyDiff, Error>
    where
        F: FnOnce(&mut R) -> Result<Vec<Event>, RegistryError>,
    {
        let events = f(&mut self.registry)?;
        Ok(self.handle_events(events))
    }

    /// Recompute the view from scratch, and return what changed.
    pub fn recompute(&mut self) -> TopologyDiff {
        let view = reconcile(&self.applied, &self.registry);
        let diff = self.view.diff(&view);
        if !diff.is_empty() {
            info!("Topology changed: {}", printer::diff_summary(&diff));
        }
        self.view = view;
        diff
    }

    /// Returns the current topology view.
    pub fn view(&self) -> &TopologyView {
        &self.view
    }

    /// Build the switch graph of the current view, including switches without any links.
    pub fn switch_graph(&self) -> SwitchGraph {
        SwitchGraph::from_view(self.registry.list_nodes(), &self.view)
    }

    /// Returns a reference to the registry
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Returns a mutable reference to the registry. Events emitted by changes done through this
    /// reference must be passed to [`TopologyManager::handle_events`], otherwise the view is stale.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Returns a reference to the storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a mutable reference to the storage
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
