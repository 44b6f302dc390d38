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

//! # Static Topology Configuration
//! This module represents the operator-supplied static topology. There are several different
//! structs in this module. Here is an overview:
//!
//! - [`StaticTopology`]: The static configuration. The datastructure is a collection of several
//!   [`StaticExpr`], at most one for each [`StaticExprKey`].
//! - [`StaticExpr`]: Single configuration expression, either a directed static switch link or an
//!   edge port.
//! - [`StaticPatch`]: Difference between two [`StaticTopology`] structs. The datastructure is a
//!   collection of several [`StaticModifier`].
//! - [`StaticModifier`]: A modification of a single [`StaticExpr`]. A modification can either be
//!   an insertion of a new expression, a removal of an existing expression, or a modification of
//!   an existing expression.
//!
//! # Example Usage
//!
//! ```rust
//! use swtopo::topology::config::StaticTopology;
//! use swtopo::topology::PortId;
//!
//! let mut staged = StaticTopology::new();
//! staged.add_switch_link(PortId::new("1000:1"), PortId::new("1001:2"));
//! staged.add_edge_port(PortId::new("1002:3"));
//!
//! // the last write for a source port wins
//! staged.add_switch_link(PortId::new("1000:1"), PortId::new("1002:1"));
//! assert_eq!(staged.switch_link(&PortId::new("1000:1")), Some(&PortId::new("1002:1")));
//!
//! // compute the patch from an empty configuration and apply it
//! let mut applied = StaticTopology::new();
//! let patch = applied.get_diff(&staged);
//! assert_eq!(patch.modifiers.len(), 2);
//! applied.apply_patch(&patch).unwrap();
//! assert_eq!(applied, staged);
//! ```

use crate::topology::storage::{StaticSwitchLink, StaticTopologyRecord};
use crate::topology::{ConfigError, PortId};

use std::collections::HashMap;

/// # Static Topology
/// This struct holds the static topology configuration. It is made up of several *unordered*
/// [`StaticExpr`]. Two configurations can be compared by computing the difference, which returns
/// a [`StaticPatch`].
///
/// The struct only contains "unique" expressions: a source port has at most one static
/// destination, and a port is either configured as edge port or not. None of the expressions are
/// validated against the ports which currently exist. Ports which do not exist (yet), and even
/// self-referential links, are accepted and simply have no effect during reconciliation.
#[derive(Debug, Clone)]
pub struct StaticTopology {
    /// All lines of configuration
    pub(crate) expr: HashMap<StaticExprKey, StaticExpr>,
}

impl Default for StaticTopology {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticTopology {
    /// Create an empty static topology
    pub fn new() -> Self {
        Self { expr: HashMap::new() }
    }

    /// Build the static topology from its persisted form. `None` (no configuration record) yields
    /// an empty configuration. If the record contains the same source twice, the last one wins.
    pub fn from_record(record: Option<&StaticTopologyRecord>) -> Self {
        let mut config = Self::new();
        if let Some(record) = record {
            for link in record.static_switch_links.iter() {
                config.add_switch_link(link.source.clone(), link.destination.clone());
            }
            for port in record.static_edge_ports.iter() {
                config.add_edge_port(port.clone());
            }
        }
        config
    }

    /// Serialize the configuration into its persisted form. If neither a static link nor an edge
    /// port is configured, `None` is returned, meaning that the record should be deleted. The
    /// entries of the record are sorted.
    pub fn to_record(&self) -> Option<StaticTopologyRecord> {
        if self.is_empty() {
            return None;
        }
        let mut static_switch_links: Vec<StaticSwitchLink> = self
            .switch_links()
            .map(|(source, destination)| StaticSwitchLink {
                source: source.clone(),
                destination: destination.clone(),
            })
            .collect();
        static_switch_links.sort();
        let mut static_edge_ports: Vec<PortId> = self.edge_ports().cloned().collect();
        static_edge_ports.sort();
        Some(StaticTopologyRecord { static_switch_links, static_edge_ports })
    }

    /// Configure the directed static link `source -> destination`. Any destination configured
    /// earlier for `source` is replaced, and returned.
    pub fn add_switch_link(&mut self, source: PortId, destination: PortId) -> Option<PortId> {
        match self.expr.insert(
            StaticExprKey::SwitchLink { source: source.clone() },
            StaticExpr::SwitchLink { source, destination },
        ) {
            Some(StaticExpr::SwitchLink { destination, .. }) => Some(destination),
            _ => None,
        }
    }

    /// Remove the static link starting at `source`. Returns the removed destination, or `None` if
    /// no static link was configured for `source`.
    pub fn remove_switch_link(&mut self, source: &PortId) -> Option<PortId> {
        match self.expr.remove(&StaticExprKey::SwitchLink { source: source.clone() }) {
            Some(StaticExpr::SwitchLink { destination, .. }) => Some(destination),
            _ => None,
        }
    }

    /// Mark the port as edge port. Returns `false` if it was already marked.
    pub fn add_edge_port(&mut self, port: PortId) -> bool {
        self.expr
            .insert(StaticExprKey::EdgePort { port: port.clone() }, StaticExpr::EdgePort { port })
            .is_none()
    }

    /// Remove the edge port designation. Returns `false` if the port was not marked.
    pub fn remove_edge_port(&mut self, port: &PortId) -> bool {
        self.expr.remove(&StaticExprKey::EdgePort { port: port.clone() }).is_some()
    }

    /// Remove all static links and all edge ports.
    pub fn clear(&mut self) {
        self.expr.clear();
    }

    /// Returns the statically configured destination of `source`.
    pub fn switch_link(&self, source: &PortId) -> Option<&PortId> {
        match self.expr.get(&StaticExprKey::SwitchLink { source: source.clone() }) {
            Some(StaticExpr::SwitchLink { destination, .. }) => Some(destination),
            _ => None,
        }
    }

    /// Returns `true` if the port is configured as edge port.
    pub fn is_edge_port(&self, port: &PortId) -> bool {
        self.expr.contains_key(&StaticExprKey::EdgePort { port: port.clone() })
    }

    /// Returns an iterator over all static links as `(source, destination)`, in arbitrary order.
    pub fn switch_links(&self) -> impl Iterator<Item = (&PortId, &PortId)> {
        self.expr.values().filter_map(|e| match e {
            StaticExpr::SwitchLink { source, destination } => Some((source, destination)),
            StaticExpr::EdgePort { .. } => None,
        })
    }

    /// Returns an iterator over all edge ports, in arbitrary order.
    pub fn edge_ports(&self) -> impl Iterator<Item = &PortId> {
        self.expr.values().filter_map(|e| match e {
            StaticExpr::EdgePort { port } => Some(port),
            StaticExpr::SwitchLink { .. } => None,
        })
    }

    /// Apply a single [`StaticModifier`]. The modifier must match the current configuration: an
    /// insert requires that nothing is configured for its key, while a removal or an update
    /// requires that the `from` expression is configured exactly. Otherwise, an error is returned
    /// and the configuration is not changed. An update cannot change the key of an expression.
    pub fn apply_modifier(&mut self, modifier: &StaticModifier) -> Result<(), ConfigError> {
        let (key, expected, new) = match modifier {
            StaticModifier::Insert(e) => (e.key(), None, Some(e)),
            StaticModifier::Remove(e) => (e.key(), Some(e), None),
            StaticModifier::Update { from, to } if from.key() == to.key() => {
                (to.key(), Some(from), Some(to))
            }
            StaticModifier::Update { .. } => {
                return Err(ConfigError::StaticModifierError(modifier.clone()))
            }
        };
        if self.expr.get(&key) != expected {
            return Err(ConfigError::StaticModifierError(modifier.clone()));
        }
        match new {
            Some(e) => self.expr.insert(key, e.clone()),
            None => self.expr.remove(&key),
        };
        Ok(())
    }

    /// Apply all modifiers of the patch in order. Either all modifiers are applied, or the first
    /// error is returned and the configuration remains untouched.
    pub fn apply_patch(&mut self, patch: &StaticPatch) -> Result<(), ConfigError> {
        let mut next = self.clone();
        for modifier in patch.modifiers.iter() {
            next.apply_modifier(modifier)?;
        }
        *self = next;
        Ok(())
    }

    /// Returns the [`StaticPatch`] which transforms `self` into `other`. Removals come first,
    /// followed by updates and insertions, such that the patch applies cleanly on `self`.
    pub fn get_diff(&self, other: &Self) -> StaticPatch {
        let mut patch = StaticPatch::new();
        for (key, old) in self.expr.iter() {
            match other.expr.get(key) {
                None => patch.add(StaticModifier::Remove(old.clone())),
                Some(new) if new != old => {
                    patch.add(StaticModifier::Update { from: old.clone(), to: new.clone() })
                }
                Some(_) => {}
            }
        }
        other
            .expr
            .iter()
            .filter(|(key, _)| !self.expr.contains_key(key))
            .for_each(|(_, new)| patch.add(StaticModifier::Insert(new.clone())));
        patch
    }

    /// Returns the number of config expressions in the config.
    pub fn len(&self) -> usize {
        self.expr.len()
    }

    /// Returns `true` if neither a static link nor an edge port is configured.
    pub fn is_empty(&self) -> bool {
        self.expr.is_empty()
    }

    /// Returns an iterator over all expressions in the configuration.
    pub fn iter(&self) -> std::collections::hash_map::Values<'_, StaticExprKey, StaticExpr> {
        self.expr.values()
    }
}

impl PartialEq for StaticTopology {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl Eq for StaticTopology {}

/// # Single configuration expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StaticExpr {
    /// Directed static link between two switch ports
    SwitchLink {
        /// Source port of the link
        source: PortId,
        /// Destination port of the link
        destination: PortId,
    },
    /// Port forced to be an edge port
    EdgePort {
        /// The edge port
        port: PortId,
    },
}

impl StaticExpr {
    /// Returns the key of the config expression. Two expressions with the same key cannot exist in
    /// the same [`StaticTopology`].
    pub fn key(&self) -> StaticExprKey {
        match self {
            StaticExpr::SwitchLink { source, .. } => {
                StaticExprKey::SwitchLink { source: source.clone() }
            }
            StaticExpr::EdgePort { port } => StaticExprKey::EdgePort { port: port.clone() },
        }
    }
}

/// # Key for Static Expressions
/// Key for a single configuration expression, where the value is missing. Static links are keyed
/// by their source only, such that a source port can have at most one static destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StaticExprKey {
    /// Static link key
    SwitchLink {
        /// Source port of the link
        source: PortId,
    },
    /// Edge port key
    EdgePort {
        /// The edge port
        port: PortId,
    },
}

/// # Static Modifier
/// A single patch to apply on a static topology. The modifier can either insert a new expression,
/// update an existing expression or remove an old expression.
#[derive(Debug, Clone, PartialEq)]
pub enum StaticModifier {
    /// Insert a new expression
    Insert(StaticExpr),
    /// Remove an existing expression
    Remove(StaticExpr),
    /// Change a config expression
    Update {
        /// Original configuration expression
        from: StaticExpr,
        /// New configuration expression, which replaces the `from` expression.
        to: StaticExpr,
    },
}

/// # Static Patch
/// A series of `StaticModifier` which can be applied on a `StaticTopology` to get a new one. The
/// modifiers are applied in the order they were added.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StaticPatch {
    /// List of all modifiers, in the order in which they are applied.
    pub modifiers: Vec<StaticModifier>,
}

impl StaticPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self { modifiers: Vec::new() }
    }

    /// Add a new modifier to the patch
    pub fn add(&mut self, modifier: StaticModifier) {
        self.modifiers.push(modifier);
    }

    /// Returns `true` if the patch does not change anything
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}
