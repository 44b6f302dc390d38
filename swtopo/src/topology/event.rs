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

//! Module for defining device-layer events

use crate::topology::{NodeId, PortId, PortState};

/// Event emitted by the device layer, whenever its view of the topology changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A new switch was connected
    NodeAdded(NodeId),
    /// A switch was removed, together with all of its ports
    NodeRemoved(NodeId),
    /// A new port appeared on a switch
    PortAdded(PortId),
    /// A port was removed
    PortRemoved(PortId),
    /// The operational state of the port changed
    PortState(PortId, PortState),
    /// The discovered peer of the port changed. `None` means that no peer is discovered anymore.
    PeerChanged(PortId, Option<PortId>),
}

impl Event {
    /// Returns true if the event was caused by link discovery
    pub fn is_link_event(&self) -> bool {
        matches!(self, Event::PeerChanged(_, _))
    }
}
