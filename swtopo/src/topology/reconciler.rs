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

//! # Topology Reconciler
//!
//! The reconciler merges the static topology with the links discovered by the device layer. It is
//! a pure function of the static configuration and of a single snapshot of the registry: every
//! evaluation is a full recompute, so the result never depends on the order of past events, and
//! evaluating the same inputs twice yields the same view.
//!
//! Each port known to the registry is evaluated independently as source of a link, using the
//! following precedence:
//!
//! 1. If the source is down, unknown, or configured as edge port, no link starts at it. A link
//!    discovered on an edge port is ignored, and so is a static link starting at it.
//! 2. Else, if a static link is configured for the source, its destination is a different port,
//!    is not configured as edge port, exists, and is up, then the static link is effective. A
//!    link discovered on the same source towards another destination is ignored. If the static
//!    destination is an edge port, the static link is ignored.
//! 3. Else, if a peer was discovered on the source, and the peer exists and is up, then the
//!    discovered link is effective, unless the peer is configured as edge port. In that case, the
//!    discovered link is ignored.
//! 4. Else, no link starts at the source.
//!
//! A static link is only reported as ignored if it would be effective without the edge port.
//! Static links towards ports which are missing or down are inactive and not reported.

use crate::topology::config::StaticTopology;
use crate::topology::registry::PortRegistry;
use crate::topology::view::{EffectiveLink, IgnoreReason, IgnoredLink, TopologyView};
use crate::topology::PortId;

use log::*;

/// Result of evaluating a single source port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortOutcome {
    /// Effective link starting at the port
    pub link: Option<EffectiveLink>,
    /// Links starting at the port which are ignored, at most one static and one discovered.
    pub ignored: Vec<IgnoredLink>,
}

/// Compute the complete topology view from the static configuration and the registry.
pub fn reconcile<R: PortRegistry + ?Sized>(config: &StaticTopology, registry: &R) -> TopologyView {
    let mut view = TopologyView::new();
    for node in registry.list_nodes() {
        for port in registry.list_ports(&node, false) {
            let outcome = evaluate_port(config, registry, &port);
            if let Some(link) = outcome.link {
                view.insert_link(link);
            }
            for ignored in outcome.ignored {
                view.insert_ignored(ignored);
            }
        }
    }
    trace!("Reconciled {} effective and {} ignored links", view.num_links(), view.num_ignored());
    view
}

/// Evaluate the links starting at `source`.
pub fn evaluate_port<R: PortRegistry + ?Sized>(
    config: &StaticTopology,
    registry: &R,
    source: &PortId,
) -> PortOutcome {
    let mut outcome = PortOutcome::default();
    if !is_up(registry, source) {
        return outcome;
    }

    let discovered = resolve_peer(registry, source);
    // static destination which would be effective if no edge port was configured
    let static_dst = config
        .switch_link(source)
        .filter(|dst| *dst != source && is_up(registry, dst));

    if config.is_edge_port(source) {
        let reason = IgnoreReason::EdgePort { port: source.clone() };
        if let Some(destination) = discovered {
            let link = IgnoredLink::new_dynamic(source.clone(), destination, reason.clone());
            outcome.ignored.push(link);
        }
        if let Some(destination) = static_dst {
            let link = IgnoredLink::new_static(source.clone(), destination.clone(), reason);
            outcome.ignored.push(link);
        }
        return outcome;
    }

    if let Some(static_dst) = static_dst {
        if !config.is_edge_port(static_dst) {
            outcome.link = Some(EffectiveLink::new_static(source.clone(), static_dst.clone()));
            if let Some(destination) = discovered.filter(|d| d != static_dst) {
                let reason = IgnoreReason::StaticLink { destination: static_dst.clone() };
                outcome.ignored.push(IgnoredLink::new_dynamic(source.clone(), destination, reason));
            }
            return outcome;
        }
        let reason = IgnoreReason::EdgePort { port: static_dst.clone() };
        outcome.ignored.push(IgnoredLink::new_static(source.clone(), static_dst.clone(), reason));
    } else if let Some(dst) = config.switch_link(source) {
        trace!("Static link {} -> {} is not active", source, dst);
    }

    if let Some(destination) = discovered {
        if config.is_edge_port(&destination) {
            let reason = IgnoreReason::EdgePort { port: destination.clone() };
            outcome.ignored.push(IgnoredLink::new_dynamic(source.clone(), destination, reason));
        } else {
            outcome.link = Some(EffectiveLink::new_dynamic(source.clone(), destination));
        }
    }

    outcome
}

fn is_up<R: PortRegistry + ?Sized>(registry: &R, port: &PortId) -> bool {
    registry.port_state(port).map_or(false, |s| s.is_up())
}

/// Returns the discovered peer of the port, if the peer exists and is up.
fn resolve_peer<R: PortRegistry + ?Sized>(registry: &R, port: &PortId) -> Option<PortId> {
    registry.peer(port).filter(|peer| peer != port && is_up(registry, peer))
}
