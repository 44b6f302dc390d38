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

//! # Helper (printer) functions for the topology
//! Module containing helper functions to get formatted strings and print information about the
//! reconciled topology and the static configuration.

use crate::topology::config::{StaticExpr, StaticModifier, StaticTopology};
use crate::topology::event::Event;
use crate::topology::view::{EffectiveLink, IgnoreReason, IgnoredLink, TopologyDiff, TopologyView};

use itertools::Itertools;

/// Returns the formatted string of an effective link
pub fn effective_link(link: &EffectiveLink) -> String {
    format!(
        "{} -> {} ({})",
        link.source,
        link.destination,
        if link.is_static { "static" } else { "dynamic" }
    )
}

/// Returns the formatted string of an ignored link, together with the reason
pub fn ignored_link(link: &IgnoredLink) -> String {
    format!(
        "{} -> {} ({}, ignored: {})",
        link.source,
        link.destination,
        if link.is_static { "static" } else { "dynamic" },
        match &link.reason {
            IgnoreReason::StaticLink { destination } => format!("static link to {}", destination),
            IgnoreReason::EdgePort { port } => format!("edge port {}", port),
        }
    )
}

/// Returns a formatted string for a given event
pub fn event(event: &Event) -> String {
    match event {
        Event::NodeAdded(n) => format!("Node {} added", n),
        Event::NodeRemoved(n) => format!("Node {} removed", n),
        Event::PortAdded(p) => format!("Port {} added", p),
        Event::PortRemoved(p) => format!("Port {} removed", p),
        Event::PortState(p, s) => format!("Port {} is {:?}", p, s),
        Event::PeerChanged(p, Some(peer)) => format!("Port {} discovered peer {}", p, peer),
        Event::PeerChanged(p, None) => format!("Port {} lost its peer", p),
    }
}

/// Returns the static expression as a string
pub fn static_expr(expr: &StaticExpr) -> String {
    match expr {
        StaticExpr::SwitchLink { source, destination } => {
            format!("Static Link: {} -> {}", source, destination)
        }
        StaticExpr::EdgePort { port } => format!("Edge Port: {}", port),
    }
}

/// Returns a formatted string for the given modifier
pub fn static_modifier(modifier: &StaticModifier) -> String {
    match modifier {
        StaticModifier::Insert(e) => format!("INSERT {}", static_expr(e)),
        StaticModifier::Remove(e) => format!("REMOVE {}", static_expr(e)),
        StaticModifier::Update { from: _, to } => format!("MODIFY {}", static_expr(to)),
    }
}

/// Get one line for each effective and ignored link of the view. Effective links come first.
pub fn topology(view: &TopologyView) -> Vec<String> {
    view.links().map(effective_link).chain(view.ignored_links().map(ignored_link)).collect()
}

/// Get one line for each change. Added links are prefixed with `+`, removed ones with `-`, and
/// changed ones with `~`.
pub fn topology_diff(diff: &TopologyDiff) -> Vec<String> {
    let mut result = Vec::with_capacity(diff.len());
    result.extend(diff.links_removed.iter().map(|l| format!("- {}", effective_link(l))));
    result.extend(diff.links_added.iter().map(|l| format!("+ {}", effective_link(l))));
    result.extend(diff.links_changed.iter().map(|(old, new)| {
        format!("~ {} => {}", effective_link(old), effective_link(new))
    }));
    result.extend(diff.ignored_removed.iter().map(|l| format!("- {}", ignored_link(l))));
    result.extend(diff.ignored_added.iter().map(|l| format!("+ {}", ignored_link(l))));
    result
}

/// Print the topology view to stdout
pub fn print_topology(view: &TopologyView) {
    println!("Topology {{");
    for line in topology(view) {
        println!("    {}", line);
    }
    println!("}}");
}

/// Print the complete static configuration to stdout, sorted
pub fn print_config(config: &StaticTopology) {
    println!("StaticTopology {{");
    for line in config.iter().map(static_expr).sorted() {
        println!("    {}", line);
    }
    println!("}}");
}

/// Returns the summary of a diff on a single line, used for logging.
pub fn diff_summary(diff: &TopologyDiff) -> String {
    if diff.is_empty() {
        String::from("no change")
    } else {
        topology_diff(diff).iter().join(", ")
    }
}
