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


use crate::example_topologies::{ExampleTopology, TriangleTopology};
use crate::topology::config::{StaticExpr, StaticModifier};
use crate::topology::{printer, reconcile, Event, PortId, PortState, StaticTopology};

#[test]
fn print_links() {
    let reg = TriangleTopology::registry().unwrap();
    let view = reconcile(&TriangleTopology::static_config(2), &reg);
    assert_eq!(
        printer::topology(&view),
        vec![
            "1000:1 -> 1001:2 (static)",
            "1000:2 -> 1002:1 (dynamic)",
            "1002:1 -> 1000:2 (dynamic)",
            "1000:1 -> 1001:1 (dynamic, ignored: static link to 1001:2)",
            "1001:1 -> 1000:1 (dynamic, ignored: edge port 1001:1)",
        ]
    );
}

#[test]
fn print_ignored_static_link() {
    let reg = TriangleTopology::registry().unwrap();
    let mut config = TriangleTopology::static_config(1);
    config.add_edge_port(PortId::new("1001:2"));
    let view = reconcile(&config, &reg);
    assert_eq!(
        printer::topology(&view).last().map(String::as_str),
        Some("1000:1 -> 1001:2 (static, ignored: edge port 1001:2)")
    );
}

#[test]
fn print_diff() {
    let reg = TriangleTopology::registry().unwrap();
    let before = reconcile(&StaticTopology::new(), &reg);
    let after = reconcile(&TriangleTopology::static_config(1), &reg);
    let diff = before.diff(&after);
    assert_eq!(
        printer::topology_diff(&diff),
        vec![
            "~ 1000:1 -> 1001:1 (dynamic) => 1000:1 -> 1001:2 (static)",
            "+ 1000:1 -> 1001:1 (dynamic, ignored: static link to 1001:2)",
        ]
    );
    assert_eq!(printer::diff_summary(&before.diff(&before)), "no change");
    assert_eq!(printer::diff_summary(&diff), printer::topology_diff(&diff).join(", "));
}

#[test]
fn print_config_items() {
    let link =
        StaticExpr::SwitchLink { source: PortId::new("1:1"), destination: PortId::new("2:1") };
    let edge = StaticExpr::EdgePort { port: PortId::new("1:2") };
    assert_eq!(printer::static_expr(&link), "Static Link: 1:1 -> 2:1");
    assert_eq!(
        printer::static_modifier(&StaticModifier::Insert(edge.clone())),
        "INSERT Edge Port: 1:2"
    );
    assert_eq!(printer::static_modifier(&StaticModifier::Remove(edge)), "REMOVE Edge Port: 1:2");
}

#[test]
fn print_events() {
    let p = PortId::new("1:1");
    assert_eq!(printer::event(&Event::PortState(p.clone(), PortState::Down)), "Port 1:1 is Down");
    assert_eq!(
        printer::event(&Event::PeerChanged(p.clone(), Some(PortId::new("2:1")))),
        "Port 1:1 discovered peer 2:1"
    );
    assert_eq!(printer::event(&Event::PeerChanged(p, None)), "Port 1:1 lost its peer");
}
