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


use crate::topology::config::{StaticExpr::*, StaticExprKey, StaticModifier::*, StaticPatch};
use crate::topology::storage::StaticSwitchLink;
use crate::topology::{ConfigError, PortId, StaticTopology, StaticTopologyRecord};
use maplit::hashset;
use std::collections::HashSet;

fn p(s: &str) -> PortId {
    PortId::new(s)
}

#[test]
fn test_config_diff() {
    let mut c1 = StaticTopology::new();
    let mut c2 = StaticTopology::new();

    // the same link in both
    c1.add_switch_link(p("1:1"), p("2:1"));
    c2.add_switch_link(p("1:1"), p("2:1"));

    // edge port only in c1, another one only in c2
    c1.add_edge_port(p("1:3"));
    c2.add_edge_port(p("2:3"));

    // the same source, but different destinations
    c1.add_switch_link(p("2:1"), p("1:1"));
    c2.add_switch_link(p("2:1"), p("3:1"));

    let patch = c1.get_diff(&c2);
    let expected_patch = vec![
        Insert(EdgePort { port: p("2:3") }),
        Remove(EdgePort { port: p("1:3") }),
        Update {
            from: SwitchLink { source: p("2:1"), destination: p("1:1") },
            to: SwitchLink { source: p("2:1"), destination: p("3:1") },
        },
    ];

    assert_eq!(patch.modifiers.len(), expected_patch.len());
    for modifier in patch.modifiers.iter() {
        assert!(expected_patch.contains(modifier));
    }

    c1.apply_patch(&patch).unwrap();
    assert_eq!(c1, c2);
    assert!(c1.get_diff(&c2).is_empty());
}

#[test]
fn diff_removes_before_insert() {
    let mut c1 = StaticTopology::new();
    let mut c2 = StaticTopology::new();
    c1.add_edge_port(p("1:1"));
    c1.add_switch_link(p("1:2"), p("2:2"));
    c2.add_switch_link(p("1:1"), p("2:1"));

    let link = SwitchLink { source: p("1:1"), destination: p("2:1") };
    let patch = c1.get_diff(&c2);
    assert_eq!(patch.modifiers.last(), Some(&Insert(link.clone())));
    c1.apply_patch(&patch).unwrap();
    assert_eq!(c1, c2);

    // the reverse direction applies as well
    let patch = c1.get_diff(&StaticTopology::new());
    assert_eq!(patch.modifiers, vec![Remove(link)]);
    c1.apply_patch(&patch).unwrap();
    assert!(c1.is_empty());
}

#[test]
fn config_unique() {
    let mut c = StaticTopology::new();

    // one static link per source
    c.apply_modifier(&Insert(SwitchLink { source: p("1:1"), destination: p("2:1") })).unwrap();
    c.apply_modifier(&Insert(SwitchLink { source: p("2:1"), destination: p("1:1") })).unwrap();
    c.apply_modifier(&Insert(SwitchLink { source: p("1:1"), destination: p("3:1") })).unwrap_err();
    assert_eq!(c.switch_link(&p("1:1")), Some(&p("2:1")));

    // the same port may be an edge port and the source of a static link
    c.apply_modifier(&Insert(EdgePort { port: p("1:1") })).unwrap();
    c.apply_modifier(&Insert(EdgePort { port: p("1:1") })).unwrap_err();

    assert_eq!(c.len(), 3);
    assert_eq!(
        c.iter().map(|e| e.key()).collect::<HashSet<_>>(),
        hashset![
            StaticExprKey::SwitchLink { source: p("1:1") },
            StaticExprKey::SwitchLink { source: p("2:1") },
            StaticExprKey::EdgePort { port: p("1:1") },
        ]
    );
}

#[test]
fn switch_link_last_write_wins() {
    let mut c = StaticTopology::new();
    assert_eq!(c.add_switch_link(p("1:1"), p("2:1")), None);
    assert_eq!(c.add_switch_link(p("1:1"), p("3:1")), Some(p("2:1")));
    assert_eq!(c.switch_link(&p("1:1")), Some(&p("3:1")));
    assert_eq!(c.switch_links().count(), 1);

    // links are directional
    assert_eq!(c.switch_link(&p("3:1")), None);

    assert_eq!(c.remove_switch_link(&p("1:1")), Some(p("3:1")));
    assert_eq!(c.remove_switch_link(&p("1:1")), None);
    assert!(c.is_empty());
}

#[test]
fn self_link_and_unknown_ports_are_stored() {
    let mut c = StaticTopology::new();
    c.add_switch_link(p("1:1"), p("1:1"));
    c.add_switch_link(p("bogus"), p("9:9"));
    assert_eq!(c.switch_link(&p("1:1")), Some(&p("1:1")));
    assert_eq!(c.switch_link(&p("bogus")), Some(&p("9:9")));
}

#[test]
fn edge_port_toggle() {
    let mut c = StaticTopology::new();
    assert!(c.add_edge_port(p("1:1")));
    assert!(!c.add_edge_port(p("1:1")));
    assert!(c.add_edge_port(p("1:2")));
    assert!(c.is_edge_port(&p("1:1")));
    assert_eq!(c.edge_ports().cloned().collect::<HashSet<_>>(), hashset![p("1:1"), p("1:2")]);

    assert!(c.remove_edge_port(&p("1:1")));
    assert!(!c.remove_edge_port(&p("1:1")));
    assert!(!c.is_edge_port(&p("1:1")));

    c.add_switch_link(p("1:3"), p("2:3"));
    c.clear();
    assert!(c.is_empty());
    assert_eq!(c.switch_links().count(), 0);
    assert_eq!(c.edge_ports().count(), 0);
}

#[test]
fn apply_modifier_strict() {
    let mut c = StaticTopology::new();
    let link = SwitchLink { source: p("1:1"), destination: p("2:1") };
    let other = SwitchLink { source: p("1:1"), destination: p("3:1") };

    c.apply_modifier(&Insert(link.clone())).unwrap();
    assert_eq!(
        c.apply_modifier(&Insert(other.clone())),
        Err(ConfigError::StaticModifierError(Insert(other.clone())))
    );
    // removing with the wrong destination fails and keeps the expression
    c.apply_modifier(&Remove(other.clone())).unwrap_err();
    assert_eq!(c.switch_link(&p("1:1")), Some(&p("2:1")));

    // update must match the current expression
    c.apply_modifier(&Update { from: other.clone(), to: link.clone() }).unwrap_err();
    c.apply_modifier(&Update { from: link.clone(), to: other.clone() }).unwrap();
    assert_eq!(c.switch_link(&p("1:1")), Some(&p("3:1")));

    // update cannot change the key
    let edge = EdgePort { port: p("1:1") };
    c.apply_modifier(&Update { from: other.clone(), to: edge.clone() }).unwrap_err();

    c.apply_modifier(&Remove(other)).unwrap();
    c.apply_modifier(&Remove(edge)).unwrap_err();
    assert!(c.is_empty());
}

#[test]
fn apply_patch_is_atomic() {
    let mut c = StaticTopology::new();
    c.add_edge_port(p("1:1"));
    let before = c.clone();

    let mut patch = StaticPatch::new();
    patch.add(Insert(SwitchLink { source: p("1:2"), destination: p("2:2") }));
    patch.add(Remove(EdgePort { port: p("1:1") }));
    patch.add(Remove(EdgePort { port: p("1:1") }));

    assert!(c.apply_patch(&patch).is_err());
    assert_eq!(c, before);
}

#[test]
fn record_conversion() {
    let mut c = StaticTopology::new();
    assert_eq!(c.to_record(), None);
    assert_eq!(StaticTopology::from_record(None), c);

    c.add_switch_link(p("1:2"), p("2:2"));
    c.add_switch_link(p("1:1"), p("2:1"));
    c.add_edge_port(p("3:1"));

    let record = c.to_record().unwrap();
    assert_eq!(
        record,
        StaticTopologyRecord {
            static_switch_links: vec![
                StaticSwitchLink { source: p("1:1"), destination: p("2:1") },
                StaticSwitchLink { source: p("1:2"), destination: p("2:2") },
            ],
            static_edge_ports: vec![p("3:1")],
        }
    );
    assert_eq!(StaticTopology::from_record(Some(&record)), c);

    // an edge port alone still produces a record
    c.remove_switch_link(&p("1:1"));
    c.remove_switch_link(&p("1:2"));
    assert!(c.to_record().is_some());
}

#[test]
fn record_duplicate_source_last_wins() {
    let record = StaticTopologyRecord {
        static_switch_links: vec![
            StaticSwitchLink { source: p("1:1"), destination: p("2:1") },
            StaticSwitchLink { source: p("1:1"), destination: p("3:1") },
        ],
        static_edge_ports: vec![],
    };
    let c = StaticTopology::from_record(Some(&record));
    assert_eq!(c.len(), 1);
    assert_eq!(c.switch_link(&p("1:1")), Some(&p("3:1")));
}
