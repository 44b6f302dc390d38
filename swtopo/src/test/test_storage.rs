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


use super::init_logger;
use crate::example_topologies::{ExampleTopology, TriangleTopology};
use crate::topology::storage::StaticSwitchLink;
use crate::topology::{
    ConfigStorage, JsonFileStorage, MemoryStorage, PortId, StaticTopologyRecord, StorageError,
    TopologyManager,
};
use crate::Error;
use std::fs;

fn get_test_record() -> StaticTopologyRecord {
    StaticTopologyRecord {
        static_switch_links: vec![StaticSwitchLink {
            source: PortId::new("1000:1"),
            destination: PortId::new("1001:2"),
        }],
        static_edge_ports: vec![PortId::new("1002:3")],
    }
}

#[test]
fn record_json_layout() {
    let value = serde_json::to_value(&get_test_record()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "static-switch-links": [{"source": "1000:1", "destination": "1001:2"}],
            "static-edge-ports": ["1002:3"]
        })
    );

    // missing collections are empty
    let record: StaticTopologyRecord =
        serde_json::from_str(r#"{"static-edge-ports": ["1:1"]}"#).unwrap();
    assert!(record.static_switch_links.is_empty());
    assert_eq!(record.static_edge_ports, vec![PortId::new("1:1")]);
}

#[test]
fn memory_storage() {
    let mut storage = MemoryStorage::new();
    assert_eq!(storage.load().unwrap(), None);

    storage.put(Some(&get_test_record())).unwrap();
    assert_eq!(storage.load().unwrap(), Some(get_test_record()));

    storage.set_read_only(true);
    assert!(matches!(storage.delete(), Err(StorageError::Rejected(_))));
    assert!(matches!(
        storage.store(&StaticTopologyRecord::default()),
        Err(StorageError::Rejected(_))
    ));
    assert_eq!(storage.record(), Some(&get_test_record()));

    storage.set_read_only(false);
    storage.put(None).unwrap();
    assert_eq!(storage.load().unwrap(), None);
}

#[test]
fn json_file_storage() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("static-topology.json");
    let mut storage = JsonFileStorage::new(&path);
    assert_eq!(storage.path(), path.as_path());

    // missing file means no record
    assert_eq!(storage.load().unwrap(), None);
    storage.delete().unwrap();

    storage.store(&get_test_record()).unwrap();
    assert!(path.exists());
    assert_eq!(storage.load().unwrap(), Some(get_test_record()));
    // no temporary file is left behind
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

    storage.delete().unwrap();
    assert!(!path.exists());
    assert_eq!(storage.load().unwrap(), None);
}

#[test]
fn json_file_storage_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("static-topology.json");
    fs::write(&path, "{ not json").unwrap();
    let storage = JsonFileStorage::new(&path);
    assert!(matches!(storage.load(), Err(StorageError::JsonError(_))));

    match TopologyManager::open(storage, TriangleTopology::registry().unwrap()) {
        Err(Error::StorageError(StorageError::JsonError(_))) => {}
        r => panic!("Expected a JSON error, got {:?}", r.map(|m| m.view().clone())),
    }
}

#[test]
fn json_file_storage_unwritable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("static-topology.json");
    let mut storage = JsonFileStorage::new(&path);
    assert!(matches!(storage.store(&get_test_record()), Err(StorageError::IoError(_))));
}

#[test]
fn json_file_storage_failed_replace() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("static-topology.json");
    // a directory at the target path cannot be replaced by the new record
    fs::create_dir(&path).unwrap();
    let mut storage = JsonFileStorage::new(&path);
    assert!(matches!(storage.store(&get_test_record()), Err(StorageError::IoError(_))));

    // the temporary file is removed again
    assert!(!dir.path().join("static-topology.json.tmp").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    assert!(path.is_dir());
}

#[test]
fn manager_persists_across_restart() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("static-topology.json");

    let mut mgr =
        TopologyManager::open(JsonFileStorage::new(&path), TriangleTopology::registry().unwrap())
            .unwrap();
    *mgr.config_mut() = TriangleTopology::static_config(2);
    mgr.apply().unwrap();
    let view = mgr.view().clone();
    drop(mgr);

    let mgr =
        TopologyManager::open(JsonFileStorage::new(&path), TriangleTopology::registry().unwrap())
            .unwrap();
    assert_eq!(mgr.applied_config(), &TriangleTopology::static_config(2));
    assert_eq!(mgr.view(), &view);

    // clearing the configuration removes the file
    let mut mgr = mgr;
    mgr.config_mut().clear();
    mgr.apply().unwrap();
    assert!(!path.exists());
}
