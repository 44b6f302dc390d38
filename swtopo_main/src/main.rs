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


use swtopo::example_topologies;
use swtopo::topology::{
    printer, JsonFileStorage, NodeId, PortId, RegistrySnapshot, SwitchRegistry, TopologyManager,
};

use clap::{Parser, Subcommand};
use log::*;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    // initialize the env logger
    pretty_env_logger::init();
    // run clap
    let args = CommandLineArguments::parse();

    let snapshot = load_snapshot(&args)?;
    let registry = SwitchRegistry::from_snapshot(&snapshot)?;
    info!("Loaded {} switches with {} ports", registry.num_nodes(), registry.num_ports());

    let mut mgr = TopologyManager::open(JsonFileStorage::new(&args.config), registry)?;

    // match on the action
    match args.cmd {
        MainCommand::Show => {
            printer::print_config(mgr.applied_config());
            printer::print_topology(mgr.view());
            return Ok(());
        }
        MainCommand::Route { from, to } => {
            let graph = mgr.switch_graph();
            match graph.route(&NodeId::new(from.as_str()), &NodeId::new(to.as_str())) {
                Some(route) if route.is_empty() => println!("{} is the destination", from),
                Some(route) => {
                    for link in route.iter() {
                        println!("{}", printer::effective_link(link));
                    }
                }
                None => println!("{} cannot reach {}", from, to),
            }
            return Ok(());
        }
        MainCommand::Registry => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            return Ok(());
        }
        MainCommand::AddLink { source, destination } => {
            if let Some(old) = mgr.config_mut().add_switch_link(source.clone(), destination) {
                info!("Replacing the static link {} -> {}", source, old);
            }
        }
        MainCommand::RemoveLink { source } => {
            if mgr.config_mut().remove_switch_link(&source).is_none() {
                warn!("No static link is configured for {}", source);
            }
        }
        MainCommand::AddEdge { port } => {
            if !mgr.config_mut().add_edge_port(port.clone()) {
                warn!("{} is already an edge port", port);
            }
        }
        MainCommand::RemoveEdge { port } => {
            if !mgr.config_mut().remove_edge_port(&port) {
                warn!("{} is not an edge port", port);
            }
        }
        MainCommand::Clear => mgr.config_mut().clear(),
        MainCommand::Init { variant } => {
            let name = args.example.as_deref().unwrap_or(DEFAULT_EXAMPLE);
            let (_, config) = example_topologies::by_name(name, variant)
                .ok_or_else(|| format!("Unknown example topology {} (variant {})", name, variant))?;
            *mgr.config_mut() = config;
        }
    }

    // all remaining commands change the static configuration
    if !mgr.has_pending_changes() {
        info!("Static topology is unchanged");
    }
    let diff = mgr.apply()?;
    for line in printer::topology_diff(&diff) {
        println!("{}", line);
    }
    Ok(())
}

const DEFAULT_EXAMPLE: &str = "triangle";

/// Read the registry snapshot either from the JSON file, or from the chosen example topology.
fn load_snapshot(args: &CommandLineArguments) -> Result<RegistrySnapshot, Box<dyn Error>> {
    if let Some(path) = args.registry.as_ref() {
        debug!("Reading the registry from {}", path.display());
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    } else {
        let name = args.example.as_deref().unwrap_or(DEFAULT_EXAMPLE);
        example_topologies::by_name(name, 0)
            .map(|(snapshot, _)| snapshot)
            .ok_or_else(|| format!("Unknown example topology {}", name).into())
    }
}

/// This is the binary to inspect and change the static switch topology. The device layer is read
/// from a JSON file (or taken from one of the example topologies), and the static configuration is
/// stored in a JSON file, which is updated by every command that changes it.
#[derive(Parser, Debug)]
#[clap(name = "SwTopo", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// File storing the static topology
    #[clap(short = 'c', long, default_value = "static-topology.json")]
    config: PathBuf,
    /// JSON file describing the switches, their ports and the discovered links
    #[clap(short = 'r', long, conflicts_with = "example")]
    registry: Option<PathBuf>,
    /// Example topology to use as device layer (triangle or ring)
    #[clap(short = 'e', long)]
    example: Option<String>,
    /// Action to perform
    #[clap(subcommand)]
    cmd: MainCommand,
}

#[derive(Subcommand, Debug)]
enum MainCommand {
    /// Print the static configuration and the reconciled topology
    #[clap(name = "show")]
    Show,
    /// Print the shortest path between two switches
    #[clap(name = "route")]
    Route {
        /// Source switch
        from: String,
        /// Destination switch
        to: String,
    },
    /// Print the device layer as JSON
    #[clap(name = "registry")]
    Registry,
    /// Configure a directed static link
    #[clap(name = "add-link")]
    AddLink {
        /// Source port, as `<node>:<port-number>`
        #[clap(parse(from_str))]
        source: PortId,
        /// Destination port
        #[clap(parse(from_str))]
        destination: PortId,
    },
    /// Remove the static link starting at the port
    #[clap(name = "remove-link")]
    RemoveLink {
        /// Source port
        #[clap(parse(from_str))]
        source: PortId,
    },
    /// Force a port to be an edge port
    #[clap(name = "add-edge")]
    AddEdge {
        /// Port
        #[clap(parse(from_str))]
        port: PortId,
    },
    /// Remove the edge port designation
    #[clap(name = "remove-edge")]
    RemoveEdge {
        /// Port
        #[clap(parse(from_str))]
        port: PortId,
    },
    /// Remove all static links and edge ports
    #[clap(name = "clear")]
    Clear,
    /// Replace the static configuration with the one of the example topology
    #[clap(name = "init")]
    Init {
        /// Variant of the static configuration
        #[clap(short = 'v', long, default_value = "1")]
        variant: usize,
    },
}
