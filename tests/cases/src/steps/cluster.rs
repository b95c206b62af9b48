use crossbeam_channel::Receiver;
use std::net::SocketAddr;

use gateway_ha::{NodeConfiguration, NodeWorker, StateSnapshot};
use gateway_ha_modules::{ChannelErrorReporter, ChannelStatePublisher, ErrorReport, InProcNetwork};

use crate::steps;

/// A node of a case cluster together with its observation channels.
pub struct CaseNode {
    pub id: String,
    pub address: SocketAddr,
    pub worker: NodeWorker,
    pub snapshot_rx: Receiver<StateSnapshot>,
    pub error_rx: Receiver<ErrorReport>,
}

impl CaseNode {
    pub fn is_active(&self) -> bool {
        self.worker.is_active()
    }

    /// Snapshots published since the last call.
    pub fn published_snapshots(&self) -> Vec<StateSnapshot> {
        self.snapshot_rx.try_iter().collect()
    }

    /// Error reports since the last call.
    pub fn error_reports(&self) -> Vec<ErrorReport> {
        self.error_rx.try_iter().collect()
    }

    pub fn terminate(self) {
        info!("--Terminating node {}", self.id);
        self.worker.terminate();
    }
}

pub fn start_node(network: &InProcNetwork, host: u8, node_id: &str, boot_epoch: i64) -> CaseNode {
    start(network, host, node_id, boot_epoch, false)
}

/// Starts the node cut off from the network.
pub fn start_isolated_node(network: &InProcNetwork, host: u8, node_id: &str, boot_epoch: i64) -> CaseNode {
    start(network, host, node_id, boot_epoch, true)
}

fn start(network: &InProcNetwork, host: u8, node_id: &str, boot_epoch: i64, isolated: bool) -> CaseNode {
    let address = steps::address(host);
    let transport = network.attach(address);
    if isolated {
        network.isolate(address);
    }
    let (state_publisher, snapshot_rx) = ChannelStatePublisher::new();
    let (error_reporter, error_rx) = ChannelErrorReporter::new();

    let node_config = NodeConfiguration {
        node_id: node_id.to_string(),
        boot_epoch: Some(boot_epoch),
        settings: steps::case_settings(),
        transport,
        state_publisher,
        error_reporter,
    };

    let worker = gateway_ha::start_node(node_config).expect("node starts");
    info!("--Node {} started on {}", node_id, address);

    CaseNode {
        id: node_id.to_string(),
        address,
        worker,
        snapshot_rx,
        error_rx,
    }
}
