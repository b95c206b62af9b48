use std::time::Duration;

use gateway_ha::Role;
use gateway_ha_modules::InProcNetwork;

use crate::steps;
use crate::steps::cluster::CaseNode;

fn active_count(nodes: &[CaseNode]) -> usize {
    nodes.iter().filter(|node| node.is_active()).count()
}

pub fn run() {
    let network = InProcNetwork::new();

    let nodes = vec![
        steps::cluster::start_node(&network, 1, "gw-1", 300),
        steps::cluster::start_node(&network, 2, "gw-2", 100),
        steps::cluster::start_node(&network, 3, "gw-3", 200),
    ];

    //single Active node elected
    assert!(
        steps::wait_for(Duration::from_secs(5), || active_count(&nodes) == 1),
        "exactly one node becomes Active"
    );

    steps::sleep_ms(1500);
    assert_eq!(active_count(&nodes), 1, "election is stable");

    let active = nodes.iter().find(|node| node.is_active()).expect("an Active node");
    info!("--Active node: {}", active.id);

    //every Standby node sees the Active node and the other Standby
    for node in nodes.iter().filter(|node| !node.is_active()) {
        let snapshot = node.worker.snapshot();
        assert_eq!(snapshot.role, Role::Standby);
        assert_eq!(snapshot.peers.len(), 2);

        let active_peer = snapshot
            .peers
            .iter()
            .find(|peer| peer.peer_id == active.id)
            .expect("Active node is a known peer");
        assert_eq!(active_peer.role, Role::Active);
    }

    for node in nodes {
        node.terminate();
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_smoke() {
        crate::cases::smoke::run()
    }
}
