use std::time::Duration;

use gateway_ha::Role;
use gateway_ha_modules::InProcNetwork;

use crate::steps;

pub fn run() {
    let network = InProcNetwork::new();

    //equal boot epochs, both nodes promote while cut off from each other
    let node_a = steps::cluster::start_isolated_node(&network, 1, "a", 100);
    let node_b = steps::cluster::start_isolated_node(&network, 2, "b", 100);

    assert!(node_a.worker.wait_until_active(Duration::from_secs(3)));
    assert!(node_b.worker.wait_until_active(Duration::from_secs(3)));

    network.reconnect(node_a.address);
    network.reconnect(node_b.address);

    //tie-break by id: "a" stays Active
    assert!(
        steps::wait_for(Duration::from_secs(3), || node_a.is_active() && !node_b.is_active()),
        "conflict resolved in favour of the smaller id"
    );

    steps::sleep_ms(1500);
    assert!(node_a.is_active());
    assert!(!node_b.is_active());

    let snapshot = node_b.worker.snapshot();
    assert_eq!(snapshot.role, Role::Standby);
    assert!(snapshot.last_election_at.is_some());
    let peer = snapshot.peers.iter().find(|peer| peer.peer_id == "a").expect("a is a known peer");
    assert_eq!(peer.role, Role::Active);

    node_a.terminate();
    node_b.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_conflicting_active() {
        crate::cases::conflicting_active::run()
    }
}
