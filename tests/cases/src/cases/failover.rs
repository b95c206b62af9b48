use std::time::Duration;

use gateway_ha_modules::InProcNetwork;

use crate::steps;

pub fn run() {
    let network = InProcNetwork::new();

    let node_1 = steps::cluster::start_node(&network, 1, "gw-1", 100);
    assert!(node_1.worker.wait_until_active(Duration::from_secs(3)));

    //a younger node joins and follows the Active node
    let node_2 = steps::cluster::start_node(&network, 2, "gw-2", 200);
    steps::sleep_ms(1500);
    assert!(node_1.is_active());
    assert!(!node_2.is_active());

    //Active node drops off the network
    network.isolate(node_1.address);
    assert!(node_2.worker.wait_until_active(Duration::from_secs(3)), "Standby node takes over");

    //silence never demotes an Active node
    assert!(node_1.is_active());

    //the older process wins once both claims meet again
    network.reconnect(node_1.address);
    assert!(
        steps::wait_for(Duration::from_secs(3), || node_1.is_active() && !node_2.is_active()),
        "older process keeps the Active role"
    );

    node_1.terminate();
    node_2.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_failover() {
        crate::cases::failover::run()
    }
}
