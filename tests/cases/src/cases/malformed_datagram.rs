use std::time::Duration;

use gateway_ha_modules::InProcNetwork;

use crate::steps;

pub fn run() {
    let network = InProcNetwork::new();
    let node = steps::cluster::start_node(&network, 1, "gw-1", 100);
    assert!(node.worker.wait_until_active(Duration::from_secs(3)));

    assert!(network.inject(node.address, b"\x00\x7fgarbage"));
    assert!(network.inject(node.address, br#"{"isActive": false, "gatewayID": "gw-9"}"#));
    assert!(network.inject(
        node.address,
        br#"{"isActive": false, "gatewayID": "gw-9", "bootTimeEPOCH": 300, "firmware": "1.2"}"#
    ));

    //the listener keeps serving after bad datagrams
    assert!(
        steps::wait_for(Duration::from_secs(2), || node
            .worker
            .snapshot()
            .peers
            .iter()
            .any(|peer| peer.peer_id == "gw-9")),
        "valid heartbeat processed"
    );

    let reports = node.error_reports();
    assert_eq!(reports.len(), 1, "only the undecodable datagram is reported");
    assert_eq!(reports[0].context, "listener");
    assert!(node.is_active());

    node.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_malformed_datagram() {
        crate::cases::malformed_datagram::run()
    }
}
