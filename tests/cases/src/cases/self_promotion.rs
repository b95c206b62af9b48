use std::time::{Duration, Instant};

use gateway_ha::{decode, HeartbeatTransport, ReceivedDatagram, Role};
use gateway_ha_modules::InProcNetwork;

use crate::steps;

pub fn run() {
    let network = InProcNetwork::new();
    let observer = network.attach(steps::address(200));

    let started = Instant::now();
    let node = steps::cluster::start_node(&network, 1, "gw-1", 100);

    //no Active heartbeat for probe interval x failed probe count
    assert!(node.worker.wait_until_active(Duration::from_secs(3)), "node promotes itself");
    let elapsed = started.elapsed();
    let failure_timeout = steps::case_settings().failure_timeout();
    assert!(
        elapsed + Duration::from_millis(50) >= failure_timeout,
        "promotion waits for the failure timeout, waited {:?}",
        elapsed
    );

    //peers are told about the new role
    let mut heard_active = false;
    for _ in 0..50 {
        if let Ok(ReceivedDatagram::Datagram(payload)) = observer.receive() {
            if let Ok(message) = decode(&payload) {
                if message.sender_id == "gw-1" && message.sender_is_active {
                    heard_active = true;
                    break;
                }
            }
        }
    }
    assert!(heard_active, "Active heartbeat broadcast");

    //no further elections while Active
    steps::sleep_ms(1500);
    assert!(node.is_active());

    let snapshots = node.published_snapshots();
    let promotions = snapshots
        .windows(2)
        .filter(|pair| pair[0].role == Role::Standby && pair[1].role == Role::Active)
        .count();
    assert_eq!(snapshots.first().map(|s| s.role), Some(Role::Standby));
    assert_eq!(promotions, 1);

    let elections: Vec<_> = snapshots
        .iter()
        .filter(|s| s.role == Role::Active)
        .map(|s| s.last_election_at)
        .collect();
    assert!(elections.iter().all(|at| at.is_some() && *at == elections[0]));

    node.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_self_promotion() {
        crate::cases::self_promotion::run()
    }
}
