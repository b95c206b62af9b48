use crossbeam_channel::Receiver;
use std::time::{Duration, Instant};

use crate::node::state::ProtectedNode;

pub struct FailureDetectorParams {
    pub protected_node: ProtectedNode,
    /// Detector period and Active silence threshold (probe interval x failed probe count).
    pub failure_timeout: Duration,
}

/// Periodically checks Active liveness and promotes the local Standby node after a
/// sustained silence.
pub fn watch_active_status(params: FailureDetectorParams, terminate_worker_rx: Receiver<()>) {
    info!("Failure detector worker started");
    let ticker = crossbeam_channel::tick(params.failure_timeout);
    loop {
        select!(
            recv(terminate_worker_rx) -> res => {
                if res.is_err() {
                    error!("Abnormal exit for failure detector worker");
                }
                break
            },
            recv(ticker) -> _ => {
                let mut node = params.protected_node.lock();
                if node.check_active_liveness(Instant::now()) {
                    trace!("Node {} promoted by the failure detector", node.identity.id);
                }
            },
        );
    }
    info!("Failure detector worker stopped");
}
