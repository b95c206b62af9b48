use crossbeam_channel::Receiver;
use rayon::prelude::*;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::communication::heartbeat;
use crate::communication::HeartbeatTransport;
use crate::errors::{new_multiple_err, ElectionError};
use crate::node::state::ProtectedNode;
use crate::reporting::ErrorReporter;

const REPORTED_SEND_ERRORS_LIMIT: usize = 3;

pub struct BroadcasterParams<T, Er>
where
    T: HeartbeatTransport,
    Er: ErrorReporter,
{
    pub protected_node: ProtectedNode,
    pub transport: T,
    pub error_reporter: Arc<Er>,
    pub destinations: Vec<SocketAddr>,
    pub probe_interval: Duration,
    /// Requests an out-of-schedule heartbeat after an election.
    pub heartbeat_trigger_rx: Receiver<()>,
}

/// Sends the node heartbeat to every destination each probe interval and on demand.
pub fn broadcast_heartbeats<T, Er>(params: BroadcasterParams<T, Er>, terminate_worker_rx: Receiver<()>)
where
    T: HeartbeatTransport,
    Er: ErrorReporter,
{
    info!(
        "Broadcaster worker started: {} destination(s) every {} ms",
        params.destinations.len(),
        params.probe_interval.as_millis()
    );
    let ticker = crossbeam_channel::tick(params.probe_interval);
    loop {
        select!(
            recv(terminate_worker_rx) -> res => {
                if res.is_err() {
                    error!("Abnormal exit for broadcaster worker");
                }
                break
            },
            recv(ticker) -> _ => {
                send_heartbeat(&params)
            },
            recv(params.heartbeat_trigger_rx) -> res => {
                if res.is_ok() {
                    trace!("Sending out-of-schedule heartbeat...");
                    send_heartbeat(&params)
                }
            },
        );
    }
    info!("Broadcaster worker stopped");
}

/// Sends one heartbeat round. The node lock is held only while reading the role.
pub fn send_heartbeat<T, Er>(params: &BroadcasterParams<T, Er>)
where
    T: HeartbeatTransport,
    Er: ErrorReporter,
{
    let message = { params.protected_node.lock().heartbeat() };

    trace!(
        "Node {} Send heartbeat (active = {})",
        message.sender_id,
        message.sender_is_active
    );

    let result = heartbeat::encode(&message)
        .and_then(|payload| fan_out(&params.transport, &params.destinations, &payload));

    if let Err(err) = result {
        error!("Node {} Send heartbeat failed: {}", message.sender_id, err);
        params.error_reporter.report_error("broadcast", &err.to_string());
    }
}

fn fan_out<T: HeartbeatTransport>(
    transport: &T,
    destinations: &[SocketAddr],
    payload: &[u8],
) -> Result<(), ElectionError> {
    let errors: Vec<ElectionError> = destinations
        .par_iter()
        .filter_map(|destination| transport.send_to(*destination, payload).err())
        .collect();

    if errors.is_empty() {
        return Ok(());
    }

    new_multiple_err(
        format!("Heartbeat not delivered to {} of {} host(s)", errors.len(), destinations.len()),
        errors,
        REPORTED_SEND_ERRORS_LIMIT,
    )
}
