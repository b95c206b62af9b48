use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;

use crate::errors::ElectionError;
use crate::leadership::Role;
use crate::peers::PeerSummary;

/// Node state reported upstream whenever the role or the peer table changes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub node_id: String,
    pub role: Role,
    pub boot_epoch: i64,
    pub last_election_at: Option<DateTime<Utc>>,
    pub peers: Vec<PeerSummary>,
    pub udp_port: u16,
    pub subnet_prefix: String,
    pub probe_interval_ms: u64,
    pub failed_probe_count: u32,
}

/// Receives state snapshots for observability. Failures never affect the election.
pub trait StatePublisher: Send + Sync + 'static {
    fn publish(&self, snapshot: StateSnapshot) -> Result<(), ElectionError>;
}

/// Receives non-fatal errors caught by the broadcaster and the listener.
pub trait ErrorReporter: Send + Sync + 'static {
    fn report_error(&self, context: &str, detail: &str);
}

pub struct StatePublisherParams<Sp: StatePublisher> {
    pub state_publisher: Sp,
    pub snapshot_rx: Receiver<StateSnapshot>,
}

/// Delivers queued snapshots to the publisher in the order the state changed.
pub fn publish_state<Sp: StatePublisher>(params: StatePublisherParams<Sp>, terminate_worker_rx: Receiver<()>) {
    info!("State publisher worker started");
    loop {
        select!(
            recv(terminate_worker_rx) -> res => {
                if res.is_err() {
                    error!("Abnormal exit for state publisher worker");
                }
                break
            },
            recv(params.snapshot_rx) -> res => {
                match res {
                    Ok(snapshot) => deliver(&params.state_publisher, snapshot),
                    Err(_) => {
                        trace!("Snapshot channel closed");
                        break
                    }
                }
            },
        );
    }
    info!("State publisher worker stopped");
}

fn deliver<Sp: StatePublisher>(state_publisher: &Sp, snapshot: StateSnapshot) {
    trace!(
        "Publishing state: role {}, {} peer(s)",
        snapshot.role,
        snapshot.peers.len()
    );
    if let Err(err) = state_publisher.publish(snapshot) {
        warn!("State publishing failed: {}", err);
    }
}

/// Sender side of the snapshot queue, owned by the node state.
pub(crate) type SnapshotSender = Sender<StateSnapshot>;
