use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

use crate::communication::heartbeat::HeartbeatMessage;
use crate::leadership::{tie_break, NodeIdentity, Role, TieBreakOutcome};
use crate::node::configuration::ProbeSettings;
use crate::peers::{PeerRecord, PeerTable};
use crate::reporting::{SnapshotSender, StateSnapshot};


/// Election state, peer table and Active-liveness tracking of the local node. Every worker
/// accesses it through the single `ProtectedNode` lock.
#[derive(Debug)]
pub struct Node {
    pub identity: NodeIdentity,
    settings: ProbeSettings,
    role: Role,
    last_election_at: Option<DateTime<Utc>>,
    last_active_heartbeat: Option<Instant>,
    peers: PeerTable,

    snapshot_tx: SnapshotSender,
    heartbeat_trigger_tx: Sender<()>,
}

pub type ProtectedNode = Arc<Mutex<Node>>;

/// What a single inbound heartbeat did to the node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeartbeatOutcome {
    pub election: Option<TieBreakOutcome>,
    pub peers_changed: bool,
}

impl HeartbeatOutcome {
    fn ignored() -> HeartbeatOutcome {
        HeartbeatOutcome {
            election: None,
            peers_changed: false,
        }
    }
}

impl Node {
    pub fn new(
        identity: NodeIdentity,
        settings: ProbeSettings,
        snapshot_tx: SnapshotSender,
        heartbeat_trigger_tx: Sender<()>,
    ) -> Node {
        Node {
            identity,
            settings,
            role: Role::Standby,
            last_election_at: None,
            last_active_heartbeat: None,
            peers: PeerTable::default(),
            snapshot_tx,
            heartbeat_trigger_tx,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn last_election_at(&self) -> Option<DateTime<Utc>> {
        self.last_election_at
    }

    pub fn peers(&self) -> &PeerTable {
        &self.peers
    }

    /// Heartbeat announcing the current role.
    pub fn heartbeat(&self) -> HeartbeatMessage {
        HeartbeatMessage::new(&self.identity, self.role)
    }

    /// Applies an inbound heartbeat: resolves conflicting Active claims, tracks Active
    /// liveness and records the sender in the peer table. Publishes at most one snapshot.
    pub fn observe_heartbeat(&mut self, message: HeartbeatMessage, now: Instant) -> HeartbeatOutcome {
        if message.sender_id == self.identity.id {
            trace!("Node {} Skipping own heartbeat", self.identity.id);
            return HeartbeatOutcome::ignored();
        }

        let sender_role = message.sender_role();
        let role_before = self.role;
        let mut election = None;

        if sender_role.is_active() {
            match self.role {
                Role::Active => {
                    election = tie_break(&self.identity, &message.sender_id, message.sender_boot_epoch);
                    match election {
                        Some(TieBreakOutcome::RemoteWins) => {
                            info!(
                                "Node {} Conflicting Active claim from {} (boot epoch {}): remote node wins",
                                self.identity.id, message.sender_id, message.sender_boot_epoch
                            );
                            self.last_active_heartbeat = Some(now);
                            self.apply_election(Role::Standby);
                        }
                        Some(TieBreakOutcome::LocalWins) => {
                            debug!(
                                "Node {} Conflicting Active claim from {} (boot epoch {}): local node wins",
                                self.identity.id, message.sender_id, message.sender_boot_epoch
                            );
                            // The role stands, only the loser needs to hear about it.
                            self.trigger_heartbeat();
                        }
                        None => {
                            warn!(
                                "Node {} Heartbeat from {} carries an identical identity",
                                self.identity.id, message.sender_id
                            );
                        }
                    }
                }
                Role::Standby => {
                    self.last_active_heartbeat = Some(now);
                }
            }
        }

        let peers_changed = self.peers.upsert(PeerRecord {
            peer_id: message.sender_id,
            role: sender_role,
            boot_epoch: message.sender_boot_epoch,
            last_seen: now,
            last_seen_at: Utc::now(),
        });

        if self.role != role_before || peers_changed {
            self.publish_state(now);
        }

        HeartbeatOutcome {
            election,
            peers_changed,
        }
    }

    /// Failure detector check. A Standby node that has not seen an Active heartbeat within
    /// the failure timeout becomes Active. Active nodes never demote here.
    /// Returns true when the node promoted itself.
    pub fn check_active_liveness(&mut self, now: Instant) -> bool {
        if self.role.is_active() {
            return false;
        }

        let timeout = self.settings.failure_timeout();
        let active_is_alive = match self.last_active_heartbeat {
            Some(last_seen) => now.saturating_duration_since(last_seen) <= timeout,
            None => false,
        };

        if active_is_alive {
            return false;
        }

        info!(
            "Node {} No Active heartbeat within {} ms. Assuming the Active role",
            self.identity.id,
            timeout.as_millis()
        );
        self.apply_election(Role::Active);
        self.publish_state(now);

        true
    }

    pub fn snapshot(&mut self, now: Instant) -> StateSnapshot {
        StateSnapshot {
            node_id: self.identity.id.clone(),
            role: self.role,
            boot_epoch: self.identity.boot_epoch,
            last_election_at: self.last_election_at,
            peers: self.peers.summaries(now),
            udp_port: self.settings.udp_port,
            subnet_prefix: self.settings.subnet.to_string(),
            probe_interval_ms: self.settings.probe_interval_ms(),
            failed_probe_count: self.settings.failed_probe_count,
        }
    }

    /// Queues the current snapshot for the state publisher. Queueing under the node lock
    /// keeps the publish order equal to the state change order.
    pub fn publish_state(&mut self, now: Instant) {
        let snapshot = self.snapshot(now);

        if self.snapshot_tx.send(snapshot).is_err() {
            warn!("Node {} State publisher is gone, snapshot dropped", self.identity.id);
        }
    }

    fn apply_election(&mut self, role: Role) {
        if self.role != role {
            info!("Node {} Role changed: {} -> {}", self.identity.id, self.role, role);
        }

        self.role = role;
        self.last_election_at = Some(Utc::now());

        self.trigger_heartbeat();
    }

    fn trigger_heartbeat(&self) {
        if self.heartbeat_trigger_tx.send(()).is_err() {
            warn!("Node {} Broadcaster is gone, immediate heartbeat skipped", self.identity.id);
        }
    }
}
