//! # Gateway HA
//!
//! Active/Standby election for a set of identical edge gateways sharing a LAN. Every node
//! broadcasts a heartbeat each probe interval to all hosts of the monitored subnet. A Standby
//! node that hears no Active heartbeat for `failed_probe_count` probe intervals assumes the
//! Active role. When two nodes claim Active at the same time the older process wins, and on
//! equal boot seconds the lexicographically smaller id wins.
//!
//! This is a best-effort, bully-style election for small clusters: there is no quorum and no
//! persistent log, so a network partition can produce two Active nodes until it heals.
//!
//! Network transport, state publishing and error reporting are supplied by the caller through
//! the [HeartbeatTransport](trait.HeartbeatTransport.html),
//! [StatePublisher](trait.StatePublisher.html) and [ErrorReporter](trait.ErrorReporter.html) traits.

#![warn(missing_debug_implementations, unsafe_code)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate crossbeam_channel;

mod common;
mod communication;
mod errors;
mod leadership;
mod node;
mod peers;
mod reporting;

pub use communication::heartbeat::{decode, encode, DecodeError, HeartbeatMessage};
pub use communication::{HeartbeatTransport, ReceivedDatagram};
pub use errors::{new_err, ElectionError};
pub use leadership::{tie_break, NodeIdentity, Role, TieBreakOutcome};
pub use node::configuration::{
    NodeConfiguration, ProbeSettings, SubnetPrefix, DEFAULT_FAILED_PROBE_COUNT,
    DEFAULT_PROBE_INTERVAL_MS, DEFAULT_SUBNET_PREFIX, DEFAULT_UDP_PORT,
};
pub use node::NodeWorker;
pub use peers::{PeerSummary, PEER_RETENTION_WINDOW};
pub use reporting::{ErrorReporter, StatePublisher, StateSnapshot};

/// Starts the election workers of a node: broadcaster, listener, failure detector and state
/// publisher. The node starts as Standby.
pub fn start_node<T, Sp, Er>(node_config: NodeConfiguration<T, Sp, Er>) -> Result<NodeWorker, ElectionError>
where
    T: HeartbeatTransport,
    Sp: StatePublisher,
    Er: ErrorReporter,
{
    node::start_node(node_config)
}
