use std::net::SocketAddr;

use crate::errors::ElectionError;

pub mod broadcaster;
pub mod heartbeat;
pub mod listener;

/// Outcome of a blocking receive on the heartbeat transport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReceivedDatagram {
    Datagram(Vec<u8>),
    /// The transport was closed, no further datagrams will arrive.
    Closed,
}

/// Datagram transport carrying heartbeats. Binding and socket setup belong to the
/// implementation and happen before the node starts.
pub trait HeartbeatTransport: Send + Sync + Clone + 'static {
    fn send_to(&self, destination: SocketAddr, payload: &[u8]) -> Result<(), ElectionError>;

    /// Blocks until a datagram arrives or the transport is closed.
    fn receive(&self) -> Result<ReceivedDatagram, ElectionError>;

    /// Unblocks a pending `receive`. Later receives return `ReceivedDatagram::Closed`.
    fn close(&self);
}
