use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gateway_ha::{ElectionError, HeartbeatTransport, ReceivedDatagram};

/// In-process datagram network. Each attached transport owns one address; datagrams sent
/// to an address nobody is attached to are lost, as with UDP.
#[derive(Clone, Debug, Default)]
pub struct InProcNetwork {
    hosts: Arc<RwLock<HashMap<SocketAddr, Sender<Vec<u8>>>>>,
    isolated: Arc<RwLock<HashSet<SocketAddr>>>,
}

impl InProcNetwork {
    pub fn new() -> InProcNetwork {
        InProcNetwork::default()
    }

    /// Creates a transport bound to the address, replacing any previous one.
    pub fn attach(&self, address: SocketAddr) -> InProcTransport {
        let (inbox_tx, inbox_rx): (Sender<Vec<u8>>, Receiver<Vec<u8>>) = crossbeam_channel::unbounded();
        let (close_tx, close_rx): (Sender<()>, Receiver<()>) = crossbeam_channel::unbounded();

        if self.hosts.write().insert(address, inbox_tx).is_some() {
            warn!("In-proc network: address {} attached twice", address);
        }
        self.isolated.write().remove(&address);

        InProcTransport {
            address,
            network: self.clone(),
            inbox_rx,
            close_tx,
            close_rx,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cuts the host off the network in both directions until it is reconnected.
    pub fn isolate(&self, address: SocketAddr) {
        debug!("In-proc network: isolating {}", address);
        self.isolated.write().insert(address);
    }

    pub fn reconnect(&self, address: SocketAddr) {
        debug!("In-proc network: reconnecting {}", address);
        self.isolated.write().remove(&address);
    }

    pub fn is_attached(&self, address: SocketAddr) -> bool {
        self.hosts.read().contains_key(&address) && !self.isolated.read().contains(&address)
    }

    /// Delivers a raw datagram to the address. Returns false if nobody listens there.
    pub fn inject(&self, destination: SocketAddr, payload: &[u8]) -> bool {
        if self.isolated.read().contains(&destination) {
            return false;
        }
        match self.hosts.read().get(&destination) {
            Some(inbox_tx) => inbox_tx.send(payload.to_vec()).is_ok(),
            None => false,
        }
    }
}

/// Transport endpoint of an `InProcNetwork`.
#[derive(Clone, Debug)]
pub struct InProcTransport {
    address: SocketAddr,
    network: InProcNetwork,
    inbox_rx: Receiver<Vec<u8>>,
    close_tx: Sender<()>,
    close_rx: Receiver<()>,
    closed: Arc<AtomicBool>,
}

impl InProcTransport {
    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

impl HeartbeatTransport for InProcTransport {
    fn send_to(&self, destination: SocketAddr, payload: &[u8]) -> Result<(), ElectionError> {
        if self.closed.load(Ordering::SeqCst) {
            trace!("In-proc transport {} is closed, datagram dropped", self.address);
            return Ok(());
        }
        if !self.network.is_attached(self.address) {
            trace!("In-proc network: {} is isolated, datagram dropped", self.address);
            return Ok(());
        }

        self.network.inject(destination, payload);
        Ok(())
    }

    fn receive(&self) -> Result<ReceivedDatagram, ElectionError> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(ReceivedDatagram::Closed);
        }

        select!(
            recv(self.inbox_rx) -> res => match res {
                Ok(payload) => Ok(ReceivedDatagram::Datagram(payload)),
                Err(_) => Ok(ReceivedDatagram::Closed),
            },
            recv(self.close_rx) -> _ => Ok(ReceivedDatagram::Closed),
        )
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.network.hosts.write().remove(&self.address);
        if self.close_tx.send(()).is_err() {
            warn!("In-proc transport {}: close signal lost", self.address);
        }
    }
}
