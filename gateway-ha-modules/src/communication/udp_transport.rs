use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gateway_ha::{new_err, ElectionError, HeartbeatTransport, ReceivedDatagram};

const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Heartbeat transport over a bound UDP socket.
#[derive(Clone, Debug)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
}

impl UdpTransport {
    /// Binds the heartbeat port on all IPv4 interfaces.
    pub fn bind(port: u16) -> Result<UdpTransport, ElectionError> {
        UdpTransport::bind_address(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
    }

    pub fn bind_address(address: SocketAddr) -> Result<UdpTransport, ElectionError> {
        let socket = match UdpSocket::bind(address) {
            Ok(socket) => socket,
            Err(err) => return new_err(format!("Cannot bind UDP socket on {}", address), err.to_string()),
        };
        let local_addr = socket.local_addr()?;

        info!("UDP heartbeat transport: listening on {}", local_addr);

        Ok(UdpTransport {
            socket: Arc::new(socket),
            local_addr,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    // The address a datagram must be sent to in order to wake a blocked receive.
    fn wake_address(&self) -> SocketAddr {
        if self.local_addr.ip().is_unspecified() {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), self.local_addr.port())
        } else {
            self.local_addr
        }
    }
}

impl HeartbeatTransport for UdpTransport {
    fn send_to(&self, destination: SocketAddr, payload: &[u8]) -> Result<(), ElectionError> {
        match self.socket.send_to(payload, destination) {
            Ok(_) => Ok(()),
            Err(err) => new_err(format!("Cannot send datagram to {}", destination), err.to_string()),
        }
    }

    fn receive(&self) -> Result<ReceivedDatagram, ElectionError> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(ReceivedDatagram::Closed);
        }

        let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];
        let result = self.socket.recv_from(&mut buffer);

        if self.closed.load(Ordering::SeqCst) {
            return Ok(ReceivedDatagram::Closed);
        }

        match result {
            Ok((size, source)) => {
                trace!("Received {} byte(s) from {}", size, source);
                buffer.truncate(size);
                Ok(ReceivedDatagram::Datagram(buffer))
            }
            Err(err) => new_err("Cannot receive datagram".to_string(), err.to_string()),
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        // std sockets cannot be closed under a blocked recv, an empty datagram wakes it instead.
        if let Err(err) = self.socket.send_to(&[], self.wake_address()) {
            warn!("Cannot wake the UDP listener on {}: {}", self.local_addr, err);
        }
        debug!("UDP heartbeat transport on {} closed", self.local_addr);
    }
}
