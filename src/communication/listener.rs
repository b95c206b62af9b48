use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::communication::heartbeat::{self, DecodeError};
use crate::communication::{HeartbeatTransport, ReceivedDatagram};
use crate::node::state::ProtectedNode;
use crate::reporting::ErrorReporter;

pub struct ListenerParams<T, Er>
where
    T: HeartbeatTransport,
    Er: ErrorReporter,
{
    pub protected_node: ProtectedNode,
    pub transport: T,
    pub error_reporter: Arc<Er>,
    /// Pause after a failed receive, so a broken socket does not spin the loop.
    pub error_backoff: Duration,
}

/// Receives heartbeats until the transport is closed. A bad datagram or a receive failure
/// never stops the loop.
pub fn listen_heartbeats<T, Er>(params: ListenerParams<T, Er>, terminate_worker_rx: Receiver<()>)
where
    T: HeartbeatTransport,
    Er: ErrorReporter,
{
    info!("Listener worker started");
    loop {
        match terminate_worker_rx.try_recv() {
            Ok(()) => break,
            Err(TryRecvError::Disconnected) => {
                error!("Abnormal exit for listener worker");
                break;
            }
            Err(TryRecvError::Empty) => {}
        }

        match params.transport.receive() {
            Ok(ReceivedDatagram::Datagram(payload)) => handle_datagram(&params, &payload),
            Ok(ReceivedDatagram::Closed) => {
                debug!("Heartbeat transport closed");
                break;
            }
            Err(err) => {
                error!("Heartbeat receive failed: {}", err);
                params.error_reporter.report_error("listener", &err.to_string());

                match terminate_worker_rx.recv_timeout(params.error_backoff) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) => break,
                    Err(RecvTimeoutError::Disconnected) => {
                        error!("Abnormal exit for listener worker");
                        break;
                    }
                }
            }
        }
    }
    info!("Listener worker stopped");
}

/// Decodes one datagram and applies it to the node. Undecodable payloads are reported,
/// incomplete heartbeats are dropped silently.
pub fn handle_datagram<T, Er>(params: &ListenerParams<T, Er>, payload: &[u8])
where
    T: HeartbeatTransport,
    Er: ErrorReporter,
{
    let message = match heartbeat::decode(payload) {
        Ok(message) => message,
        Err(DecodeError::Incomplete(detail)) => {
            debug!("Dropping incomplete heartbeat: {}", detail);
            return;
        }
        Err(err) => {
            debug!("Dropping datagram: {}", err);
            params.error_reporter.report_error("listener", &err.to_string());
            return;
        }
    };

    let mut node = params.protected_node.lock();
    let outcome = node.observe_heartbeat(message, Instant::now());
    if let Some(election) = outcome.election {
        debug!("Node {} Election resolved: {}", node.identity.id, election);
    }
}
