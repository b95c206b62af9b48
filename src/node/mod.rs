use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::common::{run_worker, Worker, WorkerPool};
use crate::communication::broadcaster::{broadcast_heartbeats, BroadcasterParams};
use crate::communication::listener::{listen_heartbeats, ListenerParams};
use crate::communication::HeartbeatTransport;
use crate::errors::Result;
use crate::leadership::failure_detector::{watch_active_status, FailureDetectorParams};
use crate::leadership::{NodeIdentity, Role};
use crate::node::configuration::NodeConfiguration;
use crate::node::state::{Node, ProtectedNode};
use crate::reporting::{publish_state, ErrorReporter, StatePublisher, StatePublisherParams, StateSnapshot};

pub mod configuration;
pub mod state;

/// Running gateway node. Dropping the handle also stops the node, but without waiting for its workers.
#[derive(Debug)]
pub struct NodeWorker {
    worker: Worker,
    protected_node: ProtectedNode,
    probe_interval: Duration,
}

impl NodeWorker {
    pub fn node_id(&self) -> String {
        self.protected_node.lock().identity.id.clone()
    }

    pub fn boot_epoch(&self) -> i64 {
        self.protected_node.lock().identity.boot_epoch
    }

    pub fn role(&self) -> Role {
        self.protected_node.lock().role()
    }

    pub fn is_active(&self) -> bool {
        self.role().is_active()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.protected_node.lock().snapshot(Instant::now())
    }

    /// Blocks until the node becomes Active, checking once per probe interval.
    /// Returns false if the timeout elapsed first.
    pub fn wait_until_active(&self, timeout: Duration) -> bool {
        let deadline = crossbeam_channel::after(timeout);
        let ticker = crossbeam_channel::tick(self.probe_interval);
        loop {
            if self.is_active() {
                return true;
            }
            select!(
                recv(deadline) -> _ => return self.is_active(),
                recv(ticker) -> _ => {},
            );
        }
    }

    /// Stops all workers and waits for them. Closing the transport unblocks the listener.
    pub fn terminate(self) {
        self.worker.signal_termination();
        self.join();
    }

    /// Waits for the node to stop.
    pub fn join(self) {
        self.worker.wait();
    }
}

struct NodeStartingParams<T, Sp, Er>
where
    T: HeartbeatTransport,
    Sp: StatePublisher,
    Er: ErrorReporter,
{
    protected_node: ProtectedNode,
    node_config: NodeConfiguration<T, Sp, Er>,
    snapshot_rx: Receiver<StateSnapshot>,
    heartbeat_trigger_rx: Receiver<()>,
}

pub(crate) fn start_node<T, Sp, Er>(node_config: NodeConfiguration<T, Sp, Er>) -> Result<NodeWorker>
where
    T: HeartbeatTransport,
    Sp: StatePublisher,
    Er: ErrorReporter,
{
    node_config.settings.validate()?;

    let identity = capture_identity(&node_config);
    info!(
        "Initializing node {}: boot epoch {}, UDP port {}, subnet {}, probe {} ms, failed probe count {}",
        identity.id,
        identity.boot_epoch,
        node_config.settings.udp_port,
        node_config.settings.subnet,
        node_config.settings.probe_interval_ms(),
        node_config.settings.failed_probe_count
    );

    let (snapshot_tx, snapshot_rx): (Sender<StateSnapshot>, Receiver<StateSnapshot>) =
        crossbeam_channel::unbounded();
    let (heartbeat_trigger_tx, heartbeat_trigger_rx): (Sender<()>, Receiver<()>) =
        crossbeam_channel::unbounded();

    let mut node = Node::new(identity, node_config.settings, snapshot_tx, heartbeat_trigger_tx);
    node.publish_state(Instant::now());

    let protected_node = Arc::new(Mutex::new(node));
    let probe_interval = node_config.settings.probe_interval;

    let worker = run_worker(
        "gateway-node",
        start,
        NodeStartingParams {
            protected_node: protected_node.clone(),
            node_config,
            snapshot_rx,
            heartbeat_trigger_rx,
        },
    );

    Ok(NodeWorker {
        worker,
        protected_node,
        probe_interval,
    })
}

// A random pause before capturing the boot epoch, so that nodes powered on together
// rarely share a boot second.
fn capture_identity<T, Sp, Er>(node_config: &NodeConfiguration<T, Sp, Er>) -> NodeIdentity
where
    T: HeartbeatTransport,
    Sp: StatePublisher,
    Er: ErrorReporter,
{
    if let Some(boot_epoch) = node_config.boot_epoch {
        return NodeIdentity::new(node_config.node_id.clone(), boot_epoch);
    }

    let max_jitter_ms = node_config.settings.probe_interval_ms() / 3;
    if max_jitter_ms > 0 {
        let jitter_ms = rand::thread_rng().gen_range(0..max_jitter_ms);
        trace!("Startup jitter {} ms", jitter_ms);
        thread::sleep(Duration::from_millis(jitter_ms));
    }

    NodeIdentity::capture(node_config.node_id.clone())
}

fn start<T, Sp, Er>(params: NodeStartingParams<T, Sp, Er>, terminate_worker_rx: Receiver<()>)
where
    T: HeartbeatTransport,
    Sp: StatePublisher,
    Er: ErrorReporter,
{
    let node_id = params.protected_node.lock().identity.id.clone();
    let settings = params.node_config.settings;
    let transport = params.node_config.transport.clone();
    let error_reporter = Arc::new(params.node_config.error_reporter);

    let state_publisher_worker = run_worker(
        "state-publisher",
        publish_state,
        StatePublisherParams {
            state_publisher: params.node_config.state_publisher,
            snapshot_rx: params.snapshot_rx,
        },
    );

    let listener_worker = run_worker(
        "heartbeat-listener",
        listen_heartbeats,
        ListenerParams {
            protected_node: params.protected_node.clone(),
            transport: transport.clone(),
            error_reporter: error_reporter.clone(),
            error_backoff: settings.probe_interval,
        },
    );

    let broadcaster_worker = run_worker(
        "heartbeat-broadcaster",
        broadcast_heartbeats,
        BroadcasterParams {
            protected_node: params.protected_node.clone(),
            transport: transport.clone(),
            error_reporter,
            destinations: settings.subnet.host_addresses(settings.udp_port),
            probe_interval: settings.probe_interval,
            heartbeat_trigger_rx: params.heartbeat_trigger_rx,
        },
    );

    let failure_detector_worker = run_worker(
        "failure-detector",
        watch_active_status,
        FailureDetectorParams {
            protected_node: params.protected_node.clone(),
            failure_timeout: settings.failure_timeout(),
        },
    );

    let workers = vec![
        failure_detector_worker,
        broadcaster_worker,
        listener_worker,
        state_publisher_worker,
    ];

    let worker_pool = WorkerPool::new(workers);

    info!("Node {} started", node_id);

    let terminate_result = terminate_worker_rx.recv();
    if let Err(e) = terminate_result {
        error!("Abnormal exit for node: {}", e);
    }

    info!("Node {} termination requested", node_id);

    transport.close();
    worker_pool.shutdown();

    info!("Node {} shutting down", node_id);
}
