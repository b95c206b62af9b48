use crossbeam_channel::{Receiver, Sender};
use std::thread;
use std::thread::JoinHandle;

/// Handle of a named worker thread and its termination channel.
#[derive(Debug)]
pub struct Worker {
    name: String,
    join_handle: JoinHandle<()>,
    terminate_worker_tx: Sender<()>,
}

impl Worker {
    pub fn signal_termination(&self) {
        if self.terminate_worker_tx.send(()).is_err() {
            warn!("Worker {} already stopped", self.name);
        }
    }

    pub fn wait(self) {
        if self.join_handle.join().is_err() {
            error!("Worker {} panicked", self.name);
        }
    }
}

/// Spawns the worker function on its own named thread. The worker receives its parameters
/// and the termination receiver it must watch.
pub fn run_worker<T, F>(name: &str, worker: F, params: T) -> Worker
where
    T: Send + 'static,
    F: Fn(T, Receiver<()>) + Send + 'static,
{
    let (terminate_worker_tx, terminate_worker_rx): (Sender<()>, Receiver<()>) =
        crossbeam_channel::unbounded();

    let join_handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || worker(params, terminate_worker_rx))
        .unwrap_or_else(|err| panic!("cannot spawn worker thread {}: {}", name, err));

    Worker {
        name: name.to_string(),
        join_handle,
        terminate_worker_tx,
    }
}

/// Workers of one node, stopped together.
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    pub fn new(workers: Vec<Worker>) -> WorkerPool {
        WorkerPool { workers }
    }

    /// Signals every worker first, then waits for them in start order.
    pub fn shutdown(self) {
        for worker in &self.workers {
            worker.signal_termination();
        }

        for worker in self.workers {
            let name = worker.name.clone();
            worker.wait();
            trace!("Worker {} joined", name);
        }
    }
}
