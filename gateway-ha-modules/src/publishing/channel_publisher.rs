use crossbeam_channel::{Receiver, Sender};

use gateway_ha::{new_err, ElectionError, ErrorReporter, StatePublisher, StateSnapshot};

/// Forwards state snapshots to a channel. The receiving end is handed to the observer.
#[derive(Clone, Debug)]
pub struct ChannelStatePublisher {
    snapshot_tx: Sender<StateSnapshot>,
}

impl ChannelStatePublisher {
    pub fn new() -> (ChannelStatePublisher, Receiver<StateSnapshot>) {
        let (snapshot_tx, snapshot_rx): (Sender<StateSnapshot>, Receiver<StateSnapshot>) =
            crossbeam_channel::unbounded();

        (ChannelStatePublisher { snapshot_tx }, snapshot_rx)
    }
}

impl StatePublisher for ChannelStatePublisher {
    fn publish(&self, snapshot: StateSnapshot) -> Result<(), ElectionError> {
        if let Err(err) = self.snapshot_tx.send(snapshot) {
            return new_err("State observer is gone".to_string(), err.to_string());
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorReport {
    pub context: String,
    pub detail: String,
}

/// Forwards reported errors to a channel.
#[derive(Clone, Debug)]
pub struct ChannelErrorReporter {
    error_tx: Sender<ErrorReport>,
}

impl ChannelErrorReporter {
    pub fn new() -> (ChannelErrorReporter, Receiver<ErrorReport>) {
        let (error_tx, error_rx): (Sender<ErrorReport>, Receiver<ErrorReport>) = crossbeam_channel::unbounded();

        (ChannelErrorReporter { error_tx }, error_rx)
    }
}

impl ErrorReporter for ChannelErrorReporter {
    fn report_error(&self, context: &str, detail: &str) {
        let report = ErrorReport {
            context: context.to_string(),
            detail: detail.to_string(),
        };

        if self.error_tx.send(report).is_err() {
            trace!("Error observer is gone, report for '{}' dropped", context);
        }
    }
}
