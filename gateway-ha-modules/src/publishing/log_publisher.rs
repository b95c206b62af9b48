use gateway_ha::{new_err, ElectionError, ErrorReporter, StatePublisher, StateSnapshot};

/// Publishes state snapshots as JSON documents to the log.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub struct LogStatePublisher;

impl StatePublisher for LogStatePublisher {
    fn publish(&self, snapshot: StateSnapshot) -> Result<(), ElectionError> {
        match serde_json::to_string(&snapshot) {
            Ok(document) => {
                info!("Reported state: {}", document);
                Ok(())
            }
            Err(err) => new_err("Cannot serialize state snapshot".to_string(), err.to_string()),
        }
    }
}

/// Logs reported errors. No delivery anywhere else.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn report_error(&self, context: &str, detail: &str) {
        error!("Reported error [{}]: {}", context, detail);
    }
}
