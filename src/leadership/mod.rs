use derive_more::Display;
use serde::Serialize;
use std::cmp::Ordering;

pub mod failure_detector;

/// Role of a gateway node in the cluster.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize)]
pub enum Role {
    #[display(fmt = "Standby")]
    Standby,
    #[display(fmt = "Active")]
    Active,
}

impl Role {
    pub fn is_active(self) -> bool {
        self == Role::Active
    }

    pub fn from_active_flag(is_active: bool) -> Role {
        if is_active {
            Role::Active
        } else {
            Role::Standby
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Standby
    }
}

/// Immutable identity of the running process.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeIdentity {
    pub id: String,
    /// Seconds since the Unix epoch at process start.
    pub boot_epoch: i64,
}

impl NodeIdentity {
    pub fn new(id: String, boot_epoch: i64) -> NodeIdentity {
        NodeIdentity { id, boot_epoch }
    }

    /// Captures the identity with the current wall-clock second as the boot epoch.
    pub fn capture(id: String) -> NodeIdentity {
        NodeIdentity {
            id,
            boot_epoch: chrono::Utc::now().timestamp(),
        }
    }

    fn seniority(&self) -> Seniority {
        Seniority {
            boot_epoch: self.boot_epoch,
            id: &self.id,
        }
    }
}

/// Result of resolving two simultaneous Active claims, from the local node's point of view.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum TieBreakOutcome {
    #[display(fmt = "local node wins")]
    LocalWins,
    #[display(fmt = "remote node wins")]
    RemoteWins,
}

// Older process first, then the lexicographically smaller id.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd)]
struct Seniority<'a> {
    boot_epoch: i64,
    id: &'a str,
}

/// Resolves a conflict between the local Active node and a remote node claiming Active.
///
/// The remote node wins when its boot epoch is smaller, or when the boot epochs are equal
/// and its id is lexicographically smaller. Evaluating the same pair from the other side
/// always yields the opposite outcome, so exactly one of the two nodes stays Active.
/// Returns `None` when both claims carry the same id and boot epoch (no conflict to resolve).
pub fn tie_break(local: &NodeIdentity, remote_id: &str, remote_boot_epoch: i64) -> Option<TieBreakOutcome> {
    let remote = Seniority {
        boot_epoch: remote_boot_epoch,
        id: remote_id,
    };

    match remote.cmp(&local.seniority()) {
        Ordering::Less => Some(TieBreakOutcome::RemoteWins),
        Ordering::Greater => Some(TieBreakOutcome::LocalWins),
        Ordering::Equal => None,
    }
}
