use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::leadership::Role;

/// Peer records older than this are dropped.
pub const PEER_RETENTION_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Last observation of a peer.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerRecord {
    pub peer_id: String,
    pub role: Role,
    pub boot_epoch: i64,
    pub last_seen: Instant,
    pub last_seen_at: DateTime<Utc>,
}

/// Reporting view of a peer record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerSummary {
    pub peer_id: String,
    pub role: Role,
    pub boot_epoch: i64,
    pub last_seen_at: DateTime<Utc>,
}

impl From<&PeerRecord> for PeerSummary {
    fn from(record: &PeerRecord) -> Self {
        PeerSummary {
            peer_id: record.peer_id.clone(),
            role: record.role,
            boot_epoch: record.boot_epoch,
            last_seen_at: record.last_seen_at,
        }
    }
}

/// Self-expiring table of recently observed peers keyed by peer id. Expiry is evaluated
/// lazily on every upsert and read.
#[derive(Clone, Debug)]
pub struct PeerTable {
    records: HashMap<String, PeerRecord>,
    retention_window: Duration,
}

impl Default for PeerTable {
    fn default() -> Self {
        PeerTable::new(PEER_RETENTION_WINDOW)
    }
}

impl PeerTable {
    pub fn new(retention_window: Duration) -> PeerTable {
        PeerTable {
            records: HashMap::new(),
            retention_window,
        }
    }

    /// Stores the fresh observation of the peer, replacing any previous record.
    ///
    /// Returns true when the table changed meaningfully: a new peer, a changed role or boot
    /// epoch, or expired records dropped. Refreshing the last-seen time of an otherwise
    /// identical record is not a meaningful change.
    pub fn upsert(&mut self, record: PeerRecord) -> bool {
        let expired = self.purge_expired(record.last_seen);

        let changed = match self.records.get(&record.peer_id) {
            Some(existing) => existing.role != record.role || existing.boot_epoch != record.boot_epoch,
            None => true,
        };

        trace!(
            "Peer {} observed as {} (boot epoch {})",
            record.peer_id,
            record.role,
            record.boot_epoch
        );
        self.records.insert(record.peer_id.clone(), record);

        changed || expired > 0
    }

    /// Drops records not seen within the retention window. Returns the number of dropped records.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let retention_window = self.retention_window;
        let before = self.records.len();

        self.records.retain(|peer_id, record| {
            let keep = now.saturating_duration_since(record.last_seen) <= retention_window;
            if !keep {
                debug!("Peer {} expired", peer_id);
            }
            keep
        });

        before - self.records.len()
    }

    pub fn get(&self, peer_id: &str) -> Option<&PeerRecord> {
        self.records.get(peer_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the live peers ordered by peer id.
    pub fn summaries(&mut self, now: Instant) -> Vec<PeerSummary> {
        self.purge_expired(now);

        let mut summaries: Vec<PeerSummary> = self.records.values().map(PeerSummary::from).collect();
        summaries.sort_by(|left, right| left.peer_id.cmp(&right.peer_id));

        summaries
    }
}
