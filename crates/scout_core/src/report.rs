//! Immutable scouting reports of completed matches.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::stats::{Counters, DerivedTotals};
use crate::storage::{keys, KeyValueStore};

/// Record of one completed match. Created only by ending a match and never
/// mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoutingReport {
    /// Creation timestamp (unix milliseconds), doubles as the identifier
    pub id: u64,
    /// Human-readable creation date
    pub date: String,
    pub player_name: String,
    pub player_number: String,
    pub own_team: String,
    pub opponent: String,
    /// Total playtime in seconds
    pub playtime: u32,
    pub is_goalkeeper: bool,
    /// Frozen end-of-match counters
    pub stats: Counters,
    /// Frozen derived statistics
    pub totals: DerivedTotals,
}

/// The persisted list of saved reports.
#[derive(Debug, Clone, Default)]
pub struct ReportList {
    reports: Vec<ScoutingReport>,
}

impl ReportList {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self { reports: keys::load_json(store, keys::SAVED_REPORTS) }
    }

    pub fn append(&mut self, store: &mut dyn KeyValueStore, report: ScoutingReport) {
        self.reports.push(report);
        self.persist(store);
    }

    pub fn delete(&mut self, store: &mut dyn KeyValueStore, id: u64) -> Result<()> {
        let before = self.reports.len();
        self.reports.retain(|r| r.id != id);
        if self.reports.len() == before {
            return Err(TrackerError::ReportNotFound(id));
        }
        self.persist(store);
        Ok(())
    }

    /// Reports sorted newest first, the display order.
    pub fn sorted_desc(&self) -> Vec<&ScoutingReport> {
        let mut sorted: Vec<&ScoutingReport> = self.reports.iter().collect();
        sorted.sort_by(|a, b| b.id.cmp(&a.id));
        sorted
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        keys::save_json(store, keys::SAVED_REPORTS, &self.reports);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn report(id: u64) -> ScoutingReport {
        ScoutingReport { id, player_name: "Lena".into(), ..Default::default() }
    }

    #[test]
    fn test_append_persists_and_reloads() {
        let mut store = MemoryStore::new();
        let mut list = ReportList::load(&store);
        list.append(&mut store, report(100));
        list.append(&mut store, report(200));

        let reloaded = ReportList::load(&store);
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_sorted_newest_first() {
        let mut store = MemoryStore::new();
        let mut list = ReportList::default();
        list.append(&mut store, report(100));
        list.append(&mut store, report(300));
        list.append(&mut store, report(200));

        let ids: Vec<u64> = list.sorted_desc().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![300, 200, 100]);
    }

    #[test]
    fn test_delete_by_id() {
        let mut store = MemoryStore::new();
        let mut list = ReportList::default();
        list.append(&mut store, report(100));

        assert!(matches!(
            list.delete(&mut store, 999),
            Err(TrackerError::ReportNotFound(999))
        ));
        list.delete(&mut store, 100).unwrap();
        assert!(list.is_empty());
        assert!(ReportList::load(&store).is_empty());
    }
}
