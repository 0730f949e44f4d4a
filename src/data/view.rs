//! The view model: the derived, render-ready snapshot of the dashboard.
//!
//! Recomputed from each poll cycle outcome. A failed cycle only touches the
//! error fields; the records from the most recent successful cycle stay on
//! screen until a newer cycle succeeds.

use chrono::{DateTime, Local};

use crate::source::{CycleOutcome, FetchError, Record, Severity};

/// Concatenate endpoint payloads into one record list.
///
/// Order is the endpoint configuration order with each payload's internal
/// order preserved. No de-duplication, no sorting.
pub fn merge(payloads: Vec<Vec<Record>>) -> Vec<Record> {
    payloads.into_iter().flatten().collect()
}

/// The most severe classification present in a batch.
///
/// Severities are compared under the explicit least-to-most-severe order
/// `none < ok < warning < critical`; display-only severities (`error`,
/// `unknown`) do not participate. An empty batch, or one with no
/// participating severity, classifies as `ok`.
pub fn aggregate_severity(records: &[Record]) -> Severity {
    records
        .iter()
        .filter_map(|r| r.severity.aggregate_rank().map(|rank| (rank, r.severity)))
        .max_by_key(|&(rank, _)| rank)
        .map(|(_, severity)| severity)
        .unwrap_or(Severity::Ok)
}

/// Render-ready dashboard state.
#[derive(Debug, Clone)]
pub struct ViewModel {
    /// Records from the most recent successful cycle, in merge order.
    pub records: Vec<Record>,
    /// Most severe classification across `records`.
    pub aggregate: Severity,
    /// True once any cycle (success or failure) has completed.
    pub is_loaded: bool,
    /// The failure of the most recent cycle, cleared on success.
    pub last_error: Option<FetchError>,
    /// Completion time of the last successful cycle before the current
    /// failure. Recorded when a failure is applied, for the "last updated
    /// at" notice.
    pub last_success_time: Option<DateTime<Local>>,

    /// Completion time of the newest applied successful cycle.
    last_good: Option<DateTime<Local>>,
    /// Id of the newest applied cycle; older outcomes are discarded.
    last_cycle: u64,
}

impl ViewModel {
    /// Create the initial, empty view model.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            aggregate: Severity::Ok,
            is_loaded: false,
            last_error: None,
            last_success_time: None,
            last_good: None,
            last_cycle: 0,
        }
    }

    /// Apply a cycle outcome.
    ///
    /// Outcomes from a cycle older than the newest applied one are
    /// discarded, so a slow early round can never overwrite a faster later
    /// one. Returns whether the outcome was applied.
    pub fn apply(&mut self, outcome: CycleOutcome) -> bool {
        if outcome.cycle <= self.last_cycle {
            return false;
        }
        self.last_cycle = outcome.cycle;

        match outcome.outcome {
            Ok(payloads) => self.apply_success(payloads, outcome.completed_at),
            Err(error) => self.apply_failure(error),
        }
        true
    }

    /// Replace the record set from a successful cycle.
    pub fn apply_success(&mut self, payloads: Vec<Vec<Record>>, completed_at: DateTime<Local>) {
        self.records = merge(payloads);
        self.aggregate = aggregate_severity(&self.records);
        self.is_loaded = true;
        self.last_error = None;
        self.last_good = Some(completed_at);
    }

    /// Record a failed cycle, leaving the displayed records untouched.
    pub fn apply_failure(&mut self, error: FetchError) {
        self.is_loaded = true;
        self.last_error = Some(error);
        self.last_success_time = self.last_good;
    }

    /// Completion time of the newest successful cycle, for the status bar.
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_good
    }
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(repository: &str, severity: Severity) -> Record {
        Record {
            repository_name: repository.to_string(),
            severity,
            ..serde_json::from_str::<Record>("{}").unwrap()
        }
    }

    fn success(cycle: u64, payloads: Vec<Vec<Record>>) -> CycleOutcome {
        CycleOutcome {
            cycle,
            outcome: Ok(payloads),
            completed_at: Local::now(),
        }
    }

    fn failure(cycle: u64, message: &str) -> CycleOutcome {
        CycleOutcome {
            cycle,
            outcome: Err(FetchError::new(message)),
            completed_at: Local::now(),
        }
    }

    #[test]
    fn test_merge_preserves_order_and_length() {
        let a = vec![record("a1", Severity::Ok), record("a2", Severity::Ok)];
        let b = vec![record("b1", Severity::Warning)];

        let merged = merge(vec![a, b]);
        assert_eq!(merged.len(), 3);
        let names: Vec<&str> =
            merged.iter().map(|r| r.repository_name.as_str()).collect();
        assert_eq!(names, vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn test_aggregate_of_empty_batch_is_default() {
        assert_eq!(aggregate_severity(&[]), Severity::Ok);
    }

    #[test]
    fn test_critical_wins_regardless_of_order() {
        let front = vec![
            record("a", Severity::Critical),
            record("b", Severity::Ok),
            record("c", Severity::Warning),
        ];
        let back = vec![
            record("b", Severity::Ok),
            record("c", Severity::Warning),
            record("a", Severity::Critical),
        ];
        assert_eq!(aggregate_severity(&front), Severity::Critical);
        assert_eq!(aggregate_severity(&back), Severity::Critical);
    }

    #[test]
    fn test_warning_beats_ok_and_none() {
        let records = vec![
            record("a", Severity::None),
            record("b", Severity::Ok),
            record("c", Severity::Warning),
        ];
        assert_eq!(aggregate_severity(&records), Severity::Warning);
    }

    #[test]
    fn test_display_only_severities_do_not_drive_aggregate() {
        let records = vec![record("a", Severity::Error), record("b", Severity::Unknown)];
        assert_eq!(aggregate_severity(&records), Severity::Ok);

        let mixed = vec![record("a", Severity::Error), record("b", Severity::Warning)];
        assert_eq!(aggregate_severity(&mixed), Severity::Warning);
    }

    #[test]
    fn test_two_endpoints_merge_and_classify() {
        let mut view = ViewModel::new();
        view.apply(success(
            1,
            vec![
                vec![record("releases", Severity::Ok)],
                vec![record("charts", Severity::Critical)],
            ],
        ));

        assert_eq!(view.records.len(), 2);
        assert_eq!(view.aggregate, Severity::Critical);
        assert!(view.is_loaded);
        assert!(view.last_error.is_none());
    }

    #[test]
    fn test_failure_keeps_last_good_records() {
        let mut view = ViewModel::new();
        view.apply(success(
            1,
            vec![vec![
                record("a", Severity::Ok),
                record("b", Severity::Ok),
                record("c", Severity::Warning),
            ]],
        ));
        let first_updated = view.last_updated();

        view.apply(failure(2, "connection refused"));

        assert_eq!(view.records.len(), 3);
        assert!(view.is_loaded);
        let err = view.last_error.as_ref().unwrap();
        assert!(err.message.contains("connection refused"));
        assert_eq!(view.last_success_time, first_updated);
    }

    #[test]
    fn test_failure_before_any_success_leaves_records_empty() {
        let mut view = ViewModel::new();
        view.apply(failure(1, "boom"));

        assert!(view.records.is_empty());
        assert!(view.is_loaded);
        assert!(view.last_success_time.is_none());
    }

    #[test]
    fn test_stale_cycle_is_discarded() {
        let mut view = ViewModel::new();
        assert!(view.apply(success(2, vec![vec![record("new", Severity::Ok)]])));

        // A slower cycle that started earlier settles afterwards.
        let applied = view.apply(success(1, vec![vec![record("old", Severity::Critical)]]));
        assert!(!applied);
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].repository_name, "new");

        // Same id is also stale.
        assert!(!view.apply(failure(2, "late failure")));
        assert!(view.last_error.is_none());
    }

    #[test]
    fn test_empty_payloads_yield_empty_view() {
        let mut view = ViewModel::new();
        view.apply(success(1, vec![vec![], vec![]]));

        assert!(view.records.is_empty());
        assert!(view.is_loaded);
        assert_eq!(view.aggregate, Severity::Ok);
    }
}
