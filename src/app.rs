//! Application state and interaction logic.

use std::path::Path;

use anyhow::Result;

use crate::data::ViewModel;
use crate::source::{CycleSource, PollHandle, Record};
use crate::ui::Theme;

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Polling
    handle: PollHandle,
    source: CycleSource,
    pub view: ViewModel,

    // Navigation state
    pub selected_index: usize,
    pub scroll_offset: usize,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App around a started poller.
    pub fn new(handle: PollHandle, source: CycleSource) -> Self {
        Self {
            running: true,
            show_help: false,
            show_detail_overlay: false,
            handle,
            source,
            view: ViewModel::new(),
            selected_index: 0,
            scroll_offset: 0,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the polled endpoints.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Drain pending cycle outcomes into the view model.
    ///
    /// Called once per UI loop iteration. Stale outcomes (older than the
    /// newest applied cycle) are discarded by the view model.
    pub fn apply_pending(&mut self) {
        let mut applied = false;
        while let Some(outcome) = self.source.poll() {
            applied |= self.view.apply(outcome);
        }

        if applied {
            // Clamp selection to the new record set
            let count = self.filtered_count();
            if self.selected_index >= count {
                self.selected_index = count.saturating_sub(1);
            }
        }
    }

    /// Request an immediate poll round.
    pub fn refresh(&mut self) {
        self.handle.refresh_now();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Stop polling. Called on quit, before the terminal is restored;
    /// dropping the App stops the poller as well.
    pub fn shutdown(&self) {
        self.handle.stop();
    }

    /// Records matching the current filter, in merge order.
    pub fn filtered_records(&self) -> Vec<&Record> {
        self.view.records.iter().filter(|r| self.matches_filter(r)).collect()
    }

    /// Count of records after applying the filter.
    pub fn filtered_count(&self) -> usize {
        if self.filter_text.is_empty() {
            return self.view.records.len();
        }
        self.view.records.iter().filter(|r| self.matches_filter(r)).count()
    }

    /// The currently selected record, if any.
    pub fn selected_record(&self) -> Option<&Record> {
        self.filtered_records().get(self.selected_index).copied()
    }

    /// Check if a record matches the current filter.
    pub fn matches_filter(&self, record: &Record) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let needle = self.filter_text.to_lowercase();
        record.repository_name.to_lowercase().contains(&needle)
            || record.tag_name.to_lowercase().contains(&needle)
    }

    /// Move selection down by one card.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one card.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n cards.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.filtered_count().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n cards.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first card.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last card.
    pub fn select_last(&mut self) {
        self.selected_index = self.filtered_count().saturating_sub(1);
    }

    /// Open the selected record's release page in the system browser.
    pub fn open_selected(&mut self) {
        let url = match self.selected_record() {
            Some(record) => record.link_url.clone(),
            None => return,
        };
        match url {
            Some(url) => match open::that(&url) {
                Ok(()) => self.set_status_message(format!("Opened {}", url)),
                Err(e) => self.set_status_message(format!("Could not open {}: {}", url, e)),
            },
            None => self.set_status_message("No link for this record".to_string()),
        }
    }

    /// Open the detail overlay for the currently selected record.
    pub fn enter_detail(&mut self) {
        if self.selected_record().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Navigate back: close overlay first, then clear any filter.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if !self.filter_text.is_empty() {
            self.clear_filter();
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.selected_index = 0;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        let count = self.filtered_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current dashboard state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        export_view_model(&self.view, path)
    }
}

/// Write a view model snapshot as pretty-printed JSON.
///
/// Used by the in-app export key and the one-shot `--export` mode.
pub fn export_view_model(view: &ViewModel, path: &Path) -> Result<()> {
    use std::io::Write;

    let mut export = serde_json::Map::new();

    let mut summary = serde_json::Map::new();
    summary.insert(
        "total_records".to_string(),
        serde_json::json!(view.records.len()),
    );
    summary.insert(
        "aggregate_severity".to_string(),
        serde_json::json!(view.aggregate.label()),
    );
    summary.insert("loaded".to_string(), serde_json::json!(view.is_loaded));
    summary.insert(
        "last_error".to_string(),
        serde_json::json!(view.last_error.as_ref().map(|e| e.message.clone())),
    );
    summary.insert(
        "last_updated".to_string(),
        serde_json::json!(view.last_updated().map(|t| t.to_rfc3339())),
    );
    export.insert("summary".to_string(), serde_json::Value::Object(summary));

    let records = serde_json::to_value(&view.records)?;
    export.insert("records".to_string(), records);

    let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::source::{Fetch, FetchError, Poller, Severity};

    #[derive(Debug)]
    struct FixedFetch(Vec<Record>);

    #[async_trait]
    impl Fetch for FixedFetch {
        async fn fetch(&self, _url: &str) -> Result<Vec<Record>, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn record(repository: &str, severity: Severity) -> Record {
        Record {
            repository_name: repository.to_string(),
            severity,
            link_url: Some(format!("https://example.com/{}", repository)),
            ..serde_json::from_str::<Record>("{}").unwrap()
        }
    }

    async fn app_with_records(records: Vec<Record>) -> App {
        let fetcher = Arc::new(FixedFetch(records));
        let poller = Poller::new(fetcher, vec!["releases".to_string()]);
        let (handle, source) = poller.start(Duration::from_secs(3600));
        let mut app = App::new(handle, source);

        for _ in 0..200 {
            app.apply_pending();
            if app.view.is_loaded {
                return app;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("first cycle never arrived");
    }

    #[tokio::test]
    async fn test_apply_pending_loads_records() {
        let app = app_with_records(vec![
            record("one", Severity::Ok),
            record("two", Severity::Warning),
        ])
        .await;

        assert_eq!(app.view.records.len(), 2);
        assert_eq!(app.view.aggregate, Severity::Warning);
        assert!(app.view.last_error.is_none());
    }

    #[tokio::test]
    async fn test_filter_narrows_selection() {
        let mut app = app_with_records(vec![
            record("grafana/loki", Severity::Ok),
            record("vmware-tanzu/velero", Severity::Ok),
        ])
        .await;

        app.start_filter();
        for c in "velero".chars() {
            app.filter_push(c);
        }

        assert_eq!(app.filtered_count(), 1);
        assert_eq!(
            app.selected_record().unwrap().repository_name,
            "vmware-tanzu/velero"
        );
    }

    #[tokio::test]
    async fn test_selection_clamps_to_record_count() {
        let mut app = app_with_records(vec![
            record("one", Severity::Ok),
            record("two", Severity::Ok),
        ])
        .await;

        app.select_next_n(10);
        assert_eq!(app.selected_index, 1);
        app.select_prev_n(10);
        assert_eq!(app.selected_index, 0);
        app.select_last();
        assert_eq!(app.selected_index, 1);
    }

    #[tokio::test]
    async fn test_export_state_writes_json() {
        let app = app_with_records(vec![record("one", Severity::Critical)]).await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["summary"]["total_records"], 1);
        assert_eq!(value["summary"]["aggregate_severity"], "critical");
        assert_eq!(value["records"][0]["repository_name"], "one");
    }

    #[tokio::test]
    async fn test_shutdown_stops_outcome_delivery() {
        let mut app = app_with_records(vec![record("one", Severity::Ok)]).await;

        app.shutdown();
        app.refresh();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let before = app.view.records.clone();
        app.apply_pending();
        assert_eq!(app.view.records.len(), before.len());
    }
}
