use crate::app::Effect;
use crate::fallback;
use crate::http::FetchError;
use crate::models::operation::{OperationFilter, OperationRecord, RawOperation};
use crate::render::OperationsRegions;

#[derive(Debug)]
pub enum OperationsAction {
    /// Raw trigger input ("IMPORT", "ALL", ...).
    Filter(String),
    Fetched {
        filter: OperationFilter,
        outcome: Result<Vec<RawOperation>, FetchError>,
    },
}

/// Filter controller for the operations table. At most one fetch is in
/// flight across all triggers; re-applying the currently shown filter while
/// idle is a no-op, but becomes a real request again once a new filter has
/// replaced it or the completed state is explicitly re-requested.
pub struct OperationsPage {
    regions: OperationsRegions,
    current_filter: Option<OperationFilter>,
    in_flight: bool,
    fallback_rows: usize,
}

impl OperationsPage {
    pub fn new(regions: OperationsRegions, fallback_rows: usize) -> Self {
        Self {
            regions,
            current_filter: None,
            in_flight: false,
            fallback_rows,
        }
    }

    pub fn update(&mut self, action: OperationsAction) -> Vec<Effect> {
        match action {
            OperationsAction::Filter(raw) => self.apply_filter(&raw),
            OperationsAction::Fetched { filter, outcome } => {
                self.on_fetched(filter, outcome);
                Vec::new()
            }
        }
    }

    fn apply_filter(&mut self, raw: &str) -> Vec<Effect> {
        let Some(filter) = OperationFilter::parse(raw) else {
            log::error!("filter request ignored: no usable filter in {raw:?}");
            return Vec::new();
        };
        if self.in_flight {
            log::debug!("filter change skipped: a request is already in flight");
            return Vec::new();
        }
        if self.current_filter == Some(filter) {
            log::debug!("filter change skipped: {} is already applied", filter.code());
            return Vec::new();
        }

        self.in_flight = true;
        self.current_filter = Some(filter);
        self.regions.triggers.set_active(filter.code());
        self.regions.table.show_loading();
        vec![Effect::FetchOperations(filter)]
    }

    fn on_fetched(&mut self, filter: OperationFilter, outcome: Result<Vec<RawOperation>, FetchError>) {
        // Released before anything else so a failed render path can never
        // wedge the controller.
        self.in_flight = false;

        let records = match outcome {
            Ok(raw) if !raw.is_empty() => {
                raw.into_iter().map(OperationRecord::from_raw).collect()
            }
            Ok(_) => {
                log::warn!(
                    "operations endpoint returned no rows for {}, substituting generated data",
                    filter.code()
                );
                fallback::generate(&filter, self.fallback_rows)
            }
            Err(err) => {
                log::error!("operations fetch failed for {}: {err}", filter.code());
                fallback::generate(&filter, self.fallback_rows)
            }
        };

        if records.is_empty() {
            self.regions.table.show_empty("No data to display");
        } else {
            self.regions.table.set_rows(&records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operation::OperationType;
    use crate::render::testing::{events, new_log, operations_regions};
    use reqwest::StatusCode;

    type Rows = std::rc::Rc<std::cell::RefCell<Vec<OperationRecord>>>;

    fn page(fallback_rows: usize) -> (OperationsPage, crate::render::testing::EventLog, Rows) {
        let log = new_log();
        let (regions, rows) = operations_regions(&log);
        (OperationsPage::new(regions, fallback_rows), log, rows)
    }

    fn fetched_ok(filter: OperationFilter, json: &str) -> OperationsAction {
        OperationsAction::Fetched {
            filter,
            outcome: Ok(serde_json::from_str(json).unwrap()),
        }
    }

    #[test]
    fn apply_marks_trigger_and_shows_loading_before_fetching() {
        let (mut page, log, _rows) = page(5);
        let effects = page.update(OperationsAction::Filter("IMPORT".into()));
        assert_eq!(
            effects,
            vec![Effect::FetchOperations(OperationFilter::Kind(
                OperationType::Import
            ))],
        );
        assert_eq!(events(&log), vec!["triggers active IMPORT", "table loading"]);
    }

    #[test]
    fn blank_and_unknown_input_is_rejected_without_side_effects() {
        let (mut page, log, _rows) = page(5);
        assert!(page.update(OperationsAction::Filter("  ".into())).is_empty());
        assert!(page.update(OperationsAction::Filter("REINDEX".into())).is_empty());
        assert!(events(&log).is_empty());
    }

    #[test]
    fn rapid_duplicate_applies_issue_exactly_one_fetch() {
        let (mut page, _log, _rows) = page(5);
        let first = page.update(OperationsAction::Filter("EXPORT".into()));
        assert_eq!(first.len(), 1);
        // same type again before the first resolves
        assert!(page.update(OperationsAction::Filter("EXPORT".into())).is_empty());
        // a different type is also suppressed while in flight
        assert!(page.update(OperationsAction::Filter("IMPORT".into())).is_empty());
    }

    #[test]
    fn same_filter_is_suppressed_when_idle_but_only_until_replaced() {
        let (mut page, _log, _rows) = page(5);
        let filter = OperationFilter::Kind(OperationType::Import);
        assert_eq!(page.update(OperationsAction::Filter("IMPORT".into())).len(), 1);
        page.update(fetched_ok(filter, "[{\"id\": 1}]"));
        // idempotent re-application of the applied filter stays suppressed
        assert!(page.update(OperationsAction::Filter("IMPORT".into())).is_empty());
        // but a new filter goes through, and the old one becomes fresh again
        assert_eq!(page.update(OperationsAction::Filter("ALL".into())).len(), 1);
        page.update(fetched_ok(OperationFilter::All, "[{\"id\": 2}]"));
        assert_eq!(page.update(OperationsAction::Filter("IMPORT".into())).len(), 1);
    }

    #[test]
    fn rows_render_in_input_order() {
        let (mut page, _log, rows) = page(5);
        page.update(OperationsAction::Filter("ALL".into()));
        page.update(fetched_ok(
            OperationFilter::All,
            r#"[{"id": 3, "clientName": "c"}, {"id": 1, "clientName": "a"}, {"id": 2, "clientName": "b"}]"#,
        ));
        let ids: Vec<u64> = rows.borrow().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn guard_clears_on_failure_and_fallback_rows_render() {
        let (mut page, log, _rows) = page(5);
        page.update(OperationsAction::Filter("EXPORT".into()));
        page.update(OperationsAction::Fetched {
            filter: OperationFilter::Kind(OperationType::Export),
            outcome: Err(FetchError::Status(StatusCode::BAD_GATEWAY)),
        });
        assert!(events(&log).contains(&"table rows 5".to_string()));
        // guard released: the next distinct filter fetches again
        assert_eq!(page.update(OperationsAction::Filter("ALL".into())).len(), 1);
    }

    #[test]
    fn empty_payload_degrades_to_generated_rows() {
        let (mut page, log, _rows) = page(5);
        page.update(OperationsAction::Filter("IMPORT".into()));
        page.update(fetched_ok(OperationFilter::Kind(OperationType::Import), "[]"));
        assert!(events(&log).contains(&"table rows 5".to_string()));
    }

    #[test]
    fn zero_fallback_rows_show_the_empty_state() {
        let (mut page, log, _rows) = page(0);
        page.update(OperationsAction::Filter("IMPORT".into()));
        page.update(fetched_ok(OperationFilter::Kind(OperationType::Import), "[]"));
        assert!(events(&log)
            .iter()
            .any(|e| e.starts_with("table empty")));
    }
}
