use crate::app::Effect;
use crate::http::FetchError;
use crate::models::charts::{ChartKind, ChartSeries, RawChartPayload};
use crate::render::{ChartHandle, ChartRegions};
use std::time::Duration;

#[derive(Debug)]
pub enum ChartsAction {
    Refresh,
    TypeFetched(Result<RawChartPayload, FetchError>),
    TimelineFetched(Result<RawChartPayload, FetchError>),
    BannerTimeout { seq: u64 },
}

/// Refresh controller for the two aggregate charts. The series load
/// independently: a failure on one never blocks the other. Replacing a chart
/// destroys the previous handle first so repeated refreshes cannot
/// accumulate renderer instances.
pub struct ChartsPage {
    regions: ChartRegions,
    type_chart: Option<Box<dyn ChartHandle>>,
    timeline_chart: Option<Box<dyn ChartHandle>>,
    banner_seq: u64,
    banner_delay: Duration,
}

impl ChartsPage {
    pub fn new(regions: ChartRegions, banner_delay: Duration) -> Self {
        Self {
            regions,
            type_chart: None,
            timeline_chart: None,
            banner_seq: 0,
            banner_delay,
        }
    }

    pub fn update(&mut self, action: ChartsAction) -> Vec<Effect> {
        match action {
            ChartsAction::Refresh => {
                vec![Effect::FetchOperationTypeChart, Effect::FetchTimelineChart]
            }
            ChartsAction::TypeFetched(outcome) => self.apply(ChartKind::OperationTypes, outcome),
            ChartsAction::TimelineFetched(outcome) => self.apply(ChartKind::Timeline, outcome),
            ChartsAction::BannerTimeout { seq } => {
                if seq == self.banner_seq {
                    self.regions.notifier.dismiss();
                }
                Vec::new()
            }
        }
    }

    fn apply(&mut self, kind: ChartKind, outcome: Result<RawChartPayload, FetchError>) -> Vec<Effect> {
        let raw = match outcome {
            Ok(raw) => raw,
            Err(err) => {
                // keep the last good chart on the surface
                log::error!("chart fetch failed for {kind:?}: {err}");
                self.banner_seq += 1;
                self.regions
                    .notifier
                    .show_error(&format!("Chart refresh failed: {err}"));
                return vec![Effect::DismissChartBanner {
                    seq: self.banner_seq,
                    after: self.banner_delay,
                }];
            }
        };

        let slot = match kind {
            ChartKind::OperationTypes => &mut self.type_chart,
            ChartKind::Timeline => &mut self.timeline_chart,
        };
        if let Some(previous) = slot.take() {
            previous.destroy();
        }
        match ChartSeries::from_raw(raw) {
            Some(series) => {
                *slot = Some(self.regions.factory.create(kind, &series));
            }
            None => {
                log::warn!("chart payload for {kind:?} carries no labels");
                self.regions.factory.show_empty(kind, "No data to display");
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{chart_regions, events, new_log, EventLog};
    use reqwest::StatusCode;

    const BANNER_DELAY: Duration = Duration::from_secs(5);

    fn page() -> (ChartsPage, EventLog) {
        let log = new_log();
        (ChartsPage::new(chart_regions(&log), BANNER_DELAY), log)
    }

    fn payload(json: &str) -> Result<RawChartPayload, FetchError> {
        Ok(serde_json::from_str(json).unwrap())
    }

    const TYPES_JSON: &str = r#"{"labels": ["IMPORT", "EXPORT"], "data": [15, 8]}"#;
    const TIMELINE_JSON: &str = r#"{"labels": ["01.03", "02.03"], "data": [3, 5]}"#;

    #[test]
    fn refresh_fetches_both_series() {
        let (mut page, _log) = page();
        assert_eq!(
            page.update(ChartsAction::Refresh),
            vec![Effect::FetchOperationTypeChart, Effect::FetchTimelineChart],
        );
    }

    #[test]
    fn second_refresh_destroys_the_previous_instance_first() {
        let (mut page, log) = page();
        page.update(ChartsAction::TypeFetched(payload(TYPES_JSON)));
        page.update(ChartsAction::TypeFetched(payload(TYPES_JSON)));
        let seen = events(&log);
        let position = |needle: &str| {
            seen.iter()
                .position(|e| e.contains(needle))
                .unwrap_or_else(|| panic!("missing event: {needle}"))
        };
        let create_first = position("create OperationTypes #1");
        let destroy_first = position("destroy OperationTypes #1");
        let create_second = position("create OperationTypes #2");
        assert!(create_first < destroy_first);
        assert!(destroy_first < create_second);
    }

    #[test]
    fn the_two_surfaces_hold_independent_instances() {
        let (mut page, log) = page();
        page.update(ChartsAction::TypeFetched(payload(TYPES_JSON)));
        page.update(ChartsAction::TimelineFetched(payload(TIMELINE_JSON)));
        page.update(ChartsAction::TimelineFetched(payload(TIMELINE_JSON)));
        let seen = events(&log);
        // the timeline replacement never touches the type chart's handle
        assert!(!seen.iter().any(|e| e.contains("destroy OperationTypes")));
        assert!(seen.iter().any(|e| e.contains("destroy Timeline #2")));
    }

    #[test]
    fn empty_labels_show_no_data_instead_of_an_empty_chart() {
        let (mut page, log) = page();
        page.update(ChartsAction::TypeFetched(payload(r#"{"labels": []}"#)));
        let seen = events(&log);
        assert!(seen
            .iter()
            .any(|e| e.starts_with("chart empty OperationTypes")));
        assert!(!seen.iter().any(|e| e.contains("create")));
    }

    #[test]
    fn replacing_a_chart_with_no_data_still_destroys_the_old_instance() {
        let (mut page, log) = page();
        page.update(ChartsAction::TypeFetched(payload(TYPES_JSON)));
        page.update(ChartsAction::TypeFetched(payload("{}")));
        let seen = events(&log);
        assert!(seen.iter().any(|e| e.contains("destroy OperationTypes #1")));
        assert!(seen
            .iter()
            .any(|e| e.starts_with("chart empty OperationTypes")));
    }

    #[test]
    fn one_series_failing_does_not_block_the_other() {
        let (mut page, log) = page();
        page.update(ChartsAction::TypeFetched(Err(FetchError::Status(
            StatusCode::BAD_GATEWAY,
        ))));
        page.update(ChartsAction::TimelineFetched(payload(TIMELINE_JSON)));
        let seen = events(&log);
        assert!(seen.iter().any(|e| e.starts_with("banner show")));
        assert!(seen.iter().any(|e| e.contains("create Timeline")));
    }

    #[test]
    fn failure_preserves_the_last_good_chart() {
        let (mut page, log) = page();
        page.update(ChartsAction::TypeFetched(payload(TYPES_JSON)));
        page.update(ChartsAction::TypeFetched(Err(FetchError::Status(
            StatusCode::BAD_GATEWAY,
        ))));
        assert!(!events(&log).iter().any(|e| e.contains("destroy")));
    }

    #[test]
    fn stale_banner_timeout_is_ignored() {
        let (mut page, log) = page();
        page.update(ChartsAction::TypeFetched(Err(FetchError::Status(
            StatusCode::BAD_GATEWAY,
        ))));
        page.update(ChartsAction::TimelineFetched(Err(FetchError::Status(
            StatusCode::BAD_GATEWAY,
        ))));
        page.update(ChartsAction::BannerTimeout { seq: 1 });
        assert!(!events(&log).contains(&"banner dismiss".to_string()));
        page.update(ChartsAction::BannerTimeout { seq: 2 });
        assert!(events(&log).contains(&"banner dismiss".to_string()));
    }
}
