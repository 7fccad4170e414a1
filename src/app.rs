//! The dashboard event loop. All state lives in [`Dashboard`] and mutates
//! only inside [`Dashboard::update`]; async work (fetches, timers) is
//! described by [`Effect`] values and executed on the loop's `LocalSet`, so
//! everything runs cooperatively on one thread and each completion re-enters
//! `update` as a [`Message`].

use crate::config::Config;
use crate::http::ApiClient;
use crate::models::operation::OperationFilter;
use crate::pages::charts::{ChartsAction, ChartsPage};
use crate::pages::operations::{OperationsAction, OperationsPage};
use crate::pages::resources::{ResourcesAction, ResourcesPage};
use crate::render::{ChartRegions, OperationsRegions, ResourceRegions};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
pub enum Message {
    Operations(OperationsAction),
    Resources(ResourcesAction),
    Charts(ChartsAction),
    Shutdown,
}

/// Deferred work produced by `update`. Kept as data so tests can assert what
/// a controller scheduled without performing any of it.
#[derive(Debug, PartialEq)]
pub enum Effect {
    FetchOperations(OperationFilter),
    FetchResources { force: bool },
    FetchOperationTypeChart,
    FetchTimelineChart,
    DismissResourceBanner { seq: u64, after: Duration },
    DismissChartBanner { seq: u64, after: Duration },
}

/// The render targets for all three pages, grouped for wiring.
pub struct RenderTargets {
    pub operations: OperationsRegions,
    pub resources: ResourceRegions,
    pub charts: ChartRegions,
}

pub struct Dashboard {
    config: Config,
    api: Rc<ApiClient>,
    tx: UnboundedSender<Message>,
    operations: OperationsPage,
    resources: ResourcesPage,
    charts: ChartsPage,
}

impl Dashboard {
    pub fn new(
        config: Config,
        api: ApiClient,
        targets: RenderTargets,
    ) -> (Self, UnboundedSender<Message>, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let banner_delay = config.error_banner();
        let dashboard = Self {
            operations: OperationsPage::new(targets.operations, config.fallback_rows),
            resources: ResourcesPage::new(targets.resources, banner_delay),
            charts: ChartsPage::new(targets.charts, banner_delay),
            api: Rc::new(api),
            tx: tx.clone(),
            config,
        };
        (dashboard, tx, rx)
    }

    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Operations(action) => self.operations.update(action),
            Message::Resources(action) => self.resources.update(action),
            Message::Charts(action) => self.charts.update(action),
            Message::Shutdown => Vec::new(),
        }
    }

    /// Runs until the channel closes or a `Shutdown` message arrives.
    pub async fn run(mut self, mut rx: UnboundedReceiver<Message>) {
        self.bootstrap();
        while let Some(message) = rx.recv().await {
            if matches!(message, Message::Shutdown) {
                break;
            }
            for effect in self.update(message) {
                self.run_effect(effect);
            }
        }
    }

    /// Initial staggered loads plus the resource poll timer. The resource
    /// card refreshes immediately and then on every interval tick; the
    /// operations table and the charts come up slightly later so the first
    /// render does not arrive all at once.
    fn bootstrap(&self) {
        let tx = self.tx.clone();
        let poll = self.config.resource_poll();
        tokio::task::spawn_local(async move {
            let mut ticker = tokio::time::interval(poll);
            loop {
                ticker.tick().await;
                if tx
                    .send(Message::Resources(ResourcesAction::Refresh { force: false }))
                    .is_err()
                {
                    break;
                }
            }
        });

        let tx = self.tx.clone();
        let delay = self.config.operations_initial_delay();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Message::Operations(OperationsAction::Filter("ALL".into())));
        });

        let tx = self.tx.clone();
        let delay = self.config.charts_initial_delay();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Message::Charts(ChartsAction::Refresh));
        });
    }

    fn run_effect(&self, effect: Effect) {
        let api = Rc::clone(&self.api);
        let tx = self.tx.clone();
        match effect {
            Effect::FetchOperations(filter) => {
                let limit = self.config.operations_limit;
                tokio::task::spawn_local(async move {
                    let outcome = api.fetch_operations(filter.code(), limit).await;
                    let _ = tx.send(Message::Operations(OperationsAction::Fetched {
                        filter,
                        outcome,
                    }));
                });
            }
            Effect::FetchResources { force } => {
                tokio::task::spawn_local(async move {
                    let outcome = api.fetch_resources(force).await;
                    let _ = tx.send(Message::Resources(ResourcesAction::Fetched {
                        forced: force,
                        outcome,
                    }));
                });
            }
            Effect::FetchOperationTypeChart => {
                tokio::task::spawn_local(async move {
                    let outcome = api.fetch_operation_type_chart().await;
                    let _ = tx.send(Message::Charts(ChartsAction::TypeFetched(outcome)));
                });
            }
            Effect::FetchTimelineChart => {
                tokio::task::spawn_local(async move {
                    let outcome = api.fetch_timeline_chart().await;
                    let _ = tx.send(Message::Charts(ChartsAction::TimelineFetched(outcome)));
                });
            }
            Effect::DismissResourceBanner { seq, after } => {
                tokio::task::spawn_local(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Message::Resources(ResourcesAction::BannerTimeout { seq }));
                });
            }
            Effect::DismissChartBanner { seq, after } => {
                tokio::task::spawn_local(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Message::Charts(ChartsAction::BannerTimeout { seq }));
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{chart_regions, new_log, operations_regions, resource_regions};

    fn dashboard() -> (Dashboard, UnboundedSender<Message>, UnboundedReceiver<Message>) {
        let log = new_log();
        let (operations, _rows) = operations_regions(&log);
        let targets = RenderTargets {
            operations,
            resources: resource_regions(&log),
            charts: chart_regions(&log),
        };
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        Dashboard::new(Config::default(), api, targets)
    }

    #[test]
    fn messages_route_to_their_page() {
        let (mut dashboard, _tx, _rx) = dashboard();
        let effects = dashboard.update(Message::Operations(OperationsAction::Filter(
            "IMPORT".into(),
        )));
        assert_eq!(effects.len(), 1);
        let effects = dashboard.update(Message::Charts(ChartsAction::Refresh));
        assert_eq!(
            effects,
            vec![Effect::FetchOperationTypeChart, Effect::FetchTimelineChart],
        );
        assert!(dashboard.update(Message::Shutdown).is_empty());
    }

    #[tokio::test]
    async fn run_exits_on_shutdown() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let (dashboard, tx, rx) = dashboard();
                tx.send(Message::Shutdown).unwrap();
                dashboard.run(rx).await;
            })
            .await;
    }
}
