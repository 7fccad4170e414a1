//! Console implementations of the render targets, used by the binary. Each
//! region redraws as one labelled line, which keeps the output readable when
//! regions refresh independently.

use super::{
    ChartFactory, ChartHandle, ChartRegions, MeterRegion, Notifier, OperationsRegions,
    RefreshControl, ResourceRegions, TableRegion, TextRegion, TriggerGroup,
};
use crate::models::charts::{ChartKind, ChartSeries};
use crate::models::operation::OperationRecord;
use crate::models::resources::Tier;

const BAR_WIDTH: usize = 20;

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

struct ConsoleMeter {
    label: &'static str,
}

impl MeterRegion for ConsoleMeter {
    fn set_progress(&mut self, percent: f64, tier: Tier) {
        println!(
            "{:<14} [{}] {:5.1}% ({})",
            self.label,
            bar(percent),
            percent,
            tier.as_str()
        );
    }
}

struct ConsoleText {
    label: &'static str,
}

impl TextRegion for ConsoleText {
    fn set_text(&mut self, text: &str) {
        println!("{:<14} {}", self.label, text);
    }
}

struct ConsoleTable;

impl TableRegion for ConsoleTable {
    fn show_loading(&mut self) {
        println!("operations     loading...");
    }

    fn show_empty(&mut self, message: &str) {
        println!("operations     {message}");
    }

    fn set_rows(&mut self, rows: &[OperationRecord]) {
        println!(
            "{:<16} | {:<20} | {:<16} | {:<14} | {:>9} | {:<12} | details",
            "start", "client", "type", "source", "progress", "status"
        );
        for row in rows {
            println!(
                "{:<16} | {:<20} | {:<16} | {:<14} | {:>9} | {:<12} | {}",
                row.start_time,
                row.client_name,
                row.kind.description,
                row.source,
                row.progress(),
                format!("{} [{}]", row.status.description, row.badge().as_str()),
                row.details_path()
            );
        }
    }
}

struct ConsoleTriggers;

impl TriggerGroup for ConsoleTriggers {
    fn set_active(&mut self, filter_code: &str) {
        println!("filter         {filter_code} active");
    }
}

struct ConsoleRefresh;

impl RefreshControl for ConsoleRefresh {
    fn set_busy(&mut self, busy: bool) {
        if busy {
            println!("refresh        busy");
        } else {
            println!("refresh        ready");
        }
    }
}

struct ConsoleNotifier {
    scope: &'static str,
}

impl Notifier for ConsoleNotifier {
    fn show_error(&mut self, message: &str) {
        eprintln!("[{}] {message}", self.scope);
    }

    fn dismiss(&mut self) {
        log::debug!("{} banner dismissed", self.scope);
    }
}

struct ConsoleChartHandle {
    kind: ChartKind,
}

impl ChartHandle for ConsoleChartHandle {
    fn destroy(self: Box<Self>) {
        log::debug!("chart instance released: {:?}", self.kind);
    }
}

struct ConsoleChartFactory;

impl ChartFactory for ConsoleChartFactory {
    fn create(&mut self, kind: ChartKind, series: &ChartSeries) -> Box<dyn ChartHandle> {
        println!("{}:", kind.title());
        let max = series
            .points
            .iter()
            .map(|p| p.value)
            .fold(f64::EPSILON, f64::max);
        for point in &series.points {
            println!(
                "  {:<20} {} {}",
                point.label,
                "#".repeat(((point.value / max) * BAR_WIDTH as f64).round() as usize),
                point.value
            );
        }
        Box::new(ConsoleChartHandle { kind })
    }

    fn show_empty(&mut self, kind: ChartKind, message: &str) {
        println!("{}: {message}", kind.title());
    }
}

/// Builds the full set of console render targets for the binary.
pub fn targets() -> (OperationsRegions, ResourceRegions, ChartRegions) {
    let operations = OperationsRegions {
        table: Box::new(ConsoleTable),
        triggers: Box::new(ConsoleTriggers),
    };
    let resources = ResourceRegions {
        cpu_meter: Box::new(ConsoleMeter { label: "cpu" }),
        cpu_details: Box::new(ConsoleText { label: "cpu" }),
        memory_meter: Box::new(ConsoleMeter { label: "memory" }),
        memory_details: Box::new(ConsoleText { label: "memory" }),
        disk_meter: Box::new(ConsoleMeter { label: "disk" }),
        disk_usage: Box::new(ConsoleText { label: "disk" }),
        disk_free: Box::new(ConsoleText { label: "disk" }),
        clients_meter: Box::new(ConsoleMeter { label: "client data" }),
        clients_size: Box::new(ConsoleText { label: "client data" }),
        clients_count: Box::new(ConsoleText { label: "client data" }),
        last_updated: Box::new(ConsoleText { label: "updated" }),
        refresh_control: Box::new(ConsoleRefresh),
        notifier: Box::new(ConsoleNotifier { scope: "resources" }),
    };
    let charts = ChartRegions {
        factory: Box::new(ConsoleChartFactory),
        notifier: Box::new(ConsoleNotifier { scope: "charts" }),
    };
    (operations, resources, charts)
}
