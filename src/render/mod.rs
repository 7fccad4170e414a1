//! Render-target seams. Each dashboard region is driven through a small
//! trait so the orchestration core never touches a concrete surface; the
//! binary plugs in the console implementations, tests plug in recorders.

pub mod console;

use crate::models::charts::{ChartKind, ChartSeries};
use crate::models::operation::OperationRecord;
use crate::models::resources::Tier;

/// A percentage bar with a color tier.
pub trait MeterRegion {
    fn set_progress(&mut self, percent: f64, tier: Tier);
}

/// A single line of text owned by one region.
pub trait TextRegion {
    fn set_text(&mut self, text: &str);
}

/// The operations table body.
pub trait TableRegion {
    fn show_loading(&mut self);
    fn show_empty(&mut self, message: &str);
    fn set_rows(&mut self, rows: &[OperationRecord]);
}

/// The filter trigger group; exactly one trigger is active at a time.
pub trait TriggerGroup {
    fn set_active(&mut self, filter_code: &str);
}

/// The manual-refresh control's busy affordance.
pub trait RefreshControl {
    fn set_busy(&mut self, busy: bool);
}

/// Transient error banner owned by one page.
pub trait Notifier {
    fn show_error(&mut self, message: &str);
    fn dismiss(&mut self);
}

/// A live chart instance. Must be destroyed before a replacement for the
/// same surface is created, or the renderer leaks instances and listeners.
pub trait ChartHandle {
    fn destroy(self: Box<Self>);
}

pub trait ChartFactory {
    fn create(&mut self, kind: ChartKind, series: &ChartSeries) -> Box<dyn ChartHandle>;
    fn show_empty(&mut self, kind: ChartKind, message: &str);
}

/// Regions owned by the operations filter controller.
pub struct OperationsRegions {
    pub table: Box<dyn TableRegion>,
    pub triggers: Box<dyn TriggerGroup>,
}

/// Regions owned by the resource poller. Every region updates independently;
/// a field the backend omits leaves its region's previous render in place.
pub struct ResourceRegions {
    pub cpu_meter: Box<dyn MeterRegion>,
    pub cpu_details: Box<dyn TextRegion>,
    pub memory_meter: Box<dyn MeterRegion>,
    pub memory_details: Box<dyn TextRegion>,
    pub disk_meter: Box<dyn MeterRegion>,
    pub disk_usage: Box<dyn TextRegion>,
    pub disk_free: Box<dyn TextRegion>,
    pub clients_meter: Box<dyn MeterRegion>,
    pub clients_size: Box<dyn TextRegion>,
    pub clients_count: Box<dyn TextRegion>,
    pub last_updated: Box<dyn TextRegion>,
    pub refresh_control: Box<dyn RefreshControl>,
    pub notifier: Box<dyn Notifier>,
}

/// Regions owned by the chart refresh controller.
pub struct ChartRegions {
    pub factory: Box<dyn ChartFactory>,
    pub notifier: Box<dyn Notifier>,
}
