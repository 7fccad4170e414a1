use crate::app::Effect;
use crate::http::FetchError;
use crate::models::resources::{
    cpu_tier, disk_tier, memory_tier, RawResourceSnapshot, ResourceSnapshot, Tier,
};
use crate::render::ResourceRegions;
use std::time::Duration;

#[derive(Debug)]
pub enum ResourcesAction {
    /// `force` marks a manual refresh; it busies the trigger control and is
    /// passed through to the backend as `forceUpdate`.
    Refresh { force: bool },
    Fetched {
        forced: bool,
        outcome: Result<RawResourceSnapshot, FetchError>,
    },
    BannerTimeout { seq: u64 },
}

/// Poller for the system-resource card. Carries no in-flight guard: when two
/// refreshes overlap, whichever response completes last paints the card.
/// Last-write-wins is accepted behavior here, not a guarantee.
pub struct ResourcesPage {
    regions: ResourceRegions,
    banner_seq: u64,
    banner_delay: Duration,
}

impl ResourcesPage {
    pub fn new(regions: ResourceRegions, banner_delay: Duration) -> Self {
        Self {
            regions,
            banner_seq: 0,
            banner_delay,
        }
    }

    pub fn update(&mut self, action: ResourcesAction) -> Vec<Effect> {
        match action {
            ResourcesAction::Refresh { force } => {
                if force {
                    self.regions.refresh_control.set_busy(true);
                }
                vec![Effect::FetchResources { force }]
            }
            ResourcesAction::Fetched { forced, outcome } => {
                // the trigger control comes back whatever the outcome
                if forced {
                    self.regions.refresh_control.set_busy(false);
                }
                match outcome {
                    Ok(raw) => {
                        self.render(ResourceSnapshot::from_raw(raw));
                        Vec::new()
                    }
                    Err(err) => {
                        log::error!("resource refresh failed: {err}");
                        self.show_banner(&format!("Refresh failed: {err}"))
                    }
                }
            }
            ResourcesAction::BannerTimeout { seq } => {
                // only the newest banner may dismiss itself
                if seq == self.banner_seq {
                    self.regions.notifier.dismiss();
                }
                Vec::new()
            }
        }
    }

    fn show_banner(&mut self, message: &str) -> Vec<Effect> {
        self.banner_seq += 1;
        self.regions.notifier.show_error(message);
        vec![Effect::DismissResourceBanner {
            seq: self.banner_seq,
            after: self.banner_delay,
        }]
    }

    /// Paints each region independently; a region whose backing field is
    /// absent keeps whatever it showed before.
    fn render(&mut self, snapshot: ResourceSnapshot) {
        if let Some(pct) = snapshot.cpu_percent {
            self.regions.cpu_meter.set_progress(pct, cpu_tier(pct));
            let cores = snapshot.cores.unwrap_or(0);
            let load = snapshot.system_load_percent.unwrap_or(pct);
            self.regions
                .cpu_details
                .set_text(&format!("Cores: {cores}, system load: {load:.2}%"));
        }

        if let Some(pct) = snapshot.memory_percent {
            self.regions.memory_meter.set_progress(pct, memory_tier(pct));
            self.regions.memory_details.set_text(&format!(
                "In use: {} of {}",
                snapshot.memory_used.as_deref().unwrap_or("0 MB"),
                snapshot.memory_total.as_deref().unwrap_or("0 GB"),
            ));
        }

        if let Some(err) = &snapshot.disk_error {
            // the backend's disk probe failed; show its message where the
            // usage line goes and leave the meters alone
            self.regions.disk_usage.set_text(&format!("Error: {err}"));
        } else {
            if let Some(pct) = snapshot.disk_percent {
                self.regions.disk_meter.set_progress(pct, disk_tier(pct));
                self.regions.disk_usage.set_text(&format!(
                    "In use: {} of {} ({pct}%)",
                    snapshot.disk_used.as_deref().unwrap_or("0 GB"),
                    snapshot.disk_total.as_deref().unwrap_or("0 GB"),
                ));
            }
            if let Some(free) = &snapshot.disk_free {
                self.regions.disk_free.set_text(&format!("Free: {free}"));
            }
            if let Some(pct) = snapshot.clients_percent {
                self.regions.clients_meter.set_progress(pct, Tier::Normal);
                self.regions.clients_size.set_text(&format!(
                    "Files size: {} ({pct}% of total)",
                    snapshot.clients_size.as_deref().unwrap_or("0 GB"),
                ));
            }
            if let Some(count) = snapshot.clients_file_count {
                self.regions
                    .clients_count
                    .set_text(&format!("Files: {count}"));
            }
        }

        self.regions
            .last_updated
            .set_text(&format!("Updated: {}", snapshot.last_updated));
    }
}
