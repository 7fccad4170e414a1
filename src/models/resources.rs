use crate::utils::format;
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;

/// Color tier for a percentage meter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    Normal,
    Warning,
    Critical,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Normal => "normal",
            Tier::Warning => "warning",
            Tier::Critical => "critical",
        }
    }
}

fn tier(percent: f64, warn_above: f64) -> Tier {
    if percent > 90.0 {
        Tier::Critical
    } else if percent > warn_above {
        Tier::Warning
    } else {
        Tier::Normal
    }
}

/// CPU and memory meters warn above 70%.
pub fn cpu_tier(percent: f64) -> Tier {
    tier(percent, 70.0)
}

pub fn memory_tier(percent: f64) -> Tier {
    tier(percent, 70.0)
}

/// Disk fills more gradually; its warning threshold sits at 75%.
pub fn disk_tier(percent: f64) -> Tier {
    tier(percent, 75.0)
}

/// Snapshot as returned by `/api/system/resources`. The backend assembles
/// this map from several probes, so every field is independently optional and
/// percentages may arrive as numbers or numeric strings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawResourceSnapshot {
    pub cpu_usage_percentage: Option<Value>,
    pub available_processors: Option<serde_json::Number>,
    pub system_cpu_load: Option<Value>,
    pub memory_usage_percentage: Option<Value>,
    pub current_memory_usage: Option<String>,
    pub used_heap_memory: Option<String>,
    pub total_memory: Option<String>,
    pub max_heap_memory: Option<String>,
    pub disk_usage_percentage: Option<Value>,
    pub used_disk_space: Option<String>,
    pub total_disk_space: Option<String>,
    pub free_disk_space: Option<String>,
    pub clients_data_percentage: Option<Value>,
    pub clients_data_size: Option<String>,
    pub clients_file_count: Option<serde_json::Number>,
    pub disk_error: Option<String>,
    pub last_updated_formatted: Option<String>,
}

fn percent(value: &Option<Value>) -> Option<f64> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.map(|p: f64| p.clamp(0.0, 100.0))
}

/// Canonical snapshot; percentages already clamped to `[0, 100]` and the
/// backend's fallback chains resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceSnapshot {
    pub cpu_percent: Option<f64>,
    pub cores: Option<u64>,
    pub system_load_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub memory_used: Option<String>,
    pub memory_total: Option<String>,
    pub disk_percent: Option<f64>,
    pub disk_used: Option<String>,
    pub disk_total: Option<String>,
    pub disk_free: Option<String>,
    pub clients_percent: Option<f64>,
    pub clients_size: Option<String>,
    pub clients_file_count: Option<u64>,
    pub disk_error: Option<String>,
    pub last_updated: String,
}

impl ResourceSnapshot {
    pub fn from_raw(raw: RawResourceSnapshot) -> Self {
        let cpu_percent = percent(&raw.cpu_usage_percentage);
        Self {
            cpu_percent,
            cores: raw.available_processors.and_then(|n| n.as_u64()),
            // overall system load, falling back to the plain CPU reading
            system_load_percent: percent(&raw.system_cpu_load).or(cpu_percent),
            memory_percent: percent(&raw.memory_usage_percentage),
            memory_used: raw.current_memory_usage.or(raw.used_heap_memory),
            memory_total: raw.total_memory.or(raw.max_heap_memory),
            disk_percent: percent(&raw.disk_usage_percentage),
            disk_used: raw.used_disk_space,
            disk_total: raw.total_disk_space,
            disk_free: raw.free_disk_space,
            clients_percent: percent(&raw.clients_data_percentage),
            clients_size: raw.clients_data_size,
            clients_file_count: raw.clients_file_count.and_then(|n| n.as_u64()),
            disk_error: raw.disk_error,
            last_updated: raw
                .last_updated_formatted
                .unwrap_or_else(|| format::format_second(&Local::now())),
        }
    }
}
