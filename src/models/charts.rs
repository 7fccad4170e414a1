use serde::Deserialize;
use std::collections::HashMap;

/// The two chart surfaces on the dashboard.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChartKind {
    OperationTypes,
    Timeline,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::OperationTypes => "Operations by type",
            ChartKind::Timeline => "Operations, last 7 days",
        }
    }
}

/// Payload of the chart endpoints: `labels` and `data` in matching order,
/// plus an optional label-to-description lookup on the type chart.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawChartPayload {
    pub labels: Option<Vec<String>>,
    pub data: Option<Vec<serde_json::Number>>,
    pub descriptions: Option<HashMap<String, String>>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Ordered series ready for a renderer; labels already decorated through the
/// payload's description lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// `None` means the payload carries nothing drawable and the surface
    /// should show its no-data state instead of an empty chart.
    pub fn from_raw(raw: RawChartPayload) -> Option<Self> {
        let labels = raw.labels.filter(|l| !l.is_empty())?;
        let data = raw.data.unwrap_or_default();
        let descriptions = raw.descriptions.unwrap_or_default();
        let points = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let value = data.get(i).and_then(|n| n.as_f64()).unwrap_or(0.0);
                let label = descriptions.get(&label).cloned().unwrap_or(label);
                ChartPoint { label, value }
            })
            .collect();
        Some(Self { points })
    }
}
