use crate::utils::format;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// Shown in the start-time column when the backend omits the timestamp or
/// sends one that does not parse.
const START_TIME_PLACEHOLDER: &str = "01.03.2025 12:00";
const CLIENT_PLACEHOLDER: &str = "Client";
const SOURCE_PLACEHOLDER: &str = "file.csv";

/// Closed set of operation types the backend reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationType {
    Import,
    Export,
    ProductUpdate,
    PriceUpdate,
}

impl OperationType {
    pub const ALL: [OperationType; 4] = [
        OperationType::Import,
        OperationType::Export,
        OperationType::ProductUpdate,
        OperationType::PriceUpdate,
    ];

    pub fn code(self) -> &'static str {
        match self {
            OperationType::Import => "IMPORT",
            OperationType::Export => "EXPORT",
            OperationType::ProductUpdate => "PRODUCT_UPDATE",
            OperationType::PriceUpdate => "PRICE_UPDATE",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl OperationStatus {
    pub fn code(self) -> &'static str {
        match self {
            OperationStatus::Pending => "PENDING",
            OperationStatus::InProgress => "IN_PROGRESS",
            OperationStatus::Completed => "COMPLETED",
            OperationStatus::Failed => "FAILED",
            OperationStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Filter selected by the operations table triggers: a concrete type, or the
/// `ALL` sentinel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationFilter {
    All,
    Kind(OperationType),
}

impl OperationFilter {
    /// Query-parameter value for the operations endpoint.
    pub fn code(&self) -> &'static str {
        match self {
            OperationFilter::All => "ALL",
            OperationFilter::Kind(kind) => kind.code(),
        }
    }

    /// Parses trigger input. Blank or unrecognized input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.eq_ignore_ascii_case("ALL") {
            return Some(OperationFilter::All);
        }
        OperationType::parse(trimmed).map(OperationFilter::Kind)
    }
}

static TYPE_DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("IMPORT", "Import"),
        ("EXPORT", "Export"),
        ("PRODUCT_UPDATE", "Product update"),
        ("PRICE_UPDATE", "Price update"),
    ])
});

static STATUS_DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("PENDING", "Pending"),
        ("IN_PROGRESS", "In progress"),
        ("COMPLETED", "Completed"),
        ("FAILED", "Failed"),
        ("CANCELLED", "Cancelled"),
    ])
});

/// Description for a type code; unknown codes describe themselves.
pub fn describe_operation_type(code: &str) -> &str {
    TYPE_DESCRIPTIONS.get(code).copied().unwrap_or(code)
}

/// Description for a status code; unknown codes describe themselves.
pub fn describe_status(code: &str) -> &str {
    STATUS_DESCRIPTIONS.get(code).copied().unwrap_or(code)
}

/// Badge tier for the status column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Badge {
    Success,
    Primary,
    Danger,
    Secondary,
    Warning,
}

impl Badge {
    pub fn as_str(self) -> &'static str {
        match self {
            Badge::Success => "success",
            Badge::Primary => "primary",
            Badge::Danger => "danger",
            Badge::Secondary => "secondary",
            Badge::Warning => "warning",
        }
    }
}

/// Warning covers PENDING and any code outside the known set.
pub fn badge_for_status(code: &str) -> Badge {
    match code {
        "COMPLETED" => Badge::Success,
        "IN_PROGRESS" => Badge::Primary,
        "FAILED" => Badge::Danger,
        "CANCELLED" => Badge::Secondary,
        _ => Badge::Warning,
    }
}

/// An enum-valued field as the backend delivers it: some endpoints send the
/// bare code, others a `{name, description}` object. Anything else is kept
/// as a raw JSON value and stringified during normalization.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawEnumField {
    Detailed {
        name: Option<String>,
        code: Option<String>,
        description: Option<String>,
    },
    Code(String),
    Other(serde_json::Value),
}

/// Canonical form of a dual-shape enum field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumValue {
    pub code: String,
    pub description: String,
}

impl EnumValue {
    pub fn of(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

/// Resolves a dual-shape field against its flattened sibling description
/// (`typeDescription` / `statusDescription`) and the static lookup table.
/// Never fails; `default` covers the absent case.
fn normalize_enum_field(
    raw: Option<RawEnumField>,
    sibling_description: Option<String>,
    describe: fn(&str) -> &str,
    default: EnumValue,
) -> EnumValue {
    let Some(raw) = raw else {
        return default;
    };
    match raw {
        RawEnumField::Detailed {
            name,
            code,
            description,
        } => {
            let code = name.or(code).unwrap_or(default.code);
            let description = description
                .or(sibling_description)
                .unwrap_or_else(|| describe(&code).to_string());
            EnumValue { code, description }
        }
        RawEnumField::Code(code) => {
            let description = sibling_description.unwrap_or_else(|| describe(&code).to_string());
            EnumValue { code, description }
        }
        RawEnumField::Other(value) => {
            let code = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            let description = sibling_description.unwrap_or_else(|| describe(&code).to_string());
            EnumValue { code, description }
        }
    }
}

/// Operation entry as returned by `/api/operations`. Every field is optional;
/// normalization supplies the defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOperation {
    pub id: Option<serde_json::Number>,
    pub start_time: Option<String>,
    pub start_time_formatted: Option<String>,
    pub client_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<RawEnumField>,
    pub type_description: Option<String>,
    pub status: Option<RawEnumField>,
    pub status_description: Option<String>,
    pub source_identifier: Option<String>,
    pub processed_records: Option<serde_json::Number>,
    pub total_records: Option<serde_json::Number>,
}

fn count(value: Option<serde_json::Number>) -> u64 {
    value
        .and_then(|n| {
            n.as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        })
        .unwrap_or(0)
}

/// One row of the operations table, already display-normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationRecord {
    pub id: u64,
    pub start_time: String,
    pub client_name: String,
    pub kind: EnumValue,
    pub source: String,
    pub processed: u64,
    pub total: u64,
    pub status: EnumValue,
}

impl OperationRecord {
    /// Canonicalizes a raw backend entry. Infallible: missing or malformed
    /// fields degrade to placeholders rather than dropping the row.
    pub fn from_raw(raw: RawOperation) -> Self {
        let start_time = raw
            .start_time_formatted
            .or_else(|| {
                raw.start_time
                    .as_deref()
                    .and_then(format::format_backend_timestamp)
            })
            .unwrap_or_else(|| START_TIME_PLACEHOLDER.to_string());
        let kind = normalize_enum_field(
            raw.kind,
            raw.type_description,
            describe_operation_type,
            EnumValue::of("UNKNOWN", "Unknown"),
        );
        let status = normalize_enum_field(
            raw.status,
            raw.status_description,
            describe_status,
            EnumValue::of(
                OperationStatus::Pending.code(),
                describe_status(OperationStatus::Pending.code()),
            ),
        );
        Self {
            id: count(raw.id),
            start_time,
            client_name: raw
                .client_name
                .unwrap_or_else(|| CLIENT_PLACEHOLDER.to_string()),
            kind,
            source: raw
                .source_identifier
                .unwrap_or_else(|| SOURCE_PLACEHOLDER.to_string()),
            processed: count(raw.processed_records),
            total: count(raw.total_records),
            status,
        }
    }

    /// "processed/total" column value.
    pub fn progress(&self) -> String {
        format!("{}/{}", self.processed, self.total)
    }

    pub fn details_path(&self) -> String {
        format!("/operations/{}/details", self.id)
    }

    pub fn badge(&self) -> Badge {
        badge_for_status(&self.status.code)
    }
}
