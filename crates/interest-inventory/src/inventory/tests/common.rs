use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::inventory::catalog::Catalog;
use crate::inventory::domain::{Respondent, ResponseSet, Submission, ValidationPolicy};
use crate::inventory::record::{self, FixedClock, SubmissionRecord};
use crate::inventory::scoring;
use crate::inventory::service::InventoryService;
use crate::inventory::store::{
    MemorySheetGateway, StoreError, SubmissionStore, TabularSubmissionStore,
};
use crate::inventory::validation::{validate, ValidationResult};

pub(crate) type MemoryStore = TabularSubmissionStore<MemorySheetGateway>;

/// Each row is a permutation of 1..=6. Totals: R33 I29 A26 S17 E12 C9.
pub(crate) const PERMUTATION_GRID: [[i32; 6]; 6] = [
    [6, 5, 4, 3, 2, 1],
    [6, 4, 5, 3, 1, 2],
    [5, 6, 4, 2, 3, 1],
    [6, 5, 3, 4, 1, 2],
    [4, 6, 5, 1, 3, 2],
    [6, 3, 5, 4, 2, 1],
];

/// Realistic rated 6 on every item, everything else 1.
pub(crate) const REALISTIC_ONLY_GRID: [[i32; 6]; 6] = [[6, 1, 1, 1, 1, 1]; 6];

pub(crate) fn fixed_clock() -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .single()
            .expect("valid timestamp"),
    )
}

pub(crate) fn student() -> Respondent {
    Respondent {
        name: "Aisyah Rahman".to_string(),
        email: None,
        institution_code: Some("SMK-0421".to_string()),
    }
}

pub(crate) fn adult() -> Respondent {
    Respondent {
        name: "Aisyah Rahman".to_string(),
        email: Some("aisyah@example.edu".to_string()),
        institution_code: None,
    }
}

pub(crate) fn permutation_submission() -> Submission {
    Submission {
        respondent: student(),
        responses: ResponseSet::from_grid(PERMUTATION_GRID),
    }
}

pub(crate) fn free_scale_submission() -> Submission {
    Submission {
        respondent: adult(),
        responses: ResponseSet::from_grid(REALISTIC_ONLY_GRID),
    }
}

fn record_for(submission: &Submission, policy: ValidationPolicy) -> SubmissionRecord {
    let validated = match validate(submission, policy) {
        ValidationResult::Valid(validated) => validated,
        ValidationResult::Invalid(failures) => panic!("fixture should validate: {failures:?}"),
    };
    let (totals, ranking) = scoring::aggregate(validated.responses());
    record::build(&validated, &totals, &ranking.highest(), &fixed_clock())
}

pub(crate) fn accepted_record() -> SubmissionRecord {
    record_for(
        &permutation_submission(),
        ValidationPolicy::PermutationPerItem,
    )
}

pub(crate) fn free_scale_record() -> SubmissionRecord {
    record_for(&free_scale_submission(), ValidationPolicy::FreeScale)
}

pub(crate) fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::standard().expect("standard catalog loads"))
}

pub(crate) fn build_service(
    policy: ValidationPolicy,
) -> (InventoryService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(TabularSubmissionStore::new(MemorySheetGateway::default()));
    let service =
        InventoryService::with_clock(catalog(), policy, store.clone(), Arc::new(fixed_clock()));
    (service, store)
}

pub(crate) fn failing_service(policy: ValidationPolicy) -> InventoryService<UnavailableStore> {
    InventoryService::with_clock(
        catalog(),
        policy,
        Arc::new(UnavailableStore),
        Arc::new(fixed_clock()),
    )
}

pub(crate) struct UnavailableStore;

impl SubmissionStore for UnavailableStore {
    fn append(&self, _record: &SubmissionRecord) -> Result<(), StoreError> {
        Err(StoreError::Transient("spreadsheet offline".to_string()))
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
