//! End-to-end scoring and persistence through the public service facade, backed by a CSV
//! sheet so each scenario can inspect exactly what a spreadsheet operator would see.

mod common {
    use std::path::Path;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use interest_inventory::inventory::{
        Catalog, CsvSheetGateway, FixedClock, InventoryService, Respondent, ResponseSet,
        Submission, TabularSubmissionStore, ValidationPolicy,
    };

    pub(super) type CsvStore = TabularSubmissionStore<CsvSheetGateway>;

    pub(super) fn service(path: &Path, policy: ValidationPolicy) -> InventoryService<CsvStore> {
        let clock = FixedClock(
            Utc.with_ymd_and_hms(2025, 6, 2, 14, 5, 0)
                .single()
                .expect("valid timestamp"),
        );
        InventoryService::with_clock(
            Arc::new(Catalog::standard().expect("standard catalog")),
            policy,
            Arc::new(TabularSubmissionStore::new(CsvSheetGateway::new(path))),
            Arc::new(clock),
        )
    }

    pub(super) fn submission(grid: [[i32; 6]; 6]) -> Submission {
        Submission {
            respondent: Respondent {
                name: " Siti Mariam ".to_string(),
                email: Some("siti@example.net".to_string()),
                institution_code: Some("SMK-0310".to_string()),
            },
            responses: ResponseSet::from_grid(grid),
        }
    }

    pub(super) fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .expect("csv opens");
        reader
            .records()
            .map(|record| {
                record
                    .expect("csv record")
                    .iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }
}

use common::{read_rows, service, submission};
use interest_inventory::inventory::{
    Category, FailureKind, PersistenceStatus, SubmissionOutcome, ValidationPolicy,
};

/// Investigative and Social tie at the top; the rest trail.
const TIED_GRID: [[i32; 6]; 6] = [
    [2, 6, 3, 5, 4, 1],
    [1, 5, 4, 6, 3, 2],
    [3, 6, 1, 5, 2, 4],
    [2, 5, 3, 6, 4, 1],
    [4, 6, 2, 5, 1, 3],
    [1, 5, 3, 6, 2, 4],
];

#[test]
fn permutation_submission_is_scored_and_written_as_one_row() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("results.csv");
    let service = service(&path, ValidationPolicy::PermutationPerItem);

    let accepted = match service.submit(&submission(TIED_GRID)) {
        SubmissionOutcome::Accepted(accepted) => accepted,
        SubmissionOutcome::Rejected(failures) => panic!("unexpected rejection: {failures:?}"),
    };

    assert_eq!(accepted.persistence, PersistenceStatus::Saved);
    assert_eq!(
        accepted.evaluation.highest,
        vec![Category::Investigative, Category::Social]
    );
    assert_eq!(accepted.evaluation.totals.get(Category::Investigative), 33);
    assert_eq!(accepted.evaluation.totals.get(Category::Social), 33);
    assert_eq!(accepted.evaluation.totals.grand_total(), 126);

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        vec![
            "Timestamp",
            "Name",
            "Institution Code",
            "R",
            "I",
            "A",
            "S",
            "E",
            "C",
            "Highest",
            "Responses"
        ]
    );
    assert_eq!(rows[1][0], "2025-06-02 14:05:00");
    assert_eq!(rows[1][1], "Siti Mariam");
    assert_eq!(rows[1][2], "SMK-0310");
    assert_eq!(&rows[1][3..9], ["13", "33", "16", "33", "16", "15"]);
    assert_eq!(rows[1][9], "I, S");

    let responses: serde_json::Value = serde_json::from_str(&rows[1][10]).expect("json cell");
    assert_eq!(responses.as_object().map(|cells| cells.len()), Some(36));
    assert_eq!(responses["I_1"], 6);
}

#[test]
fn second_submission_reuses_existing_header() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("results.csv");

    for _ in 0..2 {
        let service = service(&path, ValidationPolicy::PermutationPerItem);
        let outcome = service.submit(&submission(TIED_GRID));
        assert!(matches!(outcome, SubmissionOutcome::Accepted(_)));
    }

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], "Timestamp");
    assert_eq!(rows[1], rows[2]);
}

#[test]
fn mismatched_sheet_keeps_results_and_reports_warning() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("results.csv");

    let permutation = service(&path, ValidationPolicy::PermutationPerItem);
    assert!(matches!(
        permutation.submit(&submission(TIED_GRID)),
        SubmissionOutcome::Accepted(_)
    ));

    let free_scale = service(&path, ValidationPolicy::FreeScale);
    let accepted = match free_scale.submit(&submission([[2; 6]; 6])) {
        SubmissionOutcome::Accepted(accepted) => accepted,
        SubmissionOutcome::Rejected(failures) => panic!("unexpected rejection: {failures:?}"),
    };

    match &accepted.persistence {
        PersistenceStatus::Failed { warning } => {
            assert!(warning.starts_with("results were not saved"))
        }
        PersistenceStatus::Saved => panic!("header mismatch should not be saved"),
    }
    assert_eq!(accepted.evaluation.highest.len(), 6);
    assert_eq!(read_rows(&path).len(), 2);
}

#[test]
fn rejected_submission_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("results.csv");
    let service = service(&path, ValidationPolicy::PermutationPerItem);

    let mut grid = TIED_GRID;
    grid[2][0] = 6;
    let mut incomplete = submission(grid);
    incomplete.respondent.institution_code = Some("   ".to_string());

    let failures = match service.submit(&incomplete) {
        SubmissionOutcome::Rejected(failures) => failures,
        SubmissionOutcome::Accepted(_) => panic!("submission should be rejected"),
    };

    let kinds: Vec<FailureKind> = failures.iter().map(|failure| failure.kind()).collect();
    assert_eq!(
        kinds,
        vec![FailureKind::InvalidDistribution, FailureKind::MissingIdentity]
    );
    assert_eq!(failures[0].items().len(), 1);
    assert_eq!(failures[0].items()[0].index(), 3);
    assert!(!path.exists());
}
