use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::catalog::Catalog;
use super::domain::{Category, Submission, ValidationPolicy};
use super::presenter::ResultView;
use super::record::{self, Clock, SubmissionRecord, SystemClock};
use super::scoring::{self, CategoryTotals, Ranking};
use super::store::SubmissionStore;
use super::validation::{ValidatedSubmission, ValidationFailure, Validator};

/// Scores for one validated submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub totals: CategoryTotals,
    pub ranking: Ranking,
    pub highest: Vec<Category>,
    pub view: ResultView,
}

/// Whether the accepted record reached the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceStatus {
    Saved,
    Failed { warning: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedSubmission {
    pub record: SubmissionRecord,
    pub evaluation: Evaluation,
    pub persistence: PersistenceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Rejected(Vec<ValidationFailure>),
    Accepted(Box<AcceptedSubmission>),
}

/// Validation and scoring against one catalog, with no persistence.
#[derive(Clone)]
pub struct Evaluator {
    catalog: Arc<Catalog>,
    validator: Validator,
}

impl Evaluator {
    pub fn new(catalog: Arc<Catalog>, policy: ValidationPolicy) -> Self {
        Self {
            catalog,
            validator: Validator::new(policy),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.validator.policy()
    }

    pub fn evaluate(&self, submission: &Submission) -> Result<Evaluation, Vec<ValidationFailure>> {
        let validated = self.validate(submission)?;
        Ok(self.score(&validated))
    }

    fn validate(
        &self,
        submission: &Submission,
    ) -> Result<ValidatedSubmission, Vec<ValidationFailure>> {
        self.validator.validate(submission).into_result()
    }

    fn score(&self, validated: &ValidatedSubmission) -> Evaluation {
        let (totals, ranking) = scoring::aggregate(validated.responses());
        let highest = ranking.highest();
        let view = ResultView::present(&self.catalog, &totals, &ranking);
        Evaluation {
            totals,
            ranking,
            highest,
            view,
        }
    }
}

/// Service composing the evaluator, clock, and store.
pub struct InventoryService<S> {
    evaluator: Evaluator,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> InventoryService<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(catalog: Arc<Catalog>, policy: ValidationPolicy, store: Arc<S>) -> Self {
        Self::with_clock(catalog, policy, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        catalog: Arc<Catalog>,
        policy: ValidationPolicy,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            evaluator: Evaluator::new(catalog, policy),
            store,
            clock,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.evaluator.catalog()
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.evaluator.policy()
    }

    /// Validate and score without persisting anything.
    pub fn evaluate(&self, submission: &Submission) -> Result<Evaluation, Vec<ValidationFailure>> {
        self.evaluator.evaluate(submission)
    }

    /// Validate, score, and persist one submission. Store failures downgrade to a warning.
    pub fn submit(&self, submission: &Submission) -> SubmissionOutcome {
        let validated = match self.evaluator.validate(submission) {
            Ok(validated) => validated,
            Err(failures) => {
                info!(
                    policy = self.policy().label(),
                    failures = failures.len(),
                    "submission rejected"
                );
                return SubmissionOutcome::Rejected(failures);
            }
        };

        let evaluation = self.evaluator.score(&validated);
        let record = record::build(
            &validated,
            &evaluation.totals,
            &evaluation.highest,
            self.clock.as_ref(),
        );

        let persistence = match self.store.append(&record) {
            Ok(()) => PersistenceStatus::Saved,
            Err(err) => {
                warn!(error = %err, "submission scored but not persisted");
                PersistenceStatus::Failed {
                    warning: format!("results were not saved: {err}"),
                }
            }
        };

        info!(
            policy = self.policy().label(),
            highest = %join_codes(&evaluation.highest),
            saved = matches!(persistence, PersistenceStatus::Saved),
            "submission accepted"
        );

        SubmissionOutcome::Accepted(Box::new(AcceptedSubmission {
            record,
            evaluation,
            persistence,
        }))
    }
}

fn join_codes(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|category| category.code())
        .collect::<Vec<_>>()
        .join(",")
}
