use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Category, Respondent, ResponseSet, ValidationPolicy};
use super::scoring::CategoryTotals;
use super::validation::ValidatedSubmission;

/// Time source for submission records.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Persistence-ready snapshot of one accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
    timestamp: DateTime<Utc>,
    policy: ValidationPolicy,
    respondent: Respondent,
    totals: CategoryTotals,
    highest: Vec<Category>,
    responses: ResponseSet,
}

impl SubmissionRecord {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn respondent(&self) -> &Respondent {
        &self.respondent
    }

    pub fn totals(&self) -> &CategoryTotals {
        &self.totals
    }

    pub fn highest(&self) -> &[Category] {
        &self.highest
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }
}

/// Assemble a record from an already validated submission and its scores.
pub fn build(
    submission: &ValidatedSubmission,
    totals: &CategoryTotals,
    highest: &[Category],
    clock: &dyn Clock,
) -> SubmissionRecord {
    SubmissionRecord {
        timestamp: clock.now(),
        policy: submission.policy(),
        respondent: submission.respondent().clone(),
        totals: totals.clone(),
        highest: highest.to_vec(),
        responses: submission.responses().as_set().clone(),
    }
}
