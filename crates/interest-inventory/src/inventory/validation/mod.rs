mod failure;
mod rules;

pub use failure::{FailureKind, ItemDistribution, OutOfRangeCell, ValidationFailure};

use super::domain::{Respondent, ResponseKey, ResponseSet, Submission, ValidationPolicy};
use serde::Serialize;

/// Stateless validator applying one policy to complete submissions.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Run every check and collect all failures in one pass.
    pub fn validate(&self, submission: &Submission) -> ValidationResult {
        let failures: Vec<ValidationFailure> = [
            rules::check_completeness(&submission.responses),
            rules::check_range(&submission.responses),
            rules::check_distribution(&submission.responses, self.policy),
            rules::check_identity(&submission.respondent, self.policy),
        ]
        .into_iter()
        .flatten()
        .collect();

        if failures.is_empty() {
            ValidationResult::Valid(ValidatedSubmission {
                respondent: submission.respondent.clone(),
                responses: ValidatedResponses(submission.responses.clone()),
                policy: self.policy,
            })
        } else {
            ValidationResult::Invalid(failures)
        }
    }
}

pub fn validate(submission: &Submission, policy: ValidationPolicy) -> ValidationResult {
    Validator::new(policy).validate(submission)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid(ValidatedSubmission),
    Invalid(Vec<ValidationFailure>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn into_result(self) -> Result<ValidatedSubmission, Vec<ValidationFailure>> {
        match self {
            ValidationResult::Valid(validated) => Ok(validated),
            ValidationResult::Invalid(failures) => Err(failures),
        }
    }
}

/// A submission that passed validation. Only the validator can construct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    respondent: Respondent,
    responses: ValidatedResponses,
    policy: ValidationPolicy,
}

impl ValidatedSubmission {
    pub fn respondent(&self) -> &Respondent {
        &self.respondent
    }

    pub fn responses(&self) -> &ValidatedResponses {
        &self.responses
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }
}

/// Complete, in-range ratings: all 36 cells present, each within the scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedResponses(ResponseSet);

impl ValidatedResponses {
    pub fn rating(&self, key: ResponseKey) -> u8 {
        self.0
            .get(&key)
            .and_then(|value| u8::try_from(value).ok())
            .unwrap_or_default()
    }

    pub fn as_set(&self) -> &ResponseSet {
        &self.0
    }
}
