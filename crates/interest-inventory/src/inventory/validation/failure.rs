use serde::{Deserialize, Serialize};

use super::super::domain::{IdentityField, Item, ResponseKey};

/// Recoverable failure categories reported back to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    IncompleteResponse,
    OutOfRange,
    InvalidDistribution,
    MissingIdentity,
}

/// A rating outside the scale, reported with its cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfRangeCell {
    pub key: ResponseKey,
    pub value: i64,
}

/// An item whose ratings are not a permutation of the scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDistribution {
    pub item: Item,
    pub ratings: Vec<i64>,
    pub repeated: Vec<i64>,
    pub unused: Vec<i64>,
}

/// One validation failure with the exact cells, items, or fields at fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationFailure {
    IncompleteResponse { missing: Vec<ResponseKey> },
    OutOfRange { cells: Vec<OutOfRangeCell> },
    InvalidDistribution { items: Vec<ItemDistribution> },
    MissingIdentity { fields: Vec<IdentityField> },
}

impl ValidationFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            ValidationFailure::IncompleteResponse { .. } => FailureKind::IncompleteResponse,
            ValidationFailure::OutOfRange { .. } => FailureKind::OutOfRange,
            ValidationFailure::InvalidDistribution { .. } => FailureKind::InvalidDistribution,
            ValidationFailure::MissingIdentity { .. } => FailureKind::MissingIdentity,
        }
    }

    /// Cells the form should highlight for correction.
    pub fn cells(&self) -> Vec<ResponseKey> {
        match self {
            ValidationFailure::IncompleteResponse { missing } => missing.clone(),
            ValidationFailure::OutOfRange { cells } => cells.iter().map(|cell| cell.key).collect(),
            ValidationFailure::InvalidDistribution { .. }
            | ValidationFailure::MissingIdentity { .. } => Vec::new(),
        }
    }

    pub fn items(&self) -> Vec<Item> {
        match self {
            ValidationFailure::InvalidDistribution { items } => {
                items.iter().map(|entry| entry.item).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            ValidationFailure::IncompleteResponse { missing } => {
                format!("missing ratings for {}", join(missing))
            }
            ValidationFailure::OutOfRange { cells } => {
                let listed = cells
                    .iter()
                    .map(|cell| format!("{}={}", cell.key, cell.value))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("ratings must be between 1 and 6: {listed}")
            }
            ValidationFailure::InvalidDistribution { items } => {
                let listed = items
                    .iter()
                    .map(|entry| entry.item.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("each of 1-6 must be used exactly once within item(s) {listed}")
            }
            ValidationFailure::MissingIdentity { fields } => {
                let listed = fields
                    .iter()
                    .map(|field| field.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("required respondent field(s) empty: {listed}")
            }
        }
    }
}

fn join(keys: &[ResponseKey]) -> String {
    keys.iter()
        .map(ResponseKey::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
