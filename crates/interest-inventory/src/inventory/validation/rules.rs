use super::super::catalog::{RATING_MAX, RATING_MIN};
use super::super::domain::{Item, Respondent, ResponseKey, ResponseSet, ValidationPolicy};
use super::failure::{ItemDistribution, OutOfRangeCell, ValidationFailure};

pub(crate) fn check_completeness(responses: &ResponseSet) -> Option<ValidationFailure> {
    let missing: Vec<ResponseKey> = ResponseKey::all()
        .filter(|key| responses.get(key).is_none())
        .collect();

    (!missing.is_empty()).then_some(ValidationFailure::IncompleteResponse { missing })
}

pub(crate) fn check_range(responses: &ResponseSet) -> Option<ValidationFailure> {
    let cells: Vec<OutOfRangeCell> = responses
        .iter()
        .filter(|(_, value)| !(RATING_MIN..=RATING_MAX).contains(value))
        .map(|(key, value)| OutOfRangeCell { key, value })
        .collect();

    (!cells.is_empty()).then_some(ValidationFailure::OutOfRange { cells })
}

/// Rows with absent cells are skipped; completeness already reports them.
pub(crate) fn check_distribution(
    responses: &ResponseSet,
    policy: ValidationPolicy,
) -> Option<ValidationFailure> {
    if policy != ValidationPolicy::PermutationPerItem {
        return None;
    }

    let items: Vec<ItemDistribution> = Item::ALL
        .into_iter()
        .filter_map(|item| {
            let ratings = responses
                .row(item)
                .into_iter()
                .collect::<Option<Vec<i64>>>()?;
            row_distribution(item, ratings)
        })
        .collect();

    (!items.is_empty()).then_some(ValidationFailure::InvalidDistribution { items })
}

fn row_distribution(item: Item, ratings: Vec<i64>) -> Option<ItemDistribution> {
    let mut repeated = Vec::new();
    let mut unused = Vec::new();

    for value in RATING_MIN..=RATING_MAX {
        let uses = ratings.iter().filter(|rating| **rating == value).count();
        match uses {
            0 => unused.push(value),
            1 => {}
            _ => repeated.push(value),
        }
    }

    if repeated.is_empty() && unused.is_empty() {
        return None;
    }

    Some(ItemDistribution {
        item,
        ratings,
        repeated,
        unused,
    })
}

pub(crate) fn check_identity(
    respondent: &Respondent,
    policy: ValidationPolicy,
) -> Option<ValidationFailure> {
    let fields: Vec<_> = policy
        .required_identity()
        .into_iter()
        .filter(|field| {
            respondent
                .field(*field)
                .map_or(true, |value| value.trim().is_empty())
        })
        .collect();

    (!fields.is_empty()).then_some(ValidationFailure::MissingIdentity { fields })
}
