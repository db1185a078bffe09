use super::common::*;
use crate::inventory::domain::{Category, Item, ResponseKey, ResponseSet, ValidationPolicy};
use crate::inventory::scoring::aggregate;
use crate::inventory::validation::{validate, ValidatedSubmission};

fn validated(grid: [[i32; 6]; 6]) -> ValidatedSubmission {
    let mut submission = free_scale_submission();
    submission.responses = ResponseSet::from_grid(grid);
    validate(&submission, ValidationPolicy::FreeScale)
        .into_result()
        .expect("grid validates")
}

#[test]
fn totals_sum_each_category_across_items() {
    let submission = validate(
        &permutation_submission(),
        ValidationPolicy::PermutationPerItem,
    )
    .into_result()
    .expect("permutation grid validates");

    let (totals, ranking) = aggregate(submission.responses());

    let scores: Vec<_> = totals.iter().map(|(_, total)| total).collect();
    assert_eq!(scores, vec![33, 29, 26, 17, 12, 9]);
    assert_eq!(ranking.highest(), vec![Category::Realistic]);
    assert_eq!(totals.grand_total(), 6 * 21);
}

#[test]
fn minimum_ratings_hit_the_lower_bound() {
    let submission = validated(REALISTIC_ONLY_GRID);

    let (totals, ranking) = aggregate(submission.responses());

    assert_eq!(totals.get(Category::Realistic), 36);
    for category in &Category::ALL[1..] {
        assert_eq!(totals.get(*category), 6);
    }
    assert_eq!(ranking.max_score(), 36);
}

#[test]
fn totals_stay_in_bounds_and_preserve_the_grand_sum() {
    let grids = [
        [[1; 6]; 6],
        [[6; 6]; 6],
        [
            [3, 1, 6, 2, 5, 4],
            [2, 2, 2, 6, 6, 6],
            [1, 3, 5, 1, 3, 5],
            [6, 5, 4, 3, 2, 1],
            [4, 4, 4, 4, 4, 4],
            [5, 1, 5, 1, 5, 1],
        ],
    ];

    for grid in grids {
        let submission = validated(grid);
        let (totals, _) = aggregate(submission.responses());

        let raw_sum: u32 = grid.iter().flatten().map(|value| *value as u32).sum();
        assert_eq!(totals.grand_total(), raw_sum);
        assert!(totals.iter().all(|(_, total)| (6..=36).contains(&total)));
    }
}

#[test]
fn aggregation_is_repeatable() {
    let submission = validated(PERMUTATION_GRID);

    let first = aggregate(submission.responses());
    let second = aggregate(submission.responses());

    assert_eq!(first, second);
}

#[test]
fn k_way_ties_at_the_top_are_all_highest() {
    // R, A, E each 30; the rest below
    let submission = validated([
        [5, 1, 5, 2, 5, 1],
        [5, 2, 5, 2, 5, 1],
        [5, 3, 5, 2, 5, 1],
        [5, 1, 5, 2, 5, 1],
        [5, 1, 5, 2, 5, 1],
        [5, 1, 5, 2, 5, 1],
    ]);

    let (totals, ranking) = aggregate(submission.responses());

    let highest = ranking.highest();
    assert_eq!(
        highest,
        vec![Category::Realistic, Category::Artistic, Category::Enterprising]
    );
    assert!(highest
        .iter()
        .all(|category| totals.get(*category) == ranking.max_score()));
    assert_eq!(
        submission
            .responses()
            .rating(ResponseKey::new(Item::ALL[2], Category::Investigative)),
        3
    );
}
