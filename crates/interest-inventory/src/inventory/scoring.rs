use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Category, Item, ResponseKey};
use super::validation::ValidatedResponses;

/// Sum of each category's ratings across all items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<Category, u32>);

impl CategoryTotals {
    /// Totals in canonical category order (R, I, A, S, E, C).
    pub fn from_scores(scores: [u32; 6]) -> Self {
        Self(Category::ALL.into_iter().zip(scores).collect())
    }

    pub fn get(&self, category: Category) -> u32 {
        self.0.get(&category).copied().unwrap_or_default()
    }

    /// Totals in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn grand_total(&self) -> u32 {
        self.0.values().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCategory {
    pub category: Category,
    pub total: u32,
    /// Competition rank: tied categories share a rank and the next rank skips.
    pub rank: usize,
}

/// Categories sharing one total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieGroup {
    pub total: u32,
    pub categories: Vec<Category>,
}

/// Totals ordered by score, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankedCategory>,
}

impl Ranking {
    pub fn from_totals(totals: &CategoryTotals) -> Self {
        let mut ordered: Vec<(Category, u32)> = totals.iter().collect();
        // stable: ties keep canonical category order
        ordered.sort_by(|left, right| right.1.cmp(&left.1));

        let mut entries: Vec<RankedCategory> = Vec::with_capacity(ordered.len());
        for (position, (category, total)) in ordered.into_iter().enumerate() {
            let rank = match entries.last() {
                Some(previous) if previous.total == total => previous.rank,
                _ => position + 1,
            };
            entries.push(RankedCategory {
                category,
                total,
                rank,
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[RankedCategory] {
        &self.entries
    }

    pub fn max_score(&self) -> u32 {
        self.entries.first().map_or(0, |entry| entry.total)
    }

    /// Every category tied at the maximum total.
    pub fn highest(&self) -> Vec<Category> {
        let max = self.max_score();
        self.entries
            .iter()
            .take_while(|entry| entry.total == max)
            .map(|entry| entry.category)
            .collect()
    }

    pub fn tie_groups(&self) -> Vec<TieGroup> {
        let mut groups: Vec<TieGroup> = Vec::new();
        for entry in &self.entries {
            match groups.last_mut() {
                Some(group) if group.total == entry.total => group.categories.push(entry.category),
                _ => groups.push(TieGroup {
                    total: entry.total,
                    categories: vec![entry.category],
                }),
            }
        }
        groups
    }
}

/// Sum every category across the six items and rank the results.
pub fn aggregate(responses: &ValidatedResponses) -> (CategoryTotals, Ranking) {
    let scores = Category::ALL.map(|category| {
        Item::ALL
            .into_iter()
            .map(|item| u32::from(responses.rating(ResponseKey::new(item, category))))
            .sum::<u32>()
    });

    let totals = CategoryTotals::from_scores(scores);
    let ranking = Ranking::from_totals(&totals);
    (totals, ranking)
}
