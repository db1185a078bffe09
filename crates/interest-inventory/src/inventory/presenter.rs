use serde::Serialize;

use super::catalog::Catalog;
use super::domain::Category;
use super::scoring::{CategoryTotals, Ranking};

/// Number of categories featured ahead of the rest.
pub const TOP_CATEGORY_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub category: Category,
    pub name: &'static str,
    pub score: u32,
    pub rank: usize,
    pub description: String,
    pub highlighted: bool,
}

/// Ranked, annotated results ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub entries: Vec<ResultEntry>,
}

impl ResultView {
    pub fn present(catalog: &Catalog, totals: &CategoryTotals, ranking: &Ranking) -> Self {
        let highest = ranking.highest();
        let entries = ranking
            .entries()
            .iter()
            .map(|entry| ResultEntry {
                category: entry.category,
                name: entry.category.name(),
                score: totals.get(entry.category),
                rank: entry.rank,
                description: catalog.description(entry.category).to_string(),
                highlighted: highest.contains(&entry.category),
            })
            .collect();

        Self { entries }
    }

    pub fn top_categories(&self) -> &[ResultEntry] {
        &self.entries[..TOP_CATEGORY_COUNT.min(self.entries.len())]
    }

    pub fn other_categories(&self) -> &[ResultEntry] {
        &self.entries[TOP_CATEGORY_COUNT.min(self.entries.len())..]
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter().filter(|entry| entry.highlighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_every_category_in_the_highest_set() {
        let catalog = Catalog::standard().expect("standard catalog loads");
        let totals = CategoryTotals::from_scores([20, 20, 18, 15, 12, 10]);
        let ranking = Ranking::from_totals(&totals);

        let view = ResultView::present(&catalog, &totals, &ranking);

        let highlighted: Vec<_> = view.highlighted().map(|entry| entry.category).collect();
        assert_eq!(
            highlighted,
            vec![Category::Realistic, Category::Investigative]
        );
        assert_eq!(view.entries[2].score, 18);
        assert!(view.entries[0].description.starts_with("REALISTIC"));
    }

    #[test]
    fn splits_top_three_from_the_rest() {
        let catalog = Catalog::standard().expect("standard catalog loads");
        let totals = CategoryTotals::from_scores([8, 30, 25, 22, 7, 6]);
        let ranking = Ranking::from_totals(&totals);

        let view = ResultView::present(&catalog, &totals, &ranking);

        let top: Vec<_> = view
            .top_categories()
            .iter()
            .map(|e| e.category)
            .collect();
        assert_eq!(
            top,
            vec![Category::Investigative, Category::Artistic, Category::Social]
        );
        assert_eq!(view.other_categories().len(), 3);
        assert_eq!(view.other_categories()[2].category, Category::Conventional);
    }
}
