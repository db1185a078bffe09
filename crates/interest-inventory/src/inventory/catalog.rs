use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{Category, Item};

const STANDARD_CATALOG: &str = include_str!("../../catalog/standard.json");

/// Lowest and highest value of the rating scale.
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 6;

/// Errors raised while loading catalog data. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unable to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog defines {found} items, expected {expected}")]
    ItemCount { expected: usize, found: usize },
    #[error("catalog defines item {0} more than once")]
    DuplicateItem(Item),
    #[error("catalog item {item} has no prompt for category {category}")]
    MissingPrompt { item: Item, category: Category },
    #[error("catalog has no description for category {0}")]
    MissingDescription(Category),
    #[error("catalog rating scale has no label for value {0}")]
    MissingScaleLabel(i64),
    #[error("catalog rating scale defines value {0} outside the supported range")]
    UnexpectedScaleValue(u8),
}

/// Immutable prompt grid, category descriptions, and rating scale labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    version: String,
    rating_scale: BTreeMap<u8, String>,
    prompts: BTreeMap<Item, BTreeMap<Category, String>>,
    descriptions: BTreeMap<Category, String>,
}

impl Catalog {
    /// The instrument shipped with the crate.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json(STANDARD_CATALOG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let CatalogDocument {
            version,
            rating_scale,
            items,
            descriptions,
        } = document;

        if items.len() != Item::ALL.len() {
            return Err(CatalogError::ItemCount {
                expected: Item::ALL.len(),
                found: items.len(),
            });
        }

        let mut prompts = BTreeMap::new();
        for entry in items {
            if prompts.contains_key(&entry.item) {
                return Err(CatalogError::DuplicateItem(entry.item));
            }
            for category in Category::ALL {
                let present = entry
                    .prompts
                    .get(&category)
                    .is_some_and(|prompt| !prompt.trim().is_empty());
                if !present {
                    return Err(CatalogError::MissingPrompt {
                        item: entry.item,
                        category,
                    });
                }
            }
            prompts.insert(entry.item, entry.prompts);
        }

        for category in Category::ALL {
            if descriptions
                .get(&category)
                .map_or(true, |text| text.trim().is_empty())
            {
                return Err(CatalogError::MissingDescription(category));
            }
        }

        if let Some(value) = rating_scale
            .keys()
            .find(|value| !(RATING_MIN..=RATING_MAX).contains(&i64::from(**value)))
        {
            return Err(CatalogError::UnexpectedScaleValue(*value));
        }
        for value in RATING_MIN..=RATING_MAX {
            let label = u8::try_from(value)
                .ok()
                .and_then(|key| rating_scale.get(&key));
            if label.map_or(true, |text| text.trim().is_empty()) {
                return Err(CatalogError::MissingScaleLabel(value));
            }
        }

        Ok(Self {
            version,
            rating_scale,
            prompts,
            descriptions,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn prompt(&self, item: Item, category: Category) -> &str {
        self.prompts
            .get(&item)
            .and_then(|row| row.get(&category))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Prompts of one item in canonical category order.
    pub fn item_prompts(&self, item: Item) -> impl Iterator<Item = (Category, &str)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.prompt(item, category)))
    }

    pub fn description(&self, category: Category) -> &str {
        self.descriptions
            .get(&category)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn scale_label(&self, rating: i64) -> Option<&str> {
        u8::try_from(rating)
            .ok()
            .and_then(|key| self.rating_scale.get(&key))
            .map(String::as_str)
    }

    pub fn rating_scale(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        self.rating_scale
            .iter()
            .map(|(value, label)| (*value, label.as_str()))
    }

    /// Serializable form, identical in shape to the catalog data file.
    pub fn document(&self) -> CatalogDocument {
        CatalogDocument {
            version: self.version.clone(),
            rating_scale: self.rating_scale.clone(),
            items: self
                .prompts
                .iter()
                .map(|(item, prompts)| ItemPrompts {
                    item: *item,
                    prompts: prompts.clone(),
                })
                .collect(),
            descriptions: self.descriptions.clone(),
        }
    }
}

/// On-disk catalog format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub version: String,
    pub rating_scale: BTreeMap<u8, String>,
    pub items: Vec<ItemPrompts>,
    pub descriptions: BTreeMap<Category, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrompts {
    pub item: Item,
    pub prompts: BTreeMap<Category, String>,
}
