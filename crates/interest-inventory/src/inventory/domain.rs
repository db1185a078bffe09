use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Interest dimension scored by the inventory, serialized by its one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "R")]
    Realistic,
    #[serde(rename = "I")]
    Investigative,
    #[serde(rename = "A")]
    Artistic,
    #[serde(rename = "S")]
    Social,
    #[serde(rename = "E")]
    Enterprising,
    #[serde(rename = "C")]
    Conventional,
}

impl Category {
    /// Canonical column order used for totals, rankings among ties, and persisted rows.
    pub const ALL: [Category; 6] = [
        Category::Realistic,
        Category::Investigative,
        Category::Artistic,
        Category::Social,
        Category::Enterprising,
        Category::Conventional,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Category::Realistic => "R",
            Category::Investigative => "I",
            Category::Artistic => "A",
            Category::Social => "S",
            Category::Enterprising => "E",
            Category::Conventional => "C",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::Realistic => "Realistic",
            Category::Investigative => "Investigative",
            Category::Artistic => "Artistic",
            Category::Social => "Social",
            Category::Enterprising => "Enterprising",
            Category::Conventional => "Conventional",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Row index of the prompt grid, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Item(u8);

impl Item {
    pub const COUNT: u8 = 6;

    pub const ALL: [Item; 6] = [Item(1), Item(2), Item(3), Item(4), Item(5), Item(6)];

    pub fn new(index: u8) -> Option<Self> {
        (1..=Self::COUNT).contains(&index).then_some(Self(index))
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Item {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Item::new(value).ok_or_else(|| format!("item {value} is outside 1..={}", Item::COUNT))
    }
}

impl From<Item> for u8 {
    fn from(item: Item) -> Self {
        item.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of one cell in the grid, written on the wire as `"<code>_<item>"` (e.g. `"E_4"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResponseKey {
    pub item: Item,
    pub category: Category,
}

impl ResponseKey {
    pub const fn new(item: Item, category: Category) -> Self {
        Self { item, category }
    }

    /// Every key of a complete grid, item-major in canonical category order.
    pub fn all() -> impl Iterator<Item = ResponseKey> {
        Item::ALL.into_iter().flat_map(|item| {
            Category::ALL
                .into_iter()
                .map(move |category| ResponseKey::new(item, category))
        })
    }
}

impl fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.category.code(), self.item)
    }
}

impl FromStr for ResponseKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (code, index) = raw
            .trim()
            .split_once('_')
            .ok_or_else(|| format!("response key '{raw}' must look like 'R_1'"))?;
        let category = Category::from_code(code)
            .ok_or_else(|| format!("response key '{raw}' names an unknown category"))?;
        let item = index
            .parse::<u8>()
            .ok()
            .and_then(Item::new)
            .ok_or_else(|| format!("response key '{raw}' names an unknown item"))?;
        Ok(Self::new(item, category))
    }
}

impl TryFrom<String> for ResponseKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResponseKey> for String {
    fn from(key: ResponseKey) -> Self {
        key.to_string()
    }
}

/// Raw ratings keyed by cell. Values are kept unclamped so validation can report them;
/// `null` cells deserialize as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseSet(BTreeMap<ResponseKey, i64>);

impl<'de> Deserialize<'de> for ResponseSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cells = BTreeMap::<ResponseKey, Option<i64>>::deserialize(deserializer)?;
        Ok(cells
            .into_iter()
            .filter_map(|(key, rating)| rating.map(|rating| (key, rating)))
            .collect())
    }
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a row-major grid: `grid[item - 1][n]` rates `Category::ALL[n]`.
    pub fn from_grid(grid: [[i32; 6]; 6]) -> Self {
        let mut responses = Self::new();
        for (item, row) in Item::ALL.into_iter().zip(grid) {
            for (category, rating) in Category::ALL.into_iter().zip(row) {
                responses.insert(ResponseKey::new(item, category), i64::from(rating));
            }
        }
        responses
    }

    pub fn insert(&mut self, key: ResponseKey, rating: i64) -> Option<i64> {
        self.0.insert(key, rating)
    }

    pub fn remove(&mut self, key: &ResponseKey) -> Option<i64> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &ResponseKey) -> Option<i64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResponseKey, i64)> + '_ {
        self.0.iter().map(|(key, rating)| (*key, *rating))
    }

    /// Ratings of one item in canonical category order; `None` for absent cells.
    pub fn row(&self, item: Item) -> [Option<i64>; 6] {
        Category::ALL.map(|category| self.get(&ResponseKey::new(item, category)))
    }
}

impl FromIterator<(ResponseKey, i64)> for ResponseSet {
    fn from_iter<T: IntoIterator<Item = (ResponseKey, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identity fields captured alongside the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_code: Option<String>,
}

impl Respondent {
    pub fn field(&self, field: IdentityField) -> Option<&str> {
        match field {
            IdentityField::Name => Some(self.name.as_str()),
            IdentityField::Email => self.email.as_deref(),
            IdentityField::InstitutionCode => self.institution_code.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    Name,
    Email,
    InstitutionCode,
}

impl IdentityField {
    pub const fn label(self) -> &'static str {
        match self {
            IdentityField::Name => "Name",
            IdentityField::Email => "Email",
            IdentityField::InstitutionCode => "Institution Code",
        }
    }
}

/// Rule set applied to a grid before it may be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Every rating independently within the scale.
    FreeScale,
    /// Each item's six ratings must use every scale value exactly once.
    PermutationPerItem,
}

impl ValidationPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationPolicy::FreeScale => "free_scale",
            ValidationPolicy::PermutationPerItem => "permutation_per_item",
        }
    }

    pub const fn required_identity(self) -> [IdentityField; 2] {
        match self {
            ValidationPolicy::FreeScale => [IdentityField::Name, IdentityField::Email],
            ValidationPolicy::PermutationPerItem => {
                [IdentityField::Name, IdentityField::InstitutionCode]
            }
        }
    }

    /// The identity column persisted next to the respondent's name.
    pub const fn contact_field(self) -> IdentityField {
        self.required_identity()[1]
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "free" | "free_scale" => Ok(ValidationPolicy::FreeScale),
            "permutation" | "permutation_per_item" => Ok(ValidationPolicy::PermutationPerItem),
            other => Err(format!(
                "unknown policy '{other}' (expected free_scale or permutation)"
            )),
        }
    }
}

/// One respondent's complete hand-off from the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub respondent: Respondent,
    #[serde(default)]
    pub responses: ResponseSet,
}
