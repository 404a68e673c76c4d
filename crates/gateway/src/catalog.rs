//! In-memory restaurant catalog.
//!
//! Reference implementation of the resolver and search collaborators,
//! backed by restaurant menu JSON documents loaded at startup.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use mealroute_core::traits::{MealSearcher, RestaurantResolver};
use mealroute_core::types::{
    Constraints, Macros, MatchType, MealItem, NormalizedSearchRequest, RestaurantCandidate,
    RestaurantMatch, SearchPage,
};
use mealroute_core::{Error, Result};

use crate::keywords::{is_forbidden_token, MACRO_KEYWORDS, MEAL_TIME_NOUNS};

/// Items at or below this many calories are single ingredients, not meals.
pub const MIN_MEAL_CALORIES: f64 = 100.0;

/// Calories recorded for items whose menu entry has none.
pub const MISSING_CALORIES: f64 = 999.0;

/// Name or category fragments marking kids-menu items.
pub const KIDS_PATTERNS: &[&str] = &["kid's", "kids", "kid ", "children", "kiddie"];

/// Minimum fuzzy score for a resolver candidate.
pub const FUZZY_THRESHOLD: f64 = 0.5;

/// Score given when one name contains the other as whole words.
const CONTAINMENT_SCORE: f64 = 0.85;

/// Words that carry no dish content.
const FILLER_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "i", "im", "s", "is", "are", "what", "whats", "something",
    "anything", "food", "foods", "meal", "meals", "menu", "menus", "item", "items", "option",
    "options", "good", "best", "healthy", "like", "can", "could", "would", "should", "have",
    "there", "please", "up", "out", "dish", "dishes", "go", "eating", "grab", "try", "us",
    "show", "me", "find", "get", "give", "want", "need", "eat", "order", "looking", "recommend",
    "suggest", "craving", "hungry", "search", "nearby", "here",
];

// =============================================================================
// Menu documents
// =============================================================================

/// A restaurant menu document as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuDocument {
    pub restaurant_name: String,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub items: Vec<MenuRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuRecord {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub macros: MacroRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MacroRecord {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
}

/// Why an item was dropped at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    KidsItem,
    LowCalorie,
}

/// Menu cleanup rule: kids items and single-ingredient items go. An item
/// without calories counts as [`MISSING_CALORIES`] and stays.
pub fn removal_reason(record: &MenuRecord) -> Option<RemovalReason> {
    let name = record.name.to_lowercase();
    let category = record.category.as_deref().unwrap_or_default().to_lowercase();
    if KIDS_PATTERNS
        .iter()
        .any(|p| name.contains(p) || category.contains(p))
    {
        return Some(RemovalReason::KidsItem);
    }
    if record.macros.calories.unwrap_or(MISSING_CALORIES) <= MIN_MEAL_CALORIES {
        return Some(RemovalReason::LowCalorie);
    }
    None
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone)]
struct RestaurantEntry {
    name: String,
    id: Option<String>,
    aliases: Vec<String>,
    normalized_names: Vec<String>,
    items: Vec<MealItem>,
}

impl RestaurantEntry {
    fn from_document(doc: MenuDocument) -> Self {
        let id = doc.restaurant_id.clone();
        let slug = normalize(&doc.restaurant_name).replace(' ', "-");
        let mut kept = Vec::new();
        let mut removed = 0usize;
        for (index, record) in doc.items.into_iter().enumerate() {
            if let Some(reason) = removal_reason(&record) {
                tracing::debug!(restaurant = %doc.restaurant_name, item = %record.name, ?reason, "Dropping menu item");
                removed += 1;
                continue;
            }
            kept.push(MealItem {
                id: format!("{}-{}", id.as_deref().unwrap_or(&slug), index),
                name: record.name,
                restaurant: doc.restaurant_name.clone(),
                restaurant_id: id.clone(),
                category: record.category,
                macros: Macros {
                    calories: record.macros.calories.unwrap_or(MISSING_CALORIES),
                    protein: record.macros.protein.unwrap_or_default(),
                    carbs: record.macros.carbs.unwrap_or_default(),
                    fat: record.macros.fat.unwrap_or_default(),
                },
            });
        }
        if removed > 0 {
            tracing::info!(restaurant = %doc.restaurant_name, removed, kept = kept.len(), "Cleaned menu");
        }

        let normalized_names = std::iter::once(&doc.restaurant_name)
            .chain(doc.aliases.iter())
            .map(|n| normalize(n))
            .filter(|n| !n.is_empty())
            .collect();

        Self {
            name: doc.restaurant_name,
            id,
            aliases: doc.aliases,
            normalized_names,
            items: kept,
        }
    }

    fn variants(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.aliases.iter().cloned())
            .collect()
    }

    fn to_match(&self, match_type: MatchType) -> RestaurantMatch {
        if self.items.is_empty() {
            return RestaurantMatch::NoMenuItems {
                canonical_name: self.name.clone(),
            };
        }
        RestaurantMatch::Match {
            canonical_name: self.name.clone(),
            id: self.id.clone(),
            variants: self.variants(),
            match_type,
        }
    }

    fn score(&self, query: &str) -> f64 {
        self.normalized_names
            .iter()
            .map(|name| similarity(query, name))
            .fold(0.0, f64::max)
    }
}

/// Catalog of restaurants and their cleaned menus.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    restaurants: Vec<RestaurantEntry>,
    unavailable: bool,
}

impl InMemoryCatalog {
    pub fn from_documents(documents: Vec<MenuDocument>) -> Self {
        let mut restaurants: Vec<RestaurantEntry> = documents
            .into_iter()
            .map(RestaurantEntry::from_document)
            .collect();
        restaurants.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            restaurants,
            unavailable: false,
        }
    }

    /// Parse a single menu document.
    pub fn parse_document(json: &str) -> Result<MenuDocument> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load every `*.json` menu document in `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            Error::initialization(format!("Cannot read catalog dir {}: {}", dir.display(), e))
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                Error::initialization(format!("Cannot read {}: {}", path.display(), e))
            })?;
            documents.push(Self::parse_document(&raw)?);
        }

        let catalog = Self::from_documents(documents);
        tracing::info!(
            dir = %dir.display(),
            restaurants = catalog.restaurants.len(),
            items = catalog.item_count(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// A catalog whose every call fails, for a service started without data.
    pub fn unavailable() -> Self {
        Self {
            restaurants: Vec::new(),
            unavailable: true,
        }
    }

    pub fn restaurant_count(&self) -> usize {
        self.restaurants.len()
    }

    pub fn item_count(&self) -> usize {
        self.restaurants.iter().map(|r| r.items.len()).sum()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::initialization("catalog is not loaded"));
        }
        Ok(())
    }

    fn resolve(&self, text: &str) -> RestaurantMatch {
        let query = normalize(text);
        if query.is_empty() {
            return RestaurantMatch::NotFound {
                query_text: None,
            };
        }

        for entry in &self.restaurants {
            if normalize(&entry.name) == query {
                return entry.to_match(MatchType::Exact);
            }
        }
        for entry in &self.restaurants {
            if entry.normalized_names.iter().skip(1).any(|alias| *alias == query) {
                return entry.to_match(MatchType::Alias);
            }
        }

        let mut scored: Vec<(&RestaurantEntry, f64)> = self
            .restaurants
            .iter()
            .map(|entry| (entry, entry.score(&query)))
            .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.name.cmp(&b.0.name)));

        match scored.as_slice() {
            [] => RestaurantMatch::NotFound {
                query_text: Some(text.trim().to_string()),
            },
            [(entry, _)] => entry.to_match(MatchType::Fuzzy),
            many => RestaurantMatch::Ambiguous {
                candidates: many
                    .iter()
                    .map(|(entry, score)| RestaurantCandidate {
                        name: entry.name.clone(),
                        score: *score,
                    })
                    .collect(),
            },
        }
    }

    fn restaurant_tokens(&self) -> HashSet<&str> {
        self.restaurants
            .iter()
            .flat_map(|r| r.normalized_names.iter())
            .flat_map(|n| n.split(' '))
            .collect()
    }

    fn matches_constraints(item: &MealItem, constraints: &Constraints) -> bool {
        let macros = &item.macros;
        let within = |value: f64, min: Option<f64>, max: Option<f64>| {
            min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
        };
        within(
            macros.calories,
            constraints.min_calories,
            constraints.effective_max_calories(),
        ) && within(macros.protein, constraints.min_protein, constraints.max_protein)
            && within(macros.carbs, constraints.min_carbs, constraints.max_carbs)
            && within(macros.fat, constraints.min_fats, constraints.max_fats)
    }

    fn search(&self, request: &NormalizedSearchRequest) -> SearchPage {
        let restaurant_tokens = self.restaurant_tokens();
        let query_tokens: Vec<String> = content_tokens(&request.query)
            .filter(|t| !restaurant_tokens.contains(t.as_str()))
            .map(singular)
            .collect();

        let matches: Vec<&MealItem> = self
            .restaurants
            .iter()
            .filter(|entry| match request.restaurant.as_ref() {
                Some(identity) => {
                    identity.matches(&entry.name)
                        || (identity.id.is_some() && identity.id == entry.id)
                }
                None => true,
            })
            .flat_map(|entry| entry.items.iter())
            .filter(|item| Self::matches_constraints(item, &request.constraints))
            .filter(|item| {
                request.constraints.breakfast != Some(true)
                    || item_text(item).to_lowercase().contains("breakfast")
            })
            .filter(|item| {
                if query_tokens.is_empty() {
                    return true;
                }
                let words: HashSet<String> = normalize(&item_text(item))
                    .split(' ')
                    .map(|w| singular(w.to_string()))
                    .collect();
                query_tokens.iter().any(|t| words.contains(t))
            })
            .collect();

        let total = matches.len();
        let meals: Vec<MealItem> = matches
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect();
        let next_offset = request.offset + meals.len();

        SearchPage {
            has_more: next_offset < total,
            next_offset,
            search_key: search_key(request),
            meals,
        }
    }
}

#[async_trait]
impl RestaurantResolver for InMemoryCatalog {
    async fn resolve_restaurant(&self, text: &str) -> Result<RestaurantMatch> {
        self.ensure_available()?;
        Ok(self.resolve(text))
    }

    async fn is_restaurant_only_query(&self, text: &str, matched: bool) -> Result<bool> {
        self.ensure_available()?;
        if !matched {
            return Ok(false);
        }
        let restaurant_tokens = self.restaurant_tokens();
        let has_digits = text.chars().any(|c| c.is_ascii_digit());
        let leftover = content_tokens(text).any(|t| !restaurant_tokens.contains(t.as_str()));
        Ok(!has_digits && !leftover)
    }
}

#[async_trait]
impl MealSearcher for InMemoryCatalog {
    async fn execute_search(&self, request: &NormalizedSearchRequest) -> Result<SearchPage> {
        self.ensure_available()?;
        Ok(self.search(request))
    }
}

// =============================================================================
// Text helpers
// =============================================================================

/// Lowercase, drop apostrophes, turn other punctuation into spaces.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '’'))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokens that could describe a dish.
fn content_tokens(text: &str) -> impl Iterator<Item = String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .filter(|t| !t.chars().any(|c| c.is_ascii_digit()))
        .filter(|t| !FILLER_WORDS.contains(t))
        .filter(|t| !MEAL_TIME_NOUNS.contains(t) && !MACRO_KEYWORDS.contains(&singular(t.to_string()).as_str()))
        .filter(|t| !is_forbidden_token(t))
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}

fn singular(word: String) -> String {
    match word.strip_suffix('s') {
        Some(stem) if stem.len() > 2 && !stem.ends_with('s') => stem.to_string(),
        _ => word,
    }
}

fn item_text(item: &MealItem) -> String {
    match item.category.as_deref() {
        Some(category) => format!("{} {}", item.name, category),
        None => item.name.clone(),
    }
}

/// Token-set similarity, boosted when one name contains the other.
fn similarity(a: &str, b: &str) -> f64 {
    let a_tokens: HashSet<&str> = a.split(' ').collect();
    let b_tokens: HashSet<&str> = b.split(' ').collect();
    let intersection = a_tokens.intersection(&b_tokens).count() as f64;
    let union = a_tokens.union(&b_tokens).count() as f64;
    let jaccard = if union == 0.0 { 0.0 } else { intersection / union };

    let padded_a = format!(" {} ", a);
    let padded_b = format!(" {} ", b);
    if padded_a.contains(&padded_b) || padded_b.contains(&padded_a) {
        jaccard.max(CONTAINMENT_SCORE)
    } else {
        jaccard
    }
}

/// Deterministic key for a search request.
fn search_key(request: &NormalizedSearchRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(request).unwrap_or_default());
    format!("{:x}", hasher.finalize())
}
