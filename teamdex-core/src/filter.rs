//! Filter engine
//!
//! Pure, order-preserving predicates over a loaded catalog. Cheap enough to
//! re-run on every filter change at catalog scale, so nothing is indexed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::CatalogItem;

/// Active filters. Unset fields do not filter; set fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_term: String,
    pub selected_type: Option<String>,
    pub selected_generation: Option<u8>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
            && self.selected_type.is_none()
            && self.selected_generation.is_none()
    }
}

/// Case-insensitive substring match on the canonical name, or substring
/// match on the localized name when one is known
pub fn search_by_name<'a, I>(items: I, term: &str) -> Vec<&'a CatalogItem>
where
    I: IntoIterator<Item = &'a CatalogItem>,
{
    if term.is_empty() {
        return items.into_iter().collect();
    }

    let term_lower = term.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            item.name().to_lowercase().contains(&term_lower)
                || item.japanese_name().is_some_and(|n| n.contains(term))
        })
        .collect()
}

/// Items whose type set contains `kind`
pub fn filter_by_type<'a, I>(items: I, kind: &str) -> Vec<&'a CatalogItem>
where
    I: IntoIterator<Item = &'a CatalogItem>,
{
    if kind.is_empty() {
        return items.into_iter().collect();
    }
    items.into_iter().filter(|item| item.has_type(kind)).collect()
}

/// Items of exactly `generation`
pub fn filter_by_generation<'a, I>(items: I, generation: u8) -> Vec<&'a CatalogItem>
where
    I: IntoIterator<Item = &'a CatalogItem>,
{
    items
        .into_iter()
        .filter(|item| item.generation() == generation)
        .collect()
}

/// Name filter, then type filter, then generation filter
pub fn apply_filters<'a>(items: &'a [CatalogItem], filters: &FilterState) -> Vec<&'a CatalogItem> {
    let mut filtered = search_by_name(items, &filters.search_term);

    if let Some(kind) = &filters.selected_type {
        filtered = filter_by_type(filtered, kind);
    }

    if let Some(generation) = filters.selected_generation {
        filtered = filter_by_generation(filtered, generation);
    }

    tracing::trace!(
        "Filtered {} -> {} entries ({:?})",
        items.len(),
        filtered.len(),
        filters
    );
    filtered
}

/// Counts before and after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub total: usize,
    pub filtered: usize,
}

impl FilterSummary {
    pub fn of(items: &[CatalogItem], filtered: &[&CatalogItem]) -> Self {
        Self {
            total: items.len(),
            filtered: filtered.len(),
        }
    }
}

/// Number of entries per generation
pub fn generation_distribution(items: &[CatalogItem]) -> BTreeMap<u8, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.generation()).or_insert(0) += 1;
    }
    counts
}

/// Entries per page when browsing the catalog
pub const PAGE_SIZE: usize = 50;

/// One page of a filtered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub items: Vec<&'a CatalogItem>,
    /// 1-based
    pub number: usize,
    pub total_pages: usize,
}

impl Page<'_> {
    pub fn has_more(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Page `number` (1-based, 0 reads as 1) of `items`, `per_page` entries
/// each. Pages past the end are empty.
pub fn paginate<'a>(items: &[&'a CatalogItem], number: usize, per_page: usize) -> Page<'a> {
    let per_page = per_page.max(1);
    let number = number.max(1);
    let start = (number - 1).saturating_mul(per_page);

    Page {
        items: items.iter().skip(start).take(per_page).copied().collect(),
        number,
        total_pages: items.len().div_ceil(per_page),
    }
}
