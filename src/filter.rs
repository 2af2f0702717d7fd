//! Client-side filtering and sorting of fetched listings.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{GeoPoint, Product, Resort, Sight};

/// What the filter and sort logic needs to know about an item.
pub trait Listing {
    fn name(&self) -> &str;

    fn categories(&self) -> Vec<&str>;

    /// Text searched by the free-text query.
    fn search_text(&self) -> String;

    /// Numeric sort key: price for products, altitude for resorts.
    fn rank(&self) -> Option<f64> {
        None
    }

    fn location(&self) -> Option<GeoPoint>;
}

impl Listing for Sight {
    fn name(&self) -> &str { &self.name }

    fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(String::as_str).collect()
    }

    fn search_text(&self) -> String {
        [Some(self.name.as_str()), self.description.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn location(&self) -> Option<GeoPoint> { self.location }
}

impl Listing for Resort {
    fn name(&self) -> &str { &self.name }

    fn categories(&self) -> Vec<&str> {
        self.region.as_deref().into_iter().collect()
    }

    fn search_text(&self) -> String {
        match &self.region {
            Some(region) => format!("{} {}", self.name, region),
            None => self.name.clone(),
        }
    }

    fn rank(&self) -> Option<f64> { self.altitude_m }

    fn location(&self) -> Option<GeoPoint> { self.location }
}

impl Listing for Product {
    fn name(&self) -> &str { &self.name }

    fn categories(&self) -> Vec<&str> {
        self.category.as_deref().into_iter().collect()
    }

    fn search_text(&self) -> String {
        match &self.description {
            Some(desc) => format!("{} {}", self.name, desc),
            None => self.name.clone(),
        }
    }

    fn rank(&self) -> Option<f64> { self.price_chf }

    fn location(&self) -> Option<GeoPoint> { self.location }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Name,
    NameDesc,
    RankAsc,
    RankDesc,
}

impl SortBy {
    pub fn label_key(self) -> &'static str {
        match self {
            SortBy::Name     => "sort.name",
            SortBy::NameDesc => "sort.nameDesc",
            SortBy::RankAsc  => "sort.rankAsc",
            SortBy::RankDesc => "sort.rankDesc",
        }
    }
}

/// Filter state held by a listing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub query:      String,
    /// Empty means "all categories".
    pub categories: BTreeSet<String>,
    pub sort:       SortBy,
}

impl ListingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, q: impl Into<String>) -> Self {
        self.query = q.into(); self
    }

    pub fn category(mut self, c: impl Into<String>) -> Self {
        self.categories.insert(c.into()); self
    }

    pub fn sort(mut self, s: SortBy) -> Self {
        self.sort = s; self
    }

    pub fn toggle_category(&mut self, c: &str) {
        if !self.categories.remove(c) {
            self.categories.insert(c.to_string());
        }
    }

    pub fn clear(&mut self) {
        *self = Self { sort: self.sort, ..Self::default() };
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || !self.categories.is_empty()
    }

    pub fn matches<T: Listing>(&self, item: &T) -> bool {
        let needle = self.query.trim().to_lowercase();
        if !needle.is_empty() && !item.search_text().to_lowercase().contains(&needle) {
            return false;
        }
        self.categories.is_empty()
            || item.categories().iter().any(|c| self.categories.contains(*c))
    }

    /// Matching items in display order. The sort is stable; items without a
    /// rank go last for both rank orders.
    pub fn apply<'a, T: Listing>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut out: Vec<&T> = items.iter().filter(|i| self.matches(*i)).collect();
        match self.sort {
            SortBy::Name     => out.sort_by(|a, b| by_name(*a, *b)),
            SortBy::NameDesc => out.sort_by(|a, b| by_name(*b, *a)),
            SortBy::RankAsc  => out.sort_by(|a, b| by_rank(a.rank(), b.rank(), false)),
            SortBy::RankDesc => out.sort_by(|a, b| by_rank(a.rank(), b.rank(), true)),
        }
        out
    }
}

fn by_name<T: Listing>(a: &T, b: &T) -> Ordering {
    a.name().to_lowercase().cmp(&b.name().to_lowercase())
}

fn by_rank(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None)    => Ordering::Less,
        (None, Some(_))    => Ordering::Greater,
        (None, None)       => Ordering::Equal,
    }
}

/// Items that can be placed on the map, with their coordinates.
pub fn markers<'a, T: Listing>(items: impl IntoIterator<Item = &'a T>) -> Vec<(&'a T, GeoPoint)>
where
    T: 'a,
{
    items
        .into_iter()
        .filter_map(|i| i.location().map(|p| (i, p)))
        .collect()
}

/// Distinct categories across `items`, sorted, for building filter options.
pub fn distinct_categories<T: Listing>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .flat_map(|i| i.categories())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
