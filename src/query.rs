//! Generic search / filter / sort / paginate engine
//!
//! Records are queried through their JSON projection, so any `Serialize` type
//! whose fields serialize to scalars (or nested scalars) can be listed.

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;
use utoipa::ToSchema;

/// Fixed page size of every list view
pub const PAGE_SIZE: usize = 10;

/// Case-fold and strip combining diacritics (U+0300..U+036F)
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// A record type the engine can list
pub trait Queryable: Serialize {
    /// Fields the free-text search looks at, `None` for every field
    fn search_fields() -> Option<&'static [&'static str]> {
        None
    }
}

fn project<T: Serialize>(record: &T) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// String form of a projected field; null/missing become ""
pub fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            let mut parts = Vec::new();
            collect_scalars(other, &mut parts);
            parts.join(" ")
        }
    }
}

fn collect_scalars(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Array(items) => items.iter().for_each(|v| collect_scalars(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_scalars(v, out)),
        scalar => out.push(field_text(Some(scalar))),
    }
}

/// Does `term` (already normalized) occur in any searchable field
fn matches_search<T: Queryable>(projection: &Map<String, Value>, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    match T::search_fields() {
        Some(fields) => fields
            .iter()
            .any(|f| normalize_text(&field_text(projection.get(*f))).contains(term)),
        None => projection
            .values()
            .any(|v| normalize_text(&field_text(Some(v))).contains(term)),
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Exact-match field constraints with governing/dependent pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    values: IndexMap<String, String>,
    /// (governing field, dependent field)
    dependencies: Vec<(&'static str, &'static str)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `dependent`'s options are narrowed by `governing`
    pub fn with_dependency(mut self, governing: &'static str, dependent: &'static str) -> Self {
        self.dependencies.push((governing, dependent));
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Set a constraint. An empty value removes it. Changing a governing
    /// field to a different value clears its dependents.
    pub fn set(&mut self, field: &str, value: &str) {
        let previous = self.get(field).unwrap_or_default().to_string();
        if value.is_empty() {
            self.values.shift_remove(field);
        } else {
            self.values.insert(field.to_string(), value.to_string());
        }

        if previous != value {
            let dependents: Vec<&str> = self
                .dependencies
                .iter()
                .filter(|(governing, _)| *governing == field)
                .map(|(_, dependent)| *dependent)
                .collect();
            for dependent in dependents {
                self.values.shift_remove(dependent);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn matches(&self, projection: &Map<String, Value>) -> bool {
        self.values
            .iter()
            .all(|(field, value)| field_text(projection.get(field)) == *value)
    }

    /// Keep the records satisfying every constraint
    pub fn apply<'a, T: Serialize>(&self, records: &'a [T]) -> Vec<&'a T> {
        records
            .iter()
            .filter(|r| self.matches(&project(*r)))
            .collect()
    }

    /// Distinct non-empty values of each field, in first-seen order.
    /// A dependent field only lists values compatible with its governing
    /// field's current selection.
    pub fn options<T: Serialize>(&self, records: &[T], fields: &[&str]) -> IndexMap<String, Vec<String>> {
        let projections: Vec<_> = records.iter().map(project).collect();

        fields
            .iter()
            .map(|field| {
                let governing = self
                    .dependencies
                    .iter()
                    .find(|(_, dependent)| dependent == field)
                    .and_then(|(governing, _)| self.get(governing).map(|v| (*governing, v)));

                let values: IndexSet<String> = projections
                    .iter()
                    .filter(|p| match governing {
                        Some((g, v)) => field_text(p.get(g)) == v,
                        None => true,
                    })
                    .map(|p| field_text(p.get(*field)))
                    .filter(|v| !v.is_empty())
                    .collect();

                (field.to_string(), values.into_iter().collect())
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => field_text(a).cmp(&field_text(b)),
    }
}

/// Stable single-key sort; descending reverses the comparator
pub fn sort_records<T: Serialize>(records: &mut Vec<&T>, spec: &SortSpec) {
    let mut keyed: Vec<(Option<Value>, &T)> = records
        .drain(..)
        .map(|r| (project(r).remove(&spec.field), r))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_values(a.as_ref(), b.as_ref());
        match spec.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });

    records.extend(keyed.into_iter().map(|(_, r)| r));
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Current page over a result set of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    total_items: usize,
}

impl Pager {
    pub fn new(total_items: usize) -> Self {
        Self { page: 1, total_items }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(PAGE_SIZE)
    }

    /// Move to `page` if it lies in [1, total_pages]. Returns whether the
    /// move was accepted; a rejected move keeps the current page.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.page = page;
            true
        } else {
            false
        }
    }

    /// Index range of the current page
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * PAGE_SIZE).min(self.total_items);
        let end = (start + PAGE_SIZE).min(self.total_items);
        start..end
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

// ---------------------------------------------------------------------------
// List view
// ---------------------------------------------------------------------------

/// Search term, filters, sort and current page of one list
#[derive(Debug, Clone)]
pub struct ListView {
    search: String,
    filters: FilterSet,
    sort: Option<SortSpec>,
    page: usize,
}

impl ListView {
    pub fn new(filters: FilterSet) -> Self {
        Self {
            search: String::new(),
            filters,
            sort: None,
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Changing the search term goes back to page 1
    pub fn set_search(&mut self, term: &str) {
        if self.search != term {
            self.search = term.to_string();
            self.page = 1;
        }
    }

    /// Changing a filter goes back to page 1
    pub fn set_filter(&mut self, field: &str, value: &str) {
        let before = self.filters.clone();
        self.filters.set(field, value);
        if self.filters != before {
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = Some(sort);
    }

    /// Search, filter and sort `records`, unpaginated
    pub fn select<'a, T: Queryable>(&self, records: &'a [T]) -> Vec<&'a T> {
        let term = normalize_text(self.search.trim());
        let mut selected: Vec<&T> = records
            .iter()
            .filter(|r| {
                let projection = project(*r);
                matches_search::<T>(&projection, &term) && self.filters.matches(&projection)
            })
            .collect();

        if let Some(sort) = &self.sort {
            sort_records(&mut selected, sort);
        }
        selected
    }

    /// Request `page` for `records`; out-of-range requests keep the
    /// current page. Returns whether the request was accepted.
    pub fn go_to_page<T: Queryable>(&mut self, records: &[T], page: usize) -> bool {
        let mut pager = self.pager(self.select(records).len());
        let accepted = pager.go_to_page(page);
        self.page = pager.page();
        accepted
    }

    fn pager(&self, total_items: usize) -> Pager {
        let mut pager = Pager::new(total_items);
        pager.go_to_page(self.page);
        pager
    }

    /// The current page of results
    pub fn paginate<T: Queryable + Clone>(&self, records: &[T]) -> Page<T> {
        let selected = self.select(records);
        let pager = self.pager(selected.len());
        Page {
            items: selected[pager.range()].iter().map(|r| (*r).clone()).collect(),
            total: selected.len(),
            page: pager.page(),
            per_page: PAGE_SIZE,
            total_pages: pager.total_pages(),
        }
    }
}
