//! Facet tags used to narrow the catalog by category or place type.
//!
//! The static [`FACET_OPTIONS`] table lists the tags offered to users and
//! which record dimension each one belongs to. Matching itself is
//! dimension-agnostic: a record matches a tag when either its category or
//! its place type carries that wire name.

use std::collections::BTreeSet;

use crate::{Category, DestinationRecord, PlaceType};

/// Record dimension a facet tag is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetDimension {
    /// Matches against [`DestinationRecord::place_type`].
    PlaceType,
    /// Matches against [`DestinationRecord::category`].
    Category,
}

/// A selectable facet shown in the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetOption {
    /// Tag stored in a [`FacetSelection`].
    pub id: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Dimension the tag belongs to.
    pub dimension: FacetDimension,
}

/// Facets offered by the catalog, place types first.
pub const FACET_OPTIONS: &[FacetOption] = &[
    option("mountain", "Mountains", FacetDimension::PlaceType),
    option("monastery", "Monasteries", FacetDimension::PlaceType),
    option("lake", "Lakes", FacetDimension::PlaceType),
    option("viewpoint", "Viewpoints", FacetDimension::PlaceType),
    option("park", "Parks", FacetDimension::PlaceType),
    option("festival", "Festivals", FacetDimension::PlaceType),
    option("hotel", "Hotels", FacetDimension::Category),
    option("tourist_spot", "Tourist Spots", FacetDimension::Category),
    option("nature_point", "Nature Points", FacetDimension::Category),
    option("cultural_site", "Cultural Sites", FacetDimension::Category),
];

const fn option(id: &'static str, label: &'static str, dimension: FacetDimension) -> FacetOption {
    FacetOption {
        id,
        label,
        dimension,
    }
}

/// Look up a facet option by tag.
///
/// # Examples
/// ```
/// use yatra_core::{FacetDimension, facet_option};
///
/// let lakes = facet_option("lake").expect("lake is a known facet");
/// assert_eq!(lakes.label, "Lakes");
/// assert_eq!(lakes.dimension, FacetDimension::PlaceType);
/// assert!(facet_option("glacier").is_none());
/// ```
pub fn facet_option(id: &str) -> Option<&'static FacetOption> {
    FACET_OPTIONS.iter().find(|option| option.id == id)
}

/// Iterate the facet options belonging to `dimension`, in table order.
pub fn options_for(dimension: FacetDimension) -> impl Iterator<Item = &'static FacetOption> {
    FACET_OPTIONS
        .iter()
        .filter(move |option| option.dimension == dimension)
}

/// A set of selected facet tags.
///
/// Tags are trimmed and lower-cased on entry; blank tags are ignored.
/// Iteration is sorted, so insertion order never matters.
///
/// # Examples
/// ```
/// use yatra_core::FacetSelection;
///
/// let mut facets = FacetSelection::from_tags(["Lake", "monastery", "lake"]);
/// assert_eq!(facets.len(), 2);
/// assert!(!facets.toggle("lake"));
/// assert_eq!(facets.iter().collect::<Vec<_>>(), vec!["monastery"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    tags: BTreeSet<String>,
}

impl FacetSelection {
    /// Construct an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a selection from raw tags.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for tag in tags {
            selection.insert(tag.as_ref());
        }
        selection
    }

    /// Select a tag. Returns `true` when it was not already selected.
    pub fn insert(&mut self, tag: &str) -> bool {
        normalise(tag).is_some_and(|tag| self.tags.insert(tag))
    }

    /// Deselect a tag. Returns `true` when it was selected.
    pub fn remove(&mut self, tag: &str) -> bool {
        normalise(tag).is_some_and(|tag| self.tags.remove(&tag))
    }

    /// Flip a tag and return whether it is selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        let Some(tag) = normalise(tag) else {
            return false;
        };
        if self.tags.remove(&tag) {
            false
        } else {
            self.tags.insert(tag);
            true
        }
    }

    /// Whether the tag is selected.
    pub fn contains(&self, tag: &str) -> bool {
        normalise(tag).is_some_and(|tag| self.tags.contains(&tag))
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Number of selected tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Iterate selected tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Selected tags that appear in [`FACET_OPTIONS`], in table order.
    pub fn selected_options(&self) -> Vec<&'static FacetOption> {
        FACET_OPTIONS
            .iter()
            .filter(|option| self.tags.contains(option.id))
            .collect()
    }

    /// Whether `record` passes the facet step.
    ///
    /// An empty selection passes everything; otherwise the record's
    /// category or place type must equal at least one selected tag.
    /// `Uncategorized` values never match a tag.
    pub fn matches(&self, record: &DestinationRecord) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        let category = (record.category != Category::Uncategorized)
            .then_some(record.category.as_str());
        let place_type = (record.place_type != PlaceType::Uncategorized)
            .then_some(record.place_type.as_str());
        [category, place_type]
            .into_iter()
            .flatten()
            .any(|tag| self.tags.contains(tag))
    }
}

impl<S: AsRef<str>> FromIterator<S> for FacetSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tags(iter)
    }
}

fn normalise(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
