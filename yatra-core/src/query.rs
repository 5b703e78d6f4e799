//! The user's current search: free text plus selected facets.

use crate::{DestinationRecord, FacetSelection, filter};

/// Free-text query and facet selection for a browsing session.
///
/// The state never resets itself; callers re-run [`QueryState::apply`]
/// after every change.
///
/// # Examples
/// ```
/// use yatra_core::QueryState;
///
/// let mut query = QueryState::new();
/// query.set_query("lake");
/// assert!(query.toggle_facet("nature_point"));
/// assert!(!query.is_empty());
///
/// query.clear_query();
/// query.clear_facets();
/// assert!(query.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    text: String,
    facets: FacetSelection,
}

impl QueryState {
    /// Construct an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw free-text query, as typed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The selected facets.
    pub fn facets(&self) -> &FacetSelection {
        &self.facets
    }

    /// Replace the free-text query.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Clear the free-text query, keeping facets.
    pub fn clear_query(&mut self) {
        self.text.clear();
    }

    /// Replace the facet selection.
    pub fn set_facets(&mut self, facets: FacetSelection) {
        self.facets = facets;
    }

    /// Flip one facet and return whether it is selected afterwards.
    pub fn toggle_facet(&mut self, tag: &str) -> bool {
        self.facets.toggle(tag)
    }

    /// Clear every selected facet, keeping the text.
    pub fn clear_facets(&mut self) {
        self.facets.clear();
    }

    /// Whether neither text nor facets constrain the view.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.facets.is_empty()
    }

    /// Filter `records` with this query.
    pub fn apply<'a>(&self, records: &'a [DestinationRecord]) -> Vec<&'a DestinationRecord> {
        filter(records, &self.text, &self.facets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, PlaceType};
    use rstest::rstest;

    #[rstest]
    fn whitespace_only_text_counts_as_empty() {
        let mut query = QueryState::new();
        query.set_query("   ");
        assert!(query.is_empty());
        assert_eq!(query.text(), "   ");
    }

    #[rstest]
    fn clearing_text_keeps_facets() {
        let mut query = QueryState::new();
        query.set_query("rumtek");
        query.toggle_facet("monastery");
        query.clear_query();
        assert_eq!(query.text(), "");
        assert!(query.facets().contains("monastery"));
    }

    #[rstest]
    fn apply_delegates_to_filter() {
        let records = vec![
            DestinationRecord::new("a", "Rumtek Monastery", Category::Monastery, PlaceType::Monastery),
            DestinationRecord::new("b", "Tsomgo Lake", Category::NaturePoint, PlaceType::Lake),
        ];
        let mut query = QueryState::new();
        query.set_facets(FacetSelection::from_tags(["monastery"]));
        let found = query.apply(&records);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "a");
    }
}
