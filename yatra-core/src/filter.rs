//! Free-text and facet filtering over an in-memory record set.
//!
//! [`filter`] is pure: it never mutates its input, holds no state between
//! calls and returns matches in input order. It is cheap enough to run on
//! every keystroke for catalogs of a few thousand records; debouncing is the
//! caller's concern.

use crate::{DestinationRecord, FacetSelection};

/// Return the records that pass both the text step and the facet step.
///
/// The text step splits the trimmed, lower-cased query on whitespace; a
/// record passes when any term is a substring of its name, description,
/// address or any feature tag. A blank query passes everything. The facet
/// step is [`FacetSelection::matches`].
///
/// # Examples
/// ```
/// use yatra_core::{Category, DestinationRecord, FacetSelection, PlaceType, filter};
///
/// let records = vec![
///     DestinationRecord::new("a", "Rumtek Monastery", Category::Monastery, PlaceType::Monastery),
///     DestinationRecord::new("b", "Tsomgo Lake", Category::NaturePoint, PlaceType::Lake),
/// ];
///
/// let by_text = filter(&records, "lake", &FacetSelection::new());
/// assert_eq!(by_text.len(), 1);
/// assert_eq!(by_text[0].id.as_str(), "b");
///
/// let both = filter(&records, "monastery", &FacetSelection::from_tags(["lake"]));
/// assert!(both.is_empty());
/// ```
pub fn filter<'a>(
    records: &'a [DestinationRecord],
    query: &str,
    facets: &FacetSelection,
) -> Vec<&'a DestinationRecord> {
    let terms = search_terms(query);
    records
        .iter()
        .filter(|record| facets.matches(record) && matches_terms(record, &terms))
        .collect()
}

/// Split a query into lower-cased search terms.
///
/// Returns an empty vector for blank input.
pub fn search_terms(query: &str) -> Vec<String> {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Whether any term occurs in any searchable field of `record`.
///
/// Terms must already be lower-cased. An empty term list matches.
pub fn matches_terms(record: &DestinationRecord, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let fields = searchable_fields(record);
    terms
        .iter()
        .any(|term| fields.iter().any(|field| field.contains(term.as_str())))
}

fn searchable_fields(record: &DestinationRecord) -> Vec<String> {
    let mut fields = Vec::with_capacity(record.features.len() + 3);
    fields.push(record.name.to_lowercase());
    fields.push(record.description.to_lowercase());
    if let Some(address) = &record.address {
        fields.push(address.to_lowercase());
    }
    fields.extend(record.features.iter().map(|feature| feature.to_lowercase()));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, PlaceType};
    use rstest::{fixture, rstest};

    #[fixture]
    fn records() -> Vec<DestinationRecord> {
        vec![
            DestinationRecord::new("a", "Rumtek Monastery", Category::Monastery, PlaceType::Monastery)
                .with_rating(4.5)
                .with_address("Rumtek, East Sikkim")
                .with_features(["Golden Stupa", "Prayer wheels"]),
            DestinationRecord::new("b", "Tsomgo Lake", Category::NaturePoint, PlaceType::Lake)
                .with_rating(4.2)
                .with_description("Glacial lake on the road to Nathula."),
            DestinationRecord::new("c", "Mayfair Spa Resort", Category::Hotel, PlaceType::Hotel)
                .with_features(["Spa", "Casino"]),
        ]
    }

    fn ids(found: &[&DestinationRecord]) -> Vec<String> {
        found.iter().map(|record| record.id.to_string()).collect()
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_query_and_no_facets_returns_everything_in_order(
        records: Vec<DestinationRecord>,
        #[case] query: &str,
    ) {
        let found = filter(&records, query, &FacetSelection::new());
        assert_eq!(ids(&found), vec!["a", "b", "c"]);
    }

    #[rstest]
    #[case("rumtek", &["a"])]
    #[case("GLACIAL", &["b"])]
    #[case("east sikkim", &["a"])]
    #[case("casino", &["c"])]
    #[case("lake spa", &["b", "c"])]
    #[case("stupa", &["a"])]
    #[case("everest", &[])]
    fn text_matches_any_term_in_any_field(
        records: Vec<DestinationRecord>,
        #[case] query: &str,
        #[case] expected: &[&str],
    ) {
        let found = filter(&records, query, &FacetSelection::new());
        assert_eq!(ids(&found), expected);
    }

    #[rstest]
    fn missing_address_does_not_match_or_error(records: Vec<DestinationRecord>) {
        let found = filter(&records, "road", &FacetSelection::new());
        assert_eq!(ids(&found), vec!["b"]);
    }

    #[rstest]
    fn facet_step_and_text_step_are_intersected(records: Vec<DestinationRecord>) {
        let facets = FacetSelection::from_tags(["hotel", "lake"]);
        assert_eq!(ids(&filter(&records, "", &facets)), vec!["b", "c"]);
        assert_eq!(ids(&filter(&records, "spa", &facets)), vec!["c"]);
        assert!(filter(&records, "rumtek", &facets).is_empty());
    }

    #[rstest]
    fn filtering_is_idempotent(records: Vec<DestinationRecord>) {
        let facets = FacetSelection::from_tags(["monastery", "hotel"]);
        let first = filter(&records, "spa monastery", &facets);
        let second = filter(&records, "spa monastery", &facets);
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["a", "c"]);
    }

    #[rstest]
    fn search_terms_are_trimmed_and_lowercased() {
        assert_eq!(search_terms("  Rumtek   LAKE "), vec!["rumtek", "lake"]);
        assert!(search_terms("  ").is_empty());
    }
}
