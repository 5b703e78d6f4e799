//! Row shapes exchanged with the `favorites` table, and body decoding.

use serde::{Deserialize, Serialize};
use yatra_core::{DestinationRecord, RecordId, SourceError, UserId};

/// A row returned by `GET /rest/v1/favorites?select=place_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct FavoriteRow {
    pub(crate) place_id: RecordId,
}

/// Body of `POST /rest/v1/favorites`.
#[derive(Debug, Serialize)]
pub(crate) struct NewFavorite<'a> {
    pub(crate) user_id: &'a UserId,
    pub(crate) place_id: &'a RecordId,
}

fn decode_error(err: &serde_json::Error) -> SourceError {
    SourceError::Decode {
        message: err.to_string(),
    }
}

/// Decode a `places` response body.
pub(crate) fn decode_records(body: &str) -> Result<Vec<DestinationRecord>, SourceError> {
    serde_json::from_str(body).map_err(|err| decode_error(&err))
}

/// Decode a `favorites` response body into record ids.
pub(crate) fn decode_favorites(body: &str) -> Result<Vec<RecordId>, SourceError> {
    let rows: Vec<FavoriteRow> = serde_json::from_str(body).map_err(|err| decode_error(&err))?;
    Ok(rows.into_iter().map(|row| row.place_id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use yatra_core::Category;

    #[rstest]
    fn decodes_places_with_extra_columns() {
        let body = r#"[{
            "id": "rumtek",
            "name": "Rumtek Monastery",
            "category": "monasteries",
            "place_type": "monastery",
            "rating": 4.5,
            "is_featured": true,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z"
        }]"#;
        let records = decode_records(body).expect("decode places");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::Monastery);
        assert!(records[0].is_featured);
    }

    #[rstest]
    fn decodes_favorite_rows_in_order() {
        let body = r#"[{"place_id": "b"}, {"place_id": "a"}]"#;
        assert_eq!(
            decode_favorites(body).expect("decode favorites"),
            vec![RecordId::new("b"), RecordId::new("a")]
        );
    }

    #[rstest]
    #[case::not_json("<html>Bad Gateway</html>")]
    #[case::object_not_array(r#"{"message": "JWT expired"}"#)]
    fn malformed_bodies_are_decode_errors(#[case] body: &str) {
        assert!(matches!(decode_records(body), Err(SourceError::Decode { .. })));
        assert!(matches!(decode_favorites(body), Err(SourceError::Decode { .. })));
    }

    #[rstest]
    fn new_favorite_serialises_wire_names() {
        let user = UserId::new("u-1");
        let place = RecordId::new("rumtek");
        let body = serde_json::to_value(NewFavorite {
            user_id: &user,
            place_id: &place,
        })
        .expect("serialise");
        assert_eq!(body, serde_json::json!({"user_id": "u-1", "place_id": "rumtek"}));
    }
}
