//! Behavioural tests for the REST sources driving a catalog session.
//!
//! These use [`StubRestSource`] so response bodies go through the real
//! decoders without a running service.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use yatra_core::test_support::block_on;
use yatra_core::{
    Activation, CatalogSession, FavoriteSync, FetchError, RecordId, SourceError, UserId,
    WatchSessionGate,
};
use yatra_data::rest::test_support::StubRestSource;

type Session = CatalogSession<StubRestSource, StubRestSource, Arc<WatchSessionGate>>;

const THREE_ROWS: &str = r#"[
    {"id": "losar", "name": "Losar", "category": "culture_festivals",
     "place_type": "festival", "rating": null, "features": null},
    {"id": "tsomgo", "name": "Tsomgo Lake", "category": "nature_points",
     "place_type": "lake", "rating": 4.2, "description": null},
    {"id": "rumtek", "name": "Rumtek Monastery", "category": "monasteries",
     "place_type": "monastery", "rating": 4.5, "is_featured": true}
]"#;

/// Collaborators and outcomes shared by the steps of one scenario.
pub struct RestWorld {
    source: RefCell<StubRestSource>,
    gate: Arc<WatchSessionGate>,
    session: RefCell<Option<Session>>,
    activation: RefCell<Option<Result<Activation, FetchError>>>,
}

#[fixture]
fn world() -> RestWorld {
    RestWorld {
        source: RefCell::new(StubRestSource::default()),
        gate: Arc::new(WatchSessionGate::anonymous()),
        session: RefCell::new(None),
        activation: RefCell::new(None),
    }
}

#[given("a places response with three rows")]
fn three_rows(world: &RestWorld) {
    world
        .source
        .replace(StubRestSource::with_places_body(THREE_ROWS));
}

#[given("a places response that is not JSON")]
fn not_json(world: &RestWorld) {
    world
        .source
        .replace(StubRestSource::with_places_body("<html>502 Bad Gateway</html>"));
}

#[given("user {user} is signed in with favorite {record}")]
fn signed_in_with_favorite(world: &RestWorld, user: String, record: String) {
    let user = UserId::new(user);
    world
        .source
        .borrow()
        .set_favorites_body(&user, format!(r#"[{{"place_id": "{record}"}}]"#));
    world.gate.sign_in(user);
}

#[given("favorite writes fail")]
fn writes_fail(world: &RestWorld) {
    world.source.borrow().fail_writes(SourceError::Http {
        url: "https://abc.supabase.co/rest/v1/favorites".to_owned(),
        status: 503,
        message: "service unavailable".to_owned(),
    });
}

#[when("the catalog is activated")]
fn activate(world: &RestWorld) {
    let source = world.source.borrow().clone();
    let favorites = Arc::new(FavoriteSync::new(source.clone(), Arc::clone(&world.gate)));
    let mut session = CatalogSession::new(source, favorites);
    let outcome = block_on(session.activate());
    world.activation.replace(Some(outcome));
    world.session.replace(Some(session));
}

#[when("the user toggles favorite {record}")]
fn toggle(world: &RestWorld, record: String) {
    let session = world.session.borrow();
    let session = session.as_ref().expect("catalog should be activated");
    let notice = block_on(session.toggle_favorite(&RecordId::new(record)));
    assert!(notice.is_error(), "writes are configured to fail");
}

#[then("the catalog order is {ids}")]
fn catalog_order(world: &RestWorld, ids: String) {
    let session = world.session.borrow();
    let session = session.as_ref().expect("catalog should be activated");
    let actual: Vec<&str> = session
        .filtered_records()
        .into_iter()
        .map(|record| record.id.as_str())
        .collect();
    let expected: Vec<&str> = ids.split(',').map(str::trim).collect();
    assert_eq!(actual, expected);
}

#[then("{record} has category {category}")]
fn has_category(world: &RestWorld, record: String, category: String) {
    let session = world.session.borrow();
    let session = session.as_ref().expect("catalog should be activated");
    let found = session.record(&record).expect("record should be loaded");
    assert_eq!(found.category.as_str(), category);
}

#[then("activation fails with a decode error")]
fn decode_failure(world: &RestWorld) {
    let activation = world.activation.borrow();
    assert!(
        matches!(
            activation.as_ref(),
            Some(Err(FetchError::Records(SourceError::Decode { .. })))
        ),
        "unexpected activation {activation:?}"
    );
}

#[then("the favorites are {ids}")]
fn favorites_are(world: &RestWorld, ids: String) {
    let session = world.session.borrow();
    let session = session.as_ref().expect("catalog should be activated");
    let expected: Vec<RecordId> = ids.split(',').map(|id| RecordId::new(id.trim())).collect();
    assert_eq!(session.favorite_sync().favorites(), expected);
}

#[scenario(path = "tests/features/rest_source.feature", index = 0)]
fn rows_decode_and_order(world: RestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rest_source.feature", index = 1)]
fn malformed_response_fails(world: RestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rest_source.feature", index = 2)]
fn failing_write_rolls_back(world: RestWorld) {
    let _ = world;
}
