//! Focused unit tests covering argument parsing and configuration checks.

use std::time::Duration;

use super::*;
use crate::config::{
    ARG_API_KEY, ARG_BASE_URL, ARG_RECORD_ID, ARG_USER_ID, FavoritesConfig, SearchConfig,
    ToggleConfig,
};
use rstest::rstest;
use yatra_core::{FacetSelection, RecordId, UserId};
use yatra_data::rest::DEFAULT_TIMEOUT_SECS;

fn search_args() -> SearchArgs {
    SearchArgs {
        base_url: Some("https://abc.supabase.co".to_owned()),
        api_key: Some("anon".to_owned()),
        ..SearchArgs::default()
    }
}

fn expect_missing(err: CliError, field: &'static str, env_var: &'static str) {
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(None, Some("anon"), ARG_BASE_URL, SearchArgs::ENV_BASE_URL)]
#[case(Some("https://abc.supabase.co"), None, ARG_API_KEY, SearchArgs::ENV_API_KEY)]
fn search_without_connection_settings_errors(
    #[case] base_url: Option<&str>,
    #[case] api_key: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = SearchArgs {
        base_url: base_url.map(str::to_owned),
        api_key: api_key.map(str::to_owned),
        ..SearchArgs::default()
    };
    let err = SearchConfig::try_from(args).expect_err("missing field should error");
    expect_missing(err, field, env_var);
}

#[rstest]
fn search_defaults_apply() {
    let config = SearchConfig::try_from(search_args()).expect("valid search args");
    assert_eq!(config.query, "");
    assert!(config.facets.is_empty());
    assert_eq!(config.connection.user, None);
    assert_eq!(config.connection.access_token, None);
    assert_eq!(
        config.connection.timeout,
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    );
}

#[rstest]
fn zero_timeout_is_rejected() {
    let args = SearchArgs {
        timeout_secs: Some(0),
        ..search_args()
    };
    let err = SearchConfig::try_from(args).expect_err("zero timeout should error");
    assert!(matches!(err, CliError::ZeroTimeout), "unexpected {err:?}");
}

#[rstest]
fn facets_are_normalised() {
    let args = SearchArgs {
        facets: vec![" Lake ".to_owned(), "monastery".to_owned()],
        ..search_args()
    };
    let config = SearchConfig::try_from(args).expect("known facets");
    assert_eq!(config.facets, FacetSelection::from_tags(["lake", "monastery"]));
}

#[rstest]
fn unknown_facet_lists_the_offered_ones() {
    let args = SearchArgs {
        facets: vec!["lake".to_owned(), "beach".to_owned()],
        ..search_args()
    };
    let err = SearchConfig::try_from(args).expect_err("unknown facet should error");
    match err {
        CliError::UnknownFacet { tag, expected } => {
            assert_eq!(tag, "beach");
            assert!(expected.starts_with("mountain, monastery, lake"));
        }
        other => panic!("expected UnknownFacet, found {other:?}"),
    }
}

#[rstest]
fn favorites_require_a_user() {
    let args = FavoritesArgs {
        base_url: Some("https://abc.supabase.co".to_owned()),
        api_key: Some("anon".to_owned()),
        ..FavoritesArgs::default()
    };
    let err = FavoritesConfig::try_from(args).expect_err("missing user should error");
    expect_missing(err, ARG_USER_ID, FavoritesArgs::ENV_USER_ID);
}

#[rstest]
#[case(None, Some("rumtek"), ARG_USER_ID, ToggleArgs::ENV_USER_ID)]
#[case(Some("u1"), None, ARG_RECORD_ID, ToggleArgs::ENV_RECORD_ID)]
fn toggle_requires_user_and_record(
    #[case] user_id: Option<&str>,
    #[case] record_id: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = ToggleArgs {
        base_url: Some("https://abc.supabase.co".to_owned()),
        api_key: Some("anon".to_owned()),
        user_id: user_id.map(str::to_owned),
        record_id: record_id.map(str::to_owned),
        ..ToggleArgs::default()
    };
    let err = ToggleConfig::try_from(args).expect_err("missing field should error");
    expect_missing(err, field, env_var);
}

#[rstest]
fn toggle_config_carries_identity() {
    let args = ToggleArgs {
        base_url: Some("https://abc.supabase.co".to_owned()),
        api_key: Some("anon".to_owned()),
        access_token: Some("jwt".to_owned()),
        user_id: Some("u1".to_owned()),
        timeout_secs: Some(5),
        record_id: Some("rumtek".to_owned()),
    };
    let config = ToggleConfig::try_from(args).expect("valid toggle args");
    assert_eq!(config.user, UserId::new("u1"));
    assert_eq!(config.record_id, RecordId::new("rumtek"));
    assert_eq!(config.connection.access_token.as_deref(), Some("jwt"));
    assert_eq!(config.connection.timeout, Duration::from_secs(5));
}

#[rstest]
fn search_flags_parse() {
    let cli = Cli::try_parse_from([
        "yatra",
        "search",
        "--base-url",
        "https://abc.supabase.co",
        "--api-key",
        "anon",
        "-q",
        "rumtek",
        "--facet",
        "lake",
        "--facet",
        "park",
    ])
    .expect("search flags should parse");
    match cli.command {
        Command::Search(args) => {
            assert_eq!(args.query.as_deref(), Some("rumtek"));
            assert_eq!(args.facets, ["lake", "park"]);
            assert_eq!(args.api_key.as_deref(), Some("anon"));
        }
        other => panic!("expected search command, found {other:?}"),
    }
}

#[rstest]
fn toggle_takes_a_positional_record() {
    let cli = Cli::try_parse_from(["yatra", "toggle", "tsomgo", "--user-id", "u1"])
        .expect("toggle flags should parse");
    match cli.command {
        Command::Toggle(args) => {
            assert_eq!(args.record_id.as_deref(), Some("tsomgo"));
            assert_eq!(args.user_id.as_deref(), Some("u1"));
        }
        other => panic!("expected toggle command, found {other:?}"),
    }
}
