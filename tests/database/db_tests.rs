use serial_test::serial;
use std::collections::BTreeMap;
use tennis_rating_processor::{
    database::{db::DbClient, memory_store::InMemoryStore, snapshot_store::SnapshotStore},
    model::{
        recalc::{full_recompute, incremental_update},
        structures::{model_kind::ModelKind, rating_context::RatingContext, surface::Surface}
    },
    utils::test_utils::{generate_match, generate_random_matches, generate_random_matches_from}
};

use super::test_helpers::TestDatabase;
use crate::common::{all_models, chain_heads, init_test_env};

#[tokio::test]
#[serial]
#[ignore = "requires docker"]
async fn test_matches_round_trip() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let matches = generate_random_matches(20, 5, 1);
    test_db.insert_matches(&matches).await.expect("Failed to insert matches");

    let client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    assert_eq!(client.matches().await.unwrap(), matches);
}

#[tokio::test]
#[serial]
#[ignore = "requires docker"]
async fn test_full_then_incremental_matches_in_memory() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let head = generate_random_matches(60, 8, 2);
    let tail = generate_random_matches_from(61, 60, 40, 8, 3);
    test_db.insert_matches(&head).await.unwrap();

    let client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    full_recompute(&client, &all_models(), 100).await.unwrap();
    test_db.insert_matches(&tail).await.unwrap();
    let report = incremental_update(&client, &all_models(), 100).await.unwrap();
    assert_eq!(report.matches_processed, 40);

    let reference = InMemoryStore::new(head.into_iter().chain(tail).collect());
    full_recompute(&reference, &all_models(), 100).await.unwrap();

    let mut persisted = Vec::new();
    for competitor_id in 1..=8 {
        for model in all_models() {
            for context in [RatingContext::Overall, RatingContext::Surface(Surface::Clay)] {
                persisted.extend(client.snapshot_history(competitor_id, model, context).await.unwrap());
            }
        }
    }
    let expected: BTreeMap<_, _> = chain_heads(&reference.snapshots())
        .into_iter()
        .filter(|((_, _, context), _)| matches!(context, RatingContext::Overall | RatingContext::Surface(Surface::Clay)))
        .collect();

    assert_eq!(chain_heads(&persisted), expected);
}

#[tokio::test]
#[serial]
#[ignore = "requires docker"]
async fn test_snapshot_lookups_before_position() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let matches = vec![
        generate_match(1, 1, 2, 1, 0, None, None),
        generate_match(2, 1, 2, 2, 1, None, None),
        generate_match(3, 1, 2, 1, 1, None, None),
    ];
    test_db.insert_matches(&matches).await.unwrap();

    let client = DbClient::connect(&test_db.connection_string).await.unwrap();
    full_recompute(&client, &[ModelKind::Elo], 2).await.unwrap();

    let before_third = Some(matches[2].position());
    let latest = client
        .latest_snapshot(1, ModelKind::Elo, RatingContext::Overall, before_third)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.match_id, 2);
    assert_eq!(
        client
            .count_snapshots(1, ModelKind::Elo, RatingContext::Overall, before_third)
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        client.latest_rated_position(ModelKind::Elo).await.unwrap(),
        Some(matches[2].position())
    );
    assert_eq!(client.unrated_matches(ModelKind::Glicko2).await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
#[ignore = "requires docker"]
async fn test_writer_lock_is_exclusive() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");

    let first = DbClient::connect(&test_db.connection_string).await.unwrap();
    let second = DbClient::connect(&test_db.connection_string).await.unwrap();

    assert!(first.try_acquire_writer_lock().await.unwrap());
    assert!(!second.try_acquire_writer_lock().await.unwrap());

    first.release_writer_lock().await.unwrap();
    assert!(second.try_acquire_writer_lock().await.unwrap());
}
