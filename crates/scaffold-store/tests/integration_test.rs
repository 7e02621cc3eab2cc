//! Integration tests for scaffold-store

use scaffold_common::test_utils::discord_fixtures::{test_channel_id, test_guild_id};
use scaffold_common::test_utils::init_test_logging;
use scaffold_store::{Database, GuildRegistry, JoinOutcome, SettingsStore};

#[tokio::test]
async fn test_records_survive_reopen() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("sled://{}", dir.path().join("db").display());

    {
        let db = Database::open(&uri).unwrap();
        db.bootstrap("scaffold-bot").unwrap();
        let namespace = db.namespace("scaffold-bot");
        SettingsStore::new(&namespace)
            .unwrap()
            .ensure_exists()
            .await
            .unwrap();
        GuildRegistry::new(&namespace)
            .unwrap()
            .on_join(test_guild_id(), "Test Guild", Some(test_channel_id()))
            .await
            .unwrap();
    }

    let db = Database::open(&uri).unwrap();
    assert!(!db.bootstrap("scaffold-bot").unwrap());
    let namespace = db.namespace("scaffold-bot");

    let settings = SettingsStore::new(&namespace).unwrap();
    assert!(!settings.ensure_exists().await.unwrap());
    assert_eq!(settings.count(), 1);

    let guilds = GuildRegistry::new(&namespace).unwrap();
    let outcome = guilds
        .on_join(test_guild_id(), "Test Guild", Some(test_channel_id()))
        .await
        .unwrap();
    assert!(matches!(outcome, JoinOutcome::AlreadyRegistered(_)));
}

#[tokio::test]
async fn test_live_and_test_namespaces_do_not_share_records() {
    init_test_logging();
    let db = Database::temporary().unwrap();

    let live = GuildRegistry::new(&db.namespace("scaffold-bot")).unwrap();
    let test = GuildRegistry::new(&db.namespace("test-scaffold-bot")).unwrap();

    live.on_join(test_guild_id(), "Test Guild", None).await.unwrap();

    assert_eq!(live.count(), 1);
    assert_eq!(test.count(), 0);
    assert!(!test.on_rename(test_guild_id(), "Other").await.unwrap());
}

#[tokio::test]
async fn test_concurrent_joins_register_once() {
    init_test_logging();
    let db = Database::temporary().unwrap();
    let registry = std::sync::Arc::new(GuildRegistry::new(&db.namespace("scaffold-bot")).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .on_join(test_guild_id(), "Test Guild", None)
                    .await
                    .unwrap()
                    .is_created()
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(registry.count(), 1);
}
