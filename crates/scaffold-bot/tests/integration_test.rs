//! Integration tests for scaffold-bot startup

use scaffold_bot::prepare;
use scaffold_common::test_utils::{create_temp_dir, init_test_logging};
use scaffold_common::{GuildId, WORKSPACE_DIR_NAME};
use scaffold_config::{Config, ConfigLoader};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

fn config(root: &Path, test_mode: bool) -> Config {
    let env: HashMap<&str, String> = [
        ("DEBUG", "0".to_string()),
        ("FRAMEWORK_LOGGING", "0".to_string()),
        ("TEST_MODE", if test_mode { "1" } else { "0" }.to_string()),
        ("DISCORD_BOT_TOKEN", "token".to_string()),
        ("TEST_GUILD_ID", "42".to_string()),
        (
            "DATABASE_URI",
            format!("sled://{}", root.join("db").display()),
        ),
        ("NASA_KEY", "DEMO_KEY".to_string()),
        ("BOT_TEMP_ROOT", root.join("tmp").display().to_string()),
        ("BOT_LOG_DIR", root.join("log").display().to_string()),
    ]
    .into_iter()
    .collect();

    ConfigLoader::from_lookup(|key| env.get(key).cloned()).unwrap()
}

fn collections(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[tokio::test]
async fn test_startup_on_empty_database() {
    init_test_logging();
    let root = create_temp_dir();

    let prepared = prepare(config(root.path(), false)).await.unwrap();

    assert!(root.path().join("tmp").join(WORKSPACE_DIR_NAME).is_dir());
    assert!(prepared.report.is_complete());
    assert_eq!(
        prepared.database.collection_names("scaffold-bot"),
        collections(&["guilds", "settings"])
    );

    let settings = prepared.data.settings.get().unwrap().unwrap();
    assert!(!settings.toggle);
    assert_eq!(prepared.data.settings.count(), 1);
    assert_eq!(prepared.data.guilds.count(), 0);
    assert!(prepared.data.http.is_open());
    assert_eq!(prepared.data.config.discord.test_guild_ids, vec![GuildId(42)]);
}

#[tokio::test]
async fn test_restart_keeps_single_settings_record() {
    init_test_logging();
    let root = create_temp_dir();

    let first = prepare(config(root.path(), false)).await.unwrap();
    assert!(first.data.settings.toggle().await.unwrap());
    drop(first);

    let second = prepare(config(root.path(), false)).await.unwrap();
    assert_eq!(second.data.settings.count(), 1);
    assert!(second.data.settings.get().unwrap().unwrap().toggle);
}

#[tokio::test]
async fn test_test_mode_uses_separate_namespace() {
    init_test_logging();
    let root = create_temp_dir();

    let prepared = prepare(config(root.path(), true)).await.unwrap();

    // The live namespace is still bootstrapped; records go to the test one.
    assert_eq!(
        prepared.database.collection_names("scaffold-bot"),
        collections(&["guilds", "settings"])
    );
    assert!(prepared
        .database
        .collection_names("test-scaffold-bot")
        .contains("settings"));
    assert_eq!(prepared.data.settings.count(), 1);
}

#[tokio::test]
async fn test_unusable_temp_root_is_fatal() {
    init_test_logging();
    let root = create_temp_dir();
    std::fs::write(root.path().join("tmp"), b"not a directory").unwrap();

    assert!(prepare(config(root.path(), false)).await.is_err());
}
