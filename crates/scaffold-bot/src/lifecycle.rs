//! Startup and shutdown ordering.

use crate::error::BotResult;
use crate::scheduler::{CleanupScheduler, CLEANUP_INTERVAL};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use scaffold_commands::{
    builtin_modules, framework_options, Command, CommandRegistry, Data, HttpSession,
    StartupReport,
};
use scaffold_common::{GuildId, TempWorkspace};
use scaffold_config::defaults::LIVE_NAMESPACE;
use scaffold_config::Config;
use scaffold_store::{Database, GuildRegistry, SettingsStore};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Everything built before the gateway connects.
pub struct Prepared {
    /// Shared data handed to the framework.
    pub data: Data,
    /// Commands to register.
    pub commands: Vec<Command>,
    /// Which command modules loaded.
    pub report: StartupReport,
    /// Open database handle.
    pub database: Database,
}

/// Runs the startup phases in order, up to opening the HTTP session.
pub async fn prepare(config: Config) -> BotResult<Prepared> {
    let workspace = Arc::new(TempWorkspace::ensure(&config.paths.temp_root)?);

    let (registry, report) = CommandRegistry::build(&builtin_modules());
    if !report.is_complete() {
        warn!(
            "{} command module(s) failed to load; continuing with {}",
            report.failed.len(),
            report.loaded.join(", ")
        );
    }

    let database = Database::open(&config.database.uri)?;
    database.bootstrap(LIVE_NAMESPACE)?;

    let namespace = database.namespace(config.namespace());
    if config.test_mode {
        warn!("Running in test mode. Connected to test database.");
    } else {
        info!("Connected to database.");
    }

    let settings = Arc::new(SettingsStore::new(&namespace)?);
    settings.ensure_exists().await?;
    let guilds = Arc::new(GuildRegistry::new(&namespace)?);

    let http = HttpSession::open()?;

    Ok(Prepared {
        data: Data {
            config: Arc::new(config),
            settings,
            guilds,
            workspace,
            http,
        },
        commands: registry.into_commands(),
        report,
        database,
    })
}

/// Stops every gateway shard.
#[async_trait]
pub trait GatewayShutdown: Send + Sync {
    /// Disconnects all shards.
    async fn shutdown_all(&self);
}

#[async_trait]
impl GatewayShutdown for serenity::ShardManager {
    async fn shutdown_all(&self) {
        Self::shutdown_all(self).await;
    }
}

/// Closes HTTP, then the gateway, then the cleanup scheduler.
pub async fn shutdown<G>(http: &HttpSession, gateway: &G, scheduler: &CancellationToken)
where
    G: GatewayShutdown + ?Sized,
{
    http.close();
    gateway.shutdown_all().await;
    scheduler.cancel();
    info!("Shutdown complete");
}

/// Lines logged once the gateway is ready.
pub fn ready_banner(name: &str, id: u64, guild_count: usize) -> Vec<String> {
    vec![
        "------".to_string(),
        format!("{name} v{}", env!("CARGO_PKG_VERSION")),
        format!("ID: {id}"),
        format!("Guilds: {guild_count}"),
        "Framework: poise 0.6 on serenity 0.12".to_string(),
        format!(
            "Running on: {} ({})",
            std::env::consts::OS,
            std::env::consts::ARCH
        ),
        "------".to_string(),
    ]
}

/// Registers the commands in every test guild.
///
/// A guild that fails is logged and skipped so the others, and startup
/// itself, still go ahead. Returns the guilds that succeeded.
pub async fn register_test_guilds<F, Fut, E>(
    guild_ids: &[GuildId],
    mut register: F,
) -> Vec<GuildId>
where
    F: FnMut(GuildId) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: fmt::Display,
{
    let mut registered = Vec::with_capacity(guild_ids.len());
    for &guild_id in guild_ids {
        match register(guild_id).await {
            Ok(()) => {
                info!("Registered commands in guild {guild_id}");
                registered.push(guild_id);
            }
            Err(e) => error!("Failed to register commands in guild {guild_id}: {e}"),
        }
    }
    registered
}

/// Prepares, connects and runs the bot until shutdown.
pub async fn run(config: Config) -> BotResult<()> {
    let Prepared {
        data,
        commands,
        report,
        database: _database,
    } = prepare(config).await?;
    info!("Loaded command modules: {}", report.loaded.join(", "));

    let token = data.config.discord.token.clone();
    let guild_ids = data.config.discord.test_guild_ids.clone();
    let http = data.http.clone();

    let (ready_tx, ready_rx) = watch::channel(false);
    let cancel = CancellationToken::new();
    let scheduler = CleanupScheduler::new(
        data.workspace.clone(),
        CLEANUP_INTERVAL,
        ready_rx,
        cancel.clone(),
    );
    let scheduler_task = tokio::spawn(scheduler.run());

    let framework = poise::Framework::builder()
        .options(framework_options(commands))
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                for line in ready_banner(&ready.user.name, ready.user.id.get(), ready.guilds.len()) {
                    info!("{line}");
                }
                let commands = &framework.options().commands;
                register_test_guilds(&guild_ids, move |guild_id| {
                    poise::builtins::register_in_guild(
                        ctx,
                        commands,
                        serenity::GuildId::new(guild_id.0),
                    )
                })
                .await;
                if ready_tx.send(true).is_err() {
                    warn!("Cleanup scheduler is gone; no sweeps will run");
                }
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&token, serenity::GatewayIntents::non_privileged())
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();
    let shutdown_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {:?}", e);
            return;
        }
        info!("Received shutdown signal, starting graceful shutdown");
        shutdown(&http, shard_manager.as_ref(), &shutdown_cancel).await;
    });

    info!("scaffold-bot is starting up...");
    let result = client.start().await;
    cancel.cancel();

    match scheduler_task.await {
        Ok(sweeps) => info!("Cleanup scheduler ran {sweeps} sweeps"),
        Err(e) => error!("Cleanup scheduler task failed: {e}"),
    }

    if let Err(why) = result {
        error!("Client error: {:?}", why);
        return Err(why.into());
    }
    info!("scaffold-bot has shut down");
    Ok(())
}
